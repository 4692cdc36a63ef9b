//! Core data types for a router topology snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::naming::router_sort_key;

/// External index of a topology instance ("Topologi N")
pub type TopologyId = u32;

/// Routing protocols a router can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[serde(alias = "OSPF")]
    Ospf,
    #[serde(alias = "EIGRP")]
    Eigrp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Ospf => write!(f, "ospf"),
            Protocol::Eigrp => write!(f, "eigrp"),
        }
    }
}

/// Router-level routing process information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routing {
    #[serde(default)]
    pub protocol: BTreeSet<Protocol>,
    #[serde(default)]
    pub redistribute: bool,
}

impl Routing {
    pub fn runs(&self, protocol: Protocol) -> bool {
        self.protocol.contains(&protocol)
    }

    /// True when OSPF and EIGRP coexist, which makes redistribution mandatory.
    pub fn needs_redistribution(&self) -> bool {
        self.runs(Protocol::Ospf) && self.runs(Protocol::Eigrp)
    }
}

/// OSPF area identifier, written either as a plain number or a dotted quad
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaId {
    Number(u32),
    Text(String),
}

impl AreaId {
    /// Numeric value of the area when it can be determined
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            AreaId::Number(n) => Some(*n),
            AreaId::Text(s) => {
                let s = s.trim();
                s.parse::<u32>()
                    .ok()
                    .or_else(|| s.parse::<Ipv4Addr>().ok().map(u32::from))
            }
        }
    }
}

impl PartialEq for AreaId {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_u32(), other.as_u32()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string().trim() == other.to_string().trim(),
        }
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaId::Number(n) => write!(f, "{}", n),
            AreaId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// OSPF interface network type as reported by the device.
///
/// The value set is open (`point-to-point`, `broadcast`, `non-broadcast`, ...),
/// so it is kept as text and compared in normalized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkType(pub String);

impl NetworkType {
    /// Lowercase form with `_` folded into `-`, e.g. `POINT_TO_POINT` -> `point-to-point`
    pub fn normalized(&self) -> String {
        self.0.trim().to_lowercase().replace('_', "-")
    }
}

impl PartialEq for NetworkType {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// OSPF authentication type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    #[default]
    None,
    Simple,
    MessageDigest,
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "" | "none" | "null" => Ok(AuthType::None),
            "simple" | "clear-text" | "plain" => Ok(AuthType::Simple),
            "message-digest" | "md5" => Ok(AuthType::MessageDigest),
            other => Err(format!("unknown OSPF authentication type '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for AuthType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            Some(s) => s.parse().map_err(serde::de::Error::custom),
            None => Ok(AuthType::None),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::None => write!(f, "none"),
            AuthType::Simple => write!(f, "simple"),
            AuthType::MessageDigest => write!(f, "message-digest"),
        }
    }
}

/// Key name denoting a clear-text OSPF authentication key
pub const SIMPLE_KEY: &str = "simple";

/// Per-interface OSPF parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OspfConfig {
    #[serde(rename = "Hello", alias = "hello", default)]
    pub hello: Option<u32>,
    #[serde(rename = "Dead", alias = "dead", default)]
    pub dead: Option<u32>,
    #[serde(default)]
    pub area: Option<AreaId>,
    #[serde(rename = "Network Type", alias = "network_type", default)]
    pub network_type: Option<NetworkType>,
    #[serde(default)]
    pub passive: bool,
    #[serde(rename = "ospf auth", alias = "auth_type", default)]
    pub auth_type: AuthType,
    /// `"simple"` -> clear-text key, any other name -> MD5 key id
    #[serde(rename = "auth_key", alias = "auth_keys", default)]
    pub auth_keys: BTreeMap<String, String>,
}

impl OspfConfig {
    pub fn simple_key(&self) -> Option<&str> {
        self.auth_keys.get(SIMPLE_KEY).map(String::as_str)
    }

    /// MD5 key id -> key pairs
    pub fn digest_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.auth_keys
            .iter()
            .filter(|(id, _)| id.as_str() != SIMPLE_KEY)
            .map(|(id, key)| (id.as_str(), key.as_str()))
    }
}

/// One-directional, by-name reference to the interface on the other end of a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborRef {
    pub router: String,
    pub interface: String,
}

/// Address fields hold whatever the device printed; "unassigned" and other
/// non-addresses read as absent.
fn lenient_ipv4<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Ipv4Addr>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// A router interface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(default, deserialize_with = "lenient_ipv4")]
    pub ip: Option<Ipv4Addr>,
    #[serde(default, alias = "subnet_mask", deserialize_with = "lenient_ipv4")]
    pub subnet: Option<Ipv4Addr>,
    #[serde(rename = "MTU", alias = "mtu", default)]
    pub mtu: Option<u32>,
    /// Absent when the interface does not take part in OSPF
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ospf: Option<OspfConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbor: Option<NeighborRef>,
}

/// A router in the snapshot. Identity is the map key it is stored under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Router {
    #[serde(default)]
    pub router_id: Option<String>,
    #[serde(default)]
    pub routing: Routing,
    #[serde(default)]
    pub interfaces: BTreeMap<String, Interface>,
}

impl Router {
    /// Router ID, ignoring blank values
    pub fn router_id(&self) -> Option<&str> {
        self.router_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// A complete, read-only topology snapshot: router name -> router
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topology {
    routers: BTreeMap<String, Router>,
}

impl Topology {
    pub fn new(routers: BTreeMap<String, Router>) -> Self {
        Self { routers }
    }

    pub fn router(&self, name: &str) -> Option<&Router> {
        self.routers.get(name)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// Routers ordered by the numeric suffix of their name (R2 before R10)
    pub fn routers(&self) -> Vec<(&str, &Router)> {
        let mut routers: Vec<(&str, &Router)> = self
            .routers
            .iter()
            .map(|(name, router)| (name.as_str(), router))
            .collect();
        routers.sort_by(|a, b| router_sort_key(a.0).cmp(&router_sort_key(b.0)));
        routers
    }
}

impl FromIterator<(String, Router)> for Topology {
    fn from_iter<I: IntoIterator<Item = (String, Router)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_id_equivalence() {
        assert_eq!(AreaId::Number(0), AreaId::Text("0.0.0.0".to_string()));
        assert_eq!(AreaId::Number(1), AreaId::Text("1".to_string()));
        assert_ne!(AreaId::Number(1), AreaId::Text("0.0.0.2".to_string()));
        assert_eq!(AreaId::Text("backbone".into()), AreaId::Text(" backbone ".into()));
    }

    #[test]
    fn test_network_type_normalization() {
        let a = NetworkType("POINT_TO_POINT".to_string());
        let b = NetworkType("point-to-point".to_string());
        assert_eq!(a, b);
        assert_ne!(a, NetworkType("Broadcast".to_string()));
    }

    #[test]
    fn test_deserialize_router() {
        let json = r#"{
            "router_id": "1.1.1.1",
            "routing": {"protocol": ["ospf", "eigrp"], "redistribute": false},
            "interfaces": {
                "FastEthernet0/1": {
                    "ip": "10.0.12.1",
                    "subnet": "255.255.255.252",
                    "MTU": 1500,
                    "ospf": {
                        "Hello": 10,
                        "Dead": 40,
                        "area": 0,
                        "Network Type": "BROADCAST",
                        "passive": false,
                        "ospf auth": "message-digest",
                        "auth_key": {"1": "cisco123"}
                    },
                    "neighbor": {"router": "R2", "interface": "FastEthernet 0/1"}
                },
                "Loopback0": {"ip": "1.1.1.1", "subnet": "255.255.255.255", "MTU": 1514}
            }
        }"#;

        let router: Router = serde_json::from_str(json).unwrap();
        assert_eq!(router.router_id(), Some("1.1.1.1"));
        assert!(router.routing.needs_redistribution());

        let fa01 = &router.interfaces["FastEthernet0/1"];
        let ospf = fa01.ospf.as_ref().unwrap();
        assert_eq!(ospf.hello, Some(10));
        assert_eq!(ospf.auth_type, AuthType::MessageDigest);
        assert_eq!(ospf.digest_keys().collect::<Vec<_>>(), vec![("1", "cisco123")]);
        assert_eq!(fa01.neighbor.as_ref().unwrap().interface, "FastEthernet 0/1");

        assert!(router.interfaces["Loopback0"].ospf.is_none());
    }

    #[test]
    fn test_auth_type_parsing() {
        assert_eq!("Message-Digest".parse::<AuthType>(), Ok(AuthType::MessageDigest));
        assert_eq!("SIMPLE".parse::<AuthType>(), Ok(AuthType::Simple));
        assert_eq!("none".parse::<AuthType>(), Ok(AuthType::None));
        assert!("kerberos".parse::<AuthType>().is_err());
    }

    #[test]
    fn test_routers_sorted_numerically() {
        let topology: Topology = ["R10", "R2", "R1"]
            .iter()
            .map(|name| (name.to_string(), Router::default()))
            .collect();
        let names: Vec<&str> = topology.routers().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["R1", "R2", "R10"]);
    }
}
