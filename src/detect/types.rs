//! Finding types shared by the detector, the ground-truth parser and the evaluator.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::topology::{sort_routers, TopologyId};

/// The ten canonical mismatch kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MismatchKind {
    HelloMismatch,
    DeadMismatch,
    NetworkTypeMismatch,
    AreaMismatch,
    AuthMismatch,
    AuthKeyMismatch,
    #[serde(rename = "MTUMismatch")]
    MtuMismatch,
    PassiveMismatch,
    RedistributeMismatch,
    #[serde(rename = "RouterIDMismatch")]
    RouterIdMismatch,
}

impl MismatchKind {
    pub const ALL: [MismatchKind; 10] = [
        MismatchKind::HelloMismatch,
        MismatchKind::DeadMismatch,
        MismatchKind::NetworkTypeMismatch,
        MismatchKind::AreaMismatch,
        MismatchKind::AuthMismatch,
        MismatchKind::AuthKeyMismatch,
        MismatchKind::MtuMismatch,
        MismatchKind::PassiveMismatch,
        MismatchKind::RedistributeMismatch,
        MismatchKind::RouterIdMismatch,
    ];

    /// Canonical label spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchKind::HelloMismatch => "HelloMismatch",
            MismatchKind::DeadMismatch => "DeadMismatch",
            MismatchKind::NetworkTypeMismatch => "NetworkTypeMismatch",
            MismatchKind::AreaMismatch => "AreaMismatch",
            MismatchKind::AuthMismatch => "AuthMismatch",
            MismatchKind::AuthKeyMismatch => "AuthKeyMismatch",
            MismatchKind::MtuMismatch => "MTUMismatch",
            MismatchKind::PassiveMismatch => "PassiveMismatch",
            MismatchKind::RedistributeMismatch => "RedistributeMismatch",
            MismatchKind::RouterIdMismatch => "RouterIDMismatch",
        }
    }

    /// Spelling used in the `- <Field> Mismatch :` line of the operator report
    pub fn report_field(&self) -> &'static str {
        match self {
            MismatchKind::HelloMismatch => "Hello",
            MismatchKind::DeadMismatch => "Dead",
            MismatchKind::NetworkTypeMismatch => "Network Type",
            MismatchKind::AreaMismatch => "Area",
            MismatchKind::AuthMismatch => "OSPF Auth",
            MismatchKind::AuthKeyMismatch => "Auth Key",
            MismatchKind::MtuMismatch => "MTU",
            MismatchKind::PassiveMismatch => "Passive",
            MismatchKind::RedistributeMismatch => "Redistribute",
            MismatchKind::RouterIdMismatch => "Router ID",
        }
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MismatchKind {
    type Err = ();

    /// Exact canonical name, ignoring case and whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        MismatchKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(&compact))
            .ok_or(())
    }
}

/// Type of a finding: a canonical kind, or an unrecognized label kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Kind(MismatchKind),
    Literal(String),
}

impl Label {
    pub fn kind(&self) -> Option<MismatchKind> {
        match self {
            Label::Kind(kind) => Some(*kind),
            Label::Literal(_) => None,
        }
    }
}

impl From<MismatchKind> for Label {
    fn from(kind: MismatchKind) -> Self {
        Label::Kind(kind)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        match s.parse::<MismatchKind>() {
            Ok(kind) => Label::Kind(kind),
            Err(()) => Label::Literal(s),
        }
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Kind(kind) => f.write_str(kind.as_str()),
            Label::Literal(s) => f.write_str(s),
        }
    }
}

/// One detected or annotated mismatch: a label plus its participant routers.
///
/// Participants are kept sorted by router number and deduplicated, so two
/// findings compare equal exactly when `(label, participants)` match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFinding")]
pub struct Finding {
    #[serde(rename = "type")]
    pub label: Label,
    #[serde(rename = "routers")]
    participants: Vec<String>,
}

impl Finding {
    /// Build a finding. Panics when `participants` is empty.
    pub fn new(label: impl Into<Label>, participants: Vec<String>) -> Self {
        let mut participants = participants;
        sort_routers(&mut participants);
        assert!(!participants.is_empty(), "a finding needs at least one participant");
        Self {
            label: label.into(),
            participants,
        }
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn kind(&self) -> Option<MismatchKind> {
        self.label.kind()
    }
}

#[derive(Deserialize)]
struct RawFinding {
    #[serde(rename = "type")]
    label: Label,
    #[serde(rename = "routers")]
    participants: Vec<String>,
}

impl TryFrom<RawFinding> for Finding {
    type Error = String;

    fn try_from(raw: RawFinding) -> Result<Self, Self::Error> {
        if raw.participants.is_empty() {
            return Err(format!("finding {} has no routers", raw.label));
        }
        Ok(Finding::new(raw.label, raw.participants))
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.participants.join(" & "))
    }
}

/// Findings per topology instance
pub type FindingSets = BTreeMap<TopologyId, BTreeSet<Finding>>;

/// One side of a compared link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub router: String,
    pub interface: String,
}

/// How two authentication key sets disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthKeyConflict {
    /// One side uses a clear-text key, the other MD5 keys
    TypeMismatch,
    /// Both sides use clear-text keys with different values
    SimpleKeyDiffers,
    /// The MD5 key id -> key maps differ
    DigestKeysDiffer,
}

/// Evidence backing a detection, used to render the operator report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "evidence", rename_all = "snake_case")]
pub enum Evidence {
    /// A neighbor attribute differs between the two ends of a link
    Attribute {
        local: Endpoint,
        local_value: String,
        remote: Endpoint,
        remote_value: String,
    },
    /// Passive flags on a link (disagreeing, or both passive)
    Passive {
        local: Endpoint,
        local_passive: bool,
        remote: Endpoint,
        remote_passive: bool,
    },
    AuthKeys {
        conflict: AuthKeyConflict,
        local: Endpoint,
        local_keys: BTreeMap<String, String>,
        remote: Endpoint,
        remote_keys: BTreeMap<String, String>,
    },
    /// Router runs OSPF and EIGRP without redistributing between them
    MissingRedistribution { router: String },
    DuplicateRouterId {
        router_id: String,
        /// Every OSPF router sharing the id, including those beyond the reported pair
        members: Vec<String>,
        /// Router ID table of all OSPF routers, in traversal order
        ospf_router_ids: Vec<(String, String)>,
    },
}

/// A finding together with the evidence that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub finding: Finding,
    #[serde(flatten)]
    pub evidence: Evidence,
}

/// Interfaces excluded from neighbor checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOptions {
    /// Management port, never part of adjacency checks
    pub management_interface: String,
    /// Interface name prefixes treated as loopbacks
    pub loopback_prefixes: Vec<String>,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            management_interface: "FastEthernet0/0".to_string(),
            loopback_prefixes: vec!["Loopback".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_sorts_participants() {
        let finding = Finding::new(MismatchKind::HelloMismatch, vec!["R10".into(), "R2".into()]);
        assert_eq!(finding.participants(), &["R2".to_string(), "R10".to_string()]);
        assert_eq!(finding.to_string(), "HelloMismatch R2 & R10");
    }

    #[test]
    #[should_panic(expected = "at least one participant")]
    fn test_finding_without_participants_panics() {
        Finding::new(MismatchKind::DeadMismatch, Vec::new());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("MTUMismatch".parse::<MismatchKind>(), Ok(MismatchKind::MtuMismatch));
        assert_eq!("routeridmismatch".parse::<MismatchKind>(), Ok(MismatchKind::RouterIdMismatch));
        assert!("Hello".parse::<MismatchKind>().is_err());
    }

    #[test]
    fn test_label_serializes_as_string() {
        let finding = Finding::new(MismatchKind::MtuMismatch, vec!["R1".into(), "R2".into()]);
        let json = serde_json::to_string(&finding).unwrap();
        assert_eq!(json, r#"{"type":"MTUMismatch","routers":["R1","R2"]}"#);

        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, finding);

        assert!(serde_json::from_str::<Finding>(r#"{"type":"MTUMismatch","routers":[]}"#).is_err());

        let literal: Label = serde_json::from_str(r#""Cable unplugged""#).unwrap();
        assert_eq!(literal, Label::Literal("Cable unplugged".to_string()));
    }
}
