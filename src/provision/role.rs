//! Router role book and network advertisement planning.
//!
//! ```json
//! {"ROLES": {
//!     "R1": {"ospf_area": 0},
//!     "R4": {"ospf_area": 1, "extra": {"FastEthernet1/0": "EIGRP"}},
//!     "R7": {"eigrp_only": true}
//! }}
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtraRuleError {
    #[error("Invalid extra rule '{0}': expected an OSPF area number or \"EIGRP\"")]
    Unknown(String),
}

/// Per-interface override of a router's default role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExtraRule")]
pub enum ExtraRule {
    /// Advertise into this OSPF area
    Area(u32),
    /// Advertise into EIGRP
    Eigrp,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExtraRule {
    Number(u32),
    Text(String),
}

impl TryFrom<RawExtraRule> for ExtraRule {
    type Error = ExtraRuleError;

    fn try_from(raw: RawExtraRule) -> Result<Self, Self::Error> {
        match raw {
            RawExtraRule::Number(area) => Ok(ExtraRule::Area(area)),
            RawExtraRule::Text(text) if text.trim().eq_ignore_ascii_case("eigrp") => Ok(ExtraRule::Eigrp),
            RawExtraRule::Text(text) => Err(ExtraRuleError::Unknown(text)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterRole {
    #[serde(default)]
    pub ospf_area: Option<u32>,
    #[serde(default)]
    pub eigrp_only: bool,
    #[serde(default)]
    pub extra: BTreeMap<String, ExtraRule>,
}

impl RouterRole {
    /// A router with any interface pinned to EIGRP sits on the domain border
    pub fn is_asbr(&self) -> bool {
        self.extra.values().any(|rule| *rule == ExtraRule::Eigrp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleBook {
    #[serde(rename = "ROLES", default)]
    pub roles: BTreeMap<String, RouterRole>,
}

impl RoleBook {
    pub fn role(&self, router: &str) -> Option<&RouterRole> {
        self.roles.get(router)
    }
}

/// Load a role book from JSON
pub fn load_role_book(path: &Path) -> Result<RoleBook> {
    log::info!("Loading role book from: {}", path.display());

    let file = File::open(path).with_context(|| format!("Failed to open role book: {}", path.display()))?;
    let book: RoleBook = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse role book: {}", path.display()))?;

    log::debug!("Role book defines {} routers", book.roles.len());
    Ok(book)
}

/// Where one interface is advertised
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advertisement {
    Ospf { interface: String, area: u32 },
    Eigrp { interface: String },
}

impl Advertisement {
    pub fn interface(&self) -> &str {
        match self {
            Advertisement::Ospf { interface, .. } | Advertisement::Eigrp { interface } => interface,
        }
    }
}

/// Decide the advertisement of each interface.
///
/// An `extra` rule wins for its interface. Otherwise EIGRP-only routers
/// advertise into EIGRP, routers with an `ospf_area` into that area, and
/// anything else is left out.
pub fn plan_advertisements<'a>(role: &RouterRole, interfaces: impl IntoIterator<Item = &'a str>) -> Vec<Advertisement> {
    interfaces
        .into_iter()
        .filter_map(|name| {
            let interface = name.to_string();
            match role.extra.get(name) {
                Some(ExtraRule::Area(area)) => Some(Advertisement::Ospf { interface, area: *area }),
                Some(ExtraRule::Eigrp) => Some(Advertisement::Eigrp { interface }),
                None if role.eigrp_only => Some(Advertisement::Eigrp { interface }),
                None => role.ospf_area.map(|area| Advertisement::Ospf { interface, area }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BOOK: &str = r#"{"ROLES": {
        "R1": {"ospf_area": 0},
        "R4": {"ospf_area": 1, "extra": {"Fa1/0": "EIGRP", "Fa2/0": 0}},
        "R7": {"eigrp_only": true}
    }}"#;

    #[test]
    fn test_parse_role_book() {
        let book: RoleBook = serde_json::from_str(BOOK).unwrap();
        assert_eq!(book.roles.len(), 3);

        let r4 = book.role("R4").unwrap();
        assert_eq!(r4.extra["Fa1/0"], ExtraRule::Eigrp);
        assert_eq!(r4.extra["Fa2/0"], ExtraRule::Area(0));
        assert!(r4.is_asbr());
        assert!(!book.role("R1").unwrap().is_asbr());
        assert!(book.role("R9").is_none());
    }

    #[test]
    fn test_invalid_extra_rule_rejected() {
        let err = serde_json::from_str::<RoleBook>(r#"{"ROLES": {"R1": {"extra": {"Fa0/1": "BGP"}}}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("BGP"));
    }

    #[test]
    fn test_plan_advertisements() {
        let book: RoleBook = serde_json::from_str(BOOK).unwrap();

        let plan = plan_advertisements(book.role("R4").unwrap(), ["Fa0/1", "Fa1/0", "Fa2/0"]);
        assert_eq!(
            plan,
            vec![
                Advertisement::Ospf { interface: "Fa0/1".into(), area: 1 },
                Advertisement::Eigrp { interface: "Fa1/0".into() },
                Advertisement::Ospf { interface: "Fa2/0".into(), area: 0 },
            ]
        );

        let plan = plan_advertisements(book.role("R7").unwrap(), ["Fa0/1"]);
        assert_eq!(plan, vec![Advertisement::Eigrp { interface: "Fa0/1".into() }]);

        assert!(plan_advertisements(&RouterRole::default(), ["Fa0/1"]).is_empty());
    }

    #[test]
    fn test_load_role_book() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BOOK.as_bytes()).unwrap();

        let book = load_role_book(file.path()).unwrap();
        assert_eq!(book.role("R1").unwrap().ospf_area, Some(0));
    }
}
