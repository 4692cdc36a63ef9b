//! Ground-truth annotation parser.
//!
//! One topology per line:
//!
//! ```text
//! Topologi 1 -> Normal
//! Topologi 2 -> HelloMismatch R1 & R2
//! Topologi 20 -> (RedistributeMismatch R3) & (DeadMismatch R1 & R9)
//! Topologi 31 -> (AuthKeyMismatch & AuthMismatch R2 & R3)
//! ```
//!
//! Every label in a group shares that group's routers.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::detect::{Finding, FindingSets, Label};
use crate::topology::{sort_routers, TopologyId};

use super::labels::normalize_label;

/// Compiled regex patterns for annotation lines
pub struct TruthPatterns {
    /// Match: "Topologi 12" / "Topology 12"
    pub topology_key: Regex,
    /// Match one parenthesized group
    pub group: Regex,
    /// Match a router token such as "R12"
    pub router: Regex,
}

impl TruthPatterns {
    pub fn new() -> Self {
        Self {
            topology_key: Regex::new(r"(?i)^\s*topolog(?:i|y)\s*(\d+)\s*$")
                .expect("Invalid topology_key regex"),
            group: Regex::new(r"\(([^()]*)\)").expect("Invalid group regex"),
            router: Regex::new(r"\bR\d+\b").expect("Invalid router regex"),
        }
    }
}

impl Default for TruthPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<TruthPatterns> = LazyLock::new(TruthPatterns::new);

/// Parse the topology number from the left-hand side of a line
pub fn parse_topology_key(key: &str) -> Option<TopologyId> {
    PATTERNS
        .topology_key
        .captures(key)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Split a group into findings: labels before the first router token,
/// routers from there on.
pub fn parse_group(group: &str) -> Vec<Finding> {
    let Some(first_router) = PATTERNS.router.find(group) else {
        log::warn!("Ground-truth group '{}' names no routers (skip)", group.trim());
        return Vec::new();
    };

    let (label_region, router_region) = group.split_at(first_router.start());

    let mut routers: Vec<String> = PATTERNS
        .router
        .find_iter(router_region)
        .map(|m| m.as_str().to_string())
        .collect();
    sort_routers(&mut routers);

    let labels: Vec<Label> = label_region
        .split('&')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(normalize_label)
        .collect();
    if labels.is_empty() {
        log::warn!("Ground-truth group '{}' names no label (skip)", group.trim());
    }

    labels
        .into_iter()
        .map(|label| {
            if let Label::Literal(ref raw) = label {
                log::warn!("Unrecognized ground-truth label '{}' kept as literal", raw);
            }
            Finding::new(label, routers.clone())
        })
        .collect()
}

/// Parse the payload right of `->`
pub fn parse_payload(payload: &str) -> BTreeSet<Finding> {
    let payload = payload.trim();
    if payload.eq_ignore_ascii_case("normal") {
        return BTreeSet::new();
    }

    let groups: Vec<&str> = PATTERNS
        .group
        .captures_iter(payload)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    if groups.is_empty() {
        parse_group(payload).into_iter().collect()
    } else {
        groups.into_iter().flat_map(parse_group).collect()
    }
}

/// Parse a whole annotation file into findings per topology
pub fn parse_ground_truth(text: &str) -> FindingSets {
    let mut result = FindingSets::new();

    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let Some((left, right)) = line.split_once("->") else {
            continue;
        };

        let Some(topology) = parse_topology_key(left) else {
            log::warn!("Line {}: unrecognized topology key '{}' (skip)", line_no + 1, left.trim());
            continue;
        };

        let findings = parse_payload(right);
        let entry = result.entry(topology).or_default();
        if !entry.is_empty() {
            log::debug!("Topology {} annotated more than once; merging", topology);
        }
        entry.extend(findings);
    }

    log::info!("Parsed ground truth for {} topologies", result.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::MismatchKind;

    fn finding(kind: MismatchKind, routers: &[&str]) -> Finding {
        Finding::new(kind, routers.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn test_normal_line() {
        let parsed = parse_ground_truth("Topologi 1 -> Normal\n");
        assert_eq!(parsed.len(), 1);
        assert!(parsed[&1].is_empty());

        let parsed = parse_ground_truth("Topologi 1 -> NORMAL");
        assert!(parsed[&1].is_empty());
    }

    #[test]
    fn test_parenthesized_groups() {
        let parsed = parse_ground_truth("Topologi 20 -> (RedistributeMismatch R3) & (DeadMismatch R1 & R9)");
        let expected: BTreeSet<Finding> = [
            finding(MismatchKind::RedistributeMismatch, &["R3"]),
            finding(MismatchKind::DeadMismatch, &["R1", "R9"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(parsed[&20], expected);
    }

    #[test]
    fn test_labels_share_group_routers() {
        let parsed = parse_ground_truth("Topologi 31 -> (AuthKeyMismatch & AuthMismatch R3 & R2)");
        let expected: BTreeSet<Finding> = [
            finding(MismatchKind::AuthKeyMismatch, &["R2", "R3"]),
            finding(MismatchKind::AuthMismatch, &["R2", "R3"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(parsed[&31], expected);
    }

    #[test]
    fn test_ungrouped_payload() {
        let parsed = parse_ground_truth("Topologi 2 -> HelloMismatch R10 & R2");
        assert_eq!(
            parsed[&2].iter().collect::<Vec<_>>(),
            vec![&finding(MismatchKind::HelloMismatch, &["R2", "R10"])]
        );
    }

    #[test]
    fn test_router_id_label_not_mistaken_for_router() {
        let parsed = parse_ground_truth("Topologi 5 -> RouterIDMismatch R4 & R6");
        assert_eq!(
            parsed[&5].iter().collect::<Vec<_>>(),
            vec![&finding(MismatchKind::RouterIdMismatch, &["R4", "R6"])]
        );
    }

    #[test]
    fn test_skipped_lines() {
        let text = "\n# comment without arrow\nNot a topology -> HelloMismatch R1 & R2\nTopologi 3 -> HelloMismatch\n";
        let parsed = parse_ground_truth(text);
        assert_eq!(parsed.len(), 1);
        assert!(parsed[&3].is_empty());
    }

    #[test]
    fn test_unknown_label_is_literal() {
        let parsed = parse_ground_truth("Topologi 8 -> Cable Fault R1 & R2");
        let only = parsed[&8].iter().next().unwrap();
        assert_eq!(only.label, Label::Literal("Cable Fault".to_string()));
        assert_eq!(only.participants(), &["R1".to_string(), "R2".to_string()]);
    }

    #[test]
    fn test_repeated_topology_merges() {
        let parsed = parse_ground_truth("Topologi 4 -> HelloMismatch R1 & R2\nTopology 4 -> MTUMismatch R2 & R3");
        assert_eq!(parsed[&4].len(), 2);
    }
}
