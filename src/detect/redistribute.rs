//! Redistribution completeness.

use crate::topology::Topology;

use super::types::*;

/// Flag routers that run both OSPF and EIGRP without redistributing between them
pub fn check_redistribute(topology: &Topology) -> Vec<Detection> {
    topology
        .routers()
        .into_iter()
        .filter(|(_, router)| router.routing.needs_redistribution() && !router.routing.redistribute)
        .map(|(name, _)| Detection {
            finding: Finding::new(MismatchKind::RedistributeMismatch, vec![name.to_string()]),
            evidence: Evidence::MissingRedistribution {
                router: name.to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::parse_topology;
    use serde_json::json;

    fn topology(protocols: &[&str], redistribute: bool) -> Topology {
        let snapshot = json!({
            "R3": {"router_id": "3.3.3.3", "routing": {"protocol": protocols, "redistribute": redistribute}, "interfaces": {}}
        });
        parse_topology(&snapshot.to_string()).unwrap()
    }

    #[test]
    fn test_missing_redistribution_flagged() {
        let detections = check_redistribute(&topology(&["ospf", "eigrp"], false));
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].finding.kind(), Some(MismatchKind::RedistributeMismatch));
        assert_eq!(detections[0].finding.participants(), &["R3".to_string()]);
    }

    #[test]
    fn test_redistributing_router_passes() {
        assert!(check_redistribute(&topology(&["eigrp", "ospf"], true)).is_empty());
    }

    #[test]
    fn test_single_protocol_not_checked() {
        assert!(check_redistribute(&topology(&["ospf"], false)).is_empty());
        assert!(check_redistribute(&topology(&["eigrp"], false)).is_empty());
    }
}
