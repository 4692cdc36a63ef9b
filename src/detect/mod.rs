//! Rule-based mismatch detection over a topology snapshot.
//!
//! Three independent rules run in a fixed order:
//!
//! 1. neighbor attribute comparison (`neighbor`)
//! 2. redistribution completeness (`redistribute`)
//! 3. router-ID uniqueness (`router_id`)
//!
//! Detection is a pure function of the snapshot; the only side effect is log
//! output.

pub mod types;
pub mod neighbor;
pub mod redistribute;
pub mod router_id;
pub mod report;

pub use types::*;
pub use neighbor::check_neighbors;
pub use redistribute::check_redistribute;
pub use router_id::check_router_id;
pub use report::{render_report, write_json, write_reports};

use crate::topology::Topology;

/// Run all rules and keep the evidence for each finding
pub fn analyze(topology: &Topology, options: &DetectorOptions) -> Vec<Detection> {
    let mut detections = check_neighbors(topology, options);
    detections.extend(check_redistribute(topology));
    detections.extend(check_router_id(topology));
    detections
}

/// Run all rules, returning only the findings
pub fn detect(topology: &Topology, options: &DetectorOptions) -> Vec<Finding> {
    analyze(topology, options)
        .into_iter()
        .map(|detection| detection.finding)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::parse_topology;
    use serde_json::json;

    #[test]
    fn test_rule_order_and_determinism() {
        let snapshot = json!({
            "R1": {
                "router_id": "1.1.1.1",
                "routing": {"protocol": ["ospf", "eigrp"], "redistribute": false},
                "interfaces": {
                    "FastEthernet0/1": {
                        "MTU": 1500,
                        "ospf": {"Hello": 10, "Dead": 40, "area": 0, "Network Type": "BROADCAST", "passive": false},
                        "neighbor": {"router": "R2", "interface": "FastEthernet0/1"}
                    }
                }
            },
            "R2": {
                "router_id": "1.1.1.1",
                "routing": {"protocol": ["ospf"], "redistribute": false},
                "interfaces": {
                    "FastEthernet0/1": {
                        "MTU": 1500,
                        "ospf": {"Hello": 10, "Dead": 120, "area": 0, "Network Type": "BROADCAST", "passive": false},
                        "neighbor": {"router": "R1", "interface": "FastEthernet0/1"}
                    }
                }
            }
        });
        let topology = parse_topology(&snapshot.to_string()).unwrap();
        let options = DetectorOptions::default();

        let findings = detect(&topology, &options);
        let kinds: Vec<_> = findings.iter().filter_map(Finding::kind).collect();
        assert_eq!(
            kinds,
            vec![
                MismatchKind::DeadMismatch,
                MismatchKind::RedistributeMismatch,
                MismatchKind::RouterIdMismatch,
            ]
        );
        assert_eq!(findings, detect(&topology, &options));
    }
}
