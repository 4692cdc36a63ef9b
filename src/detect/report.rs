//! Operator report for detector output.
//!
//! Each detection becomes a block with a header naming the participants, a
//! `- <Field> Mismatch :` line, the evidence, and a `+ Solution :` section.
//! The layout is re-parsed by [`crate::truth::parse_detection_report`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::topology::{short_ifname, TopologyId};

use super::types::*;

const SEPARATOR: &str = "=========================================================";

fn header(finding: &Finding) -> String {
    match finding.participants() {
        [single] => format!("=== Mismatch on {} ===", single),
        [first, second, ..] => format!("=== Mismatch between {} and {} ===", first, second),
        [] => unreachable!("findings always have participants"),
    }
}

fn endpoint(e: &Endpoint) -> String {
    format!("{} {}", e.router, short_ifname(&e.interface))
}

fn push_keys(lines: &mut Vec<String>, side: &Endpoint, keys: &BTreeMap<String, String>) {
    lines.push(format!("\t* {} :", endpoint(side)));
    if keys.is_empty() {
        lines.push("\t\t* none".to_string());
    }
    for (id, key) in keys {
        lines.push(format!("\t\t* {} : {}", id, key));
    }
}

fn render_detection(detection: &Detection, lines: &mut Vec<String>) {
    let finding = &detection.finding;
    let field = finding
        .kind()
        .map(|kind| kind.report_field().to_string())
        .unwrap_or_else(|| finding.label.to_string());

    lines.push(header(finding));
    lines.push(SEPARATOR.to_string());
    lines.push(format!("- {} Mismatch :", field));

    let mut solution = Vec::new();
    match &detection.evidence {
        Evidence::Attribute {
            local,
            local_value,
            remote,
            remote_value,
        } => {
            lines.push(format!("\t* {} : {}", endpoint(local), local_value));
            lines.push(format!("\t* {} : {}", endpoint(remote), remote_value));
            solution.push(format!("\t* Make {} identical on {} and {}", field, local.router, remote.router));
        }
        Evidence::Passive {
            local,
            local_passive,
            remote,
            remote_passive,
        } => {
            lines.push(format!("\t* {} : {}", endpoint(local), local_passive));
            lines.push(format!("\t* {} : {}", endpoint(remote), remote_passive));
            let mut disable = Vec::new();
            if *local_passive {
                disable.push(format!("interface {} on {}", short_ifname(&local.interface), local.router));
            }
            if *remote_passive {
                disable.push(format!("interface {} on {}", short_ifname(&remote.interface), remote.router));
            }
            solution.push(format!("\t* Disable passive-interface on {}", disable.join(" and ")));
        }
        Evidence::AuthKeys {
            conflict,
            local,
            local_keys,
            remote,
            remote_keys,
        } => {
            push_keys(lines, local, local_keys);
            push_keys(lines, remote, remote_keys);
            match conflict {
                AuthKeyConflict::TypeMismatch => {
                    solution.push(format!(
                        "\t* {} and {} use different authentication types (simple vs MD5)",
                        local.router, remote.router
                    ));
                    solution.push("\t* Use the same authentication type and key".to_string());
                }
                AuthKeyConflict::SimpleKeyDiffers => {
                    solution.push(format!(
                        "\t* {} and {} have different authentication keys",
                        local.router, remote.router
                    ));
                    solution.push("\t* Use the same authentication key".to_string());
                }
                AuthKeyConflict::DigestKeysDiffer => {
                    solution.push(format!(
                        "\t* {} and {} have different message-digest keys",
                        local.router, remote.router
                    ));
                    solution.push("\t* Use the same key id and key on both routers".to_string());
                }
            }
        }
        Evidence::MissingRedistribution { router } => {
            lines.push(format!(
                "\t* {} runs OSPF and EIGRP but does not redistribute (or lacks \"subnets\")",
                router
            ));
            solution.push("\t* Add \"redistribute eigrp <as number> subnets\" under router ospf".to_string());
        }
        Evidence::DuplicateRouterId {
            router_id,
            members,
            ospf_router_ids,
        } => {
            for member in members {
                lines.push(format!("\t* {} : {}", member, router_id));
            }
            solution.push("\t* OSPF router IDs (all routers):".to_string());
            for (router, id) in ospf_router_ids {
                let pointer = if id == router_id { " <-" } else { "" };
                solution.push(format!("\t\t> {} = {}{}", router, id, pointer));
            }
            solution.push("\t* Change the router ID so it is unique".to_string());
        }
    }

    lines.push(SEPARATOR.to_string());
    lines.push("+ Solution :".to_string());
    lines.extend(solution);
    lines.push(SEPARATOR.to_string());
    lines.push(String::new());
}

/// Render the text report for one topology
pub fn render_report(topology_id: TopologyId, detections: &[Detection]) -> String {
    if detections.is_empty() {
        return format!("[OK] No mismatch found in topology {}\n", topology_id);
    }

    let mut lines = Vec::new();
    for detection in detections {
        render_detection(detection, &mut lines);
    }
    lines.join("\n")
}

/// Write one text report per topology into `dir` as `detection_<id>.txt`
pub fn write_reports(dir: &Path, results: &BTreeMap<TopologyId, Vec<Detection>>) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory: {}", dir.display()))?;

    for (id, detections) in results {
        let path = dir.join(format!("detection_{}.txt", id));
        fs::write(&path, render_report(*id, detections))
            .with_context(|| format!("Failed to write detection report to {}", path.display()))?;
    }

    log::info!("Wrote {} detection reports to {}", results.len(), dir.display());
    Ok(())
}

/// Write all detections as JSON, keyed by topology id
pub fn write_json(path: &Path, results: &BTreeMap<TopologyId, Vec<Detection>>) -> Result<()> {
    let json = serde_json::to_string_pretty(results).context("Failed to serialize detections to JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write detections to {}", path.display()))?;

    log::info!("Detections written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn passive(local: bool, remote: bool) -> Detection {
        Detection {
            finding: Finding::new(MismatchKind::PassiveMismatch, vec!["R2".into(), "R1".into()]),
            evidence: Evidence::Passive {
                local: Endpoint { router: "R2".into(), interface: "FastEthernet0/1".into() },
                local_passive: local,
                remote: Endpoint { router: "R1".into(), interface: "FastEthernet1/0".into() },
                remote_passive: remote,
            },
        }
    }

    fn end(router: &str) -> Endpoint {
        Endpoint { router: router.into(), interface: "FastEthernet0/1".into() }
    }

    fn attribute(kind: MismatchKind, local: &str, remote: &str) -> Detection {
        Detection {
            finding: Finding::new(kind, vec![local.into(), remote.into()]),
            evidence: Evidence::Attribute {
                local: end(local),
                local_value: "10".into(),
                remote: end(remote),
                remote_value: "20".into(),
            },
        }
    }

    #[test]
    fn test_every_kind_parses_back() {
        let keys = |key: &str| BTreeMap::from([("simple".to_string(), key.to_string())]);
        let detections = vec![
            attribute(MismatchKind::HelloMismatch, "R1", "R2"),
            attribute(MismatchKind::DeadMismatch, "R1", "R2"),
            attribute(MismatchKind::NetworkTypeMismatch, "R2", "R3"),
            attribute(MismatchKind::AreaMismatch, "R3", "R4"),
            attribute(MismatchKind::AuthMismatch, "R4", "R5"),
            attribute(MismatchKind::MtuMismatch, "R5", "R6"),
            passive(true, false),
            Detection {
                finding: Finding::new(MismatchKind::AuthKeyMismatch, vec!["R6".into(), "R7".into()]),
                evidence: Evidence::AuthKeys {
                    conflict: AuthKeyConflict::SimpleKeyDiffers,
                    local: end("R6"),
                    local_keys: keys("cisco"),
                    remote: end("R7"),
                    remote_keys: keys("juniper"),
                },
            },
            Detection {
                finding: Finding::new(MismatchKind::RedistributeMismatch, vec!["ISP".into()]),
                evidence: Evidence::MissingRedistribution { router: "ISP".into() },
            },
            Detection {
                finding: Finding::new(MismatchKind::RedistributeMismatch, vec!["R3".into()]),
                evidence: Evidence::MissingRedistribution { router: "R3".into() },
            },
            Detection {
                finding: Finding::new(MismatchKind::RouterIdMismatch, vec!["R8".into(), "R9".into()]),
                evidence: Evidence::DuplicateRouterId {
                    router_id: "8.8.8.8".into(),
                    members: vec!["R8".into(), "R9".into()],
                    ospf_router_ids: vec![("R8".into(), "8.8.8.8".into()), ("R9".into(), "8.8.8.8".into())],
                },
            },
        ];

        let rendered: BTreeSet<Finding> = detections.iter().map(|d| d.finding.clone()).collect();
        let kinds: BTreeSet<MismatchKind> = rendered.iter().filter_map(Finding::kind).collect();
        assert_eq!(kinds.len(), MismatchKind::ALL.len());

        let parsed: BTreeSet<Finding> = crate::truth::parse_detection_report(&render_report(3, &detections))
            .into_iter()
            .collect();
        assert_eq!(parsed, rendered);
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(render_report(4, &[]), "[OK] No mismatch found in topology 4\n");
    }

    #[test]
    fn test_pair_block_layout() {
        let report = render_report(1, &[passive(true, true)]);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "=== Mismatch between R1 and R2 ===");
        assert_eq!(lines[2], "- Passive Mismatch :");
        assert_eq!(lines[3], "\t* R2 Fa0/1 : true");
        assert!(report.contains("Disable passive-interface on interface Fa0/1 on R2 and interface Fa1/0 on R1"));
    }

    #[test]
    fn test_single_block_layout() {
        let detection = Detection {
            finding: Finding::new(MismatchKind::RedistributeMismatch, vec!["R5".into()]),
            evidence: Evidence::MissingRedistribution { router: "R5".into() },
        };
        let report = render_report(1, &[detection]);
        assert!(report.starts_with("=== Mismatch on R5 ===\n"));
        assert!(report.contains("- Redistribute Mismatch :"));
    }

    #[test]
    fn test_router_id_table() {
        let detection = Detection {
            finding: Finding::new(MismatchKind::RouterIdMismatch, vec!["R1".into(), "R2".into()]),
            evidence: Evidence::DuplicateRouterId {
                router_id: "1.1.1.1".into(),
                members: vec!["R1".into(), "R2".into(), "R4".into()],
                ospf_router_ids: vec![
                    ("R1".into(), "1.1.1.1".into()),
                    ("R2".into(), "1.1.1.1".into()),
                    ("R3".into(), "3.3.3.3".into()),
                    ("R4".into(), "1.1.1.1".into()),
                ],
            },
        };
        let report = render_report(1, &[detection]);
        assert!(report.contains("\t* R4 : 1.1.1.1"));
        assert!(report.contains("\t\t> R3 = 3.3.3.3\n"));
        assert!(report.contains("\t\t> R4 = 1.1.1.1 <-"));
    }
}
