//! Router-ID uniqueness across OSPF routers.

use std::collections::HashMap;

use crate::topology::{Protocol, Topology};

use super::types::*;

/// Report every router ID shared by more than one OSPF router.
///
/// Only the first two members of a duplicate group become participants; the
/// full membership is kept in the evidence.
pub fn check_router_id(topology: &Topology) -> Vec<Detection> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut ospf_router_ids: Vec<(String, String)> = Vec::new();

    for (name, router) in topology.routers() {
        if !router.routing.runs(Protocol::Ospf) {
            continue;
        }
        let Some(router_id) = router.router_id() else {
            continue;
        };

        ospf_router_ids.push((name.to_string(), router_id.to_string()));
        let index = *group_index.entry(router_id).or_insert_with(|| {
            groups.push((router_id, Vec::new()));
            groups.len() - 1
        });
        groups[index].1.push(name);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(router_id, members)| {
            let pair = vec![members[0].to_string(), members[1].to_string()];
            Detection {
                finding: Finding::new(MismatchKind::RouterIdMismatch, pair),
                evidence: Evidence::DuplicateRouterId {
                    router_id: router_id.to_string(),
                    members: members.iter().map(|m| m.to_string()).collect(),
                    ospf_router_ids: ospf_router_ids.clone(),
                },
            }
        })
        .collect()
}
