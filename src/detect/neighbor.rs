//! Neighbor attribute comparison.
//!
//! Every OSPF interface with a resolvable neighbor is compared against the
//! interface on the other end of the link. Each link is compared once, no
//! matter which side is visited first.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

use crate::topology::{normalize_ifname, Interface, NeighborRef, OspfConfig, Topology, SIMPLE_KEY};

use super::types::*;

/// One end of a link, resolved to its records
#[derive(Clone, Copy)]
struct Side<'a> {
    router: &'a str,
    interface_name: &'a str,
    interface: &'a Interface,
    ospf: &'a OspfConfig,
}

impl Side<'_> {
    fn endpoint(&self) -> Endpoint {
        Endpoint {
            router: self.router.to_string(),
            interface: self.interface_name.to_string(),
        }
    }
}

/// Excluded from adjacency checks: loopbacks and the management port
pub fn is_excluded_interface(name: &str, options: &DetectorOptions) -> bool {
    let normalized = normalize_ifname(name);
    options
        .loopback_prefixes
        .iter()
        .any(|prefix| normalized.starts_with(prefix.as_str()))
        || normalized == normalize_ifname(&options.management_interface)
}

/// Find the interface a neighbor reference points at.
///
/// Returns `None` when the router is missing, no interface name matches after
/// whitespace normalization, or the matched interface has no OSPF record.
fn resolve_neighbor<'a>(topology: &'a Topology, neighbor: &'a NeighborRef) -> Option<Side<'a>> {
    let router_name = neighbor.router.as_str();
    let Some(router) = topology.router(router_name) else {
        log::debug!("Neighbor router {} not in topology (skip)", router_name);
        return None;
    };

    let wanted = normalize_ifname(&neighbor.interface);
    let Some((interface_name, interface)) = router
        .interfaces
        .iter()
        .find(|(name, _)| normalize_ifname(name) == wanted)
    else {
        log::debug!("{} has no interface {} (skip)", router_name, neighbor.interface);
        return None;
    };

    let Some(ospf) = interface.ospf.as_ref() else {
        log::warn!("{} interface {} has no OSPF record (skip)", router_name, interface_name);
        return None;
    };

    Some(Side {
        router: router_name,
        interface_name: interface_name.as_str(),
        interface,
        ospf,
    })
}

fn show<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "none".to_string())
}

fn participants(local: &Side<'_>, remote: &Side<'_>) -> Vec<String> {
    vec![local.router.to_string(), remote.router.to_string()]
}

fn attribute(kind: MismatchKind, local: &Side<'_>, local_value: String, remote: &Side<'_>, remote_value: String) -> Detection {
    Detection {
        finding: Finding::new(kind, participants(local, remote)),
        evidence: Evidence::Attribute {
            local: local.endpoint(),
            local_value,
            remote: remote.endpoint(),
            remote_value,
        },
    }
}

/// Compare hello, dead, area, network type, MTU, passive and auth type
fn compare_attributes(local: &Side<'_>, remote: &Side<'_>, out: &mut Vec<Detection>) {
    let (a, b) = (local.ospf, remote.ospf);

    if a.hello != b.hello {
        out.push(attribute(MismatchKind::HelloMismatch, local, show(a.hello), remote, show(b.hello)));
    }
    if a.dead != b.dead {
        out.push(attribute(MismatchKind::DeadMismatch, local, show(a.dead), remote, show(b.dead)));
    }
    if a.area != b.area {
        out.push(attribute(
            MismatchKind::AreaMismatch,
            local,
            show(a.area.as_ref()),
            remote,
            show(b.area.as_ref()),
        ));
    }
    if a.network_type != b.network_type {
        out.push(attribute(
            MismatchKind::NetworkTypeMismatch,
            local,
            show(a.network_type.as_ref()),
            remote,
            show(b.network_type.as_ref()),
        ));
    }
    if local.interface.mtu != remote.interface.mtu {
        out.push(attribute(
            MismatchKind::MtuMismatch,
            local,
            show(local.interface.mtu),
            remote,
            show(remote.interface.mtu),
        ));
    }
    // Two passive ends never form an adjacency either.
    if a.passive != b.passive || (a.passive && b.passive) {
        out.push(Detection {
            finding: Finding::new(MismatchKind::PassiveMismatch, participants(local, remote)),
            evidence: Evidence::Passive {
                local: local.endpoint(),
                local_passive: a.passive,
                remote: remote.endpoint(),
                remote_passive: b.passive,
            },
        });
    }
    if a.auth_type != b.auth_type {
        out.push(attribute(
            MismatchKind::AuthMismatch,
            local,
            a.auth_type.to_string(),
            remote,
            b.auth_type.to_string(),
        ));
    }
}

/// Classify how two key maps disagree, if they do
pub fn auth_key_conflict(a: &BTreeMap<String, String>, b: &BTreeMap<String, String>) -> Option<AuthKeyConflict> {
    if a.is_empty() && b.is_empty() {
        return None;
    }

    let (simple_a, simple_b) = (a.get(SIMPLE_KEY), b.get(SIMPLE_KEY));
    match (simple_a, simple_b) {
        (Some(_), None) | (None, Some(_)) => Some(AuthKeyConflict::TypeMismatch),
        (Some(ka), Some(kb)) => (ka != kb).then_some(AuthKeyConflict::SimpleKeyDiffers),
        (None, None) => (a != b).then_some(AuthKeyConflict::DigestKeysDiffer),
    }
}

fn compare_auth_keys(local: &Side<'_>, remote: &Side<'_>, out: &mut Vec<Detection>) {
    let Some(conflict) = auth_key_conflict(&local.ospf.auth_keys, &remote.ospf.auth_keys) else {
        return;
    };

    out.push(Detection {
        finding: Finding::new(MismatchKind::AuthKeyMismatch, participants(local, remote)),
        evidence: Evidence::AuthKeys {
            conflict,
            local: local.endpoint(),
            local_keys: local.ospf.auth_keys.clone(),
            remote: remote.endpoint(),
            remote_keys: remote.ospf.auth_keys.clone(),
        },
    });
}

/// Compare the two ends of every OSPF link in the topology
pub fn check_neighbors(topology: &Topology, options: &DetectorOptions) -> Vec<Detection> {
    let mut detections = Vec::new();
    let mut checked_pairs: HashSet<[(&str, &str); 2]> = HashSet::new();

    for (router_name, router) in topology.routers() {
        for (interface_name, interface) in &router.interfaces {
            let Some(ospf) = interface.ospf.as_ref() else {
                continue;
            };
            if is_excluded_interface(interface_name, options) {
                continue;
            }
            let Some(neighbor) = interface.neighbor.as_ref() else {
                continue;
            };
            let Some(remote) = resolve_neighbor(topology, neighbor) else {
                continue;
            };

            let mut pair_key = [
                (router_name, interface_name.as_str()),
                (remote.router, remote.interface_name),
            ];
            pair_key.sort();
            if !checked_pairs.insert(pair_key) {
                continue;
            }

            let local = Side {
                router: router_name,
                interface_name: interface_name.as_str(),
                interface,
                ospf,
            };
            compare_attributes(&local, &remote, &mut detections);
            compare_auth_keys(&local, &remote, &mut detections);
        }
    }

    detections
}
