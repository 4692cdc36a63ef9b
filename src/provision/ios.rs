//! Cisco IOS configuration rendering from a topology snapshot.

use crate::detect::DetectorOptions;
use crate::topology::{normalize_ifname, short_ifname, AreaId, AuthType, Interface, Protocol, Router};

use super::role::{plan_advertisements, Advertisement, RouterRole};

const OSPF_PROCESS: u32 = 1;
const EIGRP_AS: u32 = 1;

/// Rendering inputs besides the router itself
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    pub interfaces: &'a DetectorOptions,
    /// When present, network statements follow the role instead of the snapshot
    pub role: Option<&'a RouterRole>,
}

fn is_management(name: &str, management: &str) -> bool {
    let name = normalize_ifname(name);
    let management = normalize_ifname(management);
    name.eq_ignore_ascii_case(&management) || short_ifname(&name).eq_ignore_ascii_case(&short_ifname(&management))
}

fn is_loopback(name: &str, options: &DetectorOptions) -> bool {
    let name = normalize_ifname(name);
    options.loopback_prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
}

/// Interfaces that may be advertised: addressed and not the management port
fn advertisable<'r>(router: &'r Router, options: &DetectorOptions) -> impl Iterator<Item = (&'r str, &'r Interface)> {
    let management = options.management_interface.clone();
    router
        .interfaces
        .iter()
        .filter(move |(name, iface)| iface.ip.is_some() && !is_management(name, &management))
        .map(|(name, iface)| (name.as_str(), iface))
}

fn router_id(router: &Router, options: &DetectorOptions) -> Option<String> {
    router.router_id().map(str::to_string).or_else(|| {
        router
            .interfaces
            .iter()
            .find(|(name, iface)| is_loopback(name, options) && iface.ip.is_some())
            .and_then(|(_, iface)| iface.ip)
            .map(|ip| ip.to_string())
    })
}

fn render_interface(lines: &mut Vec<String>, name: &str, iface: &Interface) {
    lines.push(format!("interface {}", name));

    if let (Some(ip), Some(mask)) = (iface.ip, iface.subnet) {
        lines.push(format!(" ip address {} {}", ip, mask));
    }
    if let Some(mtu) = iface.mtu {
        lines.push(format!(" mtu {}", mtu));
    }

    if let Some(ospf) = &iface.ospf {
        if let Some(key) = ospf.simple_key() {
            lines.push(format!(" ip ospf authentication-key {}", key));
        }
        for (key_id, key) in ospf.digest_keys() {
            lines.push(format!(" ip ospf message-digest-key {} md5 {}", key_id, key));
        }
        match ospf.auth_type {
            AuthType::None => {}
            AuthType::Simple => lines.push(" ip ospf authentication".to_string()),
            AuthType::MessageDigest => lines.push(" ip ospf authentication message-digest".to_string()),
        }
        if let Some(network_type) = &ospf.network_type {
            lines.push(format!(" ip ospf network {}", network_type.normalized()));
        }
        if let Some(hello) = ospf.hello {
            lines.push(format!(" ip ospf hello-interval {}", hello));
        }
        if let Some(dead) = ospf.dead {
            lines.push(format!(" ip ospf dead-interval {}", dead));
        }
    }

    lines.push(" no shutdown".to_string());
    lines.push(" exit".to_string());
}

/// Render the full configuration of one router, one command per line
pub fn render_router_config(router: &Router, options: &RenderOptions<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, iface) in &router.interfaces {
        render_interface(&mut lines, name, iface);
    }

    let mut ospf_networks: Vec<String> = Vec::new();
    let mut eigrp_networks: Vec<String> = Vec::new();
    let redistribute;

    match options.role {
        Some(role) => {
            let addressed: Vec<(&str, &Interface)> = advertisable(router, options.interfaces).collect();
            for plan in plan_advertisements(role, addressed.iter().map(|(name, _)| *name)) {
                let Some(ip) = router.interfaces.get(plan.interface()).and_then(|iface| iface.ip) else {
                    continue;
                };
                match plan {
                    Advertisement::Ospf { area, .. } => {
                        ospf_networks.push(format!(" network {} 0.0.0.0 area {}", ip, area));
                    }
                    Advertisement::Eigrp { .. } => eigrp_networks.push(format!(" network {} 0.0.0.0", ip)),
                }
            }
            redistribute = role.is_asbr();
        }
        None => {
            for (_, iface) in advertisable(router, options.interfaces) {
                let Some(ip) = iface.ip else { continue };
                match &iface.ospf {
                    Some(ospf) if router.routing.runs(Protocol::Ospf) => {
                        let area = ospf.area.clone().unwrap_or(AreaId::Number(0));
                        ospf_networks.push(format!(" network {} 0.0.0.0 area {}", ip, area));
                    }
                    None if router.routing.runs(Protocol::Eigrp) => {
                        eigrp_networks.push(format!(" network {} 0.0.0.0", ip));
                    }
                    _ => {}
                }
            }
            redistribute = router.routing.needs_redistribution() && router.routing.redistribute;
        }
    }

    let runs_ospf = router.routing.runs(Protocol::Ospf) || !ospf_networks.is_empty();
    let runs_eigrp = router.routing.runs(Protocol::Eigrp) || !eigrp_networks.is_empty();

    if runs_ospf {
        lines.push(format!("router ospf {}", OSPF_PROCESS));
        if let Some(id) = router_id(router, options.interfaces) {
            lines.push(format!(" router-id {}", id));
        }
        lines.push(" log-adjacency-changes".to_string());
        lines.extend(ospf_networks);
        for (name, _) in router
            .interfaces
            .iter()
            .filter(|(_, iface)| iface.ospf.as_ref().is_some_and(|ospf| ospf.passive))
            .filter(|(name, _)| !is_management(name, &options.interfaces.management_interface))
        {
            lines.push(format!(" passive-interface {}", name));
        }
        if redistribute {
            lines.push(format!(" redistribute eigrp {} subnets", EIGRP_AS));
        }
        lines.push(" exit".to_string());
    }

    if runs_eigrp {
        lines.push(format!("router eigrp {}", EIGRP_AS));
        lines.push(" no auto-summary".to_string());
        lines.extend(eigrp_networks);
        if redistribute {
            lines.push(format!(" redistribute ospf {} metric 1 1 1 1 1", OSPF_PROCESS));
        }
        lines.push(" exit".to_string());
    }

    lines
}
