//! Router and interface naming helpers.

/// Remove all whitespace from an interface name ("FastEthernet 0/1" -> "FastEthernet0/1")
pub fn normalize_ifname(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Abbreviate an interface name the way IOS prints it (FastEthernet0/1 -> Fa0/1)
pub fn short_ifname(name: &str) -> String {
    name.replace("FastEthernet", "Fa")
        .replace("GigabitEthernet", "Gi")
        .replace("Loopback", "Lo")
}

/// Numeric suffix of a router name ("R12" -> 12)
pub fn router_number(name: &str) -> Option<u64> {
    let digits_start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    name[digits_start..].parse().ok()
}

/// Sort key ordering routers by numeric suffix, names without one last
pub fn router_sort_key(name: &str) -> (u64, &str) {
    (router_number(name).unwrap_or(u64::MAX), name)
}

/// Sort router names by numeric suffix and drop duplicates
pub fn sort_routers(routers: &mut Vec<String>) {
    routers.sort_by(|a, b| router_sort_key(a).cmp(&router_sort_key(b)));
    routers.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ifname() {
        assert_eq!(normalize_ifname("FastEthernet 0/1"), "FastEthernet0/1");
        assert_eq!(normalize_ifname("FastEthernet0/1"), "FastEthernet0/1");
        assert_eq!(normalize_ifname(" Gigabit Ethernet 1/0 "), "GigabitEthernet1/0");
    }

    #[test]
    fn test_short_ifname() {
        assert_eq!(short_ifname("FastEthernet0/1"), "Fa0/1");
        assert_eq!(short_ifname("GigabitEthernet1/0"), "Gi1/0");
        assert_eq!(short_ifname("Loopback0"), "Lo0");
        assert_eq!(short_ifname("Serial0/0/0"), "Serial0/0/0");
    }

    #[test]
    fn test_router_number() {
        assert_eq!(router_number("R12"), Some(12));
        assert_eq!(router_number("core-7"), Some(7));
        assert_eq!(router_number("ISP"), None);
    }

    #[test]
    fn test_sort_routers() {
        let mut routers = vec!["R10".to_string(), "R2".to_string(), "R2".to_string(), "ISP".to_string(), "R1".to_string()];
        sort_routers(&mut routers);
        assert_eq!(routers, vec!["R1", "R2", "R10", "ISP"]);
    }
}
