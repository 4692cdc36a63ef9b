//! Snapshot loading.
//!
//! Snapshots are JSON files (one topology each) written by the collection
//! pipeline. A router or interface entry that does not match the model is
//! skipped so the rest of the snapshot stays usable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;
use regex::Regex;

use super::types::{Interface, Router, Topology, TopologyId};

/// Build one router, converting each interface on its own so a bad
/// interface entry is dropped without losing the router.
fn parse_router(name: &str, mut value: serde_json::Value) -> Option<Router> {
    let interfaces = value.as_object_mut().and_then(|obj| obj.remove("interfaces"));

    let mut router = match serde_json::from_value::<Router>(value) {
        Ok(router) => router,
        Err(e) => {
            log::warn!("Skipping router {}: {}", name, e);
            return None;
        }
    };

    match interfaces {
        None | Some(serde_json::Value::Null) => {}
        Some(serde_json::Value::Object(entries)) => {
            for (iface, raw) in entries {
                match serde_json::from_value::<Interface>(raw) {
                    Ok(interface) => {
                        router.interfaces.insert(iface, interface);
                    }
                    Err(e) => log::warn!("Skipping interface {} on {}: {}", iface, name, e),
                }
            }
        }
        Some(_) => log::warn!("Router {}: interfaces is not an object (ignored)", name),
    }

    Some(router)
}

/// Parse one snapshot from its JSON text
pub fn parse_topology(json: &str) -> Result<Topology> {
    let raw: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(json).context("Snapshot is not a JSON object of routers")?;

    let routers = raw
        .into_iter()
        .filter_map(|(name, value)| parse_router(&name, value).map(|router| (name, router)))
        .collect();

    Ok(Topology::new(routers))
}

/// Load one snapshot file
pub fn load_topology(path: &Path) -> Result<Topology> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    parse_topology(&content).with_context(|| format!("Failed to parse snapshot: {}", path.display()))
}

/// Topology id taken from the last number in a file name ("topologi_12.json" -> 12)
pub fn topology_id_from_path(path: &Path) -> Option<TopologyId> {
    let name = path.file_name()?.to_str()?;
    let digits: Vec<&str> = name
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect();
    digits.last()?.parse().ok()
}

/// List the files in `dir` whose name matches `pattern`, ordered by topology id.
///
/// The pattern's first capture group, when present, supplies the id; otherwise
/// the last number in the file name is used.
pub fn discover_files(dir: &Path, pattern: &Regex) -> Result<Vec<(TopologyId, PathBuf)>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(caps) = pattern.captures(name) else {
            continue;
        };

        let id = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .or_else(|| topology_id_from_path(&path));
        match id {
            Some(id) => found.push((id, path)),
            None => log::warn!("No topology number in file name {}", name),
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(found)
}

/// Load every matching snapshot in `dir` in parallel
pub fn load_all_topologies(dir: &Path, pattern: &Regex) -> Result<BTreeMap<TopologyId, Topology>> {
    let files = discover_files(dir, pattern)?;
    log::info!("Loading {} snapshots from {}...", files.len(), dir.display());

    let results: Vec<(TopologyId, Topology)> = files
        .par_iter()
        .filter_map(|(id, path)| match load_topology(path) {
            Ok(topology) => {
                log::debug!("Loaded topology {}: {} routers", id, topology.len());
                Some((*id, topology))
            }
            Err(e) => {
                log::warn!("Failed to load {}: {:#}", path.display(), e);
                None
            }
        })
        .collect();

    let mut topologies = BTreeMap::new();
    for (id, topology) in results {
        if topologies.insert(id, topology).is_some() {
            log::warn!("Topology {} appears in more than one file; keeping the last", id);
        }
    }

    log::info!("Loaded {} topologies", topologies.len());
    Ok(topologies)
}
