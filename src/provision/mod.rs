//! Lab provisioning: role books and IOS configuration rendering.
//!
//! Configurations are rendered to text only. Nothing here talks to devices.

pub mod ios;
pub mod role;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

pub use ios::{render_router_config, RenderOptions};
pub use role::{load_role_book, plan_advertisements, Advertisement, ExtraRule, ExtraRuleError, RoleBook, RouterRole};

use crate::detect::DetectorOptions;
use crate::topology::Topology;

/// Render every router of a topology, keyed by router name
pub fn render_topology(
    topology: &Topology,
    options: &DetectorOptions,
    roles: Option<&RoleBook>,
) -> BTreeMap<String, Vec<String>> {
    topology
        .routers()
        .into_iter()
        .map(|(name, router)| {
            let role = roles.and_then(|book| book.role(name));
            if roles.is_some() && role.is_none() {
                log::warn!("No role defined for {}; advertising nothing", name);
            }
            let render = RenderOptions {
                interfaces: options,
                role: role.or(roles.map(|_| &EMPTY_ROLE)),
            };
            (name.to_string(), render_router_config(router, &render))
        })
        .collect()
}

static EMPTY_ROLE: RouterRole = RouterRole {
    ospf_area: None,
    eigrp_only: false,
    extra: BTreeMap::new(),
};

/// Write one `<router>.cfg` per router into `dir`
pub fn write_configs(dir: &Path, configs: &BTreeMap<String, Vec<String>>) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create config directory {}", dir.display()))?;

    for (router, lines) in configs {
        let path = dir.join(format!("{}.cfg", router));
        fs::write(&path, lines.join("\n") + "\n")
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
    }

    log::info!("Wrote {} router configs to {}", configs.len(), dir.display());
    Ok(())
}
