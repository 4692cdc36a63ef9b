//! Router topology model.
//!
//! This module contains the in-memory representation of a topology snapshot
//! (routers, interfaces, OSPF parameters, neighbor references), naming helpers,
//! and the snapshot loader.

pub mod types;
pub mod naming;
pub mod loader;

// Re-export key types and functions for easier access
pub use types::*;
pub use naming::{normalize_ifname, router_sort_key, short_ifname, sort_routers};
pub use loader::{load_all_topologies, load_topology, parse_topology};
