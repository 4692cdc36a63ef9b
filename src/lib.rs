//! # ospf-audit - Rule-based OSPF misconfiguration detection
//!
//! This library finds OSPF adjacency mismatches, missing OSPF/EIGRP
//! redistribution and duplicate router IDs in router topology snapshots, and
//! scores the detector against hand-annotated ground truth.
//!
//! ## Overview
//!
//! A snapshot is a JSON map of routers to their interfaces, OSPF parameters
//! and neighbor references. The detector turns each snapshot into a set of
//! findings, each a label plus its participant routers. The same finding
//! representation is parsed from ground-truth annotations and from the
//! detector's own text reports, so any two sources can be compared.
//!
//! ## Key Features
//!
//! - **Ten mismatch kinds**: Hello, Dead, network type, area, auth type, auth
//!   key, MTU, passive, redistribution and router ID
//! - **Evidence**: every detection carries the values that triggered it
//! - **Evaluation**: per-label, macro and micro precision/recall/F1, Jaccard,
//!   Hamming and subset accuracy
//! - **Parallel**: topologies are loaded and analyzed with rayon
//! - **Provisioning**: IOS configuration rendering for lab setups
//!
//! ## Architecture
//!
//! - `topology`: snapshot model, interface/router naming helpers, loader
//! - `detect`: neighbor, redistribution and router-ID rules, text reports
//! - `truth`: label normalization, ground-truth and report parsers
//! - `evaluation`: metrics, boolean matrix projection, reports
//! - `provision`: role books and IOS configuration rendering
//! - `config`: YAML configuration and CLI overrides
//! - `orchestrator`: end-to-end pipelines behind the CLI subcommands
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ospf_audit::{detect, evaluation, topology, truth};
//!
//! let snapshot = topology::load_topology(Path::new("topologi_1.json"))?;
//! let findings = detect::detect(&snapshot, &detect::DetectorOptions::default());
//! for finding in &findings {
//!     println!("{}", finding);
//! }
//!
//! let ground_truth = truth::load_ground_truth(Path::new("ground_truth.txt"))?;
//! let predicted: detect::FindingSets = [(1, findings.into_iter().collect())].into_iter().collect();
//! let (per_label, summary) = evaluation::evaluate(&ground_truth, &predicted);
//! println!("{} labels, micro F1 {:.4}", per_label.len(), summary.micro.f1);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! I/O boundaries return `color_eyre::Result` with context naming the path.
//! Detection, parsing and scoring never fail: malformed records are skipped
//! with a warning and empty denominators score 0. Invalid configuration and
//! role-book entries surface as `thiserror` enums.

pub mod config;
pub mod detect;
pub mod evaluation;
pub mod orchestrator;
pub mod provision;
pub mod topology;
pub mod truth;
