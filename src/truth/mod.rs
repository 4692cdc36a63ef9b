//! Ground-truth parsing.
//!
//! Converts the hand-authored annotation file and the detector's text reports
//! into the same per-topology finding sets, using one label normalization
//! table so both sides agree on label spelling.

pub mod labels;
pub mod parser;
pub mod report_parser;

pub use labels::normalize_label;
pub use parser::{parse_ground_truth, parse_payload};
pub use report_parser::{load_detection_reports, parse_detection_report};

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use crate::detect::FindingSets;

/// Read and parse a ground-truth annotation file
pub fn load_ground_truth(path: &Path) -> Result<FindingSets> {
    log::info!("Loading ground truth from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ground truth: {}", path.display()))?;
    Ok(parse_ground_truth(&text))
}
