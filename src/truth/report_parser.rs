//! Parser for the detector's own text report.
//!
//! Recognizes pair headers (`=== Mismatch between R1 and R2 ===`), single
//! headers (`=== Mismatch on R3 ===`) and `- <Label> :` lines. Router names
//! are any run of non-space characters. The legacy
//! Indonesian headers (`antara .. dan ..`, `pada ..`) are accepted too.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;
use regex::Regex;

use crate::detect::{Finding, FindingSets};
use crate::topology::loader::discover_files;
use crate::topology::TopologyId;

use super::labels::normalize_label;

/// Compiled regex patterns for report lines
pub struct ReportPatterns {
    pub pair_header: Regex,
    pub single_header: Regex,
    /// Any `=== Mismatch ...` line, parsed or not
    pub any_header: Regex,
    pub label_line: Regex,
}

impl ReportPatterns {
    pub fn new() -> Self {
        Self {
            pair_header: Regex::new(
                r"(?i)^=+\s*Mismatch\s+(?:between|antara)\s+([^\s=]+)\s+(?:and|dan)\s+([^\s=]+)\s*=+\s*$",
            )
            .expect("Invalid pair_header regex"),
            single_header: Regex::new(r"(?i)^=+\s*Mismatch\s+(?:on|pada)\s+([^\s=]+)\s*=+\s*$")
                .expect("Invalid single_header regex"),
            any_header: Regex::new(r"(?i)^=+\s*Mismatch\b").expect("Invalid any_header regex"),
            label_line: Regex::new(r"^\s*-\s*([A-Za-z _-]+?)\s*:\s*$").expect("Invalid label_line regex"),
        }
    }
}

impl Default for ReportPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<ReportPatterns> = LazyLock::new(ReportPatterns::new);

/// Extract findings from one rendered report
pub fn parse_detection_report(text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut current: Option<Vec<String>> = None;

    for line in text.lines() {
        if let Some(caps) = PATTERNS.pair_header.captures(line) {
            current = Some(vec![caps[1].to_string(), caps[2].to_string()]);
            continue;
        }

        if let Some(caps) = PATTERNS.single_header.captures(line) {
            current = Some(vec![caps[1].to_string()]);
            continue;
        }

        if PATTERNS.any_header.is_match(line) {
            log::warn!("Unrecognized report header '{}'; its labels are skipped", line.trim());
            current = None;
            continue;
        }

        if let Some(caps) = PATTERNS.label_line.captures(line) {
            match &current {
                Some(routers) => findings.push(Finding::new(normalize_label(&caps[1]), routers.clone())),
                None => log::warn!("Label line '{}' appears before any header (skip)", line.trim()),
            }
        }
    }

    findings
}

/// Read every report in `dir` whose name matches `pattern`, in parallel
pub fn load_detection_reports(dir: &Path, pattern: &Regex) -> Result<FindingSets> {
    let files = discover_files(dir, pattern)?;
    log::info!("Parsing {} detection reports from {}...", files.len(), dir.display());

    let results: Vec<(TopologyId, Vec<Finding>)> = files
        .par_iter()
        .map(|(id, path)| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read detection report: {}", path.display()))?;
            Ok((*id, parse_detection_report(&text)))
        })
        .collect::<Result<_>>()?;

    let mut sets: FindingSets = BTreeMap::new();
    for (id, findings) in results {
        sets.entry(id).or_default().extend(findings);
    }
    Ok(sets)
}
