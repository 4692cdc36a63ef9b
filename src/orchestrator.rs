//! Pipeline orchestration.
//!
//! Ties loading, detection, ground-truth parsing, evaluation and rendering
//! together for the command-line subcommands. Each `run_*` function reads its
//! inputs from the configured paths and writes its outputs under them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AuditConfig;
use crate::detect::{self, Detection, DetectorOptions, FindingSets};
use crate::evaluation::{self, BooleanMatrix, EvaluationReport};
use crate::provision::{self, RoleBook};
use crate::topology::{self, Topology, TopologyId};
use crate::truth;

/// Run the detector over every topology in parallel
pub fn detect_all(
    topologies: &BTreeMap<TopologyId, Topology>,
    options: &DetectorOptions,
) -> BTreeMap<TopologyId, Vec<Detection>> {
    topologies
        .par_iter()
        .map(|(id, topology)| {
            let detections = detect::analyze(topology, options);
            log::debug!("Topology {}: {} findings", id, detections.len());
            (*id, detections)
        })
        .collect()
}

/// Drop evidence, keeping the findings per topology
pub fn to_finding_sets(results: &BTreeMap<TopologyId, Vec<Detection>>) -> FindingSets {
    results
        .iter()
        .map(|(id, detections)| (*id, detections.iter().map(|d| d.finding.clone()).collect()))
        .collect()
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory: {}", dir.display()))
}

/// Detect on all snapshots; writes text reports and `detections.json`
pub fn run_detect(config: &AuditConfig) -> Result<BTreeMap<TopologyId, Vec<Detection>>> {
    let pattern = config.snapshot_regex()?;
    let topologies = topology::load_all_topologies(&config.paths.snapshots_dir, &pattern)?;

    let results = detect_all(&topologies, &config.detector);
    let flagged = results.values().filter(|d| !d.is_empty()).count();
    let total: usize = results.values().map(Vec::len).sum();
    log::info!(
        "Detected {} findings in {} of {} topologies",
        total,
        flagged,
        results.len()
    );

    detect::write_reports(&config.paths.reports_dir, &results)?;
    ensure_dir(&config.paths.output_dir)?;
    detect::write_json(&config.paths.output_dir.join("detections.json"), &results)?;

    Ok(results)
}

/// Parsed ground truth together with its boolean projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthExport {
    pub findings: FindingSets,
    pub matrix: BooleanMatrix,
}

impl TruthExport {
    pub fn new(findings: FindingSets) -> Self {
        let ids: Vec<TopologyId> = findings.keys().copied().collect();
        let matrix = evaluation::project(&findings, &ids);
        Self { findings, matrix }
    }
}

/// Parse the ground-truth file and export it as `ground_truth.json`
pub fn run_truth(config: &AuditConfig) -> Result<TruthExport> {
    let export = TruthExport::new(truth::load_ground_truth(&config.paths.ground_truth)?);

    ensure_dir(&config.paths.output_dir)?;
    let path = config.paths.output_dir.join("ground_truth.json");
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize ground truth to JSON")?;
    fs::write(&path, json).with_context(|| format!("Failed to write ground truth to {}", path.display()))?;

    log::info!("Ground truth written to {}", path.display());
    Ok(export)
}

/// Where predicted findings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    /// Parse previously written detector text reports
    Reports,
    /// Run the detector on the snapshots in memory
    Snapshots,
}

/// Evaluate predictions against ground truth; writes `evaluation.{json,txt}`
pub fn run_evaluate(config: &AuditConfig, source: PredictionSource) -> Result<EvaluationReport> {
    let ground_truth = truth::load_ground_truth(&config.paths.ground_truth)?;

    let (predicted, prediction_source) = match source {
        PredictionSource::Reports => {
            let pattern = config.report_regex()?;
            (
                truth::load_detection_reports(&config.paths.reports_dir, &pattern)?,
                config.paths.reports_dir.display().to_string(),
            )
        }
        PredictionSource::Snapshots => {
            let pattern = config.snapshot_regex()?;
            let topologies = topology::load_all_topologies(&config.paths.snapshots_dir, &pattern)?;
            (
                to_finding_sets(&detect_all(&topologies, &config.detector)),
                config.paths.snapshots_dir.display().to_string(),
            )
        }
    };

    let report = evaluation::build_report(
        &ground_truth,
        &predicted,
        &config.paths.ground_truth.display().to_string(),
        &prediction_source,
    );
    evaluation::write_reports(&report, &config.paths.output_dir, "evaluation")?;

    Ok(report)
}

/// Render IOS configs for one snapshot into `output_dir/configs/<topology>`
pub fn run_render(config: &AuditConfig, snapshot: &Path, roles: Option<&Path>) -> Result<BTreeMap<String, Vec<String>>> {
    let topology = topology::load_topology(snapshot)?;
    let book: Option<RoleBook> = roles.map(provision::load_role_book).transpose()?;

    let configs = provision::render_topology(&topology, &config.detector, book.as_ref());

    let name = snapshot
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "topology".to_string());
    provision::write_configs(&config.paths.output_dir.join("configs").join(name), &configs)?;

    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::MismatchKind;
    use crate::topology::parse_topology;

    #[test]
    fn test_detect_all_keyed_by_topology() {
        let clean = parse_topology(r#"{"R1": {"routing": {"protocol": ["ospf"]}}}"#).unwrap();
        let missing = parse_topology(
            r#"{"R3": {"routing": {"protocol": ["ospf", "eigrp"], "redistribute": false}}}"#,
        )
        .unwrap();
        let topologies: BTreeMap<TopologyId, Topology> = [(2, missing), (1, clean)].into_iter().collect();

        let results = detect_all(&topologies, &DetectorOptions::default());
        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(results[&1].is_empty());

        let sets = to_finding_sets(&results);
        assert!(sets[&1].is_empty());
        let only = sets[&2].iter().next().unwrap();
        assert_eq!(only.kind(), Some(MismatchKind::RedistributeMismatch));
        assert_eq!(only.participants(), &["R3".to_string()]);
    }

    #[test]
    fn test_truth_export_matrix() {
        let findings = truth::parse_ground_truth("Topologi 1 -> Normal\nTopologi 2 -> MTUMismatch R1 & R2\n");
        let export = TruthExport::new(findings);

        assert_eq!(export.matrix.len(), 2);
        assert!(export.matrix[&2][&MismatchKind::MtuMismatch]);
        assert!(!export.matrix[&1][&MismatchKind::MtuMismatch]);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["matrix"]["2"]["MTUMismatch"], true);
        assert_eq!(json["findings"]["2"][0]["type"], "MTUMismatch");
    }
}
