//! Detector evaluation against annotated ground truth.
//!
//! # Metrics
//!
//! - Per-label precision, recall and F1 over (label, participants) instances
//! - Macro and micro averages, micro Jaccard accuracy
//! - Standard and Hamming accuracy from the label x topology boolean matrix
//! - Subset accuracy (exact per-topology match)

pub mod matrix;
pub mod metrics;
pub mod report;
pub mod types;

use color_eyre::eyre::{Context, Result};

pub use matrix::{label_flags, project, BooleanMatrix, LabelFlags};
pub use metrics::evaluate;
pub use report::{print_summary, render_text_report, write_json_report, write_text_report};
pub use types::*;

use crate::detect::FindingSets;

/// Score predictions and wrap the result with run metadata
pub fn build_report(
    truth: &FindingSets,
    predicted: &FindingSets,
    ground_truth_source: &str,
    prediction_source: &str,
) -> EvaluationReport {
    let (per_label, summary) = evaluate(truth, predicted);

    EvaluationReport {
        metadata: EvaluationMetadata {
            generated_at: chrono::Utc::now().to_rfc3339(),
            ground_truth: ground_truth_source.to_string(),
            predictions: prediction_source.to_string(),
        },
        per_label,
        summary,
    }
}

/// Write `<stem>.json` and `<stem>.txt` into `output_dir`
pub fn write_reports(report: &EvaluationReport, output_dir: &std::path::Path, stem: &str) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    write_json_report(report, &output_dir.join(format!("{}.json", stem)))?;
    write_text_report(report, &output_dir.join(format!("{}.txt", stem)))?;
    Ok(())
}
