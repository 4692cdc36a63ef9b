//! Evaluation report output.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::types::*;

/// Generate JSON report
pub fn write_json_report(report: &EvaluationReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize evaluation report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

/// Render the text table
pub fn render_text_report(report: &EvaluationReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    let summary = &report.summary;

    lines.push("=".repeat(80));
    lines.push("                     OSPF MISCONFIGURATION DETECTOR EVALUATION".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Generated: {}", report.metadata.generated_at));
    lines.push(format!("Ground Truth: {}", report.metadata.ground_truth));
    lines.push(format!("Predictions: {}", report.metadata.predictions));
    lines.push(format!("Topologies: {}", summary.subset_accuracy.num_topologies));
    lines.push(String::new());

    lines.push("=".repeat(80));
    lines.push("                              PER-LABEL METRICS".to_string());
    lines.push("=".repeat(80));
    lines.push(format!(
        "{:<24} {:>5} {:>5} {:>5} {:>5} {:>9} {:>9} {:>9} {:>9}",
        "Label", "TP", "FP", "FN", "TN", "Precision", "Recall", "F1", "Accuracy"
    ));
    lines.push("-".repeat(80));
    for m in &report.per_label {
        lines.push(format!(
            "{:<24} {:>5} {:>5} {:>5} {:>5} {:>9.4} {:>9.4} {:>9.4} {:>9}",
            m.label.to_string(),
            m.tp,
            m.fp,
            m.fn_,
            m.tn.map(|tn| tn.to_string()).unwrap_or_else(|| "-".to_string()),
            m.precision,
            m.recall,
            m.f1,
            optional(m.accuracy),
        ));
    }
    if report.per_label.is_empty() {
        lines.push("  (no labels on either side)".to_string());
    }
    lines.push(String::new());

    lines.push("=".repeat(80));
    lines.push("                                  SUMMARY".to_string());
    lines.push("=".repeat(80));
    lines.push("Macro Average:".to_string());
    lines.push(format!("  Precision: {:.4}", summary.macro_avg.precision));
    lines.push(format!("  Recall:    {:.4}", summary.macro_avg.recall));
    lines.push(format!("  F1:        {:.4}", summary.macro_avg.f1));
    lines.push(format!("  Accuracy:  {:.4}", summary.macro_avg.accuracy));
    lines.push(String::new());

    lines.push("Micro Average:".to_string());
    lines.push(format!("  Precision:          {:.4}", summary.micro.precision));
    lines.push(format!("  Recall:             {:.4}", summary.micro.recall));
    lines.push(format!("  F1:                 {:.4}", summary.micro.f1));
    lines.push(format!("  Accuracy (Jaccard): {:.4}", summary.micro.accuracy_jaccard));
    lines.push(format!("  Accuracy (matrix):  {:.4}", summary.micro.accuracy_standard));
    lines.push(format!("  Hamming Accuracy:   {:.4}", summary.micro.hamming_accuracy));
    lines.push(String::new());

    let counts = &summary.global_counts;
    lines.push(format!(
        "Global Counts: TP={} FP={} FN={} TN={}",
        counts.tp_total, counts.fp_total, counts.fn_total, counts.tn_total
    ));
    let subset = &summary.subset_accuracy;
    lines.push(format!(
        "Subset Accuracy: {:.4} ({} of {} topologies with findings match exactly)",
        subset.mean_exact_match, subset.exact_matches, subset.evaluated_topologies
    ));
    lines.push("=".repeat(80));

    lines.join("\n") + "\n"
}

/// Generate human-readable text report
pub fn write_text_report(report: &EvaluationReport, output_path: &Path) -> Result<()> {
    fs::write(output_path, render_text_report(report))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print summary to stdout
pub fn print_summary(report: &EvaluationReport) {
    let summary = &report.summary;
    println!("\n=== DETECTOR EVALUATION SUMMARY ===\n");
    println!("Topologies: {}", summary.subset_accuracy.num_topologies);
    println!("Labels: {}", report.per_label.len());

    println!("\nMicro Average:");
    println!("  Precision: {:.4}", summary.micro.precision);
    println!("  Recall: {:.4}", summary.micro.recall);
    println!("  F1: {:.4}", summary.micro.f1);
    println!("  Hamming accuracy: {:.4}", summary.micro.hamming_accuracy);

    println!("\nMacro Average:");
    println!("  Precision: {:.4}", summary.macro_avg.precision);
    println!("  Recall: {:.4}", summary.macro_avg.recall);
    println!("  F1: {:.4}", summary.macro_avg.f1);

    println!("\nSubset accuracy: {:.4}", summary.subset_accuracy.mean_exact_match);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Label, MismatchKind};
    use tempfile::TempDir;

    fn sample_report() -> EvaluationReport {
        EvaluationReport {
            metadata: EvaluationMetadata {
                generated_at: "2026-01-01T00:00:00Z".to_string(),
                ground_truth: "truth.txt".to_string(),
                predictions: "reports".to_string(),
            },
            per_label: vec![
                LabelMetrics {
                    label: Label::Kind(MismatchKind::HelloMismatch),
                    tp: 1,
                    fp: 0,
                    fn_: 0,
                    tn: Some(0),
                    precision: 1.0,
                    recall: 1.0,
                    f1: 1.0,
                    accuracy: Some(1.0),
                    support: 1,
                },
                LabelMetrics {
                    label: Label::Literal("Cable Fault".to_string()),
                    tp: 0,
                    fp: 0,
                    fn_: 1,
                    tn: None,
                    precision: 0.0,
                    recall: 0.0,
                    f1: 0.0,
                    accuracy: None,
                    support: 1,
                },
            ],
            summary: EvaluationSummary::default(),
        }
    }

    #[test]
    fn test_text_report_has_four_decimals() {
        let text = render_text_report(&sample_report());
        assert!(text.contains("HelloMismatch"));
        assert!(text.contains("1.0000"));
        assert!(text.contains("Cable Fault"));
        assert!(text.contains("Subset Accuracy: 0.0000"));
    }

    #[test]
    fn test_json_report_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("evaluation.json");
        write_json_report(&sample_report(), &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["per_label"][0]["label"], "HelloMismatch");
        assert_eq!(value["per_label"][1]["fn"], 1);
        assert!(value["per_label"][1]["tn"].is_null());
        assert!(value["summary"]["macro"].is_object());
    }
}
