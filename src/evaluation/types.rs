//! Metric and report types for detector evaluation.

use serde::{Deserialize, Serialize};

use crate::detect::Label;

/// Division that yields 0 for a zero denominator
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Instance-level confusion counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl Counts {
    pub fn precision(&self) -> f64 {
        safe_div(self.tp as f64, (self.tp + self.fp) as f64)
    }

    pub fn recall(&self) -> f64 {
        safe_div(self.tp as f64, (self.tp + self.fn_) as f64)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        safe_div(2.0 * p * r, p + r)
    }

    /// tp / (tp + fp + fn)
    pub fn jaccard(&self) -> f64 {
        safe_div(self.tp as f64, (self.tp + self.fp + self.fn_) as f64)
    }
}

/// Cell counts of the label x topology boolean matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCounts {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub tn: usize,
}

impl CellCounts {
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.fn_ + self.tn
    }

    pub fn correct(&self) -> usize {
        self.tp + self.tn
    }
}

/// Metrics for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub label: Label,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    /// Topologies where neither side has this label; literal labels have none
    pub tn: Option<usize>,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Boolean-matrix accuracy over all topologies
    pub accuracy: Option<f64>,
    /// tp + fn
    pub support: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroAverages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MicroAverages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy_jaccard: f64,
    pub accuracy_standard: f64,
    pub hamming_accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCounts {
    pub tp_total: usize,
    pub fp_total: usize,
    pub fn_total: usize,
    pub tn_total: usize,
}

/// Exact-match accuracy over topologies with at least one finding on either side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubsetAccuracy {
    pub exact_matches: usize,
    pub evaluated_topologies: usize,
    pub mean_exact_match: f64,
    /// All topologies seen, including those left out of the mean
    pub num_topologies: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    #[serde(rename = "macro")]
    pub macro_avg: MacroAverages,
    pub micro: MicroAverages,
    pub global_counts: GlobalCounts,
    pub subset_accuracy: SubsetAccuracy,
}

/// Run metadata recorded with a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    pub generated_at: String,
    pub ground_truth: String,
    pub predictions: String,
}

/// Full evaluation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub metadata: EvaluationMetadata,
    pub per_label: Vec<LabelMetrics>,
    pub summary: EvaluationSummary,
}
