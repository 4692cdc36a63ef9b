//! Scoring of predicted finding sets against ground truth.
//!
//! A finding counts as a true positive only when label and participants both
//! match. Accuracy figures that need a true-negative count take it from the
//! boolean matrix, since the instance space has no natural negatives.

use std::collections::{BTreeMap, BTreeSet};

use crate::detect::{FindingSets, Label, MismatchKind};
use crate::topology::TopologyId;

use super::matrix::{compare, project};
use super::types::*;

/// Score `predicted` against `truth` over the union of their topologies
pub fn evaluate(truth: &FindingSets, predicted: &FindingSets) -> (Vec<LabelMetrics>, EvaluationSummary) {
    let topologies: BTreeSet<TopologyId> = truth.keys().chain(predicted.keys()).copied().collect();
    let empty = BTreeSet::new();

    let mut per_label: BTreeMap<Label, Counts> = BTreeMap::new();
    let mut pooled = Counts::default();
    let mut exact_matches = 0usize;
    let mut evaluated = 0usize;

    for id in &topologies {
        let t = truth.get(id).unwrap_or(&empty);
        let p = predicted.get(id).unwrap_or(&empty);

        for finding in t.intersection(p) {
            per_label.entry(finding.label.clone()).or_default().tp += 1;
            pooled.tp += 1;
        }
        for finding in p.difference(t) {
            per_label.entry(finding.label.clone()).or_default().fp += 1;
            pooled.fp += 1;
        }
        for finding in t.difference(p) {
            per_label.entry(finding.label.clone()).or_default().fn_ += 1;
            pooled.fn_ += 1;
        }

        if !t.is_empty() || !p.is_empty() {
            evaluated += 1;
            if t == p {
                exact_matches += 1;
            }
        }
    }

    let cells = compare(&project(truth, &topologies), &project(predicted, &topologies));

    let metrics: Vec<LabelMetrics> = per_label
        .into_iter()
        .map(|(label, counts)| {
            let cell = label.kind().and_then(|kind| cells.get(&kind));
            LabelMetrics {
                tp: counts.tp,
                fp: counts.fp,
                fn_: counts.fn_,
                tn: cell.map(|c| c.tn),
                precision: counts.precision(),
                recall: counts.recall(),
                f1: counts.f1(),
                accuracy: cell.map(|c| safe_div(c.correct() as f64, c.total() as f64)),
                support: counts.tp + counts.fn_,
                label,
            }
        })
        .collect();

    let tn_total: usize = cells.values().map(|c| c.tn).sum();
    let cells_correct: usize = cells.values().map(|c| c.correct()).sum();
    let cells_counted: usize = cells.values().map(|c| c.total()).sum();
    let cells_total = MismatchKind::ALL.len() * topologies.len();

    let summary = EvaluationSummary {
        macro_avg: macro_averages(&metrics),
        micro: MicroAverages {
            precision: pooled.precision(),
            recall: pooled.recall(),
            f1: pooled.f1(),
            accuracy_jaccard: pooled.jaccard(),
            // (tp+tn)/(tp+fp+fn+tn) over matrix cells, not instance counts
            accuracy_standard: safe_div(cells_correct as f64, cells_counted as f64),
            hamming_accuracy: safe_div(cells_correct as f64, cells_total as f64),
        },
        global_counts: GlobalCounts {
            tp_total: pooled.tp,
            fp_total: pooled.fp,
            fn_total: pooled.fn_,
            tn_total,
        },
        subset_accuracy: SubsetAccuracy {
            exact_matches,
            evaluated_topologies: evaluated,
            mean_exact_match: safe_div(exact_matches as f64, evaluated as f64),
            num_topologies: topologies.len(),
        },
    };

    (metrics, summary)
}

/// Unweighted means over the labels present on either side
fn macro_averages(metrics: &[LabelMetrics]) -> MacroAverages {
    let n = metrics.len() as f64;
    let accuracies: Vec<f64> = metrics.iter().filter_map(|m| m.accuracy).collect();

    MacroAverages {
        precision: safe_div(metrics.iter().map(|m| m.precision).sum(), n),
        recall: safe_div(metrics.iter().map(|m| m.recall).sum(), n),
        f1: safe_div(metrics.iter().map(|m| m.f1).sum(), n),
        accuracy: safe_div(accuracies.iter().sum(), accuracies.len() as f64),
    }
}
