//! Boolean label x topology matrix, projected from finding sets.
//!
//! A cell is true when the topology has at least one finding of that kind.
//! Literal labels have no column.

use std::collections::{BTreeMap, BTreeSet};

use crate::detect::{Finding, FindingSets, MismatchKind};
use crate::topology::TopologyId;

use super::types::CellCounts;

pub type LabelFlags = BTreeMap<MismatchKind, bool>;
pub type BooleanMatrix = BTreeMap<TopologyId, LabelFlags>;

/// One row: every canonical kind mapped to presence
pub fn label_flags(findings: &BTreeSet<Finding>) -> LabelFlags {
    MismatchKind::ALL
        .into_iter()
        .map(|kind| (kind, findings.iter().any(|f| f.kind() == Some(kind))))
        .collect()
}

/// Project `sets` onto the given topologies; missing topologies get all-false rows
pub fn project<'a>(sets: &FindingSets, topologies: impl IntoIterator<Item = &'a TopologyId>) -> BooleanMatrix {
    let empty = BTreeSet::new();
    topologies
        .into_iter()
        .map(|id| (*id, label_flags(sets.get(id).unwrap_or(&empty))))
        .collect()
}

/// Per-kind cell counts between two matrices over the same topologies
pub fn compare(truth: &BooleanMatrix, predicted: &BooleanMatrix) -> BTreeMap<MismatchKind, CellCounts> {
    let mut cells: BTreeMap<MismatchKind, CellCounts> = MismatchKind::ALL
        .into_iter()
        .map(|kind| (kind, CellCounts::default()))
        .collect();
    let all_false = LabelFlags::new();

    for (id, truth_row) in truth {
        let predicted_row = predicted.get(id).unwrap_or(&all_false);
        for kind in MismatchKind::ALL {
            let y_true = truth_row.get(&kind).copied().unwrap_or(false);
            let y_pred = predicted_row.get(&kind).copied().unwrap_or(false);
            let cell = cells.entry(kind).or_default();
            match (y_true, y_pred) {
                (true, true) => cell.tp += 1,
                (false, true) => cell.fp += 1,
                (true, false) => cell.fn_ += 1,
                (false, false) => cell.tn += 1,
            }
        }
    }

    cells
}
