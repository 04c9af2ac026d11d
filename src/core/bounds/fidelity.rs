//! Label Fidelity
//!
//! Compares the labels a caller asked for with the labels the engine
//! answered with. Detectors never call this themselves.

use std::collections::HashMap;

use serde::Serialize;

use super::types::{Label, LabeledBoundary};

/// Multiset difference between requested and returned labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelFidelity {
    /// Requested but absent (or returned fewer times than requested)
    pub missing: Vec<Label>,
    /// Returned but never requested (or returned more times than requested)
    pub unexpected: Vec<Label>,
}

impl LabelFidelity {
    /// The returned labels are a permutation of the requested ones.
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

/// Compare `requested` against the labels present in `returned`.
///
/// Entries resolved to `-1` still count as present.
pub fn check_label_fidelity(requested: &[Label], returned: &[LabeledBoundary]) -> LabelFidelity {
    let mut balance: HashMap<&Label, i64> = HashMap::new();
    for label in requested {
        *balance.entry(label).or_default() += 1;
    }
    for boundary in returned {
        *balance.entry(&boundary.solution_number).or_default() -= 1;
    }

    let mut fidelity = LabelFidelity::default();
    // walk in request order, then engine order, so reports are stable
    let order = requested
        .iter()
        .chain(returned.iter().map(|b| &b.solution_number));
    for label in order {
        if let Some(count) = balance.remove(label) {
            if count > 0 {
                fidelity
                    .missing
                    .extend(std::iter::repeat(label.clone()).take(count as usize));
            } else if count < 0 {
                fidelity
                    .unexpected
                    .extend(std::iter::repeat(label.clone()).take(count.unsigned_abs() as usize));
            }
        }
    }
    fidelity
}
