//! Property-based tests for label fidelity
//!
//! Tests invariants:
//! - A permutation of the request is always exact
//! - Removing returned entries reports them missing
//! - Adding returned entries reports them unexpected
//! - The labeled detector never reorders, drops, or invents pairs

use proptest::prelude::*;

use super::block_on;
use crate::core::bounds::{
    check_label_fidelity, BoundaryValue, Label, LabeledBoundary, LabeledBoundaryDetector,
};
use crate::tests::common::{labeled_payload, sample_page};
use crate::tests::mocks::recording_gateway;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Labels in the styles assignments use: "3", "2b", "4)", "1.", "c"
fn arb_label() -> impl Strategy<Value = Label> {
    prop_oneof![
        "[1-9][0-9]?",
        "[1-9][a-f]",
        "[1-9][.)]",
        "[a-f][.)]?",
    ]
    .prop_map(Label::from)
}

fn arb_labels() -> impl Strategy<Value = Vec<Label>> {
    prop::collection::vec(arb_label(), 1..10)
}

fn arb_boundary() -> impl Strategy<Value = BoundaryValue> {
    prop_oneof![Just(-1i64), 0i64..=1000].prop_map(|v| BoundaryValue::new(v).unwrap())
}

/// Requested labels with a shuffled, fully resolved answer
fn arb_permuted_answer() -> impl Strategy<Value = (Vec<Label>, Vec<LabeledBoundary>)> {
    arb_labels().prop_flat_map(|requested| {
        let n = requested.len();
        (
            Just(requested.clone()),
            Just(requested).prop_shuffle(),
            prop::collection::vec(arb_boundary(), n),
        )
            .prop_map(|(requested, shuffled, values)| {
                let answer = shuffled
                    .into_iter()
                    .zip(values)
                    .map(|(label, value)| LabeledBoundary::new(label, value))
                    .collect();
                (requested, answer)
            })
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: any permutation is exact, regardless of sentinel entries
    #[test]
    fn prop_permutation_is_exact((requested, answer) in arb_permuted_answer()) {
        let fidelity = check_label_fidelity(&requested, &answer);
        prop_assert!(fidelity.is_exact(), "{:?}", fidelity);
    }

    /// Property: dropping an entry reports exactly that label missing
    #[test]
    fn prop_dropped_entry_is_missing(
        (requested, mut answer) in arb_permuted_answer(),
        at in any::<prop::sample::Index>(),
    ) {
        let dropped = answer.remove(at.index(answer.len()));
        let fidelity = check_label_fidelity(&requested, &answer);
        prop_assert_eq!(fidelity.missing, vec![dropped.solution_number]);
        prop_assert!(fidelity.unexpected.is_empty());
    }

    /// Property: an extra entry reports exactly that label unexpected
    #[test]
    fn prop_extra_entry_is_unexpected(
        (requested, mut answer) in arb_permuted_answer(),
        extra in arb_label(),
    ) {
        answer.push(LabeledBoundary::new(extra.clone(), BoundaryValue::NOT_FOUND));
        let fidelity = check_label_fidelity(&requested, &answer);
        prop_assert!(fidelity.missing.is_empty());
        prop_assert_eq!(fidelity.unexpected, vec![extra]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: the detector hands back the engine's pairs as-is
    #[test]
    fn prop_labeled_detector_passes_through((requested, answer) in arb_permuted_answer()) {
        let raw: Vec<(String, i64)> = answer
            .iter()
            .map(|b| (b.solution_number.to_string(), b.upper_bound.get() as i64))
            .collect();
        let pairs: Vec<(&str, i64)> = raw.iter().map(|(l, v)| (l.as_str(), *v)).collect();

        let (gateway, _) = recording_gateway(labeled_payload(&pairs));
        let detector = LabeledBoundaryDetector::new(gateway);
        let resolved = block_on(detector.detect_with_config_instruction(&sample_page(), &requested))
            .unwrap();

        prop_assert_eq!(&resolved, &answer);
        prop_assert!(check_label_fidelity(&requested, &resolved).is_exact());
    }
}
