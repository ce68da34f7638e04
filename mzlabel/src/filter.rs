//! Discard anchors without enough evidence of labeling
use itertools::Itertools;
use tracing::debug;

use crate::solution::Assignment;

/// Decide whether the assignments of a single anchor, sorted by label count, show
/// labeling.
///
/// A lone assignment is rejected, and so is a monoisotopic peak paired only with a
/// single label peak, which cannot be told apart from a natural isotope.
pub fn accept_group(group: &[Assignment]) -> bool {
    match group {
        [] | [_] => false,
        [_, second] => second.label_count != 1,
        _ => true,
    }
}

/// Keep only the anchors in `assignments` that pass [`accept_group`].
///
/// `assignments` must already be in their final order. Anchors are grouped by exact
/// equality of `unlabeled_mz`, which holds because every assignment of an anchor
/// copies the same value.
pub fn filter_minimum_labels(assignments: Vec<Assignment>) -> Vec<Assignment> {
    let total = assignments.len();
    let mut accepted = Vec::with_capacity(total);
    let mut n_anchors = 0usize;
    let mut n_accepted = 0usize;

    let groups = assignments
        .into_iter()
        .group_by(|a| a.unlabeled_mz.to_bits());
    for (_, group) in &groups {
        let group: Vec<Assignment> = group.collect();
        n_anchors += 1;
        if accept_group(&group) {
            n_accepted += 1;
            accepted.extend(group);
        }
    }
    debug!(
        "Accepted {n_accepted} of {n_anchors} anchors ({} of {total} assignments)",
        accepted.len()
    );
    accepted
}
