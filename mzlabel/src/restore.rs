//! Put back monoisotopic peaks removed by contaminant subtraction.
//!
//! The subtraction step cannot tell a contaminant from the unlabeled form of a
//! labeled compound. Once an anchor is known to carry at least one label, a removed
//! peak at the anchor's m/z is taken to be that anchor's monoisotopic peak.
use tracing::{debug, trace};

use crate::params::LabelingParameters;
use crate::peaks::RemovedPeak;
use crate::solution::{anchor_groups, sort_assignments, Assignment};

/// Synthesize zero label assignments from `removed` for anchors in `assignments` that
/// have labeled matches but no monoisotopic one.
///
/// `assignments` must be ordered by `unlabeled_mz` and `removed` by `mz`. The two are
/// swept together, and a removed peak matches an anchor when it falls in the half-open
/// window `(mz * (1 - tol), mz * (1 + tol)]` of the anchor's m/z. Each removed peak is
/// used at most once, for the first anchor in ascending order whose window contains
/// it, and each anchor is restored at most once. An anchor that already has a zero
/// label assignment takes up the removed peak without restoring it.
pub fn find_monoisotopes(
    assignments: &[Assignment],
    removed: &[RemovedPeak],
    params: &LabelingParameters,
) -> Vec<Assignment> {
    let tolerance = params.tolerance();
    let groups = anchor_groups(assignments);
    let mut restored = Vec::new();

    let mut i = 0;
    let mut j = 0;
    while i < removed.len() && j < groups.len() {
        let group = &assignments[groups[j].clone()];
        let anchor = &group[0];
        let peak = &removed[i];
        let (low, high) = tolerance.bounds(anchor.unlabeled_mz);
        if peak.mz <= low {
            i += 1;
        } else if peak.mz > high {
            j += 1;
        } else {
            if group.iter().any(|a| a.is_monoisotopic()) {
                trace!(
                    "{:0.5} already has a monoisotopic peak, skipping {:0.5}",
                    anchor.unlabeled_mz,
                    peak.mz
                );
            } else {
                trace!(
                    "Restoring {:0.5} as the monoisotopic peak of {:0.5}",
                    peak.mz,
                    anchor.unlabeled_mz
                );
                restored.push(Assignment::new(
                    anchor.unlabeled_mz,
                    peak.mz,
                    0,
                    peak.intensity,
                    anchor.unlabeled_intensity,
                ));
            }
            i += 1;
            j += 1;
        }
    }
    restored
}

/// Restore monoisotopic peaks from `removed` into `assignments`, returning all
/// assignments in their final order.
pub fn restore_monoisotopes(
    mut assignments: Vec<Assignment>,
    removed: &[RemovedPeak],
    params: &LabelingParameters,
) -> Vec<Assignment> {
    assignments.sort_by(|a, b| a.unlabeled_mz.total_cmp(&b.unlabeled_mz));
    let restored = find_monoisotopes(&assignments, removed, params);
    debug!("Restored {} monoisotopic peaks", restored.len());
    assignments.extend(restored);
    sort_assignments(&mut assignments);
    assignments
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_restore() {
        let params = LabelingParameters::default();
        let assignments = vec![
            Assignment::new(500.0, 501.0034, 1, 50.0, 1000.0),
            Assignment::new(500.0, 502.0067, 2, 40.0, 1000.0),
        ];
        let removed = vec![RemovedPeak::new(500.0, 900.0)];
        let restored = restore_monoisotopes(assignments, &removed, &params);
        assert_eq!(restored.len(), 3);
        assert_eq!(restored[0], Assignment::new(500.0, 500.0, 0, 900.0, 1000.0));
        let counts: Vec<_> = restored.iter().map(|a| a.label_count).collect();
        assert_eq!(counts, vec![0, 1, 2]);
    }

    #[test]
    fn test_each_anchor_once() {
        let params = LabelingParameters::default();
        let assignments = vec![
            Assignment::new(500.0, 501.0034, 1, 50.0, 1000.0),
            Assignment::new(500.0, 502.0067, 2, 40.0, 1000.0),
            Assignment::new(700.0, 701.0034, 1, 50.0, 300.0),
        ];
        let removed = vec![
            RemovedPeak::new(499.9996, 900.0),
            RemovedPeak::new(500.0004, 800.0),
            RemovedPeak::new(600.0, 800.0),
            RemovedPeak::new(700.0001, 100.0),
        ];
        let restored = find_monoisotopes(&assignments, &removed, &params);
        assert_eq!(
            restored,
            vec![
                Assignment::new(500.0, 499.9996, 0, 900.0, 1000.0),
                Assignment::new(700.0, 700.0001, 0, 100.0, 300.0),
            ]
        );
    }

    #[test]
    fn test_existing_monoisotope() {
        let params = LabelingParameters::default();
        let assignments = vec![
            Assignment::new(500.0, 500.0002, 0, 50.0, 1000.0),
            Assignment::new(500.0, 501.0034, 1, 50.0, 1000.0),
        ];
        let removed = vec![RemovedPeak::new(500.0, 900.0)];
        let restored = find_monoisotopes(&assignments, &removed, &params);
        assert!(restored.is_empty());
    }

    #[test]
    fn test_no_removed() {
        let params = LabelingParameters::default();
        let assignments = vec![
            Assignment::new(700.0, 701.0034, 1, 50.0, 300.0),
            Assignment::new(500.0, 501.0034, 1, 50.0, 1000.0),
        ];
        let restored = restore_monoisotopes(assignments, &[], &params);
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[0].unlabeled_mz, 500.0);
    }
}
