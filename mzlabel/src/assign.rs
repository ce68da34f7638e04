//! Assign labeled peaks to background anchor peaks.
//!
//! Each background peak is an anchor with zero labels. For increasing label counts,
//! the labeled spectrum is searched for a peak at `anchor + count * label_shift`.
//! Candidates that are well above their noise level are accepted anywhere in the full
//! mass tolerance window, while weaker candidates must fall inside a narrower window.
use tracing::{debug, trace};

use crate::params::LabelingParameters;
use crate::peaks::{Peak, Spectrum};
use crate::solution::Assignment;

/// The result of scanning the labeled spectrum for a single anchor
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnchorScan {
    /// The accepted matches, in increasing label count
    pub assignments: Vec<Assignment>,
    /// The labeled spectrum position the next anchor's scan should start from
    pub resume_index: usize,
}

/// Scan `labeled` for peaks carrying labels relative to `anchor`, starting at `start`.
///
/// The scan advances a single position through `labeled` and a label count, starting
/// from zero and stopping before [`LabelingParameters::max_label_count`]:
///
/// - a peak below the current window is passed over. While still looking for the zero
///   label peak, its position becomes the resume index.
/// - a peak above the current window moves on to the next label count, keeping the
///   same peak to test against it.
/// - a peak inside the window moves on to both the next peak and the next label count,
///   whether or not it was accepted.
///
/// The resume index is `start` unless a peak below the zero label window was seen.
/// Restarting the next anchor there, rather than where this scan stopped, lets a peak
/// that matched this anchor at a high label count also match a nearby anchor at a
/// lower one.
pub fn scan_anchor(
    anchor: &Peak,
    labeled: &[Peak],
    start: usize,
    params: &LabelingParameters,
) -> AnchorScan {
    let max_count = params.max_label_count(anchor.mz);
    let tolerance = params.tolerance();
    let narrow_tolerance = params.low_confidence_tolerance();

    let mut assignments = Vec::new();
    let mut resume_index = start;
    let mut i = start;
    let mut count: u32 = 0;

    while i < labeled.len() && count < max_count {
        let target = params.labeled_mz(anchor.mz, count);
        let (low, high) = tolerance.bounds(target);
        let candidate = &labeled[i];
        if candidate.mz < low {
            if count == 0 {
                resume_index = i;
            }
            i += 1;
        } else if candidate.mz < high {
            let accepted = if candidate.is_confident(params.confidence_threshold) {
                true
            } else {
                let (narrow_low, narrow_high) = narrow_tolerance.bounds(target);
                candidate.mz > narrow_low && candidate.mz < narrow_high
            };
            if accepted {
                trace!(
                    "{:0.5} matched {:0.5} with {} labels",
                    anchor.mz,
                    candidate.mz,
                    count
                );
                assignments.push(Assignment::new(
                    anchor.mz,
                    candidate.mz,
                    count,
                    candidate.intensity,
                    anchor.intensity,
                ));
            }
            i += 1;
            count += 1;
        } else {
            count += 1;
        }
    }

    AnchorScan {
        assignments,
        resume_index,
    }
}

/// Assign labeled peaks to every anchor in `background`, in ascending anchor order.
///
/// An anchor may receive no assignments, or one per label count.
pub fn assign_labels(
    background: &Spectrum,
    labeled: &Spectrum,
    params: &LabelingParameters,
) -> Vec<Assignment> {
    let mut assignments = Vec::new();
    let mut start = 0;
    for anchor in background.iter() {
        let scan = scan_anchor(anchor, labeled.as_slice(), start, params);
        assignments.extend(scan.assignments);
        start = scan.resume_index;
    }
    debug!(
        "Assigned {} labeled peaks to {} anchors",
        assignments.len(),
        background.len()
    );
    assignments
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::CARBON_13_SHIFT;

    #[test]
    fn test_scan_anchor() {
        let params = LabelingParameters::default();
        let anchor = Peak::new(500.0, 1000.0, 10.0);
        let labeled = vec![
            Peak::new(450.0, 80.0, 1.0),
            Peak::new(500.3, 80.0, 1.0),
            Peak::new(501.0034, 50.0, 1.0),
            Peak::new(502.0067, 40.0, 1.0),
            Peak::new(504.0134, 40.0, 1.0),
        ];
        let scan = scan_anchor(&anchor, &labeled, 0, &params);
        let counts: Vec<_> = scan.assignments.iter().map(|a| a.label_count).collect();
        assert_eq!(counts, vec![1, 2, 4]);
        assert_eq!(scan.resume_index, 0);
        for a in scan.assignments.iter() {
            assert_eq!(a.unlabeled_mz, 500.0);
            assert_eq!(a.unlabeled_intensity, 1000.0);
            assert!(
                (a.labeled_mz - params.labeled_mz(500.0, a.label_count)).abs() < 1e-3,
                "{a:?}"
            );
        }
        assert_eq!(scan.assignments[0].labeled_intensity, 50.0);
    }

    #[test]
    fn test_resume_index() {
        let params = LabelingParameters::default();
        let anchor = Peak::new(500.0, 1000.0, 10.0);
        let labeled = vec![
            Peak::new(400.0, 80.0, 1.0),
            Peak::new(450.0, 80.0, 1.0),
            Peak::new(500.0, 80.0, 1.0),
        ];
        let scan = scan_anchor(&anchor, &labeled, 0, &params);
        assert_eq!(scan.resume_index, 1);
        assert_eq!(scan.assignments.len(), 1);
        assert_eq!(scan.assignments[0].label_count, 0);

        let scan = scan_anchor(&anchor, &labeled, 2, &params);
        assert_eq!(scan.resume_index, 2);
    }

    #[test]
    fn test_shared_labeled_peak() {
        let params = LabelingParameters::default();
        let a = 500.0;
        let b = 500.0 + CARBON_13_SHIFT;
        let background = Spectrum::new(vec![Peak::new(a, 1000.0, 10.0), Peak::new(b, 800.0, 10.0)]);
        let labeled = Spectrum::new(vec![
            Peak::new(b, 300.0, 1.0),
            Peak::new(b + CARBON_13_SHIFT, 300.0, 1.0),
        ]);
        let assignments = assign_labels(&background, &labeled, &params);
        let pairs: Vec<_> = assignments
            .iter()
            .map(|x| (x.unlabeled_mz, x.label_count))
            .collect();
        assert_eq!(pairs, vec![(a, 1), (a, 2), (b, 0), (b, 1)]);
    }

    #[test]
    fn test_low_confidence_window() {
        let params = LabelingParameters::default();
        let anchor = Peak::new(500.0, 1000.0, 10.0);
        let target = params.labeled_mz(500.0, 1);
        let off = target * 1.8e-6;

        // Between 1.5 and 2 ppm, only a confident candidate is accepted
        let weak = vec![Peak::new(target + off, 20.0, 1.0)];
        let scan = scan_anchor(&anchor, &weak, 0, &params);
        assert!(scan.assignments.is_empty());

        let strong = vec![Peak::new(target + off, 30.0, 1.0)];
        let scan = scan_anchor(&anchor, &strong, 0, &params);
        assert_eq!(scan.assignments.len(), 1);

        // Within 1.5 ppm, either is accepted
        let weak = vec![Peak::new(target - target * 1.0e-6, 20.0, 1.0)];
        let scan = scan_anchor(&anchor, &weak, 0, &params);
        assert_eq!(scan.assignments.len(), 1);
    }

    #[test]
    fn test_rejected_candidate_advances_count() {
        let params = LabelingParameters::default();
        let anchor = Peak::new(500.0, 1000.0, 10.0);
        let t1 = params.labeled_mz(500.0, 1);
        let t2 = params.labeled_mz(500.0, 2);
        let labeled = vec![
            Peak::new(t1 + t1 * 1.8e-6, 20.0, 1.0),
            Peak::new(t2, 20.0, 1.0),
        ];
        let scan = scan_anchor(&anchor, &labeled, 0, &params);
        assert_eq!(scan.assignments.len(), 1);
        assert_eq!(scan.assignments[0].label_count, 2);
    }

    #[test]
    fn test_label_count_bound() {
        let params = LabelingParameters::default();
        let anchor = Peak::new(13.0, 1000.0, 10.0);
        let labeled = vec![Peak::new(13.0, 1000.0, 1.0)];
        let scan = scan_anchor(&anchor, &labeled, 0, &params);
        assert!(scan.assignments.is_empty());

        // 30 / 14 allows counts 0 and 1
        let anchor = Peak::new(30.0, 1000.0, 10.0);
        let labeled: Vec<_> = (0..4)
            .map(|c| Peak::new(params.labeled_mz(30.0, c), 1000.0, 1.0))
            .collect();
        let scan = scan_anchor(&anchor, &labeled, 0, &params);
        let counts: Vec<_> = scan.assignments.iter().map(|a| a.label_count).collect();
        assert_eq!(counts, vec![0, 1]);
        for a in scan.assignments.iter() {
            assert!(a.label_count <= params.max_label_count(a.unlabeled_mz));
        }
    }

    #[test]
    fn test_empty() {
        let params = LabelingParameters::default();
        let background = Spectrum::new(vec![Peak::new(500.0, 1000.0, 10.0)]);
        assert!(assign_labels(&background, &Spectrum::default(), &params).is_empty());
        assert!(assign_labels(&Spectrum::default(), &background, &params).is_empty());
    }
}
