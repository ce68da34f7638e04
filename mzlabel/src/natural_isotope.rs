//! Remove natural isotope satellite peaks from the unlabeled background spectrum.
//!
//! Without this step, the M+1 natural isotope peak of a background compound would
//! be treated as an anchor of its own, and a labeled peak carrying `n` labels would
//! be assigned to it with `n - 1` labels as well.
use tracing::{debug, trace};

use crate::params::LabelingParameters;
use crate::peaks::{Peak, Spectrum};

/// Mark the peaks of `background` that are natural isotope satellites of an earlier peak.
///
/// For each anchor, in ascending m/z order, the peaks after it are scanned for one
/// falling in the tolerance window around `anchor + k * label_shift` for `k` from 1 up
/// to [`LabelingParameters::natural_isotope_order`]. At most one peak is marked per
/// order. Peaks already marked are neither anchors nor candidates.
pub fn find_natural_isotope_peaks(background: &[Peak], params: &LabelingParameters) -> Vec<bool> {
    let n = background.len();
    let mut mask = vec![false; n];
    let tolerance = params.tolerance();

    for j in 0..n {
        if mask[j] {
            continue;
        }
        let anchor_mz = background[j].mz;
        let mut order = 1;
        let mut k = j + 1;
        while k < n && order <= params.natural_isotope_order {
            if mask[k] {
                k += 1;
                continue;
            }
            let (low, high) = tolerance.bounds(params.labeled_mz(anchor_mz, order));
            let mz = background[k].mz;
            if mz < low {
                k += 1;
            } else if mz < high {
                trace!("{mz:0.5} is the M+{order} natural isotope of {anchor_mz:0.5}");
                mask[k] = true;
                k += 1;
                order += 1;
            } else {
                order += 1;
            }
        }
    }
    mask
}

/// Remove natural isotope satellites from `background`, returning a new spectrum
/// in the same order.
pub fn remove_natural_isotopes(background: Spectrum, params: &LabelingParameters) -> Spectrum {
    let mask = find_natural_isotope_peaks(background.as_slice(), params);
    let (kept, removed) = background.split_by_mask(&mask);
    debug!(
        "Removed {} natural isotope peaks from the background spectrum, {} remain",
        removed.len(),
        kept.len()
    );
    kept
}
