//! Remove contaminant peaks from the labeled spectrum.
//!
//! A labeled peak that coincides with a background peak is presumed to be
//! non-biological, unless it is markedly more intense than its background
//! counterpart. This also removes the monoisotopic peaks of labeled compounds,
//! which is why the removed peaks are retained for [`crate::restore`].
use tracing::{debug, trace};

use crate::params::LabelingParameters;
use crate::peaks::{Peak, RemovedPeak, Spectrum};

/// The labeled spectrum after contaminant subtraction, and the peaks taken out of it
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubtractionResult {
    pub labeled: Spectrum,
    /// The removed peaks in ascending m/z order
    pub removed: Vec<RemovedPeak>,
}

impl SubtractionResult {
    pub fn new(labeled: Spectrum, removed: Vec<RemovedPeak>) -> Self {
        Self { labeled, removed }
    }
}

/// Mark the peaks of `labeled` that coincide with a peak in `background` and are less
/// than [`LabelingParameters::contamination_ratio`] times as intense as it.
///
/// Both peak lists are swept forward once. A background peak matches when it falls in
/// the half-open window `(mz * (1 - tol), mz * (1 + tol)]` of the current labeled peak.
pub fn find_common_peaks(
    background: &[Peak],
    labeled: &[Peak],
    params: &LabelingParameters,
) -> Vec<bool> {
    let mut mask = vec![false; labeled.len()];
    let tolerance = params.tolerance();
    let mut i = 0;
    let mut j = 0;
    while i < labeled.len() && j < background.len() {
        let peak = &labeled[i];
        let (low, high) = tolerance.bounds(peak.mz);
        let bg = &background[j];
        if bg.mz <= low {
            j += 1;
        } else if bg.mz > high {
            i += 1;
        } else {
            if peak.intensity < params.contamination_ratio * bg.intensity {
                trace!(
                    "{:0.5} ({}) coincides with background {:0.5} ({})",
                    peak.mz,
                    peak.intensity,
                    bg.mz,
                    bg.intensity
                );
                mask[i] = true;
            }
            i += 1;
        }
    }
    mask
}

/// Remove contaminant peaks shared with `background` from `labeled`.
///
/// Every input peak ends up in exactly one of [`SubtractionResult::labeled`] or
/// [`SubtractionResult::removed`].
pub fn subtract_common_peaks(
    background: &Spectrum,
    labeled: Spectrum,
    params: &LabelingParameters,
) -> SubtractionResult {
    let mask = find_common_peaks(background.as_slice(), labeled.as_slice(), params);
    let (labeled, removed) = labeled.split_by_mask(&mask);
    let removed: Vec<RemovedPeak> = removed.into_iter().map(RemovedPeak::from).collect();
    debug!(
        "Removed {} peaks common to both spectra, {} labeled peaks remain",
        removed.len(),
        labeled.len()
    );
    SubtractionResult::new(labeled, removed)
}
