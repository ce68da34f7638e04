//! Peak and peak list types shared by every stage of the labeling pipeline.
use std::cmp::Ordering;
use std::ops::Index;
use std::slice;
use std::vec;

use mzpeaks::{CoordinateLike, IntensityMeasurement, MZ};

/// The smallest noise level a peak may carry. Lower recorded values are raised to this.
pub const NOISE_FLOOR: f64 = 0.5;

/// A centroided peak with the noise level reported for it by the instrument software.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
    pub noise: f64,
}

impl Peak {
    /// Create a new peak, clamping `noise` to [`NOISE_FLOOR`]
    pub fn new(mz: f64, intensity: f64, noise: f64) -> Self {
        Self {
            mz,
            intensity,
            noise: noise.max(NOISE_FLOOR),
        }
    }

    /// The ratio of this peak's intensity to its noise level
    pub fn signal_to_noise(&self) -> f64 {
        self.intensity / self.noise
    }

    /// Whether this peak's intensity is at least `threshold` times its noise level
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.intensity >= threshold * self.noise
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.mz
            .total_cmp(&other.mz)
            .then_with(|| self.intensity.total_cmp(&other.intensity))
            .then_with(|| self.noise.total_cmp(&other.noise))
    }
}

impl CoordinateLike<MZ> for Peak {
    fn coordinate(&self) -> f64 {
        self.mz
    }
}

impl IntensityMeasurement for Peak {
    fn intensity(&self) -> f32 {
        self.intensity as f32
    }
}

/// A labeled peak taken out of the labeled spectrum because it coincided with a
/// background peak. It may later be restored as a monoisotopic peak.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemovedPeak {
    pub mz: f64,
    pub intensity: f64,
}

impl RemovedPeak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

impl From<Peak> for RemovedPeak {
    fn from(value: Peak) -> Self {
        Self::new(value.mz, value.intensity)
    }
}

impl CoordinateLike<MZ> for RemovedPeak {
    fn coordinate(&self) -> f64 {
        self.mz
    }
}

impl IntensityMeasurement for RemovedPeak {
    fn intensity(&self) -> f32 {
        self.intensity as f32
    }
}

/// A peak list sorted by ascending m/z.
///
/// The ordering is established once on construction. The filtering stages never
/// re-sort, they only drop peaks via [`Spectrum::split_by_mask`], which preserves
/// the order of what remains.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Spectrum {
    peaks: Vec<Peak>,
}

impl Spectrum {
    pub fn new(mut peaks: Vec<Peak>) -> Self {
        peaks.sort_by(|a, b| a.total_cmp(b));
        Self { peaks }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Peak> {
        self.peaks.iter()
    }

    pub fn as_slice(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn get(&self, index: usize) -> Option<&Peak> {
        self.peaks.get(index)
    }

    pub fn into_inner(self) -> Vec<Peak> {
        self.peaks
    }

    /// Check that the peaks are in non-decreasing m/z order
    pub fn is_sorted(&self) -> bool {
        self.peaks.windows(2).all(|w| w[0].mz <= w[1].mz)
    }

    /// Split this spectrum into the peaks whose `mask` entry is `false` and the
    /// peaks whose `mask` entry is `true`, both in their original order.
    ///
    /// # Panics
    /// If `mask` is not the same length as the spectrum.
    pub fn split_by_mask(self, mask: &[bool]) -> (Spectrum, Vec<Peak>) {
        assert_eq!(
            mask.len(),
            self.peaks.len(),
            "Peak mask length does not match spectrum length"
        );
        let mut kept = Vec::with_capacity(self.peaks.len());
        let mut dropped = Vec::new();
        for (peak, masked) in self.peaks.into_iter().zip(mask.iter().copied()) {
            if masked {
                dropped.push(peak);
            } else {
                kept.push(peak);
            }
        }
        (Spectrum { peaks: kept }, dropped)
    }
}

impl Index<usize> for Spectrum {
    type Output = Peak;

    fn index(&self, index: usize) -> &Self::Output {
        &self.peaks[index]
    }
}

impl From<Vec<Peak>> for Spectrum {
    fn from(value: Vec<Peak>) -> Self {
        Self::new(value)
    }
}

impl FromIterator<Peak> for Spectrum {
    fn from_iter<T: IntoIterator<Item = Peak>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Spectrum {
    type Item = Peak;
    type IntoIter = vec::IntoIter<Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.peaks.into_iter()
    }
}

impl<'a> IntoIterator for &'a Spectrum {
    type Item = &'a Peak;
    type IntoIter = slice::Iter<'a, Peak>;

    fn into_iter(self) -> Self::IntoIter {
        self.peaks.iter()
    }
}
