//! Run-level constants for a labeling run
use std::fmt::Display;

use mzpeaks::Tolerance;

use crate::error::LabelFinderError;

/// The mass difference between 13C and 12C
pub const CARBON_13_SHIFT: f64 = 1.0033548;
/// The mass difference between 2H and 1H
pub const DEUTERIUM_SHIFT: f64 = 1.006277;
/// The mass difference between 15N and 14N
pub const NITROGEN_15_SHIFT: f64 = 0.997035;

/// The stable isotope used as the label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LabelType {
    #[default]
    Carbon13,
    Deuterium,
    Nitrogen15,
}

impl LabelType {
    /// The mass added by a single label substitution
    pub const fn mass_shift(&self) -> f64 {
        match self {
            LabelType::Carbon13 => CARBON_13_SHIFT,
            LabelType::Deuterium => DEUTERIUM_SHIFT,
            LabelType::Nitrogen15 => NITROGEN_15_SHIFT,
        }
    }

    /// The mass per labelable atom, used to bound the number of labels an anchor of
    /// a given mass may carry. One carbon per CH2 (14 Da), but two hydrogens.
    pub const fn effective_atom_span(&self) -> f64 {
        match self {
            LabelType::Carbon13 => 14.0,
            LabelType::Deuterium => 7.0,
            LabelType::Nitrogen15 => 14.0,
        }
    }
}

impl Display for LabelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The constants shared by every stage of the pipeline.
///
/// Every stage takes these explicitly so that stages can be exercised on their own
/// with different values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LabelingParameters {
    /// The relative mass tolerance in parts-per-million for every m/z comparison
    pub tolerance_ppm: f64,
    /// The fraction of `tolerance_ppm` a low confidence label candidate must fall within
    pub low_confidence_factor: f64,
    /// The multiple of its noise level a candidate's intensity must reach to be
    /// considered high confidence
    pub confidence_threshold: f64,
    /// The mass added by each label
    pub label_shift: f64,
    /// The anchor mass per labelable atom, bounding the label count tried
    pub effective_atom_span: f64,
    /// The highest natural isotope order removed from the background spectrum
    pub natural_isotope_order: u32,
    /// A labeled peak at least this many times as intense as the background peak it
    /// coincides with is kept as real signal
    pub contamination_ratio: f64,
}

impl Default for LabelingParameters {
    fn default() -> Self {
        Self::for_label(LabelType::default())
    }
}

impl LabelingParameters {
    pub fn new(
        tolerance_ppm: f64,
        low_confidence_factor: f64,
        confidence_threshold: f64,
        label_shift: f64,
        effective_atom_span: f64,
        natural_isotope_order: u32,
        contamination_ratio: f64,
    ) -> Self {
        Self {
            tolerance_ppm,
            low_confidence_factor,
            confidence_threshold,
            label_shift,
            effective_atom_span,
            natural_isotope_order,
            contamination_ratio,
        }
    }

    /// The default parameters for a particular label
    pub fn for_label(label_type: LabelType) -> Self {
        Self::new(
            2.0,
            0.75,
            30.0,
            label_type.mass_shift(),
            label_type.effective_atom_span(),
            1,
            2.0,
        )
    }

    pub fn with_tolerance_ppm(mut self, tolerance_ppm: f64) -> Self {
        self.tolerance_ppm = tolerance_ppm;
        self
    }

    pub fn with_natural_isotope_order(mut self, natural_isotope_order: u32) -> Self {
        self.natural_isotope_order = natural_isotope_order;
        self
    }

    /// The full mass tolerance window
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::PPM(self.tolerance_ppm)
    }

    /// The narrower window low confidence candidates must fall within
    pub fn low_confidence_tolerance(&self) -> Tolerance {
        Tolerance::PPM(self.tolerance_ppm * self.low_confidence_factor)
    }

    /// The number of label orders, starting from zero, to try for an anchor at `anchor_mz`
    pub fn max_label_count(&self, anchor_mz: f64) -> u32 {
        (anchor_mz / self.effective_atom_span).floor() as u32
    }

    /// The m/z expected for an anchor carrying `count` labels
    pub fn labeled_mz(&self, anchor_mz: f64, count: u32) -> f64 {
        anchor_mz + self.label_shift * count as f64
    }

    /// Reject parameter combinations the sweeps cannot run with
    pub fn validate(&self) -> Result<(), LabelFinderError> {
        if !(self.tolerance_ppm > 0.0) {
            return Err(LabelFinderError::InvalidParameters(format!(
                "mass tolerance must be positive, got {}",
                self.tolerance_ppm
            )));
        }
        if !(self.low_confidence_factor > 0.0 && self.low_confidence_factor <= 1.0) {
            return Err(LabelFinderError::InvalidParameters(format!(
                "low confidence factor must be in (0, 1], got {}",
                self.low_confidence_factor
            )));
        }
        if !(self.label_shift > 0.0) {
            return Err(LabelFinderError::InvalidParameters(format!(
                "label mass shift must be positive, got {}",
                self.label_shift
            )));
        }
        if !(self.effective_atom_span > 0.0) {
            return Err(LabelFinderError::InvalidParameters(format!(
                "effective atom span must be positive, got {}",
                self.effective_atom_span
            )));
        }
        if self.natural_isotope_order == 0 {
            return Err(LabelFinderError::InvalidParameters(
                "natural isotope order must be at least 1".to_string(),
            ));
        }
        if !(self.confidence_threshold >= 0.0) || !(self.contamination_ratio >= 0.0) {
            return Err(LabelFinderError::InvalidParameters(format!(
                "confidence threshold ({}) and contamination ratio ({}) must not be negative",
                self.confidence_threshold, self.contamination_ratio
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = LabelingParameters::default();
        assert_eq!(params.tolerance_ppm, 2.0);
        assert_eq!(params.low_confidence_factor, 0.75);
        assert_eq!(params.confidence_threshold, 30.0);
        assert_eq!(params.label_shift, CARBON_13_SHIFT);
        assert_eq!(params.effective_atom_span, 14.0);
        assert_eq!(params.natural_isotope_order, 1);
        assert_eq!(params.contamination_ratio, 2.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_label_types() {
        let params = LabelingParameters::for_label(LabelType::Deuterium);
        assert_eq!(params.label_shift, DEUTERIUM_SHIFT);
        assert_eq!(params.effective_atom_span, 7.0);
        assert_eq!(params.max_label_count(500.0), 71);

        let params = LabelingParameters::for_label(LabelType::Nitrogen15);
        assert_eq!(params.label_shift, NITROGEN_15_SHIFT);
        assert_eq!(LabelType::Nitrogen15.to_string(), "Nitrogen15");
    }

    #[test]
    fn test_windows() {
        let params = LabelingParameters::default();
        assert_eq!(params.max_label_count(500.0), 35);
        assert_eq!(params.max_label_count(13.9), 0);
        assert_eq!(params.max_label_count(14.0), 1);

        let (low, high) = params.tolerance().bounds(500.0);
        assert!((low - 499.999).abs() < 1e-9);
        assert!((high - 500.001).abs() < 1e-9);

        let (low, high) = params.low_confidence_tolerance().bounds(500.0);
        assert!((low - 499.99925).abs() < 1e-9);
        assert!((high - 500.00075).abs() < 1e-9);

        assert!((params.labeled_mz(500.0, 2) - 502.0067096).abs() < 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            LabelingParameters::default().with_tolerance_ppm(0.0).validate(),
            Err(LabelFinderError::InvalidParameters(_))
        ));
        assert!(matches!(
            LabelingParameters::default()
                .with_natural_isotope_order(0)
                .validate(),
            Err(LabelFinderError::InvalidParameters(_))
        ));
        let mut params = LabelingParameters::default();
        params.effective_atom_span = -1.0;
        assert!(params.validate().is_err());
        params.effective_atom_span = f64::NAN;
        assert!(params.validate().is_err());
    }
}
