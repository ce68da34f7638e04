//! High level APIs for running the full labeling pipeline
use std::fmt::Display;
use std::ops::{Add, AddAssign};

use tracing::{debug, instrument, warn};

use crate::assign::assign_labels;
use crate::error::LabelFinderError;
use crate::filter::filter_minimum_labels;
use crate::natural_isotope::remove_natural_isotopes;
use crate::params::LabelingParameters;
use crate::peaks::Spectrum;
use crate::restore::restore_monoisotopes;
use crate::solution::{anchor_groups, Assignment};
use crate::subtract::subtract_common_peaks;

/// Peak and assignment counts recorded as a run passes through each stage
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineSummary {
    pub background_peaks: usize,
    pub labeled_peaks: usize,
    pub natural_isotopes_removed: usize,
    pub common_peaks_removed: usize,
    pub raw_assignments: usize,
    pub monoisotopes_restored: usize,
    pub accepted_assignments: usize,
    pub accepted_anchors: usize,
}

impl Add for PipelineSummary {
    type Output = PipelineSummary;

    fn add(self, rhs: Self) -> Self::Output {
        let mut dup = self;
        dup += rhs;
        dup
    }
}

impl AddAssign for PipelineSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.background_peaks += rhs.background_peaks;
        self.labeled_peaks += rhs.labeled_peaks;
        self.natural_isotopes_removed += rhs.natural_isotopes_removed;
        self.common_peaks_removed += rhs.common_peaks_removed;
        self.raw_assignments += rhs.raw_assignments;
        self.monoisotopes_restored += rhs.monoisotopes_restored;
        self.accepted_assignments += rhs.accepted_assignments;
        self.accepted_anchors += rhs.accepted_anchors;
    }
}

impl Display for PipelineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Background Peaks: {} (-{} natural isotopes) | Labeled Peaks: {} (-{} common) | \
Assignments: {} (+{} monoisotopes) | Accepted: {} assignments for {} anchors",
            self.background_peaks,
            self.natural_isotopes_removed,
            self.labeled_peaks,
            self.common_peaks_removed,
            self.raw_assignments,
            self.monoisotopes_restored,
            self.accepted_assignments,
            self.accepted_anchors
        )
    }
}

/// The final assignment table of a run and how it was arrived at
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LabelingResult {
    /// The accepted assignments, ordered by anchor m/z and then label count
    pub assignments: Vec<Assignment>,
    pub summary: PipelineSummary,
}

/// Runs the labeling pipeline with a fixed, validated set of [`LabelingParameters`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFinder {
    params: LabelingParameters,
}

impl LabelFinder {
    pub fn new(params: LabelingParameters) -> Result<Self, LabelFinderError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LabelingParameters {
        &self.params
    }

    /// Find the labeled peaks in `labeled` relative to the unlabeled `background`.
    ///
    /// Empty spectra are not an error. Every stage passes them through and the
    /// result is an empty table.
    #[instrument(skip_all)]
    pub fn find_labels(&self, background: Spectrum, labeled: Spectrum) -> LabelingResult {
        let params = &self.params;
        let mut summary = PipelineSummary {
            background_peaks: background.len(),
            labeled_peaks: labeled.len(),
            ..Default::default()
        };
        if background.is_empty() {
            warn!("The background spectrum is empty");
        }
        if labeled.is_empty() {
            warn!("The labeled spectrum is empty");
        }

        let background = remove_natural_isotopes(background, params);
        summary.natural_isotopes_removed = summary.background_peaks - background.len();

        let subtraction = subtract_common_peaks(&background, labeled, params);
        summary.common_peaks_removed = subtraction.removed.len();

        let assignments = assign_labels(&background, &subtraction.labeled, params);
        summary.raw_assignments = assignments.len();

        let assignments = restore_monoisotopes(assignments, &subtraction.removed, params);
        summary.monoisotopes_restored = assignments.len() - summary.raw_assignments;

        let assignments = filter_minimum_labels(assignments);
        summary.accepted_assignments = assignments.len();
        summary.accepted_anchors = anchor_groups(&assignments).len();
        debug!("{summary}");

        LabelingResult {
            assignments,
            summary,
        }
    }
}

/// A single-shot labeling run.
///
/// Internally, this creates a [`LabelFinder`] and calls [`LabelFinder::find_labels`].
pub fn find_labels(
    background: Spectrum,
    labeled: Spectrum,
    params: LabelingParameters,
) -> Result<LabelingResult, LabelFinderError> {
    let finder = LabelFinder::new(params)?;
    Ok(finder.find_labels(background, labeled))
}
