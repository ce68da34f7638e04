//! Find stable isotope labeled peaks by comparing a labeled mass spectrum against
//! an unlabeled ("background") reference spectrum.
//!
//! The work is done in five stages, each a sweep over m/z-sorted peak lists:
//!
//! 1. [`natural_isotope::remove_natural_isotopes`] strips natural isotope satellites
//!    from the background spectrum.
//! 2. [`subtract::subtract_common_peaks`] removes contaminant peaks shared between the
//!    two spectra, holding them aside.
//! 3. [`assign::assign_labels`] matches each background peak to labeled peaks at
//!    increasing numbers of label mass shifts.
//! 4. [`restore::restore_monoisotopes`] puts back monoisotopic peaks that the
//!    contaminant subtraction removed for anchors with label evidence.
//! 5. [`filter::filter_minimum_labels`] drops anchors without enough label evidence.
//!
//! [`api::LabelFinder`] runs them in order.
pub mod api;
pub mod assign;
pub mod error;
pub mod filter;
pub mod io;
pub mod natural_isotope;
pub mod params;
pub mod peaks;
pub mod restore;
pub mod solution;
pub mod subtract;

pub mod prelude {
    pub use crate::io::{ResultSink, SpectrumSource};
    pub use mzpeaks::{IntensityMeasurement, MZLocated};
}

pub use api::{find_labels, LabelFinder, LabelingResult, PipelineSummary};
pub use error::LabelFinderError;
pub use io::{AssignmentTableWriter, PeakListReader, ResultSink, SpectrumSource};
pub use params::{LabelType, LabelingParameters};
pub use peaks::{Peak, RemovedPeak, Spectrum};
pub use solution::Assignment;
