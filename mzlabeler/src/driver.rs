use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use mzlabel::prelude::*;
use mzlabel::{
    Assignment, AssignmentTableWriter, LabelFinder, LabelFinderError, LabelType,
    LabelingParameters, PeakListReader, Spectrum,
};

use crate::args::{non_negative_float_f64, positive_float_f64, ArgLabelType};

/// The configuration file read from the working directory, if present
pub const DEFAULT_CONFIG_FILE: &str = "mzlabeler.toml";
/// The prefix of environment variables that override configuration
pub const ENV_PREFIX: &str = "MZLABELER_";
/// The output path that means "write to STDOUT"
pub const STDOUT_PATH: &str = "-";

#[derive(Debug, Error)]
pub enum MZLabelerError {
    #[error("An IO error occurred: {0}")]
    IOError(
        #[source]
        #[from]
        io::Error,
    ),
    #[error("Failed to process {0}: {1}")]
    InputError(String, #[source] LabelFinderError),
    #[error(transparent)]
    LabelFinderError(#[from] LabelFinderError),
    #[error("Failed to load configuration: {0}")]
    ConfigurationError(
        #[source]
        #[from]
        figment::Error,
    ),
}

/// Find stable isotope labeled peaks in a labeled mass spectrum.
///
/// Read an unlabeled background peak list and a labeled peak list exported from the
/// instrument software, match labeled peaks to background peaks across increasing
/// numbers of labels, and write a tab-delimited table of the anchors that show labeling.
#[derive(Parser, Debug, Deserialize, Serialize)]
#[command(author, version)]
pub struct MZLabeler {
    /// The path to the unlabeled (background) peak list
    #[arg()]
    pub background_file: PathBuf,

    /// The path to the labeled peak list
    #[arg()]
    pub labeled_file: PathBuf,

    /// The path to write the assignment table to, or if '-' is passed, write to STDOUT [default: -]
    #[arg(short = 'o', long = "output-file")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,

    /// The path to write a log file to, in addition to STDERR
    #[arg(short = 'l', long = "log-file")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// A TOML configuration file to read additional parameters from.
    ///
    /// Configurations are also read from `mzlabeler.toml` in the working directory.
    /// Environment variables prefixed with `MZLABELER_` will be read too. Options given
    /// on the command line take precedence over all of these.
    #[arg(long = "config-file")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,

    /// The number of leading non-data lines to skip in each peak list [default: 0]
    #[arg(short = 'k', long = "skip-lines")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_lines: Option<usize>,

    /// The multiple of its noise level a peak's intensity must exceed to be read [default: 1]
    #[arg(short = 'n', long = "noise-factor", value_parser = non_negative_float_f64)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_factor: Option<f64>,

    /// The isotope used as the label, which sets the default label shift and atom span [default: carbon13]
    #[arg(short = 'L', long = "label-type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_type: Option<ArgLabelType>,

    /// The mass tolerance in parts-per-million [default: 2]
    #[arg(short = 't', long = "tolerance-ppm", value_parser = positive_float_f64)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance_ppm: Option<f64>,

    /// The fraction of the mass tolerance low confidence peaks must fall within [default: 0.75]
    #[arg(long = "low-confidence-factor", value_parser = positive_float_f64)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_confidence_factor: Option<f64>,

    /// The signal-to-noise ratio at which a labeled peak is high confidence [default: 30]
    #[arg(short = 'c', long = "confidence-threshold", value_parser = non_negative_float_f64)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,

    /// The mass of a single label, overriding the label type's
    #[arg(long = "label-shift", value_parser = positive_float_f64)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_shift: Option<f64>,

    /// The anchor mass per labelable atom, overriding the label type's
    #[arg(long = "effective-atom-span", value_parser = positive_float_f64)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_atom_span: Option<f64>,

    /// The highest natural isotope order removed from the background [default: 1]
    #[arg(
        short = 'i',
        long = "natural-isotope-order",
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_isotope_order: Option<u32>,

    /// How many times more intense than a coinciding background peak a labeled peak
    /// must be to be kept as signal [default: 2]
    #[arg(long = "contamination-ratio", value_parser = non_negative_float_f64)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contamination_ratio: Option<f64>,
}

impl MZLabeler {
    /// Layer the configuration sources under the options given on the command line.
    ///
    /// From lowest to highest precedence: `mzlabeler.toml` in the working directory,
    /// the `--config-file`, `MZLABELER_` environment variables, and finally the
    /// options present on the command line.
    pub fn load_configuration(self) -> Result<Self, MZLabelerError> {
        let mut config = Figment::new().merge(Toml::file(DEFAULT_CONFIG_FILE));
        if let Some(path) = self.config_file.as_ref() {
            config = config.merge(Toml::file_exact(path));
        }
        config = config
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(&self));
        Ok(config.extract()?)
    }

    /// The path the assignment table is written to, `-` meaning STDOUT
    pub fn output_path(&self) -> &Path {
        self.output_file
            .as_deref()
            .unwrap_or_else(|| Path::new(STDOUT_PATH))
    }

    /// Build the labeling parameters from the label type and any overrides
    pub fn labeling_parameters(&self) -> LabelingParameters {
        let label_type: LabelType = self.label_type.unwrap_or_default().into();
        let mut params = LabelingParameters::for_label(label_type);
        if let Some(value) = self.tolerance_ppm {
            params.tolerance_ppm = value;
        }
        if let Some(value) = self.low_confidence_factor {
            params.low_confidence_factor = value;
        }
        if let Some(value) = self.confidence_threshold {
            params.confidence_threshold = value;
        }
        if let Some(value) = self.label_shift {
            params.label_shift = value;
        }
        if let Some(value) = self.effective_atom_span {
            params.effective_atom_span = value;
        }
        if let Some(value) = self.natural_isotope_order {
            params.natural_isotope_order = value;
        }
        if let Some(value) = self.contamination_ratio {
            params.contamination_ratio = value;
        }
        params
    }

    fn read_spectrum(&self, path: &Path) -> Result<Spectrum, MZLabelerError> {
        let input_error =
            |e: LabelFinderError| MZLabelerError::InputError(path.display().to_string(), e);
        let mut reader = PeakListReader::open_path(path)
            .map_err(|e| input_error(e.into()))?
            .with_skip_lines(self.skip_lines.unwrap_or_default())
            .with_noise_factor(self.noise_factor.unwrap_or(1.0));
        let spectrum = reader.read_spectrum().map_err(input_error)?;
        if spectrum.is_empty() {
            warn!("No peaks were read from {}", path.display());
        } else {
            debug!("Read {} peaks from {}", spectrum.len(), path.display());
        }
        Ok(spectrum)
    }

    fn write_output(&self, assignments: &[Assignment]) -> Result<(), MZLabelerError> {
        let output_path = self.output_path();
        if output_path == Path::new(STDOUT_PATH) {
            let mut writer = AssignmentTableWriter::new(io::stdout().lock());
            writer.write_assignments(assignments)?;
        } else {
            let handle = io::BufWriter::new(fs::File::create(output_path)?);
            let mut writer = AssignmentTableWriter::new(handle);
            writer.write_assignments(assignments)?;
        }
        Ok(())
    }

    pub fn main(&self) -> Result<(), MZLabelerError> {
        info!(
            "mzlabeler v{}",
            option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")
        );
        info!("Background: {}", self.background_file.display());
        info!("Labeled: {}", self.labeled_file.display());
        info!("Output: {}", self.output_path().display());

        let params = self.labeling_parameters();
        debug!("Parameters: {params:?}");
        let finder = LabelFinder::new(params)?;

        let start = Instant::now();
        let background = self.read_spectrum(&self.background_file)?;
        let labeled = self.read_spectrum(&self.labeled_file)?;

        let result = finder.find_labels(background, labeled);
        let summary = result.summary;
        info!(
            "Background Peaks: {} | Natural Isotopes Removed: {}",
            summary.background_peaks, summary.natural_isotopes_removed
        );
        info!(
            "Labeled Peaks: {} | Common Peaks Removed: {}",
            summary.labeled_peaks, summary.common_peaks_removed
        );
        info!(
            "Assignments: {} | Monoisotopes Restored: {}",
            summary.raw_assignments, summary.monoisotopes_restored
        );
        info!(
            "Accepted Anchors: {} | Accepted Assignments: {}",
            summary.accepted_anchors, summary.accepted_assignments
        );

        self.write_output(&result.assignments)?;
        info!("Total Elapsed Time: {:0.3?}", start.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parameter_overrides() {
        let args = MZLabeler::parse_from([
            "mzlabeler",
            "bg.txt",
            "lb.txt",
            "-L",
            "deuterium",
            "-t",
            "3",
            "--label-shift",
            "1.5",
        ]);
        let params = args.labeling_parameters();
        assert_eq!(params.tolerance_ppm, 3.0);
        assert_eq!(params.label_shift, 1.5);
        assert_eq!(params.effective_atom_span, 7.0);
        assert_eq!(params.confidence_threshold, 30.0);
        assert_eq!(args.output_path(), Path::new("-"));
    }

    #[test]
    fn test_defaults() {
        let args = MZLabeler::parse_from(["mzlabeler", "bg.txt", "lb.txt"]);
        assert_eq!(args.labeling_parameters(), LabelingParameters::default());
    }

    #[test]
    fn test_output_file_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                "output_file = \"from_config.tsv\"\nskip_lines = 2\n",
            )?;
            let args = MZLabeler::parse_from(["mzlabeler", "bg.txt", "lb.txt"])
                .load_configuration()
                .map_err(|e| e.to_string())?;
            assert_eq!(args.output_path(), Path::new("from_config.tsv"));
            assert_eq!(args.skip_lines, Some(2));

            jail.set_env("MZLABELER_OUTPUT_FILE", "from_env.tsv");
            let args = MZLabeler::parse_from(["mzlabeler", "bg.txt", "lb.txt"])
                .load_configuration()
                .map_err(|e| e.to_string())?;
            assert_eq!(args.output_path(), Path::new("from_env.tsv"));

            let args = MZLabeler::parse_from(["mzlabeler", "bg.txt", "lb.txt", "-o", "-"])
                .load_configuration()
                .map_err(|e| e.to_string())?;
            assert_eq!(args.output_path(), Path::new("-"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_order() {
        let result = MZLabeler::try_parse_from(["mzlabeler", "bg.txt", "lb.txt", "-i", "0"]);
        assert!(result.is_err());
    }
}
