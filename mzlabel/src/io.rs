//! Reading exported peak lists and writing assignment tables.
//!
//! Peak lists are the text exports of instrument software such as Xcalibur
//! QualBrowser's exact mass list: a few leading non-data lines followed by one peak
//! per line with four whitespace-separated columns, `m/z`, `intensity`,
//! `relative intensity` and `noise`.
use std::fs;
use std::io::{self, prelude::*};
use std::path::Path;

use flate2::bufread::GzDecoder;
use tracing::debug;

use crate::error::LabelFinderError;
use crate::peaks::{Peak, Spectrum};
use crate::solution::Assignment;

/// The header line of an assignment table
pub const ASSIGNMENT_TABLE_HEADER: &str =
    "Unlabeled\tLabeled\t#ofLabels\tLabeled intensity\tUnlabeled intensity";

/// Something that produces a single m/z sorted [`Spectrum`]
pub trait SpectrumSource {
    fn read_spectrum(&mut self) -> Result<Spectrum, LabelFinderError>;
}

/// Something that consumes the final assignment table
pub trait ResultSink {
    fn write_assignments(&mut self, assignments: &[Assignment]) -> Result<(), LabelFinderError>;
}

/// Read a peak list from a tab-delimited text export.
///
/// A peak is kept only if its intensity exceeds its noise level times `noise_factor`,
/// after the noise level has been raised to [`crate::peaks::NOISE_FLOOR`].
#[derive(Debug)]
pub struct PeakListReader<R: BufRead> {
    handle: R,
    skip_lines: usize,
    noise_factor: f64,
}

impl<R: BufRead> PeakListReader<R> {
    pub fn new(handle: R) -> Self {
        Self {
            handle,
            skip_lines: 0,
            noise_factor: 1.0,
        }
    }

    /// Set the number of leading non-data lines to discard
    pub fn with_skip_lines(mut self, skip_lines: usize) -> Self {
        self.skip_lines = skip_lines;
        self
    }

    /// Set the multiple of a peak's noise level its intensity must exceed to be kept
    pub fn with_noise_factor(mut self, noise_factor: f64) -> Self {
        self.noise_factor = noise_factor;
        self
    }

    /// Parse a single data line, returning `None` for blank lines.
    ///
    /// Every field must be a finite number, the m/z must be positive and neither the
    /// intensity nor the noise may be negative. `line_number` is only used for error
    /// reporting.
    pub fn parse_line(line_number: usize, line: &str) -> Result<Option<Peak>, LabelFinderError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(None);
        }
        if tokens.len() != 4 {
            return Err(LabelFinderError::MalformedLine {
                line_number,
                line: line.trim_end().to_string(),
            });
        }
        let mut values = [0.0f64; 4];
        for (value, token) in values.iter_mut().zip(tokens.iter()) {
            *value = token
                .parse()
                .map_err(|e| LabelFinderError::InvalidNumber {
                    line_number,
                    token: token.to_string(),
                    source: e,
                })?;
        }
        // The relative intensity column is not used
        let [mz, intensity, _relative_intensity, noise] = values;
        let invalid = |token: &str, reason: &'static str| LabelFinderError::InvalidValue {
            line_number,
            token: token.to_string(),
            reason,
        };
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(invalid(tokens[i], "not a finite number"));
        }
        if mz <= 0.0 {
            return Err(invalid(tokens[0], "m/z must be positive"));
        }
        if intensity < 0.0 {
            return Err(invalid(tokens[1], "intensity must not be negative"));
        }
        if noise < 0.0 {
            return Err(invalid(tokens[3], "noise must not be negative"));
        }
        Ok(Some(Peak::new(mz, intensity, noise)))
    }

    fn keep(&self, peak: &Peak) -> bool {
        peak.intensity > peak.noise * self.noise_factor
    }

    /// Read every remaining line, returning the retained peaks in file order
    pub fn read_peaks(&mut self) -> Result<Vec<Peak>, LabelFinderError> {
        let mut peaks = Vec::new();
        let mut line = String::new();
        let mut line_number = 0;
        let mut n_rejected = 0usize;
        loop {
            line.clear();
            if self.handle.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;
            if line_number <= self.skip_lines {
                continue;
            }
            if let Some(peak) = Self::parse_line(line_number, &line)? {
                if self.keep(&peak) {
                    peaks.push(peak);
                } else {
                    n_rejected += 1;
                }
            }
        }
        debug!(
            "Read {line_number} lines, kept {} peaks and dropped {n_rejected} below the noise cutoff",
            peaks.len()
        );
        Ok(peaks)
    }
}

impl PeakListReader<Box<dyn BufRead>> {
    /// Open a peak list file, decompressing it if its name ends in `.gz`
    pub fn open_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let handle = io::BufReader::new(fs::File::open(path)?);
        let is_gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or_default();
        let handle: Box<dyn BufRead> = if is_gzip {
            debug!("Reading {} as gzip compressed", path.display());
            Box::new(io::BufReader::new(GzDecoder::new(handle)))
        } else {
            Box::new(handle)
        };
        Ok(Self::new(handle))
    }
}

impl<R: BufRead> SpectrumSource for PeakListReader<R> {
    fn read_spectrum(&mut self) -> Result<Spectrum, LabelFinderError> {
        Ok(Spectrum::new(self.read_peaks()?))
    }
}

/// Write assignments as a tab-delimited table with a header line
#[derive(Debug)]
pub struct AssignmentTableWriter<W: Write> {
    handle: W,
}

impl<W: Write> AssignmentTableWriter<W> {
    pub fn new(handle: W) -> Self {
        Self { handle }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.handle, "{ASSIGNMENT_TABLE_HEADER}")
    }

    pub fn write_assignment(&mut self, assignment: &Assignment) -> io::Result<()> {
        writeln!(
            self.handle,
            "{:?}\t{:?}\t{}\t{:?}\t{:?}",
            assignment.unlabeled_mz,
            assignment.labeled_mz,
            assignment.label_count,
            assignment.labeled_intensity,
            assignment.unlabeled_intensity
        )
    }

    pub fn into_inner(self) -> W {
        self.handle
    }
}

impl<W: Write> ResultSink for AssignmentTableWriter<W> {
    fn write_assignments(&mut self, assignments: &[Assignment]) -> Result<(), LabelFinderError> {
        self.write_header()?;
        for assignment in assignments {
            self.write_assignment(assignment)?;
        }
        self.handle.flush()?;
        Ok(())
    }
}
