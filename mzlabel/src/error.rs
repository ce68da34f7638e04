use std::io;
use std::num::ParseFloatError;

use thiserror::Error;

/// An error that might occur while reading peak lists, writing results, or
/// configuring a labeling run
#[derive(Debug, Error)]
pub enum LabelFinderError {
    #[error("An IO error occurred: {0}")]
    IOError(
        #[source]
        #[from]
        io::Error,
    ),
    #[error("Line {line_number} does not have exactly four fields: {line:?}")]
    MalformedLine { line_number: usize, line: String },
    #[error("Line {line_number} has a field that is not a number, {token:?}: {source}")]
    InvalidNumber {
        line_number: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("Line {line_number} has an invalid value {token:?}: {reason}")]
    InvalidValue {
        line_number: usize,
        token: String,
        reason: &'static str,
    },
    #[error("Invalid labeling parameters: {0}")]
    InvalidParameters(String),
}
