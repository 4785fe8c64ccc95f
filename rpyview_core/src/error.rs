//! Error types for sample parsing.

use std::num::ParseFloatError;
use thiserror::Error;

/// Errors raised while turning a data line into a sample.
///
/// Every variant is a "malformed data" failure: the frame is skipped and the
/// previous drawing stays on screen.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SampleError {
    /// The line did not split into the expected number of fields
    #[error("Expected {expected} comma-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    /// A field could not be parsed as a float
    #[error("Field {index} is not a number: {value:?} ({source})")]
    InvalidNumber {
        index: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A field parsed but is NaN or infinite
    #[error("Field {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },
}

impl SampleError {
    /// Creates a field count error.
    pub fn field_count(expected: usize, found: usize) -> Self {
        Self::FieldCount { expected, found }
    }

    /// The field count of the rejected line, for field count errors.
    pub fn found_fields(&self) -> Option<usize> {
        match self {
            Self::FieldCount { found, .. } => Some(*found),
            _ => None,
        }
    }
}
