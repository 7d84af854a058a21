//! Errors that occur during writing

use crate::validate::ValidationReport;

/// An error occured while writing an envelope
#[derive(Debug)]
pub enum Error {
    ValidationFailed(ValidationReport),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ValidationFailed(report) => report.fmt(f),
        }
    }
}

impl std::error::Error for Error {}
