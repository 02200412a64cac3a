// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

/// Failure to turn a workbook on disk into an observation table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not exist or cannot be read.
    #[error("input not found or unreadable: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but its sheet/header layout is not what we expect.
    #[error("malformed workbook {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::InputNotFound { .. })
    }
}

/// Structural problems with the sheet itself.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("cannot decode workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("sheet `{sheet}` not found (available: {})", available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("no header row after skipping {skip_rows} rows")]
    NoHeader { skip_rows: u32 },

    #[error("required column `{label}` missing from header")]
    MissingColumn { label: String },

    #[error("year column `{label}` does not fit a calendar year")]
    YearOutOfRange { label: String },
}

/// Rejected dashboard filter selections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("observation table is empty")]
    EmptyTable,

    #[error("year {0} has no observations")]
    UnknownYear(i32),

    #[error("country `{0}` has no observations")]
    UnknownCountry(String),
}
