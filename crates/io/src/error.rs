use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an input file into records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: malformed CSV: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: cannot read spreadsheet: {message}", .path.display())]
    Excel { path: PathBuf, message: String },

    #[error("{}: spreadsheet contains no sheets", .path.display())]
    NoSheets { path: PathBuf },

    #[error("{}: unsupported file type '{extension}', expected a CSV or Excel file", .path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("{}: no records found", .path.display())]
    Empty { path: PathBuf },
}
