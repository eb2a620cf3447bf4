// File loading: CSV and Excel exports into reconciliation records

pub mod csv;
pub mod error;
pub mod fields;
pub mod xlsx;

use std::path::Path;

use log::info;

use tallyrec_recon::Record;

pub use error::LoadError;

/// Load one input file, choosing the reader by extension.
///
/// A file that parses but yields no records is an error: the engine is only
/// ever handed non-empty collections.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => crate::csv::import(path)?,
        "xlsx" | "xls" | "xlsb" | "ods" => crate::xlsx::import(path)?,
        _ => {
            return Err(LoadError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    if records.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
