// Excel import (xlsx, xls, xlsb, ods) - first worksheet only

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use log::debug;

use tallyrec_recon::model::Value;
use tallyrec_recon::Record;

use crate::error::LoadError;
use crate::fields::record_from_row;

pub fn import(path: &Path) -> Result<Vec<Record>, LoadError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| LoadError::Excel {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::NoSheets {
            path: path.to_path_buf(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Excel {
            path: path.to_path_buf(),
            message: format!("cannot read sheet '{sheet_name}': {e}"),
        })?;

    debug!(
        "{}: reading sheet '{}' ({} x {})",
        path.display(),
        sheet_name,
        range.height(),
        range.width()
    );

    Ok(records_from_range(&range))
}

/// First row is the header; fully blank rows are skipped.
pub fn records_from_range(range: &Range<Data>) -> Vec<Record> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    rows.filter(|row| row.iter().any(|cell| cell_value(cell).is_some()))
        .enumerate()
        .map(|(i, row)| {
            let cells = headers
                .iter()
                .zip(row)
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, cell)| (h.as_str(), cell_value(cell)));
            record_from_row(cells, i + 1)
        })
        .collect()
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Strings stay text, numbers stay numbers, date cells become their serial
/// number. Empty and error cells are absent.
fn cell_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(Value::Text(s.clone())),
        Data::Float(n) => Some(Value::Number(*n)),
        Data::Int(n) => Some(Value::Number(*n as f64)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Some(Value::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::Text(s.clone())),
    }
}
