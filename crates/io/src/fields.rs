// Column -> record field mapping shared by the CSV and Excel importers

use log::debug;

use tallyrec_recon::model::{
    Value, AMOUNT, CATEGORY, DATE, DESCRIPTION, ID, REFERENCE, WELL_KNOWN_FIELDS,
};
use tallyrec_recon::Record;

/// Build a record from one data row.
///
/// `cells` pairs each header with the cell value, `None` for a cell the
/// source left out. `position` is the 1-based row number among data rows and
/// names synthesized identifiers.
///
/// Headers are matched loosely (trimmed, lowercased, substring):
///
/// | header contains               | fills                       |
/// |-------------------------------|-----------------------------|
/// | `id`, `reference`             | `id` and `reference`, first non-empty wins |
/// | `date`                        | `date`, last wins           |
/// | `amount`, `value`, `price`    | `amount` as a number, invalid text is 0 |
/// | `description`, `details`, `note` | `description`            |
/// | `category`, `type`            | `category`                  |
///
/// Every column is also kept under its own header unless that header is
/// exactly a well-known field name.
pub fn record_from_row<'a, I>(cells: I, position: usize) -> Record
where
    I: IntoIterator<Item = (&'a str, Option<Value>)>,
{
    let mut record = Record::new();

    for (header, value) in cells {
        let Some(value) = value else { continue };
        let key = header.trim().to_lowercase();

        if key.contains(ID) || key.contains(REFERENCE) {
            if record.id.as_ref().map_or(true, is_blank) {
                record.id = Some(value.clone());
            }
            if record.reference.as_ref().map_or(true, is_blank) {
                record.reference = Some(value.clone());
            }
        }
        if key.contains(DATE) {
            record.date = Some(value.clone());
        }
        if key.contains(AMOUNT) || key.contains("value") || key.contains("price") {
            record.amount = Some(Value::Number(coerce_number(&value)));
        }
        if key.contains(DESCRIPTION) || key.contains("details") || key.contains("note") {
            record.description = Some(value.clone());
        }
        if key.contains(CATEGORY) || key.contains("type") {
            record.category = Some(value.clone());
        }

        if !WELL_KNOWN_FIELDS.contains(&header) {
            record.set(header, value);
        }
    }

    let has_id = record.id.as_ref().is_some_and(|v| !is_blank(v));
    let has_reference = record.reference.as_ref().is_some_and(|v| !is_blank(v));
    if !has_id && !has_reference {
        let synthesized = format!("record-{position}");
        debug!("row {position}: no identifier column, using '{synthesized}'");
        record.id = Some(Value::Text(synthesized.clone()));
        record.reference = Some(Value::Text(synthesized));
    }

    record
}

/// Empty text, zero, NaN and `false` do not count as an identifier.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Text(s) => s.is_empty(),
        Value::Number(n) => *n == 0.0 || n.is_nan(),
        Value::Bool(b) => !b,
    }
}

/// Lenient numeric coercion for amount columns. Anything unparseable is 0.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => *n,
        Value::Text(s) => parse_leading_float(s).unwrap_or(0.0),
        Value::Bool(_) => 0.0,
    };
    if n.is_nan() {
        0.0
    } else {
        n
    }
}

/// Parse the longest numeric prefix of `s` after leading whitespace,
/// e.g. `"12.50 USD"` -> 12.5. `None` when there is no leading number.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let digits_from = |mut i: usize| {
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if end < len && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < len && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
