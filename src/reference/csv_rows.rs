use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::loader::LoadReport;
use super::LoadError;

/// Data rows of a headed CSV file, paired with their 1-based line number.
///
/// Rows that fail to decode, repeat the header or have fewer than
/// `min_columns` cells are reported and left out.
pub(crate) fn read_rows(
    path: &Path,
    min_columns: usize,
    report: &mut LoadReport,
) -> Result<Vec<(u64, StringRecord)>, LoadError> {
    let file = file_label(path);
    let csv_error = |source| LoadError::Csv {
        file: file.clone(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let first_header = reader
        .headers()
        .map_err(csv_error)?
        .get(0)
        .unwrap_or_default()
        .to_string();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                report.warn(format!("{}: skipping unreadable row: {}", file, e));
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.get(0) == Some(first_header.as_str()) {
            continue;
        }
        if record.len() < min_columns {
            report.warn(format!(
                "{} line {}: expected {} columns, found {}",
                file,
                line,
                min_columns,
                record.len()
            ));
            continue;
        }
        rows.push((line, record));
    }
    Ok(rows)
}

/// Numeric cell; an empty cell reads as zero.
pub(crate) fn parse_float(record: &StringRecord, index: usize, name: &str) -> Result<f64, String> {
    let cell = record.get(index).unwrap_or_default();
    if cell.is_empty() {
        return Ok(0.0);
    }
    cell.parse()
        .map_err(|_| format!("{} is not a number: {:?}", name, cell))
}

pub(crate) fn cell(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
