// Positional point records: name, easting, northing, elevation, code

use std::path::Path;

use pointfix_core::Point;

use crate::error::PointIoError;
use crate::text::read_file_as_utf8;

/// Reference design points are comma-separated.
pub const REFERENCE_DELIMITER: u8 = b',';

/// As-built survey points are tab-separated.
pub const ASBUILT_DELIMITER: u8 = b'\t';

const FIELD_COUNT: usize = 5;

pub fn read_reference_file(path: &Path) -> Result<Vec<Point>, PointIoError> {
    read_points(path, REFERENCE_DELIMITER)
}

pub fn read_asbuilt_file(path: &Path) -> Result<Vec<Point>, PointIoError> {
    read_points(path, ASBUILT_DELIMITER)
}

pub fn read_points(path: &Path, delimiter: u8) -> Result<Vec<Point>, PointIoError> {
    let content = read_file_as_utf8(path)?;
    parse_points(&content, delimiter, path)
}

/// Parse headerless five-field point records.
///
/// `source` only labels errors. Blank lines are skipped; any other record
/// must have exactly five fields with numeric easting, northing and elevation.
/// Numbers may carry surrounding whitespace; name and code are kept verbatim.
pub fn parse_points(
    content: &str,
    delimiter: u8,
    source: &Path,
) -> Result<Vec<Point>, PointIoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut points = Vec::new();

    for (record_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| PointIoError::Read {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(record_idx as u64 + 1);

        // Only a whitespace-only line is blank. Delimiters with nothing
        // between them are still a row and must parse.
        if record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty()) {
            continue;
        }

        if record.len() != FIELD_COUNT {
            return Err(PointIoError::MalformedRecord {
                path: source.to_path_buf(),
                line,
                fields: record.len(),
            });
        }

        let number = |idx: usize, field: &'static str| -> Result<f64, PointIoError> {
            let raw = record.get(idx).unwrap_or("");
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| PointIoError::InvalidNumber {
                    path: source.to_path_buf(),
                    line,
                    field,
                    value: raw.to_string(),
                })
        };

        points.push(Point {
            name: record.get(0).unwrap_or("").to_string(),
            easting: number(1, "easting")?,
            northing: number(2, "northing")?,
            elevation: number(3, "elevation")?,
            code: record.get(4).unwrap_or("").to_string(),
        });
    }

    Ok(points)
}
