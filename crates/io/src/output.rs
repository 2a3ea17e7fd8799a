// Output projection: joined records -> tab-separated point file

use std::path::{Path, PathBuf};

use pointfix_core::format_coordinate;
use pointfix_matcher::JoinedRecord;

use crate::error::PointIoError;

/// Header row of every output file.
pub const OUTPUT_HEADER: [&str; 5] = [
    "Point_Name",
    "Easting",
    "Northing",
    "Elevation",
    "Point_Code",
];

pub const OUTPUT_DELIMITER: u8 = b'\t';

/// The five output fields of a record: the matched reference point's
/// attributes, or five empty strings when nothing matched.
pub fn project(record: &JoinedRecord) -> [String; 5] {
    match record.point() {
        Some(p) => [
            p.name.clone(),
            format_coordinate(p.easting),
            format_coordinate(p.northing),
            format_coordinate(p.elevation),
            p.code.clone(),
        ],
        None => Default::default(),
    }
}

/// Serialize records with a header row, one line per record.
pub fn render_joined(records: &[JoinedRecord]) -> Result<Vec<u8>, String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(OUTPUT_DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(OUTPUT_HEADER).map_err(|e| e.to_string())?;
    for record in records {
        writer.write_record(project(record)).map_err(|e| e.to_string())?;
    }

    writer.into_inner().map_err(|e| e.to_string())
}

/// Render then write the whole file in one go, so a failed render never
/// leaves a truncated output behind.
pub fn write_joined(path: &Path, records: &[JoinedRecord]) -> Result<(), PointIoError> {
    let bytes = render_joined(records).map_err(|message| PointIoError::Write {
        path: path.to_path_buf(),
        message,
    })?;

    std::fs::write(path, bytes).map_err(|e| PointIoError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// `<output_dir>/<as-built stem>.<extension>`
pub fn output_path_for(asbuilt: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = asbuilt
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}.{extension}"))
}
