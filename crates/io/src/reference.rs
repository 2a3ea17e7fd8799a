// Reference set loading: every reference file in a folder, concatenated

use std::path::{Path, PathBuf};

use pointfix_core::Point;

use crate::discover::find_files;
use crate::error::PointIoError;
use crate::points::read_reference_file;

/// Reference points gathered from one or more files, in load order.
#[derive(Debug, Default)]
pub struct LoadedReference {
    pub points: Vec<Point>,
    /// Source files with the number of points each contributed.
    pub files: Vec<(PathBuf, usize)>,
}

/// Load every `*.<extension>` file in `dir` and concatenate the points in
/// discovery order. No deduplication.
pub fn load_reference_dir(dir: &Path, extension: &str) -> Result<LoadedReference, PointIoError> {
    let files = find_files(dir, extension)?;
    if files.is_empty() {
        log::warn!("no *.{extension} reference files in {}", dir.display());
    }
    load_reference_files(&files)
}

pub fn load_reference_files(files: &[PathBuf]) -> Result<LoadedReference, PointIoError> {
    let mut loaded = LoadedReference::default();
    for path in files {
        let points = read_reference_file(path)?;
        log::debug!("{}: {} reference points", path.display(), points.len());
        loaded.files.push((path.clone(), points.len()));
        loaded.points.extend(points);
    }
    Ok(loaded)
}
