// File discovery inside configured folders

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::PointIoError;

/// List regular files in `dir` whose extension is `extension` (case-insensitive).
///
/// Not recursive; hidden files are skipped. Results are sorted by path so
/// batches run in a stable order.
pub fn find_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, PointIoError> {
    if !dir.is_dir() {
        return Err(PointIoError::NotADirectory(dir.to_path_buf()));
    }

    let pattern = Pattern::new(&format!("*.{}", Pattern::escape(extension))).map_err(|e| {
        PointIoError::Read {
            path: dir.to_path_buf(),
            message: format!("invalid extension {extension:?}: {e}"),
        }
    })?;
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let read_err = |e: std::io::Error| PointIoError::Read {
        path: dir.to_path_buf(),
        message: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if pattern.matches_with(&name, options) {
            files.push(path);
        }
    }

    files.sort();
    log::debug!("{} *.{extension} file(s) in {}", files.len(), dir.display());
    Ok(files)
}
