//! Batch driver: load the reference set once, relabel every as-built file.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use pointfix_core::Point;
use pointfix_io::discover::find_files;
use pointfix_io::output::{output_path_for, write_joined};
use pointfix_io::points::read_asbuilt_file;
use pointfix_io::reference::load_reference_dir;
use pointfix_io::PointIoError;
use pointfix_matcher::{
    MatchConfig, MatchError, MatchResult, MatchStrategy, MatchSummary, ReferenceSet,
};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum BatchError {
    Io(PointIoError),
    Match(MatchError),
    /// The computed output path is the as-built file being read.
    OutputIsInput(PathBuf),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Match(e) => write!(f, "{e}"),
            Self::OutputIsInput(path) => {
                write!(f, "refusing to overwrite input file {}", path.display())
            }
        }
    }
}

impl std::error::Error for BatchError {}

impl From<PointIoError> for BatchError {
    fn from(e: PointIoError) -> Self {
        Self::Io(e)
    }
}

impl From<MatchError> for BatchError {
    fn from(e: MatchError) -> Self {
        Self::Match(e)
    }
}

// ============================================================================
// Options + Report
// ============================================================================

/// Everything a batch needs besides the folders it reads.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub matching: MatchConfig,
    pub output_dir: PathBuf,
    pub asbuilt_extension: String,
    pub output_extension: String,
    pub crs: String,
    /// Stop at the first file that fails instead of recording it and moving on.
    pub fail_fast: bool,
}

/// Reference set plus where its points came from.
#[derive(Debug)]
pub struct LoadedReferenceSet {
    pub set: ReferenceSet,
    pub files: Vec<ReferenceFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceFile {
    pub path: PathBuf,
    pub points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Written,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MatchSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn failed(input: &Path, err: &BatchError) -> Self {
        Self {
            input: input.to_path_buf(),
            status: FileStatus::Failed,
            output: None,
            summary: None,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub engine_version: String,
    pub run_at: String,
    pub crs: String,
    pub strategy: MatchStrategy,
    pub reference_files: Vec<ReferenceFile>,
    pub reference_points: usize,
    pub files: Vec<FileReport>,
    /// Row counts summed over every written file.
    pub totals: MatchSummary,
}

impl BatchReport {
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.status == FileStatus::Written).count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.status == FileStatus::Failed).count()
    }
}

// ============================================================================
// Steps
// ============================================================================

/// Load and index every reference file in `dir`.
pub fn load_reference(dir: &Path, extension: &str) -> Result<LoadedReferenceSet, BatchError> {
    let loaded = load_reference_dir(dir, extension)?;
    let files = loaded
        .files
        .into_iter()
        .map(|(path, points)| ReferenceFile { path, points })
        .collect();
    let set = ReferenceSet::build(loaded.points)?;
    log::info!("reference set: {} point(s) from {}", set.len(), dir.display());
    Ok(LoadedReferenceSet { set, files })
}

/// Match already-parsed as-built points and write the relabelled file.
pub fn relabel(
    as_built: &[Point],
    reference: &ReferenceSet,
    config: &MatchConfig,
    output: &Path,
) -> Result<MatchResult, BatchError> {
    let result = pointfix_matcher::run(config, as_built, reference)?;
    write_joined(output, &result.records)?;
    Ok(result)
}

/// Relabel one as-built file into `options.output_dir`.
pub fn process_file(
    input: &Path,
    reference: &ReferenceSet,
    options: &BatchOptions,
) -> Result<FileReport, BatchError> {
    let output = output_path_for(input, &options.output_dir, &options.output_extension);
    if is_same_file(input, &output) {
        return Err(BatchError::OutputIsInput(input.to_path_buf()));
    }

    let as_built = read_asbuilt_file(input)?;
    let result = relabel(&as_built, reference, &options.matching, &output)?;
    log::info!(
        "{} -> {}: {} row(s), {} matched",
        input.display(),
        output.display(),
        result.summary.total,
        result.summary.matched,
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        status: FileStatus::Written,
        output: Some(output),
        summary: Some(result.summary),
        error: None,
    })
}

/// Relabel every as-built file in `asbuilt_dir` against one reference set.
///
/// Per-file failures are recorded in the report and the batch moves on,
/// unless `options.fail_fast` is set, in which case the first one is returned.
/// Failing to list the folder or create the output folder is always fatal.
pub fn run_batch(
    asbuilt_dir: &Path,
    reference: &LoadedReferenceSet,
    options: &BatchOptions,
) -> Result<BatchReport, BatchError> {
    let inputs = find_files(asbuilt_dir, &options.asbuilt_extension)?;
    if inputs.is_empty() {
        log::info!(
            "no *.{} files in {}",
            options.asbuilt_extension,
            asbuilt_dir.display()
        );
    } else {
        ensure_dir(&options.output_dir)?;
    }

    let mut files = Vec::with_capacity(inputs.len());
    let mut totals = MatchSummary::default();

    for input in &inputs {
        match process_file(input, &reference.set, options) {
            Ok(report) => {
                if let Some(s) = &report.summary {
                    totals.total += s.total;
                    totals.matched += s.matched;
                    totals.unmatched += s.unmatched;
                    totals.ambiguous += s.ambiguous;
                }
                files.push(report);
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                log::warn!("skipping {}: {e}", input.display());
                files.push(FileReport::failed(input, &e));
            }
        }
    }

    Ok(BatchReport {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: chrono::Utc::now().to_rfc3339(),
        crs: options.crs.clone(),
        strategy: options.matching.strategy,
        reference_files: reference.files.clone(),
        reference_points: reference.set.len(),
        files,
        totals,
    })
}

/// Create the output folder if it does not exist yet.
pub fn ensure_dir(dir: &Path) -> Result<(), BatchError> {
    if dir.is_dir() {
        return Ok(());
    }
    log::info!("creating output folder {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|e| {
        BatchError::Io(PointIoError::Write {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })
    })
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
