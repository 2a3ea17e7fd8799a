// PointFix CLI - relabel as-built survey points with reference design names

mod exit_codes;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use pointfix_cli::batch::{self, BatchError, BatchOptions, BatchReport, FileReport};
use pointfix_config::{ConfigError, PathConfig, Settings};
use pointfix_matcher::{MatchConfig, MatchStrategy};

use exit_codes::{
    batch_exit_code, config_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_PARTIAL, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "ptfix")]
#[command(about = "Relabel as-built survey points with the names of coincident design points")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true, env = "POINTFIX_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relabel every as-built file in a folder
    #[command(after_help = "\
Examples:
  ptfix run
  ptfix run --csv design/ --asbuilt survey/ --output fixed/ --save
  ptfix run --strategy nearest --max-distance 0.02
  ptfix run --json > report.json")]
    Run {
        /// Folder with reference design point files (*.csv)
        #[arg(long, value_name = "DIR")]
        csv: Option<PathBuf>,

        /// Folder with as-built survey files (*.pts)
        #[arg(long, value_name = "DIR")]
        asbuilt: Option<PathBuf>,

        /// Folder receiving the relabelled files
        #[arg(long, short = 'o', value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        matching: MatchArgs,

        /// Remember the folders used by this run in the settings file
        #[arg(long)]
        save: bool,

        /// Stop at the first file that fails
        #[arg(long)]
        fail_fast: bool,

        /// Print the batch report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Relabel a single as-built file
    #[command(after_help = "\
Examples:
  ptfix file survey/day1.pts
  ptfix file day1.pts --csv design/ --output fixed/ --json")]
    File {
        /// As-built survey file
        asbuilt: PathBuf,

        /// Folder with reference design point files (*.csv)
        #[arg(long, value_name = "DIR")]
        csv: Option<PathBuf>,

        /// Folder receiving the relabelled file
        #[arg(long, short = 'o', value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        matching: MatchArgs,

        /// Print the file report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show or change persisted settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(clap::Args)]
struct MatchArgs {
    /// How an as-built point picks its reference point
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Search radius for --strategy nearest, in CRS units
    #[arg(long, value_name = "DIST")]
    max_distance: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Coincident,
    Nearest,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Coincident => MatchStrategy::Coincident,
            StrategyArg::Nearest => MatchStrategy::Nearest,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective settings
    Show {
        /// JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Print the settings file location
    Path,

    /// Set one value and save. An empty value clears an optional setting.
    #[command(after_help = "\
Examples:
  ptfix config set csv-path /data/design
  ptfix config set strategy nearest
  ptfix config set max-distance 0.02
  ptfix config set max-distance ''")]
    Set {
        key: ConfigKey,
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigKey {
    CsvPath,
    AsbuiltPath,
    OutputPath,
    Crs,
    Strategy,
    MaxDistance,
    ReferenceExtension,
    AsbuiltExtension,
    OutputExtension,
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("PTFIX_BUILD_COMMIT"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("PTFIX_BUILD_TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("PTFIX_BUILD_COMMIT"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("PTFIX_BUILD_TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(Settings::config_path);

    let result = match cli.command {
        Commands::Run {
            csv,
            asbuilt,
            output,
            matching,
            save,
            fail_fast,
            json,
        } => {
            let overrides = PathConfig {
                csv_path: csv,
                asbuilt_path: asbuilt,
                output_path: output,
            };
            cmd_run(&config_path, overrides, matching, save, fail_fast, json)
        }
        Commands::File {
            asbuilt,
            csv,
            output,
            matching,
            json,
        } => {
            let overrides = PathConfig {
                csv_path: csv,
                asbuilt_path: None,
                output_path: output,
            };
            cmd_file(&config_path, &asbuilt, overrides, matching, json)
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { json } => cmd_config_show(&config_path, json),
            ConfigCommands::Path => cmd_config_path(&config_path),
            ConfigCommands::Set { key, value } => cmd_config_set(&config_path, key, &value),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::MissingPath(name) => Some(format!(
                "pass the folder on the command line, or: ptfix config set {} <DIR>",
                name.replace('_', "-")
            )),
            ConfigError::Parse { .. } => {
                Some("fix the file or remove it to start from defaults".to_string())
            }
            _ => None,
        };
        Self {
            code: config_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }

    pub fn batch(err: BatchError) -> Self {
        let hint = match &err {
            BatchError::OutputIsInput(_) => {
                Some("choose an output folder different from the as-built folder".to_string())
            }
            _ => None,
        };
        Self {
            code: batch_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }

    pub fn serialize(err: impl std::fmt::Display) -> Self {
        Self {
            code: EXIT_ERROR,
            message: format!("serialization error: {err}"),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared resolution
// ============================================================================

/// Command-line match flags layered over the persisted match section.
fn effective_match_config(base: &MatchConfig, args: &MatchArgs) -> Result<MatchConfig, CliError> {
    let mut config = base.clone();

    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
        if config.strategy == MatchStrategy::Coincident {
            config.tolerance.max_distance = None;
        }
    }
    if let Some(max) = args.max_distance {
        config.tolerance.max_distance = Some(max);
    }

    config.validate().map_err(|e| {
        let err = CliError::args(e.to_string());
        if args.max_distance.is_some() && config.strategy == MatchStrategy::Coincident {
            err.with_hint("--max-distance only applies with --strategy nearest")
        } else {
            err
        }
    })?;
    Ok(config)
}

fn batch_options(
    settings: &Settings,
    matching: MatchConfig,
    output_dir: &Path,
    fail_fast: bool,
) -> BatchOptions {
    BatchOptions {
        matching,
        output_dir: output_dir.to_path_buf(),
        asbuilt_extension: settings.files.asbuilt_extension.clone(),
        output_extension: settings.files.output_extension.clone(),
        crs: settings.crs.clone(),
        fail_fast,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::serialize)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{json}").map_err(|e| CliError {
        code: EXIT_ERROR,
        message: e.to_string(),
        hint: None,
    })
}

fn describe_file(report: &FileReport) -> String {
    let name = report
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match (&report.output, &report.summary, &report.error) {
        (Some(out), Some(s), _) => format!(
            "{name} -> {}: {} row(s), {} matched, {} unmatched{}",
            out.display(),
            s.total,
            s.matched,
            s.unmatched,
            if s.ambiguous > 0 { format!(", {} ambiguous", s.ambiguous) } else { String::new() },
        ),
        (_, _, Some(err)) => format!("{name}: failed: {err}"),
        _ => name,
    }
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    config_path: &Path,
    overrides: PathConfig,
    match_args: MatchArgs,
    save: bool,
    fail_fast: bool,
    json: bool,
) -> Result<(), CliError> {
    let mut settings = Settings::load_from(config_path).map_err(CliError::config)?;
    let paths = settings.paths.clone().overlay(overrides);

    let csv_dir = paths.csv().map_err(CliError::config)?;
    let asbuilt_dir = paths.asbuilt().map_err(CliError::config)?;
    let output_dir = paths.output().map_err(CliError::config)?;
    let matching = effective_match_config(&settings.matching, &match_args)?;

    let reference = batch::load_reference(csv_dir, &settings.files.reference_extension)
        .map_err(CliError::batch)?;
    eprintln!(
        "reference: {} point(s) from {} file(s)",
        reference.set.len(),
        reference.files.len()
    );

    let options = batch_options(&settings, matching, output_dir, fail_fast);
    let report: BatchReport =
        batch::run_batch(asbuilt_dir, &reference, &options).map_err(CliError::batch)?;

    if save && settings.paths != paths {
        settings.paths = paths.clone();
        settings.save_to(config_path).map_err(CliError::config)?;
        eprintln!("saved folders to {}", config_path.display());
    }

    if json {
        print_json(&report)?;
    }

    for file in &report.files {
        eprintln!("  {}", describe_file(file));
    }
    if report.files.is_empty() {
        eprintln!(
            "no *.{} files found in {}",
            settings.files.asbuilt_extension,
            asbuilt_dir.display()
        );
    }
    eprintln!(
        "processed {} file(s): {} written, {} failed; {} row(s), {} matched, {} unmatched",
        report.files.len(),
        report.written(),
        report.failed(),
        report.totals.total,
        report.totals.matched,
        report.totals.unmatched,
    );

    match report.failed() {
        0 => Ok(()),
        n => Err(CliError {
            code: EXIT_PARTIAL,
            message: format!("{n} file(s) failed"),
            hint: Some("rerun with --fail-fast to stop at the first failure".to_string()),
        }),
    }
}

// ============================================================================
// file
// ============================================================================

fn cmd_file(
    config_path: &Path,
    asbuilt: &Path,
    overrides: PathConfig,
    match_args: MatchArgs,
    json: bool,
) -> Result<(), CliError> {
    let settings = Settings::load_from(config_path).map_err(CliError::config)?;
    let paths = settings.paths.clone().overlay(overrides);

    let csv_dir = paths.csv().map_err(CliError::config)?;
    let output_dir = paths.output().map_err(CliError::config)?;
    let matching = effective_match_config(&settings.matching, &match_args)?;

    if !asbuilt.is_file() {
        return Err(CliError::args(format!("not a file: {}", asbuilt.display())));
    }

    let reference = batch::load_reference(csv_dir, &settings.files.reference_extension)
        .map_err(CliError::batch)?;
    let options = batch_options(&settings, matching, output_dir, true);
    batch::ensure_dir(output_dir).map_err(CliError::batch)?;
    let report = batch::process_file(asbuilt, &reference.set, &options).map_err(CliError::batch)?;

    if json {
        print_json(&report)?;
    }
    eprintln!("{}", describe_file(&report));
    Ok(())
}

// ============================================================================
// config
// ============================================================================

fn cmd_config_show(config_path: &Path, json: bool) -> Result<(), CliError> {
    let settings = Settings::load_from(config_path).map_err(CliError::config)?;
    if json {
        return print_json(&settings);
    }
    let text = toml::to_string_pretty(&settings).map_err(CliError::serialize)?;
    print!("{text}");
    Ok(())
}

fn cmd_config_path(config_path: &Path) -> Result<(), CliError> {
    println!("{}", config_path.display());
    Ok(())
}

fn cmd_config_set(config_path: &Path, key: ConfigKey, value: &str) -> Result<(), CliError> {
    let mut settings = Settings::load_from(config_path).map_err(CliError::config)?;
    let optional_path = |v: &str| (!v.is_empty()).then(|| PathBuf::from(v));

    match key {
        ConfigKey::CsvPath => settings.paths.csv_path = optional_path(value),
        ConfigKey::AsbuiltPath => settings.paths.asbuilt_path = optional_path(value),
        ConfigKey::OutputPath => settings.paths.output_path = optional_path(value),
        ConfigKey::Crs => settings.crs = value.to_string(),
        ConfigKey::Strategy => {
            settings.matching.strategy = value
                .parse()
                .map_err(|e: pointfix_matcher::MatchError| CliError::args(e.to_string()))?;
        }
        ConfigKey::MaxDistance => {
            settings.matching.tolerance.max_distance = if value.is_empty() {
                None
            } else {
                let max = value.parse::<f64>().map_err(|_| {
                    CliError::args(format!("max-distance must be a number, got {value:?}"))
                })?;
                Some(max)
            };
        }
        ConfigKey::ReferenceExtension => settings.files.reference_extension = value.to_string(),
        ConfigKey::AsbuiltExtension => settings.files.asbuilt_extension = value.to_string(),
        ConfigKey::OutputExtension => settings.files.output_extension = value.to_string(),
    }

    settings.validate().map_err(|e| {
        let err = CliError {
            code: EXIT_CONFIG,
            message: e.to_string(),
            hint: None,
        };
        if settings.matching.strategy == MatchStrategy::Coincident
            && settings.matching.tolerance.max_distance.is_some()
        {
            err.with_hint("set strategy to nearest first: ptfix config set strategy nearest")
        } else {
            err
        }
    })?;
    settings.save_to(config_path).map_err(CliError::config)?;
    eprintln!("saved {}", config_path.display());
    Ok(())
}
