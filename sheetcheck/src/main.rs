use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use serde_json::json;
use sheetcheck::{Validator, ValidatorConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "Usage: sheetcheck <zip_file_path> [original_filename]";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(about = "Validate a georeferenced map sheet upload before it enters processing")]
struct Cli {
    /// Zip archive holding the raster and its world file
    archive: PathBuf,

    /// Name the archive was uploaded under; defaults to the archive's own name
    original_filename: Option<String>,

    /// Inward margin applied to the nominal sheet before the coverage check
    #[arg(long, env = "SHEETCHECK_SHRINK_METERS", default_value_t = 2.0)]
    shrink_meters: f64,

    /// Directory for temporary extraction; system temp dir when unset
    #[arg(long, env = "SHEETCHECK_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,
}

fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "sheetcheck=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to install log subscriber")
}

fn fail(message: String) -> ExitCode {
    println!("{}", json!({ "error": message }));
    ExitCode::FAILURE
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => return Ok(fail(USAGE.to_string())),
    };

    init_logging()?;

    if !cli.archive.exists() {
        return Ok(fail(format!("File not found: {}", cli.archive.display())));
    }

    info!(
        archive = %cli.archive.display(),
        original_filename = cli.original_filename.as_deref().unwrap_or("-"),
        "validating upload"
    );

    let mut config = ValidatorConfig::default().with_shrink_meters(cli.shrink_meters);
    if let Some(dir) = cli.scratch_dir {
        config = config.with_scratch_dir(dir);
    }

    let result = Validator::new(config).validate(&cli.archive, cli.original_filename.as_deref());
    let output = serde_json::to_string_pretty(&result).context("Failed to encode result")?;
    println!("{output}");

    Ok(if result.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
