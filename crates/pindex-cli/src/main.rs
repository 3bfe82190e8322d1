use std::{ffi::OsString, path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use pindex_core::{Config, Invocation, Pipeline};
use tracing_subscriber::{fmt, fmt::writer::MakeWriterExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "pindex",
    author,
    version,
    about = "Builds a JSON plugin index from a directory of plugin archives"
)]
struct Cli {
    /// Directory scanned (non-recursively) for plugin archives.
    #[arg(value_name = "ZIP_DIR")]
    zip_dir: PathBuf,

    /// Where the manifest JSON is written; parent directories are created.
    #[arg(value_name = "OUTPUT_JSON")]
    output: PathBuf,

    /// Public download location the archives and icons are served from.
    #[arg(value_name = "BASE_DOWNLOAD_URL")]
    base_url: String,

    /// Optional TOML file overriding the naming conventions.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sets the log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };
    init_tracing(&cli.log_level);
    ExitCode::from(exit_code(run(cli).await))
}

/// Parses arguments, or returns the exit status to stop with: 0 after `--help` or
/// `--version`, 1 for any usage error.
fn parse_cli<I, T>(args: I) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| {
        let _ = err.print();
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => 1,
        }
    })
}

fn exit_code(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);
    fmt().with_env_filter(filter).with_writer(writer).try_init().ok();
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    tracing::debug!(version = pindex_core::version(), ?config, "starting");

    let pipeline = Pipeline::new(
        config,
        Invocation {
            zip_dir: cli.zip_dir,
            output: cli.output,
            base_url: cli.base_url,
        },
    )?;
    let written = pipeline.run().await?;
    println!("wrote {written} entries to {}", pipeline.output().display());
    Ok(())
}
