//! recfetch CLI.
//!
//! Downloads one recording from an edge device through the media gateway
//! and writes it to disk. The library does the probing and chunked
//! fetching; this binary adds argument parsing, a progress bar, an
//! optional whole-download retry loop, and the output filename choice.

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indicatif::ProgressBar;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use recfetch::{
    Credential, DownloadConfig, DownloadTarget, Downloader, Endpoint, ProgressCallback, Recording,
    ReqwestTransport,
};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "recfetch", version, about = "Download a recording from an edge device")]
struct Args {
    /// Edge device (peripheral unit) identifier.
    device_id: String,

    /// Recording file identifier on the device.
    file_id: String,

    /// Base URL of the media gateway, e.g. https://vms.example.com
    #[arg(long)]
    base_url: String,

    /// Session token sent as the Authorization header.
    #[arg(long, env = "RECFETCH_TOKEN", hide_env_values = true)]
    token: String,

    /// Output path. Defaults to the server-suggested filename, or
    /// <device-id>_<file-id> when the server suggests none.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Chunk size for ranged downloads, in MiB.
    #[arg(long, default_value_t = 5)]
    chunk_size_mib: u64,

    /// Maximum parallel chunk requests.
    #[arg(long, default_value_t = 5)]
    max_parallel: usize,

    /// Number of whole-download retries after a failure.
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

/// Fallback output filename when the server suggests none.
fn default_file_name(device_id: &str, file_id: &str) -> String {
    format!("{}_{}", device_id, file_id)
}

async fn run(args: Args) -> Result<(), CliError> {
    let transport = ReqwestTransport::new()?;
    let config = DownloadConfig::new(args.chunk_size_mib * 1024 * 1024, args.max_parallel);
    let downloader = Downloader::with_config(transport, Endpoint::new(&args.base_url), config);
    let target = DownloadTarget::new(&args.device_id, &args.file_id, Credential::new(&args.token));

    let mut attempt: u32 = 0;
    let recording: Recording = loop {
        attempt += 1;

        let bar = ProgressBar::new(100);
        let bar_handle = bar.clone();
        let on_progress: ProgressCallback =
            Box::new(move |percent| bar_handle.set_position(percent.round() as u64));

        match downloader.download(&target, Some(on_progress)).await {
            Ok(recording) => {
                bar.finish_and_clear();
                break recording;
            }
            Err(e) if attempt <= args.retries => {
                bar.abandon();
                warn!(error = %e, attempt, "download failed, retrying");
            }
            Err(e) => {
                bar.abandon();
                return Err(e.into());
            }
        }
    };

    let path = match args.output {
        Some(path) => path,
        None => PathBuf::from(
            recording
                .file_name
                .unwrap_or_else(|| default_file_name(&args.device_id, &args.file_id)),
        ),
    };

    tokio::fs::write(&path, &recording.bytes).await?;
    println!("Saved {} bytes to {}", recording.bytes.len(), path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
