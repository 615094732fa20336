//! Entropy Stream CLI
//!
//! Writes random bytes from the OS entropy source, optionally hash-mixed,
//! to stdout.

use clap::Parser;
use entropy_stream::{
    config::OutputConfig, ConfigError, EntropyError, FileConfig, HashAlgorithm, OutputFormat,
    RandomStream,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

/// Write cryptographically secure random bytes to stdout.
#[derive(Debug, Parser)]
#[command(name = "entropy-stream", version)]
struct Cli {
    /// TOML configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hash used by the mixer.
    #[arg(short, long, value_enum)]
    algorithm: Option<HashAlgorithm>,

    /// Digest lengths of raw entropy hashed per output segment.
    #[arg(short, long)]
    stretch: Option<usize>,

    /// Read the OS source directly, without mixing.
    #[arg(long)]
    raw: bool,

    /// Random device to read (unix only).
    #[arg(long)]
    device: Option<PathBuf>,

    /// Bytes per block.
    #[arg(short, long)]
    bytes: Option<usize>,

    /// Output rendering.
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Keep writing blocks until interrupted.
    #[arg(long)]
    stream: bool,
}

impl Cli {
    fn into_config(self) -> Result<FileConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };

        if let Some(algorithm) = self.algorithm {
            config.mixer.algorithm = algorithm;
        }
        if let Some(stretch) = self.stretch {
            config.mixer.stretch_factor = stretch;
        }
        if let Some(device) = self.device {
            config.source.device_path = device;
        }
        if let Some(bytes) = self.bytes {
            config.output.bytes = bytes;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.mixer.raw |= self.raw;
        config.output.stream |= self.stream;

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Entropy(#[from] EntropyError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only random bytes
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Entropy Stream v{}", entropy_stream::VERSION);

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut stream = match config.open_stream() {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to open entropy stream: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    if config.output.stream {
        let flag = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run(stream.as_mut(), &config.output, &running, &mut out) {
        Ok(blocks) => {
            info!("Done. Blocks written: {}", blocks);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Reads and writes blocks until one block is done, or until streaming stops.
fn run(
    stream: &mut dyn RandomStream,
    output: &OutputConfig,
    running: &AtomicBool,
    out: &mut impl Write,
) -> Result<u64, RunError> {
    let mut block = Zeroizing::new(vec![0u8; output.bytes]);
    let mut blocks = 0u64;

    loop {
        // A failed read writes nothing.
        stream.read(block.as_mut_slice())?;

        match write_block(out, block.as_slice(), output.format) {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => break,
            result => result?,
        }
        blocks += 1;

        if !output.stream || !running.load(Ordering::SeqCst) {
            break;
        }
    }

    match out.flush() {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e.into()),
        _ => Ok(blocks),
    }
}

fn write_block(out: &mut impl Write, block: &[u8], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Hex => {
            let line: String = block.iter().map(|b| format!("{:02x}", b)).collect();
            writeln!(out, "{}", line)
        }
        OutputFormat::Binary => out.write_all(block),
    }
}
