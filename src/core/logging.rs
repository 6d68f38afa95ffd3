//! Logging Module
//!
//! Sets up `tracing` with:
//! - a JSON file layer, rolled daily
//! - a pretty console layer on stderr (stdout carries command output)
//! - `log` crate events redirected into `tracing`
//! - gzip compression of rolled files from earlier days

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Rolled log file prefix
pub const LOG_FILE_PREFIX: &str = "tagmap.log";

/// Initialize logging into `log_dir`.
///
/// `RUST_LOG` overrides `default_filter`. Returns a `WorkerGuard` which must
/// be kept alive for the duration of the application so buffered logs are
/// flushed on shutdown.
pub fn init(log_dir: &Path, default_filter: &str) -> WorkerGuard {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter.clone());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .pretty()
        .with_filter(env_filter);

    if let Err(e) = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
    {
        eprintln!("Failed to initialize tracing subscriber: {}", e);
    }

    // Usually already installed by the subscriber's init
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::trace!("LogTracer not installed: {}", e);
    }

    let log_dir_owned = log_dir.to_path_buf();
    std::thread::spawn(move || {
        compress_old_logs(log_dir_owned);
    });

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX)
    );

    guard
}

/// Compress rolled log files that are not today's
fn compress_old_logs(log_dir: PathBuf) {
    let today_suffix = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(&log_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if !should_compress(name, &today_suffix) {
            continue;
        }

        match compress_file(&path) {
            Ok(()) => log::info!("Compressed old log: {:?}", path),
            Err(e) => log::warn!("Failed to compress old log {:?}: {}", path, e),
        }
    }
}

/// Rolled files are named `prefix.YYYY-MM-DD`.
fn should_compress(name: &str, today_suffix: &str) -> bool {
    name.starts_with(&format!("{LOG_FILE_PREFIX}."))
        && !name.ends_with(today_suffix)
        && !name.ends_with(".gz")
}

fn compress_file(path: &Path) -> io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = io::BufReader::new(file);

    let mut gz_path_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_path_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No parent directory"))?;
    let gz_path = parent_dir.join(gz_path_name);

    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;

    Ok(())
}
