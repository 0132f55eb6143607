//! File logger for the CLI. Each run writes to
//! ~/.mindmap/logs/{timestamp}_{uuid}/log.

use anyhow::{Context, Result};
use chrono::Local;
use dirs::home_dir;
use log::{LevelFilter, Log, Metadata, Record};
use std::env;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "MINDMAP_LOG";

pub struct MapLogger {
    level: LevelFilter,
    file: Mutex<File>,
    /// Mirror records to stderr.
    echo: bool,
    log_path: PathBuf,
}

impl MapLogger {
    /// Opens a fresh log file for this run.
    pub fn new(level: LevelFilter, echo: bool) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid_string = Uuid::new_v4().to_string();
        let uuid = uuid_string.split('-').next().unwrap_or("unknown");
        let run_id = format!("{timestamp}_{uuid}");

        let log_dir = Self::log_dir(&run_id)?;
        create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok(Self {
            level,
            file: Mutex::new(file),
            echo,
            log_path,
        })
    }

    pub fn log_dir(run_id: &str) -> Result<PathBuf> {
        let home = home_dir().context("Could not find home directory")?;
        Ok(home.join(".mindmap").join("logs").join(run_id))
    }

    /// Installs the logger as the global `log` backend.
    pub fn init(level: LevelFilter, echo: bool) -> Result<()> {
        let logger = Self::new(level, echo)?;
        let log_path = logger.log_path.clone();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::debug!("Log file: {}", log_path.display());
        Ok(())
    }
}

impl Log for MapLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let message = format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        );

        if let Ok(mut file) = self.file.lock() {
            // A failed log write must not take the command down with it.
            let _ = writeln!(file, "{}", message);
        }
        if self.echo {
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Picks the log level: `-v` flags win, then `MINDMAP_LOG`, then info.
pub fn level_from(verbose: u8) -> LevelFilter {
    match verbose {
        0 => env::var(LOG_ENV)
            .ok()
            .and_then(|level| level.trim().parse().ok())
            .unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
