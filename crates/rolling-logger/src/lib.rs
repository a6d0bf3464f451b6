//! Rolling Logger
//!
//! Installs a global `tracing` subscriber (with the `log` bridge) that writes
//! to daily files `<app>.<YYYY-MM-DD>.log`, keeps only the newest few files
//! and remembers the most recent lines in memory for an in-app log viewer.

use chrono::{Local, NaiveDate};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use thiserror::Error;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_RETENTION: usize = 7;
pub const DEFAULT_BUFFER_LINES: usize = 500;

static GLOBAL: OnceLock<RollingLogger> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Log directory error: {0}")]
    Io(#[from] io::Error),
    #[error("Logger already initialized")]
    AlreadyInitialized,
    #[error("Logger not initialized")]
    NotInitialized,
    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub dir: PathBuf,
    pub app_name: String,
    /// Number of daily files kept on disk
    pub retention: usize,
    /// Lines kept in memory
    pub buffer_lines: usize,
}

impl LoggerConfig {
    pub fn new(dir: impl Into<PathBuf>, app_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            app_name: app_name.into(),
            retention: DEFAULT_RETENTION,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

struct CurrentFile {
    date: NaiveDate,
    file: File,
}

struct Inner {
    config: LoggerConfig,
    current: Mutex<Option<CurrentFile>>,
    recent: Mutex<VecDeque<String>>,
}

/// Daily rolling file sink. Cheap to clone.
#[derive(Clone)]
pub struct RollingLogger {
    inner: Arc<Inner>,
}

impl RollingLogger {
    pub fn new(config: LoggerConfig) -> Result<Self, LoggerError> {
        fs::create_dir_all(&config.dir)?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                current: Mutex::new(None),
                recent: Mutex::new(VecDeque::new()),
            }),
        })
    }

    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}.{}.log", self.inner.config.app_name, date.format("%Y-%m-%d"))
    }

    /// Log files on disk, oldest first
    pub fn log_files(&self) -> io::Result<Vec<PathBuf>> {
        let prefix = format!("{}.", self.inner.config.app_name);
        let mut files: Vec<PathBuf> = fs::read_dir(&self.inner.config.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(&prefix) && n.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();
        // ISO dates sort chronologically
        files.sort();
        Ok(files)
    }

    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.recent.lock() {
            Ok(recent) => recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Write one formatted chunk as if it were `date`
    pub fn write_at(&self, date: NaiveDate, buf: &[u8]) -> io::Result<()> {
        {
            let mut current = self
                .inner
                .current
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;

            let stale = current.as_ref().map_or(true, |c| c.date != date);
            if stale {
                let path = self.inner.config.dir.join(self.file_name(date));
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                *current = Some(CurrentFile { date, file });
                self.prune()?;
            }
            if let Some(current) = current.as_mut() {
                current.file.write_all(buf)?;
            }
        }

        self.remember(buf);
        Ok(())
    }

    fn remember(&self, buf: &[u8]) {
        let text = String::from_utf8_lossy(buf);
        if let Ok(mut recent) = self.inner.recent.lock() {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                if recent.len() == self.inner.config.buffer_lines {
                    recent.pop_front();
                }
                recent.push_back(line.to_string());
            }
        }
    }

    fn prune(&self) -> io::Result<()> {
        let files = self.log_files()?;
        let excess = files.len().saturating_sub(self.inner.config.retention.max(1));
        for path in files.into_iter().take(excess) {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// `io::Write` handle handed out to the fmt layer
pub struct RollingWriter {
    logger: RollingLogger,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.logger.write_at(Local::now().date_naive(), buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.logger.inner.current.lock() {
            Ok(mut current) => match current.as_mut() {
                Some(c) => c.file.flush(),
                None => Ok(()),
            },
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingLogger {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter {
            logger: self.clone(),
        }
    }
}

/// Install the global logger with default retention
pub fn init_logger(dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_with(LoggerConfig::new(dir.as_ref(), app_name))
}

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
pub fn init_with(config: LoggerConfig) -> Result<(), LoggerError> {
    if GLOBAL.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let dir = config.dir.clone();
    let logger = RollingLogger::new(config)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(logger.clone()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;

    GLOBAL
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    log::info!("Logging to {}", dir.display());
    Ok(())
}

fn global() -> Result<&'static RollingLogger, LoggerError> {
    GLOBAL.get().ok_or(LoggerError::NotInitialized)
}

/// Most recent log lines, oldest first. Empty before initialization.
pub fn recent_lines() -> Vec<String> {
    GLOBAL.get().map(|l| l.recent_lines()).unwrap_or_default()
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    global()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    global()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    global()?;
    tracing::error!("{}", msg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn logger(dir: &Path, retention: usize, buffer_lines: usize) -> RollingLogger {
        let mut config = LoggerConfig::new(dir, "Knit");
        config.retention = retention;
        config.buffer_lines = buffer_lines;
        RollingLogger::new(config).unwrap()
    }

    #[test]
    fn test_rolls_daily_and_prunes() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path(), 3, 10);

        for d in 1..=5 {
            logger.write_at(day(d), format!("line {}\n", d).as_bytes()).unwrap();
        }

        let names: Vec<String> = logger
            .log_files()
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        assert_eq!(
            names,
            vec!["Knit.2024-03-03.log", "Knit.2024-03-04.log", "Knit.2024-03-05.log"]
        );
    }

    #[test]
    fn test_same_day_appends() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path(), 3, 10);
        logger.write_at(day(1), b"first\n").unwrap();
        logger.write_at(day(1), b"second\n").unwrap();

        let content = fs::read_to_string(dir.path().join("Knit.2024-03-01.log")).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_ring_buffer_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path(), 3, 2);
        logger.write_at(day(1), b"a\nb\n").unwrap();
        logger.write_at(day(1), b"c\n").unwrap();
        assert_eq!(logger.recent_lines(), vec!["b", "c"]);
    }

    #[test]
    fn test_unrelated_files_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        let logger = logger(dir.path(), 1, 10);
        logger.write_at(day(1), b"x\n").unwrap();
        logger.write_at(day(2), b"y\n").unwrap();

        assert!(dir.path().join("notes.txt").exists());
        assert_eq!(logger.log_files().unwrap().len(), 1);
    }

    #[test]
    fn test_helpers_require_init() {
        if GLOBAL.get().is_none() {
            assert!(matches!(info("hello"), Err(LoggerError::NotInitialized)));
            assert!(recent_lines().is_empty());
        }
    }
}
