//! Logger setup.
//!
//! Everything logs through the `log` macros; this module installs `env_logger` as the
//! backend. Lines go to stderr and, when a log file is configured, are appended to it as
//! well.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

use crate::error_handling::types::ConfigError;

/// Writes every buffer to the console and, if present, to a file.
pub struct TeeWriter<C: Write, F: Write> {
    console: C,
    file: Option<F>,
}

impl<C: Write, F: Write> TeeWriter<C, F> {
    pub fn new(console: C, file: Option<F>) -> Self {
        Self { console, file }
    }
}

impl<C: Write, F: Write> Write for TeeWriter<C, F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.console.flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// Installs the global logger.
///
/// `level` comes from `--log`; without it `RUST_LOG` applies, and `info` when that is unset
/// too. Must be called once, before anything logs.
pub fn init(level: Option<LevelFilter>, log_file: Option<&Path>) -> Result<(), ConfigError> {
    let file = match log_file {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };

    let mut builder = Builder::from_default_env();
    match level {
        Some(level) => {
            builder.filter_level(level);
        }
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(LevelFilter::Info);
        }
        None => {}
    }

    builder
        .format_target(false)
        .write_style(WriteStyle::Never)
        .target(Target::Pipe(Box::new(TeeWriter::new(io::stderr(), file))))
        .try_init()
        .map_err(|e| ConfigError::LoggingError(e.to_string()))
}

fn open_log_file(path: &Path) -> Result<File, ConfigError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ConfigError::LoggingError(format!("cannot open {}: {}", path.display(), e)))
}
