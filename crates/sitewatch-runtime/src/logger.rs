use crate::Result;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

const INFO_LOG: &str = "sitewatch.log";
const ERROR_LOG: &str = "error.log";

/// Explicit logging context for the whole process.
///
/// Constructed once at startup and passed by reference to every component
/// that reports. Owns two append-only, line-oriented files: the full
/// lifecycle log and an errors-only log. Lines are mirrored to the console
/// so failures are never visible in only one place.
///
/// Writes are best-effort: a failing log write is not allowed to take the
/// monitor down with it.
pub struct MonitorLogger {
    info_file: Mutex<File>,
    error_file: Mutex<File>,
}

impl MonitorLogger {
    /// Create the log directory if needed and open both files for append.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        Ok(Self {
            info_file: Mutex::new(open_append(&dir.join(INFO_LOG))?),
            error_file: Mutex::new(open_append(&dir.join(ERROR_LOG))?),
        })
    }

    /// Lifecycle transitions and human-readable summaries.
    pub fn info(&self, message: &str) {
        println!("{}", message);
        self.write_line(&self.info_file, "INFO", message);
    }

    /// Errors go to the console, the lifecycle log, and the errors-only log.
    pub fn error(&self, message: &str) {
        eprintln!("{}", message);
        self.write_line(&self.info_file, "ERROR", message);
        self.write_line(&self.error_file, "ERROR", message);
    }

    fn write_line(&self, file: &Mutex<File>, level: &str, message: &str) {
        let line = format!(
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            message
        );
        if let Ok(mut file) = file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }
}

fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
