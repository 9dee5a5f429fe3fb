use crate::config::PersistenceMode;
use crate::logger::MonitorLogger;
use crate::{Error, Result};
use sitewatch_types::ErrorRecord;
use std::path::{Path, PathBuf};

const SNAPSHOT_PREFIX: &str = "error_details_";
const LEDGER_FILE: &str = "error_ledger.json";

/// Durable storage for classified failures.
///
/// `persist` is pure storage I/O; reporting to the textual error channel is
/// layered on top by [`persist_with_report`] so a storage failure is still
/// observable even when the record itself could not be written.
pub trait ErrorSink {
    /// Write one record. Returns where it landed and anything the sink had
    /// to recover from on the way.
    fn persist(&self, record: &ErrorRecord) -> Result<Persisted>;
}

/// Receipt for one successful `persist` call.
#[derive(Debug)]
pub struct Persisted {
    /// The file the record landed in.
    pub path: PathBuf,
    /// Non-fatal damage the sink recovered from while writing, such as a
    /// corrupt ledger file that had to be reset.
    pub warning: Option<String>,
}

impl Persisted {
    fn clean(path: PathBuf) -> Self {
        Self { path, warning: None }
    }
}

/// Persist a record and report the outcome on the error channel.
///
/// Persistence failures are logged and absorbed; they never stop monitoring.
pub fn persist_with_report(sink: &dyn ErrorSink, record: &ErrorRecord, logger: &MonitorLogger) {
    match sink.persist(record) {
        Ok(receipt) => {
            if let Some(warning) = &receipt.warning {
                logger.error(warning);
            }
            logger.error(&format!("error details saved to: {}", receipt.path.display()));
        }
        Err(err) => logger.error(&format!("failed to persist error record: {}", err)),
    }
}

/// Build the sink the configured deployment mode asks for.
pub fn sink_for(mode: PersistenceMode, dir: &Path) -> Box<dyn ErrorSink> {
    match mode {
        PersistenceMode::Snapshot => Box::new(SnapshotSink::new(dir)),
        PersistenceMode::Ledger => Box::new(LedgerSink::new(dir.join(LEDGER_FILE))),
    }
}

/// One uniquely named JSON file per incident.
///
/// Filenames are derived from the record timestamp at second resolution.
/// Two records within the same second collide and the later one overwrites
/// the earlier; known limitation of the naming scheme.
pub struct SnapshotSink {
    dir: PathBuf,
}

impl SnapshotSink {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }
}

impl ErrorSink for SnapshotSink {
    fn persist(&self, record: &ErrorRecord) -> Result<Persisted> {
        std::fs::create_dir_all(&self.dir)?;

        let stamp = record.timestamp.format("%Y%m%d_%H%M%S");
        let path = self.dir.join(format!("{}{}.json", SNAPSHOT_PREFIX, stamp));

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        std::fs::write(&path, json)?;
        Ok(Persisted::clean(path))
    }
}

/// All records in one ordered JSON array, rewritten on every append.
///
/// A missing or corrupt file is treated as an empty ledger, never as a fatal
/// condition. The read-modify-write cycle is not safe under concurrent
/// writers; one monitoring process per ledger file is an invariant, not an
/// option.
pub struct LedgerSink {
    path: PathBuf,
}

impl LedgerSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the full ledger in append order. A corrupt file reads as empty.
    pub fn read_all(&self) -> Result<Vec<ErrorRecord>> {
        Ok(self.load()?.0)
    }

    /// Load the ledger, distinguishing a corrupt file (recovered as empty,
    /// with a warning) from a missing one (empty, no warning).
    fn load(&self) -> Result<(Vec<ErrorRecord>, Option<String>)> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => Ok((records, None)),
                Err(err) => Ok((
                    Vec::new(),
                    Some(format!(
                        "ledger {} was unreadable and has been reset: {}",
                        self.path.display(),
                        err
                    )),
                )),
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok((Vec::new(), None)),
            Err(err) => Err(err.into()),
        }
    }
}

impl ErrorSink for LedgerSink {
    fn persist(&self, record: &ErrorRecord) -> Result<Persisted> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (mut records, warning) = self.load()?;
        records.push(record.clone());

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(Persisted {
            path: self.path.clone(),
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sitewatch_types::ErrorKind;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn record_at(ts: chrono::DateTime<Utc>, url: &str) -> ErrorRecord {
        ErrorRecord::http_failure(ts, url, 500, None, HashMap::new(), ErrorKind::HttpError)
    }

    #[test]
    fn test_ledger_preserves_append_order() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let sink = LedgerSink::new(temp_dir.path().join("ledger.json"));

        let base = Utc::now();
        for i in 0..5 {
            sink.persist(&record_at(base, &format!("http://h/api/{}", i)))?;
        }

        let records = sink.read_all()?;
        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.url, format!("http://h/api/{}", i));
        }
        Ok(())
    }

    #[test]
    fn test_corrupt_ledger_is_treated_as_empty() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("ledger.json");
        std::fs::write(&path, "{{{{ not json")?;

        let sink = LedgerSink::new(path);
        assert!(sink.read_all()?.is_empty());

        sink.persist(&record_at(Utc::now(), "http://h/api/after-corruption"))?;
        assert_eq!(sink.read_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_ledger_reset_carries_a_warning() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("ledger.json");
        std::fs::write(&path, "{{{{ not json")?;

        let sink = LedgerSink::new(path);
        let receipt = sink.persist(&record_at(Utc::now(), "http://h/api/a"))?;
        let warning = receipt.warning.as_deref().unwrap_or("");
        assert!(warning.contains("has been reset"));

        // The rewritten file is healthy again.
        let receipt = sink.persist(&record_at(Utc::now(), "http://h/api/b"))?;
        assert!(receipt.warning.is_none());
        assert_eq!(sink.read_all()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_ledger_reset_is_reported_on_the_error_channel() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("ledger.json");
        std::fs::write(&path, "[not, valid")?;

        let logger = MonitorLogger::open(&temp_dir.path().join("logs"))?;
        let sink = LedgerSink::new(path);
        persist_with_report(&sink, &record_at(Utc::now(), "http://h/api/a"), &logger);

        let errors = std::fs::read_to_string(temp_dir.path().join("logs/error.log"))?;
        assert!(errors.contains("unreadable and has been reset"));
        assert!(errors.contains("error details saved to"));
        Ok(())
    }

    #[test]
    fn test_snapshot_writes_distinct_files_per_second() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let sink = SnapshotSink::new(temp_dir.path());

        let first = Utc::now();
        let second = first + Duration::seconds(1);
        let path_a = sink.persist(&record_at(first, "http://h/api/a"))?.path;
        let path_b = sink.persist(&record_at(second, "http://h/api/b"))?.path;

        assert_ne!(path_a, path_b);
        assert!(path_a.exists() && path_b.exists());
        Ok(())
    }

    #[test]
    fn test_snapshot_same_second_overwrites() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let sink = SnapshotSink::new(temp_dir.path());

        let ts = Utc::now();
        sink.persist(&record_at(ts, "http://h/api/first"))?;
        let path = sink.persist(&record_at(ts, "http://h/api/second"))?.path;

        let stored: ErrorRecord = serde_json::from_str(&std::fs::read_to_string(&path)?)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        assert_eq!(stored.url, "http://h/api/second");
        assert_eq!(std::fs::read_dir(temp_dir.path())?.count(), 1);
        Ok(())
    }
}
