pub mod config;
pub mod driver;
pub mod error;
pub mod logger;
pub mod login;
pub mod monitor;
pub mod navigation;
pub mod sink;
pub mod webdriver;

pub use config::{LoginConfig, MonitorConfig, PersistenceMode, TimingConfig};
pub use driver::SessionDriver;
pub use error::{Error, Result};
pub use logger::MonitorLogger;
pub use login::LoginDetector;
pub use monitor::Monitor;
pub use navigation::wait_for_page;
pub use sink::{ErrorSink, LedgerSink, Persisted, SnapshotSink, persist_with_report, sink_for};
pub use webdriver::WebDriverSession;
