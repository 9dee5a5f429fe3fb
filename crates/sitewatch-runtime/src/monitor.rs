use crate::config::MonitorConfig;
use crate::driver::SessionDriver;
use crate::logger::MonitorLogger;
use crate::login::LoginDetector;
use crate::navigation::wait_for_page;
use crate::sink::{ErrorSink, persist_with_report};
use crate::{Error, Result};
use chrono::Utc;
use sitewatch_engine::Classifier;
use sitewatch_types::{ErrorRecord, SessionState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The orchestrating state machine:
/// `Unstarted → Authenticating → Navigating → Monitoring (cyclic) → Terminated`.
///
/// Login or navigation failure short-circuits to `Terminated` with a fatal
/// record. Once monitoring, the loop runs until the cancellation flag is
/// observed between ticks or an unrecoverable session error propagates out of
/// a tick. On every path out, the driver is released exactly once.
pub struct Monitor {
    config: MonitorConfig,
    classifier: Classifier,
    detector: LoginDetector,
    logger: MonitorLogger,
    sink: Box<dyn ErrorSink>,
    cancel: Arc<AtomicBool>,
    state: SessionState,
}

impl Monitor {
    pub fn new(
        config: MonitorConfig,
        logger: MonitorLogger,
        sink: Box<dyn ErrorSink>,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        let classifier = Classifier::new(config.rules.clone());
        let detector = LoginDetector::from_config(&config.login);
        Self {
            config,
            classifier,
            detector,
            logger,
            sink,
            cancel,
            state: SessionState::Unstarted,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the whole lifecycle against one driver. The driver is closed
    /// before this returns, whatever happened in between.
    pub fn run(&mut self, driver: &mut dyn SessionDriver) -> Result<()> {
        let result = self.drive(driver);

        if let Err(err) = &result {
            let record = ErrorRecord::monitor_failure(
                Utc::now(),
                &self.config.target_url(),
                err.class_name(),
                &err.to_string(),
            );
            self.logger.error(&format!("monitor terminated: {}", err));
            persist_with_report(self.sink.as_ref(), &record, &self.logger);
        }

        if let Err(err) = driver.close() {
            self.logger.error(&format!("failed to release session: {}", err));
        }
        self.state = SessionState::Terminated;

        result
    }

    fn drive(&mut self, driver: &mut dyn SessionDriver) -> Result<()> {
        self.state = SessionState::Authenticating;
        self.logger.info("logging in...");
        driver.navigate(&self.config.login_url())?;
        driver.submit_credentials(&self.config.account, &self.config.password)?;

        let outcome = self.detector.detect(driver, &self.logger);
        if !outcome.is_success() {
            return Err(match self.detector.last_rejection() {
                Some(status) => Error::AuthenticationRejected(format!(
                    "login endpoint answered with status {}",
                    status
                )),
                None => Error::AuthenticationTimeout,
            });
        }
        self.logger.info("login succeeded");

        self.state = SessionState::Navigating;
        let target = self.config.target_url();
        self.logger.info(&format!("navigating to target page: {}", target));
        wait_for_page(driver, &target, self.config.timing.navigation_timeout())?;
        self.logger.info("target page ready");

        self.state = SessionState::Monitoring;
        self.logger.info("monitoring network requests...");
        self.observe(driver)
    }

    /// The steady-state loop: drain, classify, persist, sleep. No timeout of
    /// its own; it runs until cancelled or the session dies.
    fn observe(&mut self, driver: &mut dyn SessionDriver) -> Result<()> {
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                self.logger.info("cancellation requested, shutting down");
                return Ok(());
            }

            let entries = driver.drain_network_log()?;
            let report = self.classifier.drain_tick(&entries, Utc::now());

            if report.dropped > 0 {
                self.logger
                    .info(&format!("dropped {} malformed log entries", report.dropped));
            }

            for record in &report.records {
                self.logger.error(&record.summary());
                persist_with_report(self.sink.as_ref(), record, &self.logger);
            }

            std::thread::sleep(self.config.timing.tick_interval());
        }
    }
}
