use crate::config::LoginConfig;
use crate::driver::SessionDriver;
use crate::logger::MonitorLogger;
use crate::Result;
use sitewatch_types::{LoginOutcome, NetworkEvent};
use std::time::{Duration, Instant};

/// Detects completion of the asynchronous login handshake.
///
/// There is no callback for the login API call finishing, so the detector
/// polls two independent signals under one wall-clock deadline:
///
/// 1. a response for the login endpoint with status 200 in the drained
///    network log, and
/// 2. the landing marker appearing in the session's current location.
///
/// Whichever is observed first wins. The budget is short and the resource is
/// local, so the cadence is a fixed sleep with no backoff.
pub struct LoginDetector {
    endpoint_fragment: String,
    landing_marker: String,
    budget: Duration,
    poll_interval: Duration,
    confirm_wait: Duration,
    rejection: Option<u16>,
}

impl LoginDetector {
    pub fn new(
        endpoint_fragment: &str,
        landing_marker: &str,
        budget: Duration,
        poll_interval: Duration,
        confirm_wait: Duration,
    ) -> Self {
        Self {
            endpoint_fragment: endpoint_fragment.to_string(),
            landing_marker: landing_marker.to_string(),
            budget,
            poll_interval,
            confirm_wait,
            rejection: None,
        }
    }

    pub fn from_config(config: &LoginConfig) -> Self {
        Self::new(
            &config.endpoint_fragment,
            &config.landing_marker,
            Duration::from_secs(config.timeout_secs),
            Duration::from_millis(config.poll_ms),
            Duration::from_secs(config.confirm_secs),
        )
    }

    /// Poll until a success signal fires or the deadline passes. Never blocks
    /// past the budget while waiting for the primary signals; any
    /// unrecoverable session error is logged and surfaces as `Failure`.
    pub fn detect(&mut self, driver: &mut dyn SessionDriver, logger: &MonitorLogger) -> LoginOutcome {
        self.rejection = None;
        let deadline = Instant::now() + self.budget;

        while Instant::now() < deadline {
            match self.login_response_seen(driver, logger) {
                Ok(true) => return LoginOutcome::Success,
                Ok(false) => {}
                Err(err) => {
                    logger.error(&format!("login detection failed: {}", err));
                    return LoginOutcome::Failure;
                }
            }

            match driver.current_location() {
                Ok(location) if location.contains(&self.landing_marker) => {
                    // The page can bounce through the landing route and away
                    // again; take a second sample before declaring success.
                    std::thread::sleep(self.poll_interval);
                    return self.confirm_landing(driver, logger);
                }
                Ok(_) => {}
                Err(err) => {
                    logger.error(&format!("login detection failed: {}", err));
                    return LoginOutcome::Failure;
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            std::thread::sleep(self.poll_interval.min(remaining));
        }

        LoginOutcome::Failure
    }

    /// The last non-2xx status the login endpoint answered with during the
    /// most recent `detect` call, if any. Distinguishes an explicit rejection
    /// from a login that simply never completed.
    pub fn last_rejection(&self) -> Option<u16> {
        self.rejection
    }

    /// Scan freshly drained entries for a login-endpoint response.
    fn login_response_seen(
        &mut self,
        driver: &mut dyn SessionDriver,
        logger: &MonitorLogger,
    ) -> Result<bool> {
        for raw in driver.drain_network_log()? {
            let Ok(Some(event)) = sitewatch_engine::parse_entry(&raw) else {
                continue;
            };
            let NetworkEvent::ResponseReceived { url, status, .. } = event else {
                continue;
            };
            if !url.contains(&self.endpoint_fragment) {
                continue;
            }
            if status == 200 {
                return Ok(true);
            }
            logger.error(&format!("login endpoint answered with status {}", status));
            self.rejection = Some(status);
        }
        Ok(false)
    }

    /// Secondary wait for the marker path: require the landing location to
    /// still be present before declaring success.
    fn confirm_landing(
        &self,
        driver: &mut dyn SessionDriver,
        logger: &MonitorLogger,
    ) -> LoginOutcome {
        let deadline = Instant::now() + self.confirm_wait;

        loop {
            match driver.current_location() {
                Ok(location) if location.contains(&self.landing_marker) => {
                    return LoginOutcome::Success;
                }
                Ok(_) => {}
                Err(err) => {
                    logger.error(&format!("login confirmation failed: {}", err));
                    return LoginOutcome::Failure;
                }
            }

            if Instant::now() >= deadline {
                logger.error("login signal observed but landing page was never reached");
                return LoginOutcome::Failure;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            std::thread::sleep(self.poll_interval.min(remaining));
        }
    }
}
