use crate::driver::SessionDriver;
use crate::{Error, Result};
use std::time::{Duration, Instant};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Navigation gate: issue navigation and block until the document root
/// exists or the timeout elapses.
///
/// Holds no state across calls; each navigation is independent and
/// idempotent. Classification is none of this function's business.
pub fn wait_for_page(driver: &mut dyn SessionDriver, url: &str, timeout: Duration) -> Result<()> {
    driver.navigate(url)?;

    let deadline = Instant::now() + timeout;
    loop {
        if driver.document_ready()? {
            return Ok(());
        }

        if Instant::now() >= deadline {
            return Err(Error::NavigationTimeout(url.to_string()));
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        std::thread::sleep(READY_POLL_INTERVAL.min(remaining));
    }
}
