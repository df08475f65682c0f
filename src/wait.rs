//! Wait Gate: bounded polling for element readiness

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::driver::ElementHandle;
use crate::{Error, Result};

/// Readiness predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Element exists in the DOM
    Presence,
    /// Element is present, visible, enabled and not obscured
    Clickable,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Presence => write!(f, "presence"),
            Condition::Clickable => write!(f, "clickable"),
        }
    }
}

/// Polls a predicate until it holds or the budget runs out.
///
/// Each call gets the full budget; waiting for presence and then clickability
/// may take up to twice the budget in total.
#[derive(Debug, Clone, Copy)]
pub struct WaitGate {
    timeout: Duration,
    poll_interval: Duration,
}

impl WaitGate {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Gate using the run configuration and an optional step override
    pub fn from_config(config: &Config, step_override_ms: Option<u64>) -> Self {
        Self::new(config.wait_timeout(step_override_ms), config.poll_interval())
    }

    /// Budget applied to each wait
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until `element` satisfies `condition`
    #[instrument(skip(self, element), fields(selector = %element.locator()))]
    pub async fn await_ready(&self, element: &dyn ElementHandle, condition: Condition) -> Result<()> {
        let locator = element.locator();
        let message = format!(
            "{} ({} {}) timed out after {}ms",
            condition,
            locator.kind,
            locator.value,
            self.timeout.as_millis()
        );

        self.wait_until(
            || async move {
                match condition {
                    Condition::Presence => element.is_present().await,
                    Condition::Clickable => element.is_clickable().await,
                }
            },
            message,
        )
        .await
    }

    /// Poll `predicate` until it returns `true`.
    ///
    /// Predicate errors end the wait immediately. The predicate is always
    /// evaluated at least once, even with a zero budget.
    pub async fn wait_until<F, Fut>(&self, mut predicate: F, message: String) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = Instant::now();

        loop {
            if predicate().await? {
                debug!("Ready after {}ms", start.elapsed().as_millis());
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed >= self.timeout {
                return Err(Error::timeout(message));
            }

            tokio::time::sleep(self.poll_interval.min(self.timeout - elapsed)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Driver, MockDriver, MockElement};
    use crate::locator::Locator;

    fn gate(timeout_ms: u64) -> WaitGate {
        WaitGate::new(Duration::from_millis(timeout_ms), Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn test_presence_times_out_after_budget() {
        let driver = MockDriver::new();
        let handle = driver.find(&Locator::from_raw("//button[@id='go']"));

        let start = Instant::now();
        let err = gate(5000)
            .await_ready(handle.as_ref(), Condition::Presence)
            .await
            .unwrap_err();
        let elapsed = start.elapsed();

        assert!(err.is_timeout());
        assert!(elapsed >= Duration::from_millis(5000));
        assert!(elapsed < Duration::from_millis(5200));
        let message = err.to_string();
        assert!(message.contains("presence"));
        assert!(message.contains("//button[@id='go']"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_presence_succeeds_when_element_appears() {
        let driver = MockDriver::new();
        driver.add_element(".late", MockElement::new("").appearing_after(Duration::from_millis(350)));
        let handle = driver.find(&Locator::from_raw(".late"));

        let start = Instant::now();
        gate(5000)
            .await_ready(handle.as_ref(), Condition::Presence)
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_element_never_clickable() {
        let driver = MockDriver::new();
        driver.add_element("#go", MockElement::new("").hidden());
        let handle = driver.find(&Locator::from_raw("#go"));

        let gate = gate(300);
        gate.await_ready(handle.as_ref(), Condition::Presence).await.unwrap();
        let err = gate
            .await_ready(handle.as_ref(), Condition::Clickable)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("clickable (css #go)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_checks_once() {
        let mut calls = 0;
        let result = gate(0)
            .wait_until(
                || {
                    calls += 1;
                    async { Ok(false) }
                },
                "never".to_string(),
            )
            .await;
        assert!(matches!(result, Err(Error::Timeout(_))));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_predicate_error_propagates() {
        let result = gate(5000)
            .wait_until(|| async { Err(Error::cdp("gone")) }, "x".to_string())
            .await;
        assert!(matches!(result, Err(Error::Cdp(_))));
    }

    #[test]
    fn test_from_config_uses_run_override() {
        let config = Config::default().with_custom_timeout(800);
        assert_eq!(WaitGate::from_config(&config, None).timeout(), Duration::from_millis(800));
    }
}
