//! Action/Assertion Executor
//!
//! Runs one parsed step at a time: resolve page objects, gate on readiness,
//! then act or assert. Every page-object lookup a step needs happens before
//! its first driver call, so a missing key never touches the browser.

use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::kind::{PageElement, Step, StepKind, TextSource};
use super::registry::StepRegistry;
use crate::config::Config;
use crate::driver::{CdpDriver, Driver, ElementHandle};
use crate::locator::PageObjects;
use crate::wait::{Condition, WaitGate};
use crate::{Error, Result};

/// Executes step sentences against a driver
#[derive(Debug, Clone)]
pub struct StepExecutor {
    driver: Arc<dyn Driver>,
    page_objects: Arc<PageObjects>,
    config: Config,
    registry: Arc<StepRegistry>,
}

impl StepExecutor {
    /// Executor over the standard step catalogue
    pub fn new(driver: Arc<dyn Driver>, page_objects: Arc<PageObjects>, config: Config) -> Result<Self> {
        let registry = Arc::new(StepRegistry::standard()?);
        Ok(Self::with_registry(driver, page_objects, config, registry))
    }

    /// Attach to the browser at `config.cdp_endpoint` with the page objects
    /// from `config.page_objects_path`
    pub async fn connect(config: Config) -> Result<Self> {
        let path = config
            .page_objects_path
            .as_deref()
            .ok_or_else(|| Error::configuration("page_objects_path is not set"))?;
        let page_objects = PageObjects::from_file(path)?;
        let driver = CdpDriver::connect(&config.cdp_endpoint).await?;
        info!("Loaded {} page objects from {}", page_objects.page_count(), path);

        Self::new(Arc::new(driver), Arc::new(page_objects), config)
    }

    pub fn with_registry(
        driver: Arc<dyn Driver>,
        page_objects: Arc<PageObjects>,
        config: Config,
        registry: Arc<StepRegistry>,
    ) -> Self {
        Self {
            driver,
            page_objects,
            config,
            registry,
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and execute a single sentence
    pub async fn run(&self, sentence: &str) -> Result<()> {
        let step = self.registry.parse(sentence)?;
        self.execute(&step).await
    }

    /// Execute a parsed step
    #[instrument(skip(self, step), fields(kind = step.kind.name()))]
    pub async fn execute(&self, step: &Step) -> Result<()> {
        info!("Executing step: {}", step.sentence);
        let gate = WaitGate::from_config(&self.config, step.timeout_override_ms);

        let result = match step.timeout_override_ms {
            // One poll interval of slack so a wait of exactly the limit still passes
            Some(limit_ms) => {
                let deadline = Duration::from_millis(limit_ms) + self.config.poll_interval();
                match tokio::time::timeout(deadline, self.dispatch(&step.kind, &gate)).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::timeout(format!(
                        "Step {:?} exceeded its {}ms limit",
                        step.sentence, limit_ms
                    ))),
                }
            }
            None => self.dispatch(&step.kind, &gate).await,
        };
        match &result {
            Ok(()) => info!("Step passed: {}", step.sentence),
            Err(e) => warn!("Step failed: {}: {}", step.sentence, e),
        }
        result
    }

    async fn dispatch(&self, kind: &StepKind, gate: &WaitGate) -> Result<()> {
        match kind {
            StepKind::GoToUrl { url } => self.driver.navigate(url).await,
            StepKind::GoToPageObject { target } => {
                let url = self.raw(target)?.to_string();
                self.driver.navigate(&url).await
            }
            StepKind::Reload => self.driver.refresh().await,
            StepKind::Click { target } => {
                let element = self.find(target)?;
                ready_to_click(gate, element.as_ref()).await?;
                element.click().await
            }
            StepKind::DeferredClick { target } => {
                let element = self.find(target)?;
                ready_to_click(gate, element.as_ref()).await?;
                tokio::time::sleep(self.config.deferred_click_delay()).await;
                element.click().await
            }
            StepKind::ClickIfPresent { target } => {
                let element = self.find(target)?;
                if element.is_present().await? {
                    element.click().await
                } else {
                    debug!("{} absent, skipping click", target);
                    Ok(())
                }
            }
            StepKind::WaitFor { duration_ms } => {
                tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
                Ok(())
            }
            StepKind::WaitForPresent { target } => {
                let element = self.find(target)?;
                gate.await_ready(element.as_ref(), Condition::Presence).await
            }
            StepKind::Type { text, target } => {
                let value = self.text_of(text)?;
                let element = self.find(target)?;
                ready_to_click(gate, element.as_ref()).await?;
                self.driver.move_and_click(element.as_ref()).await?;
                element.send_keys(&value).await
            }
            StepKind::TitleEquals { expected } => {
                let actual = self.driver.title().await?;
                expect_equal(&actual, expected)
            }
            StepKind::Present { target } => {
                let element = self.find(target)?;
                if element.is_present().await? {
                    Ok(())
                } else {
                    Err(Error::Mismatch(format!("{} should be present", element.locator())))
                }
            }
            StepKind::NotPresent { target } => {
                let element = self.find(target)?;
                if element.is_present().await? {
                    Err(Error::Mismatch(format!("{} should not be present", element.locator())))
                } else {
                    Ok(())
                }
            }
            StepKind::TextEquals { target, expected } => {
                let expected = self.text_of(expected)?;
                let element = self.find(target)?;
                let actual = element.text().await?;
                expect_equal(&actual, &expected)
            }
            StepKind::TextContains { target, expected } => {
                let expected = self.text_of(expected)?;
                let element = self.find(target)?;
                let actual = element.text().await?;
                expect_contains(&actual, &expected)
            }
            StepKind::UrlEquals { expected } => {
                let actual = self.driver.current_url().await?;
                expect_equal(&actual, expected)
            }
            StepKind::UrlMatches { pattern } => {
                let regex = Regex::new(pattern)
                    .map_err(|e| Error::invalid_argument(format!("Invalid regexp /{}/: {}", pattern, e)))?;
                let actual = self.driver.current_url().await?;
                if regex.is_match(&actual) {
                    Ok(())
                } else {
                    Err(Error::mismatch(&actual, "should match regexp", pattern))
                }
            }
            StepKind::UrlContains { expected } => {
                let actual = self.driver.current_url().await?;
                expect_contains(&actual, expected)
            }
            StepKind::FileEmpty { path } => {
                let contents = tokio::fs::read_to_string(path).await?;
                if contents.is_empty() {
                    Ok(())
                } else {
                    Err(Error::Mismatch(format!(
                        "{:?} should be empty but contains {:?}",
                        path, contents
                    )))
                }
            }
        }
    }

    /// Run sentences in order, stopping at the first failure
    pub async fn run_scenario<I, S>(&self, sentences: I) -> ScenarioReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = ScenarioReport::default();

        for (index, sentence) in sentences.into_iter().enumerate() {
            let sentence = sentence.as_ref();
            if report.failure.is_some() {
                report.skipped += 1;
                continue;
            }

            match self.run(sentence).await {
                Ok(()) => report.passed += 1,
                Err(error) => {
                    debug!("Scenario stopped at step {}", index + 1);
                    report.failure = Some(StepFailure {
                        index,
                        sentence: sentence.to_string(),
                        error,
                    });
                }
            }
        }

        report
    }

    fn raw(&self, target: &PageElement) -> Result<&str> {
        self.page_objects.raw(&target.page, &target.element)
    }

    fn find(&self, target: &PageElement) -> Result<Arc<dyn ElementHandle>> {
        let locator = self.page_objects.resolve(&target.page, &target.element)?;
        Ok(self.driver.find(&locator))
    }

    fn text_of(&self, source: &TextSource) -> Result<String> {
        match source {
            TextSource::Literal(text) => Ok(text.clone()),
            TextSource::PageObject(target) => Ok(self.raw(target)?.to_string()),
        }
    }
}

async fn ready_to_click(gate: &WaitGate, element: &dyn ElementHandle) -> Result<()> {
    gate.await_ready(element, Condition::Presence).await?;
    gate.await_ready(element, Condition::Clickable).await
}

fn expect_equal(actual: &str, expected: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::mismatch(actual, "should be", expected))
    }
}

fn expect_contains(actual: &str, expected: &str) -> Result<()> {
    if actual.contains(expected) {
        Ok(())
    } else {
        Err(Error::mismatch(actual, "should contain", expected))
    }
}

/// Failing step of a scenario
#[derive(Debug)]
pub struct StepFailure {
    /// Zero-based position in the scenario
    pub index: usize,
    pub sentence: String,
    pub error: Error,
}

/// Outcome of [`StepExecutor::run_scenario`]
#[derive(Debug, Default)]
pub struct ScenarioReport {
    pub passed: usize,
    pub skipped: usize,
    pub failure: Option<StepFailure>,
}

impl ScenarioReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of passed steps, or the first failure's error
    pub fn into_result(self) -> Result<usize> {
        match self.failure {
            Some(failure) => Err(failure.error),
            None => Ok(self.passed),
        }
    }
}
