//! World state for the step-library scenarios.

use std::sync::Arc;

use cucumber::World;
use oxide_steps::driver::MockAction;
use oxide_steps::{Config, Error, MockDriver, PageObjects, StepExecutor, StepRegistry};
use tempfile::TempDir;

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct BrowserWorld {
    pub driver: MockDriver,
    pub page_objects: PageObjects,
    pub config: Config,
    registry: Arc<StepRegistry>,
    pub last_error: Option<Error>,
    pub files: TempDir,
}

impl BrowserWorld {
    fn new() -> Self {
        Self {
            driver: MockDriver::new(),
            page_objects: PageObjects::new(),
            config: Config {
                poll_interval_ms: 10,
                deferred_click_delay_ms: 20,
                ..Config::default().with_custom_timeout(200)
            },
            registry: Arc::new(StepRegistry::standard().expect("standard catalogue")),
            last_error: None,
            files: tempfile::tempdir().expect("temp dir"),
        }
    }

    fn executor(&self) -> StepExecutor {
        StepExecutor::with_registry(
            Arc::new(self.driver.clone()),
            Arc::new(self.page_objects.clone()),
            self.config.clone(),
            Arc::clone(&self.registry),
        )
    }

    /// Run a library sentence; `{tmp}` expands to the scenario's temp dir.
    pub async fn run_sentence(&mut self, sentence: &str) -> Result<(), Error> {
        let sentence = sentence.replace("{tmp}", &self.files.path().display().to_string());
        self.executor().run(&sentence).await
    }

    /// Run a sentence that is expected to fail and keep its error.
    pub async fn attempt(&mut self, sentence: &str) {
        self.last_error = self.run_sentence(sentence).await.err();
    }

    pub fn clicks(&self) -> Vec<String> {
        self.driver
            .actions()
            .into_iter()
            .filter_map(|action| match action {
                MockAction::Click(selector) => Some(selector),
                _ => None,
            })
            .collect()
    }
}
