//! Common test utilities
//!
//! Shared fixtures for the integration tests: the page-object table used by
//! the end-to-end scenarios and an executor wired to a `MockDriver`.

#![allow(dead_code)]

use oxide_steps::{Config, MockDriver, PageObjects, StepExecutor};
use std::sync::Arc;

/// Page objects for the login/home scenarios
pub fn page_objects() -> PageObjects {
    PageObjects::from_json_str(
        r##"{
            "Login": {
                "url": "https://x/login",
                "submit": "//button[@id='go']",
                "email": "#email"
            },
            "Home": {
                "url": "https://x/home",
                "banner": ".banner"
            },
            "Users": {
                "bob": "bob@x.io"
            }
        }"##,
    )
    .expect("valid page objects")
}

/// Fresh mock browser and an executor driving it
pub fn setup() -> (MockDriver, StepExecutor) {
    setup_with(Config::default())
}

pub fn setup_with(config: Config) -> (MockDriver, StepExecutor) {
    let driver = MockDriver::new();
    let executor = StepExecutor::new(Arc::new(driver.clone()), Arc::new(page_objects()), config)
        .expect("standard catalogue");
    (driver, executor)
}
