//! Oxide-Steps: Gherkin step library for browser automation
//!
//! Binds a fixed vocabulary of sentences ("I click 'Login'.'submit'", "URL
//! should contain 'home'") to browser actions and assertions. Elements are
//! named through a page-object table and every interaction is gated on
//! element readiness with a bounded wait.
//!
//! The browser is reached through the [`Driver`] trait; [`CdpDriver`] talks
//! to Chrome over the DevTools protocol and [`MockDriver`] keeps an in-memory
//! page for tests.

pub mod error;
pub mod config;
pub mod telemetry;

pub mod cdp;
pub mod driver;
pub mod locator;
pub mod wait;
pub mod steps;

// Re-exports
pub use error::{Error, Result};
pub use config::Config;
pub use driver::{CdpDriver, Driver, ElementHandle, MockDriver, MockElement};
pub use locator::{Locator, LocatorKind, PageObjects};
pub use wait::{Condition, WaitGate};
pub use steps::{ScenarioReport, Step, StepExecutor, StepKind, StepRegistry};

/// Oxide-Steps library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
