//! Step library: sentence catalogue, parsing and execution
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use oxide_steps::{Config, CdpDriver, PageObjects, StepExecutor};
//!
//! # async fn example() -> oxide_steps::Result<()> {
//! let config = Config::from_env()?;
//! let driver = CdpDriver::connect(&config.cdp_endpoint).await?;
//! let page_objects = PageObjects::from_file("pages.toml")?;
//! let executor = StepExecutor::new(Arc::new(driver), Arc::new(page_objects), config)?;
//!
//! executor.run("When I go to 'Login'.'url'").await?;
//! executor.run("Then URL should contain '/login'").await?;
//! # Ok(())
//! # }
//! ```

pub mod kind;
pub mod registry;
pub mod executor;

pub use kind::{PageElement, Step, StepKind, TextSource};
pub use registry::{Args, StepBuilder, StepDefinition, StepRegistry};
pub use executor::{ScenarioReport, StepExecutor, StepFailure};
