//! Cucumber world and glue steps.
//!
//! Library sentences are forwarded verbatim to [`StepExecutor`]; the
//! remaining steps arrange the fake browser and inspect what happened.

pub mod steps;
pub mod world;
