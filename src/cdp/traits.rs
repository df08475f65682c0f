//! Seams between the driver and the DevTools wire
//!
//! `CdpConnection` moves raw JSON-RPC commands; `CdpClient` gives the driver
//! the handful of typed page operations it needs. Both have mock
//! implementations in [`super::mock`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::Error;

/// Reply to one command, matched to its request by `id`
#[derive(Debug, Clone)]
pub struct CdpResponse {
    pub id: u64,
    pub result: Option<Value>,
    pub error: Option<CdpError>,
}

/// Protocol-level failure reported by the browser
#[derive(Debug, Clone)]
pub struct CdpError {
    pub code: i32,
    pub message: String,
}

/// Command channel to one DevTools target
#[async_trait]
pub trait CdpConnection: Send + Sync + std::fmt::Debug {
    /// Send `method` and wait for its reply
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse, Error>;

    async fn close(&self) -> Result<(), Error>;

    fn is_active(&self) -> bool;
}

/// Page operations used by [`crate::driver::CdpDriver`]
#[async_trait]
pub trait CdpClient: Send + Sync + std::fmt::Debug {
    fn connection(&self) -> Arc<dyn CdpConnection>;

    /// Load `url`, then wait for `document.readyState == "complete"`
    async fn navigate(&self, url: &str) -> Result<NavigationResult, Error>;

    /// Reload, then wait for the document as [`CdpClient::navigate`] does
    async fn reload(&self, ignore_cache: bool) -> Result<(), Error>;

    /// Run `script` in the page and return its value by value.
    ///
    /// A thrown exception becomes [`Error::ScriptExecutionFailed`].
    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, Error>;

    /// Send `<domain>.enable`
    async fn enable_domain(&self, domain: &str) -> Result<(), Error>;

    /// Send any method; protocol errors become [`Error::Cdp`]
    async fn call_method(&self, method: &str, params: Value) -> Result<Value, Error>;
}

/// Outcome of [`CdpClient::navigate`]
#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    /// `false` when load polling gave up before `complete`
    pub loaded: bool,
}

/// Value returned by a page script
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationResult {
    String(String),
    Number(f64),
    Bool(bool),
    /// `null` and `undefined`
    Null,
    /// Objects and arrays as JSON
    Object(Value),
}
