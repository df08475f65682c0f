//! CDP client implementation
//!
//! This module provides a high-level CDP client with typed methods for common operations.

use super::traits::*;
use super::types::*;
use crate::Error;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Polling budget for `document.readyState` after a navigation
const LOAD_POLL_ATTEMPTS: u32 = 50;
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// CDP client implementation
#[derive(Debug, Clone)]
pub struct CdpClientImpl {
    connection: Arc<dyn CdpConnection>,
}

impl CdpClientImpl {
    /// Create a new CDP client over an open connection
    pub fn new(connection: Arc<dyn CdpConnection>) -> Self {
        Self { connection }
    }

    /// Parse remote object value to evaluation result
    fn parse_remote_object(obj: &RemoteObject) -> EvaluationResult {
        match obj.r#type.as_str() {
            "string" => EvaluationResult::String(
                obj.value
                    .as_ref()
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            ),
            "number" => EvaluationResult::Number(obj.value.as_ref().and_then(|v| v.as_f64()).unwrap_or(0.0)),
            "boolean" => EvaluationResult::Bool(obj.value.as_ref().and_then(|v| v.as_bool()).unwrap_or(false)),
            "object" if obj.subtype.as_deref() == Some("null") => EvaluationResult::Null,
            "object" => EvaluationResult::Object(obj.value.clone().unwrap_or(serde_json::Value::Null)),
            _ => EvaluationResult::Null,
        }
    }

    /// Poll `document.readyState` until the page reports `complete`
    async fn wait_for_load(&self) -> bool {
        for attempt in 1..=LOAD_POLL_ATTEMPTS {
            tokio::time::sleep(LOAD_POLL_INTERVAL).await;

            match self.evaluate("document.readyState", false).await {
                Ok(EvaluationResult::String(state)) if state == "complete" => {
                    debug!("Page loaded on attempt {}", attempt);
                    return true;
                }
                Ok(other) => debug!("Document not ready on attempt {}: {:?}", attempt, other),
                // The execution context is torn down mid-navigation; keep polling.
                Err(e) => debug!("Ready state check failed on attempt {}: {}", attempt, e),
            }
        }

        warn!("Page load polling timed out, continuing anyway");
        false
    }
}

#[async_trait]
impl CdpClient for CdpClientImpl {
    fn connection(&self) -> Arc<dyn CdpConnection> {
        Arc::clone(&self.connection)
    }

    async fn navigate(&self, url: &str) -> Result<NavigationResult, Error> {
        info!("Navigating to {}", url);

        let params = serde_json::to_value(NavigateParams { url: url.to_string() })?;
        let result = self.call_method("Page.navigate", params).await?;

        if let Some(error_text) = result.get("errorText").and_then(|v| v.as_str()) {
            return Err(Error::cdp(format!("Navigation to {} failed: {}", url, error_text)));
        }

        let loaded = self.wait_for_load().await;
        Ok(NavigationResult {
            url: url.to_string(),
            loaded,
        })
    }

    async fn reload(&self, ignore_cache: bool) -> Result<(), Error> {
        info!("Reloading page (ignore_cache: {})", ignore_cache);

        self.call_method("Page.reload", serde_json::json!({ "ignoreCache": ignore_cache }))
            .await?;
        self.wait_for_load().await;
        Ok(())
    }

    async fn evaluate(&self, script: &str, await_promise: bool) -> Result<EvaluationResult, Error> {
        debug!("Evaluating script: {}", script);

        let params = serde_json::to_value(EvaluateParams {
            expression: script.to_string(),
            await_promise,
            return_by_value: true,
        })?;
        let result = self.call_method("Runtime.evaluate", params).await?;

        let response: EvaluateResponse = serde_json::from_value(result)
            .map_err(|e| Error::cdp(format!("Failed to parse EvaluateResponse: {}", e)))?;

        if let Some(exception) = response.exception_details {
            return Err(Error::script_execution_failed(exception.describe()));
        }

        Ok(Self::parse_remote_object(&response.result))
    }

    async fn enable_domain(&self, domain: &str) -> Result<(), Error> {
        debug!("Enabling domain: {}", domain);
        self.call_method(&format!("{}.enable", domain), serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn call_method(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, Error> {
        let response = self.connection.send_command(method, params).await?;

        if let Some(error) = response.error {
            return Err(Error::cdp(format!("{} failed ({}): {}", method, error.code, error.message)));
        }

        response.result.ok_or_else(|| Error::cdp("No result in response"))
    }
}
