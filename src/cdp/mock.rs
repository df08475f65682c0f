//! Mock CDP implementation for testing
//!
//! `MockCdpConnection` answers commands from a per-method response table;
//! `MockCdpClient` answers evaluations from a caller-supplied function.
//! Both record what they were sent.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cdp::traits::*;
use crate::Error;

/// Mock CDP connection
#[derive(Debug)]
pub struct MockCdpConnection {
    is_active: AtomicBool,
    next_id: AtomicU64,
    responses: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, CdpError>>,
    sent: Mutex<Vec<(String, Value)>>,
}

impl MockCdpConnection {
    /// Create a new mock connection whose pages always report `complete`
    pub fn new() -> Self {
        let mut responses = HashMap::new();
        responses.insert(
            "Runtime.evaluate".to_string(),
            serde_json::json!({"result": {"type": "string", "value": "complete"}}),
        );

        Self {
            is_active: AtomicBool::new(true),
            next_id: AtomicU64::new(1),
            responses: Mutex::new(responses),
            failures: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Answer `method` with `result`
    pub async fn respond(&self, method: &str, result: Value) {
        self.responses.lock().await.insert(method.to_string(), result);
    }

    /// Answer `method` with a protocol error
    pub async fn fail(&self, method: &str, code: i32, message: &str) {
        self.failures.lock().await.insert(
            method.to_string(),
            CdpError {
                code,
                message: message.to_string(),
            },
        );
    }

    /// Commands sent so far, in order
    pub async fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockCdpConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CdpConnection for MockCdpConnection {
    async fn send_command(&self, method: &str, params: Value) -> Result<CdpResponse, Error> {
        if !self.is_active() {
            return Err(Error::cdp("Connection is closed"));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sent.lock().await.push((method.to_string(), params));

        if let Some(error) = self.failures.lock().await.get(method).cloned() {
            return Ok(CdpResponse {
                id,
                result: None,
                error: Some(error),
            });
        }

        let result = self
            .responses
            .lock()
            .await
            .get(method)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}));

        Ok(CdpResponse {
            id,
            result: Some(result),
            error: None,
        })
    }

    async fn close(&self) -> Result<(), Error> {
        self.is_active.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::Relaxed)
    }
}

type Evaluator = Box<dyn Fn(&str) -> Result<EvaluationResult, Error> + Send + Sync>;

/// Mock CDP client
pub struct MockCdpClient {
    connection: Arc<MockCdpConnection>,
    evaluator: Evaluator,
    scripts: Mutex<Vec<String>>,
    navigations: Mutex<Vec<String>>,
    methods: Mutex<Vec<(String, Value)>>,
    reloads: AtomicU64,
}

impl std::fmt::Debug for MockCdpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCdpClient").finish_non_exhaustive()
    }
}

impl MockCdpClient {
    /// Create a mock client that evaluates every script to `null`
    pub fn new() -> Self {
        Self::with_evaluator(|_| Ok(EvaluationResult::Null))
    }

    /// Create a mock client answering evaluations with `evaluator`
    pub fn with_evaluator<F>(evaluator: F) -> Self
    where
        F: Fn(&str) -> Result<EvaluationResult, Error> + Send + Sync + 'static,
    {
        Self {
            connection: Arc::new(MockCdpConnection::new()),
            evaluator: Box::new(evaluator),
            scripts: Mutex::new(Vec::new()),
            navigations: Mutex::new(Vec::new()),
            methods: Mutex::new(Vec::new()),
            reloads: AtomicU64::new(0),
        }
    }

    /// Scripts evaluated so far
    pub async fn scripts(&self) -> Vec<String> {
        self.scripts.lock().await.clone()
    }

    /// URLs navigated to so far
    pub async fn navigations(&self) -> Vec<String> {
        self.navigations.lock().await.clone()
    }

    /// Raw methods called so far
    pub async fn methods(&self) -> Vec<(String, Value)> {
        self.methods.lock().await.clone()
    }

    /// Number of reloads
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::Relaxed)
    }
}

impl Default for MockCdpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CdpClient for MockCdpClient {
    fn connection(&self) -> Arc<dyn CdpConnection> {
        self.connection.clone()
    }

    async fn navigate(&self, url: &str) -> Result<NavigationResult, Error> {
        self.navigations.lock().await.push(url.to_string());
        Ok(NavigationResult {
            url: url.to_string(),
            loaded: true,
        })
    }

    async fn reload(&self, _ignore_cache: bool) -> Result<(), Error> {
        self.reloads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn evaluate(&self, script: &str, _await_promise: bool) -> Result<EvaluationResult, Error> {
        self.scripts.lock().await.push(script.to_string());
        (self.evaluator)(script)
    }

    async fn enable_domain(&self, domain: &str) -> Result<(), Error> {
        self.call_method(&format!("{}.enable", domain), serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn call_method(&self, method: &str, params: Value) -> Result<Value, Error> {
        self.methods.lock().await.push((method.to_string(), params));
        Ok(serde_json::json!({}))
    }
}
