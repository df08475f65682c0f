//! CDP-backed driver
//!
//! Element queries are JavaScript evaluations; pointer and keyboard input go
//! through the `Input` domain so the page sees trusted events.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::scripts;
use super::traits::{Driver, ElementHandle};
use crate::cdp::traits::{CdpClient, EvaluationResult};
use crate::locator::Locator;
use crate::Error;

/// Driver over a single CDP page client
#[derive(Debug, Clone)]
pub struct CdpDriver {
    client: Arc<dyn CdpClient>,
}

impl CdpDriver {
    /// Create a driver for an attached page
    pub fn new(client: Arc<dyn CdpClient>) -> Self {
        Self { client }
    }

    /// Attach to the first page of the browser behind `endpoint`
    pub async fn connect(endpoint: &str) -> Result<Self, Error> {
        let client = crate::cdp::CdpBrowser::new(endpoint).connect_page().await?;
        Ok(Self::new(client))
    }

    async fn evaluate_string(&self, script: &str) -> Result<String, Error> {
        expect_string(self.client.evaluate(script, false).await?)
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn navigate(&self, url: &str) -> Result<(), Error> {
        self.client.navigate(url).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), Error> {
        self.client.reload(false).await
    }

    async fn current_url(&self) -> Result<String, Error> {
        self.evaluate_string(scripts::CURRENT_URL).await
    }

    async fn title(&self) -> Result<String, Error> {
        self.evaluate_string(scripts::TITLE).await
    }

    fn find(&self, locator: &Locator) -> Arc<dyn ElementHandle> {
        Arc::new(CdpElement::new(locator.clone(), Arc::clone(&self.client)))
    }

    #[instrument(skip(self, element), fields(selector = %element.locator()))]
    async fn move_and_click(&self, element: &dyn ElementHandle) -> Result<(), Error> {
        let pointer = Pointer::new(Arc::clone(&self.client));
        let (x, y) = pointer.center_of(element.locator()).await?;
        pointer.dispatch("mouseMoved", x, y).await?;
        pointer.click_at(x, y).await
    }
}

/// Element handle evaluated through CDP
#[derive(Debug)]
pub struct CdpElement {
    id: String,
    locator: Locator,
    client: Arc<dyn CdpClient>,
}

impl CdpElement {
    pub fn new(locator: Locator, client: Arc<dyn CdpClient>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            locator,
            client,
        }
    }
}

#[async_trait]
impl ElementHandle for CdpElement {
    fn locator(&self) -> &Locator {
        &self.locator
    }

    async fn is_present(&self) -> Result<bool, Error> {
        expect_bool(self.client.evaluate(&scripts::presence(&self.locator), false).await?)
    }

    async fn is_clickable(&self) -> Result<bool, Error> {
        expect_bool(self.client.evaluate(&scripts::clickable(&self.locator), false).await?)
    }

    async fn click(&self) -> Result<(), Error> {
        debug!("Clicking element {} ({})", self.id, self.locator);
        let pointer = Pointer::new(Arc::clone(&self.client));
        let (x, y) = pointer.center_of(&self.locator).await?;
        pointer.click_at(x, y).await
    }

    async fn send_keys(&self, text: &str) -> Result<(), Error> {
        debug!("Typing {} chars into element {}", text.chars().count(), self.id);
        for ch in text.chars() {
            self.client
                .call_method(
                    "Input.dispatchKeyEvent",
                    json!({
                        "type": "char",
                        "text": ch.to_string(),
                    }),
                )
                .await?;
        }
        Ok(())
    }

    async fn text(&self) -> Result<String, Error> {
        expect_string(self.client.evaluate(&scripts::text(&self.locator), false).await?)
    }
}

#[derive(Debug, Deserialize)]
struct Point {
    x: f64,
    y: f64,
}

/// Mouse input over `Input.dispatchMouseEvent`
struct Pointer {
    client: Arc<dyn CdpClient>,
}

impl Pointer {
    fn new(client: Arc<dyn CdpClient>) -> Self {
        Self { client }
    }

    async fn center_of(&self, locator: &Locator) -> Result<(f64, f64), Error> {
        let raw = expect_string(self.client.evaluate(&scripts::center(locator), false).await?)?;
        let point: Point = serde_json::from_str(&raw)?;
        Ok((point.x, point.y))
    }

    async fn dispatch(&self, kind: &str, x: f64, y: f64) -> Result<(), Error> {
        let mut params = json!({ "type": kind, "x": x, "y": y });
        if kind != "mouseMoved" {
            params["button"] = json!("left");
            params["clickCount"] = json!(1);
        }
        self.client.call_method("Input.dispatchMouseEvent", params).await?;
        Ok(())
    }

    async fn click_at(&self, x: f64, y: f64) -> Result<(), Error> {
        info!("Clicking at ({:.1}, {:.1})", x, y);
        self.dispatch("mousePressed", x, y).await?;
        self.dispatch("mouseReleased", x, y).await
    }
}

fn expect_bool(result: EvaluationResult) -> Result<bool, Error> {
    match result {
        EvaluationResult::Bool(value) => Ok(value),
        other => Err(Error::script_execution_failed(format!(
            "Expected boolean result, got {:?}",
            other
        ))),
    }
}

fn expect_string(result: EvaluationResult) -> Result<String, Error> {
    match result {
        EvaluationResult::String(value) => Ok(value),
        EvaluationResult::Null => Ok(String::new()),
        other => Err(Error::script_execution_failed(format!(
            "Expected string result, got {:?}",
            other
        ))),
    }
}
