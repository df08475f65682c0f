//! DevTools endpoint discovery
//!
//! Finds (or opens) a page target through the browser's HTTP endpoint and
//! attaches a CDP client to it.

use super::client::CdpClientImpl;
use super::connection::CdpWebSocketConnection;
use super::traits::CdpClient;
use super::types::TargetInfo;
use crate::Error;
use std::sync::Arc;
use tracing::{debug, info};

/// Handle on a browser started with `--remote-debugging-port`
#[derive(Debug, Clone)]
pub struct CdpBrowser {
    /// HTTP endpoint (e.g., "http://localhost:9222")
    http_endpoint: String,
    http: reqwest::Client,
}

impl CdpBrowser {
    /// Create a browser handle; `ws://` endpoints are accepted and mapped to HTTP
    pub fn new<S: Into<String>>(endpoint: S) -> Self {
        let endpoint = endpoint.into();
        let http_endpoint = endpoint
            .replacen("ws://", "http://", 1)
            .replacen("wss://", "https://", 1)
            .trim_end_matches('/')
            .to_string();

        Self {
            http_endpoint,
            http: reqwest::Client::new(),
        }
    }

    /// HTTP endpoint in use
    pub fn endpoint(&self) -> &str {
        &self.http_endpoint
    }

    /// List targets
    pub async fn targets(&self) -> Result<Vec<TargetInfo>, Error> {
        let url = format!("{}/json/list", self.http_endpoint);
        debug!("Fetching targets from {}", url);

        self.http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::cdp(format!("Failed to reach DevTools endpoint {}: {}", self.http_endpoint, e)))?
            .json()
            .await
            .map_err(|e| Error::cdp(format!("Failed to parse targets: {}", e)))
    }

    /// Open a new page target and return it
    pub async fn new_page(&self) -> Result<TargetInfo, Error> {
        let url = format!("{}/json/new?about:blank", self.http_endpoint);
        debug!("Creating page via {}", url);

        self.http
            .put(&url)
            .send()
            .await
            .map_err(|e| Error::cdp(format!("Failed to create page target: {}", e)))?
            .json()
            .await
            .map_err(|e| Error::cdp(format!("Failed to parse new target response: {}", e)))
    }

    /// Attach to the first page target, opening one if none exists
    pub async fn connect_page(&self) -> Result<Arc<dyn CdpClient>, Error> {
        let target = match first_page(self.targets().await?) {
            Some(target) => target,
            None => self.new_page().await?,
        };

        let ws_url = target
            .web_socket_debugger_url
            .ok_or_else(|| Error::cdp(format!("Target {} is already attached elsewhere", target.id)))?;

        info!("Attaching to page target {} ({})", target.id, target.url);
        let connection = CdpWebSocketConnection::connect(ws_url).await?;
        let client = CdpClientImpl::new(connection);

        client.enable_domain("Page").await?;
        client.enable_domain("Runtime").await?;

        Ok(Arc::new(client))
    }
}

fn first_page(targets: Vec<TargetInfo>) -> Option<TargetInfo> {
    targets
        .into_iter()
        .find(|t| t.target_type == "page" && t.web_socket_debugger_url.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, kind: &str, ws: Option<&str>) -> TargetInfo {
        TargetInfo {
            id: id.to_string(),
            target_type: kind.to_string(),
            title: String::new(),
            url: "about:blank".to_string(),
            web_socket_debugger_url: ws.map(str::to_string),
        }
    }

    #[test]
    fn test_endpoint_normalisation() {
        assert_eq!(CdpBrowser::new("ws://localhost:9222").endpoint(), "http://localhost:9222");
        assert_eq!(CdpBrowser::new("wss://remote:9222/").endpoint(), "https://remote:9222");
        assert_eq!(CdpBrowser::new("http://127.0.0.1:9333").endpoint(), "http://127.0.0.1:9333");
    }

    #[test]
    fn test_first_page_skips_workers_and_attached() {
        let targets = vec![
            target("W", "service_worker", Some("ws://w")),
            target("P1", "page", None),
            target("P2", "page", Some("ws://p2")),
        ];
        assert_eq!(first_page(targets).unwrap().id, "P2");
        assert!(first_page(vec![target("W", "worker", Some("ws://w"))]).is_none());
    }
}
