//! Chrome DevTools Protocol plumbing behind [`crate::driver::CdpDriver`]
//!
//! - `types`: JSON-RPC envelopes, `Runtime.evaluate` shapes, target entries
//! - `traits`: [`CdpConnection`] and [`CdpClient`]
//! - `connection`: WebSocket transport with id-routed replies
//! - `client`: navigate/reload with load polling, script evaluation
//! - `browser`: page discovery over the DevTools HTTP endpoint
//! - `mock`: recording doubles for unit tests
//!
//! ```rust,no_run
//! use oxide_steps::cdp::CdpBrowser;
//!
//! # async fn example() -> oxide_steps::Result<()> {
//! let client = CdpBrowser::new("http://localhost:9222").connect_page().await?;
//! let page = client.navigate("https://x/login").await?;
//! assert!(page.loaded);
//! # Ok(())
//! # }
//! ```

pub mod types;
pub mod traits;
pub mod connection;
pub mod client;
pub mod browser;
pub mod mock;

pub use traits::{CdpClient, CdpConnection, CdpError, CdpResponse, EvaluationResult, NavigationResult};
pub use connection::CdpWebSocketConnection;
pub use client::CdpClientImpl;
pub use browser::CdpBrowser;
pub use mock::{MockCdpClient, MockCdpConnection};
