//! Automation driver traits
//!
//! The step executor only talks to the browser through these two traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::locator::Locator;

/// Lazily evaluated reference to the elements matching a locator.
///
/// Every call re-queries the live document; nothing is cached between calls.
#[async_trait]
pub trait ElementHandle: Send + Sync + std::fmt::Debug {
    /// Locator this handle queries
    fn locator(&self) -> &Locator;

    /// At least one matching element exists in the DOM
    async fn is_present(&self) -> Result<bool, crate::Error>;

    /// The first match is present, visible, enabled and not obscured
    async fn is_clickable(&self) -> Result<bool, crate::Error>;

    /// Click the first match
    async fn click(&self) -> Result<(), crate::Error>;

    /// Send keystrokes to the first match
    async fn send_keys(&self, text: &str) -> Result<(), crate::Error>;

    /// Visible text of the first match
    async fn text(&self) -> Result<String, crate::Error>;
}

/// Browser session driving a single page
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Navigate to URL
    async fn navigate(&self, url: &str) -> Result<(), crate::Error>;

    /// Reload the current page
    async fn refresh(&self) -> Result<(), crate::Error>;

    /// Current document URL
    async fn current_url(&self) -> Result<String, crate::Error>;

    /// Current document title
    async fn title(&self) -> Result<String, crate::Error>;

    /// Build a handle for `locator`; performs no browser call
    fn find(&self, locator: &Locator) -> Arc<dyn ElementHandle>;

    /// Move the pointer onto the element and click it
    async fn move_and_click(&self, element: &dyn ElementHandle) -> Result<(), crate::Error>;
}
