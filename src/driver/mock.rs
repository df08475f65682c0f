//! In-memory driver for tests
//!
//! Elements are keyed by their raw selector string. Every side-effecting
//! call is recorded as a [`MockAction`] and every driver/handle call bumps a
//! counter, so tests can assert both what happened and that nothing did.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use super::traits::{Driver, ElementHandle};
use crate::locator::Locator;
use crate::Error;

/// Side effect observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    Navigate(String),
    Refresh,
    Click(String),
    MoveAndClick(String),
    SendKeys(String, String),
}

/// Fake DOM element
#[derive(Debug, Clone)]
pub struct MockElement {
    pub text: String,
    pub visible: bool,
    pub enabled: bool,
    /// Element is absent until this much time has passed since it was added
    pub appears_after: Option<Duration>,
    /// Element is not clickable until this much time has passed since it was added
    pub clickable_after: Option<Duration>,
}

impl MockElement {
    /// Visible, enabled element showing `text`
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            visible: true,
            enabled: true,
            appears_after: None,
            clickable_after: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn appearing_after(mut self, delay: Duration) -> Self {
        self.appears_after = Some(delay);
        self
    }

    pub fn clickable_after(mut self, delay: Duration) -> Self {
        self.clickable_after = Some(delay);
        self
    }
}

#[derive(Debug)]
struct Node {
    element: MockElement,
    added_at: Instant,
    typed: String,
}

impl Node {
    fn present(&self) -> bool {
        self.element
            .appears_after
            .map_or(true, |delay| self.added_at.elapsed() >= delay)
    }

    fn clickable(&self) -> bool {
        let ready = self
            .element
            .clickable_after
            .map_or(true, |delay| self.added_at.elapsed() >= delay);
        self.present() && self.element.visible && self.element.enabled && ready
    }
}

#[derive(Debug)]
struct PageState {
    url: String,
    title: String,
    nodes: HashMap<String, Node>,
    actions: Vec<MockAction>,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<PageState>,
    calls: AtomicUsize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Mock driver
#[derive(Debug, Clone)]
pub struct MockDriver {
    shared: Arc<Shared>,
}

impl MockDriver {
    /// Blank page at `about:blank`
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(PageState {
                    url: "about:blank".to_string(),
                    title: String::new(),
                    nodes: HashMap::new(),
                    actions: Vec::new(),
                }),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Set the current URL without recording a navigation
    pub fn set_url<S: Into<String>>(&self, url: S) {
        self.state().url = url.into();
    }

    /// Set the document title
    pub fn set_title<S: Into<String>>(&self, title: S) {
        self.state().title = title.into();
    }

    /// Add or replace the element matched by `selector`
    pub fn add_element<S: Into<String>>(&self, selector: S, element: MockElement) {
        self.state().nodes.insert(
            selector.into(),
            Node {
                element,
                added_at: Instant::now(),
                typed: String::new(),
            },
        );
    }

    /// Remove the element matched by `selector`
    pub fn remove_element(&self, selector: &str) {
        self.state().nodes.remove(selector);
    }

    /// Recorded side effects
    pub fn actions(&self) -> Vec<MockAction> {
        self.state().actions.clone()
    }

    /// Keystrokes received by the element matched by `selector`
    pub fn typed_text(&self, selector: &str) -> Option<String> {
        self.state().nodes.get(selector).map(|node| node.typed.clone())
    }

    /// Number of driver and handle calls made so far
    pub fn call_count(&self) -> usize {
        self.shared.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn no_match(locator: &Locator) -> Error {
    Error::script_execution_failed(format!("No element matches {}", locator))
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&self, url: &str) -> Result<(), Error> {
        let mut state = self.shared.lock();
        state.url = url.to_string();
        state.actions.push(MockAction::Navigate(url.to_string()));
        Ok(())
    }

    async fn refresh(&self) -> Result<(), Error> {
        self.shared.lock().actions.push(MockAction::Refresh);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, Error> {
        Ok(self.shared.lock().url.clone())
    }

    async fn title(&self) -> Result<String, Error> {
        Ok(self.shared.lock().title.clone())
    }

    fn find(&self, locator: &Locator) -> Arc<dyn ElementHandle> {
        self.shared.calls.fetch_add(1, Ordering::SeqCst);
        Arc::new(MockHandle {
            locator: locator.clone(),
            shared: Arc::clone(&self.shared),
        })
    }

    async fn move_and_click(&self, element: &dyn ElementHandle) -> Result<(), Error> {
        let locator = element.locator();
        let mut guard = self.shared.lock();
        let state = &mut *guard;
        if !state.nodes.get(&locator.value).is_some_and(Node::present) {
            return Err(no_match(locator));
        }
        state.actions.push(MockAction::MoveAndClick(locator.value.clone()));
        Ok(())
    }
}

/// Handle into the mock page
#[derive(Debug)]
pub struct MockHandle {
    locator: Locator,
    shared: Arc<Shared>,
}

#[async_trait]
impl ElementHandle for MockHandle {
    fn locator(&self) -> &Locator {
        &self.locator
    }

    async fn is_present(&self) -> Result<bool, Error> {
        let state = self.shared.lock();
        Ok(state.nodes.get(&self.locator.value).is_some_and(Node::present))
    }

    async fn is_clickable(&self) -> Result<bool, Error> {
        let state = self.shared.lock();
        Ok(state.nodes.get(&self.locator.value).is_some_and(Node::clickable))
    }

    async fn click(&self) -> Result<(), Error> {
        let mut guard = self.shared.lock();
        let state = &mut *guard;
        if !state.nodes.get(&self.locator.value).is_some_and(Node::present) {
            return Err(no_match(&self.locator));
        }
        state.actions.push(MockAction::Click(self.locator.value.clone()));
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), Error> {
        let mut guard = self.shared.lock();
        let state = &mut *guard;
        match state.nodes.get_mut(&self.locator.value) {
            Some(node) if node.present() => {
                node.typed.push_str(text);
                state
                    .actions
                    .push(MockAction::SendKeys(self.locator.value.clone(), text.to_string()));
                Ok(())
            }
            _ => Err(no_match(&self.locator)),
        }
    }

    async fn text(&self) -> Result<String, Error> {
        let state = self.shared.lock();
        match state.nodes.get(&self.locator.value) {
            Some(node) if node.present() => Ok(node.element.text.clone()),
            _ => Err(no_match(&self.locator)),
        }
    }
}
