//! Parsed step representation

use std::fmt;

/// `(page, element)` key into the page-object table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub page: String,
    pub element: String,
}

impl PageElement {
    pub fn new<P: Into<String>, E: Into<String>>(page: P, element: E) -> Self {
        Self {
            page: page.into(),
            element: element.into(),
        }
    }
}

impl fmt::Display for PageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.page, self.element)
    }
}

/// Text given inline or looked up from another page-object entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Literal(String),
    PageObject(PageElement),
}

/// Every step the registry knows, with its extracted arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    GoToUrl { url: String },
    GoToPageObject { target: PageElement },
    Reload,
    Click { target: PageElement },
    DeferredClick { target: PageElement },
    ClickIfPresent { target: PageElement },
    WaitFor { duration_ms: u64 },
    WaitForPresent { target: PageElement },
    Type { text: TextSource, target: PageElement },
    TitleEquals { expected: String },
    Present { target: PageElement },
    NotPresent { target: PageElement },
    TextEquals { target: PageElement, expected: TextSource },
    TextContains { target: PageElement, expected: TextSource },
    UrlEquals { expected: String },
    UrlMatches { pattern: String },
    UrlContains { expected: String },
    FileEmpty { path: String },
}

impl StepKind {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            StepKind::GoToUrl { .. } => "go_to_url",
            StepKind::GoToPageObject { .. } => "go_to_page_object",
            StepKind::Reload => "reload",
            StepKind::Click { .. } => "click",
            StepKind::DeferredClick { .. } => "deferred_click",
            StepKind::ClickIfPresent { .. } => "click_if_present",
            StepKind::WaitFor { .. } => "wait_for",
            StepKind::WaitForPresent { .. } => "wait_for_present",
            StepKind::Type { .. } => "type",
            StepKind::TitleEquals { .. } => "title_equals",
            StepKind::Present { .. } => "present",
            StepKind::NotPresent { .. } => "not_present",
            StepKind::TextEquals { .. } => "text_equals",
            StepKind::TextContains { .. } => "text_contains",
            StepKind::UrlEquals { .. } => "url_equals",
            StepKind::UrlMatches { .. } => "url_matches",
            StepKind::UrlContains { .. } => "url_contains",
            StepKind::FileEmpty { .. } => "file_empty",
        }
    }
}

/// A sentence matched against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Sentence with any Gherkin keyword stripped
    pub sentence: String,
    pub kind: StepKind,
    /// Wait budget declared by the matching definition
    pub timeout_override_ms: Option<u64>,
}
