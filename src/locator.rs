//! Page-object table and locator resolution
//!
//! A page-object table maps page names to element names to raw locator
//! strings. A raw string is either a selector or a URL; only selectors are
//! turned into [`Locator`]s.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// Selector language of a locator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    XPath,
    Css,
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorKind::XPath => write!(f, "xpath"),
            LocatorKind::Css => write!(f, "css"),
        }
    }
}

/// Resolved, typed selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub kind: LocatorKind,
    pub value: String,
}

impl Locator {
    /// Classify a raw selector string.
    ///
    /// A leading `//` means XPath, anything else is CSS. The remainder is not
    /// validated; malformed selectors fail later at query time.
    pub fn from_raw<S: Into<String>>(raw: S) -> Self {
        let value = raw.into();
        let kind = if value.starts_with("//") {
            LocatorKind::XPath
        } else {
            LocatorKind::Css
        };
        Self { kind, value }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Page-object table: page -> element -> raw locator or URL
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PageObjects {
    pages: HashMap<String, HashMap<String, String>>,
}

impl PageObjects {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any previous value
    pub fn with<P, E, R>(mut self, page: P, element: E, raw: R) -> Self
    where
        P: Into<String>,
        E: Into<String>,
        R: Into<String>,
    {
        self.pages
            .entry(page.into())
            .or_default()
            .insert(element.into(), raw.into());
        self
    }

    /// Parse a table from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a table from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse page objects: {}", e)))
    }

    /// Load a table from a file; `.toml` files are TOML, everything else JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Raw string stored for `page.element`
    pub fn raw(&self, page: &str, element: &str) -> Result<&str> {
        self.pages
            .get(page)
            .and_then(|elements| elements.get(element))
            .map(String::as_str)
            .ok_or_else(|| Error::not_found(page, element))
    }

    /// Resolve `page.element` into a typed locator
    pub fn resolve(&self, page: &str, element: &str) -> Result<Locator> {
        let locator = Locator::from_raw(self.raw(page, element)?);
        debug!("Resolved {}.{} -> {} {}", page, element, locator.kind, locator.value);
        Ok(locator)
    }

    /// Number of pages in the table
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl From<HashMap<String, HashMap<String, String>>> for PageObjects {
    fn from(pages: HashMap<String, HashMap<String, String>>) -> Self {
        Self { pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PageObjects {
        PageObjects::new()
            .with("Login", "url", "https://x/login")
            .with("Login", "submit", "//button[@id='go']")
            .with("Home", "banner", ".banner")
    }

    #[test]
    fn test_xpath_prefix() {
        let locator = table().resolve("Login", "submit").unwrap();
        assert_eq!(locator.kind, LocatorKind::XPath);
        assert_eq!(locator.value, "//button[@id='go']");
    }

    #[test]
    fn test_everything_else_is_css() {
        assert_eq!(table().resolve("Home", "banner").unwrap().kind, LocatorKind::Css);

        for raw in ["/html/body", "(//div)[1]", "", "/", " //div", "#id"] {
            assert_eq!(Locator::from_raw(raw).kind, LocatorKind::Css, "raw={:?}", raw);
        }
        assert_eq!(Locator::from_raw("//").kind, LocatorKind::XPath);
    }

    #[test]
    fn test_missing_page_and_element() {
        let table = table();
        assert!(matches!(table.resolve("Nope", "url"), Err(Error::NotFound(_))));
        assert!(matches!(table.resolve("Login", "nope"), Err(Error::NotFound(_))));
        assert!(matches!(table.raw("", ""), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_raw_returns_urls_untouched() {
        assert_eq!(table().raw("Login", "url").unwrap(), "https://x/login");
    }

    #[test]
    fn test_from_json() {
        let table = PageObjects::from_json_str(
            r#"{"Home": {"banner": ".banner", "logo": "//img"}}"#,
        )
        .unwrap();
        assert_eq!(table.page_count(), 1);
        assert_eq!(table.resolve("Home", "logo").unwrap().kind, LocatorKind::XPath);
    }

    #[test]
    fn test_from_toml() {
        let table = PageObjects::from_toml_str(
            r#"
            [Login]
            url = "https://x/login"
            submit = "//button[@id='go']"
            "#,
        )
        .unwrap();
        assert_eq!(table.raw("Login", "url").unwrap(), "https://x/login");
    }

    #[test]
    fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("pages.json");
        std::fs::write(&json_path, r##"{"A": {"b": "#b"}}"##).unwrap();
        let toml_path = dir.path().join("pages.toml");
        std::fs::write(&toml_path, "[A]\nb = \"//b\"\n").unwrap();

        let json = PageObjects::from_file(&json_path).unwrap();
        let toml = PageObjects::from_file(&toml_path).unwrap();
        assert_eq!(json.resolve("A", "b").unwrap().kind, LocatorKind::Css);
        assert_eq!(toml.resolve("A", "b").unwrap().kind, LocatorKind::XPath);
    }
}
