//! JavaScript evaluated by the CDP driver
//!
//! Selector values are embedded as JSON string literals so quotes and
//! backslashes in page-object entries survive intact.

use crate::locator::{Locator, LocatorKind};

/// Expression yielding the first matching element or `null`
pub fn first_match(locator: &Locator) -> String {
    let literal = serde_json::Value::String(locator.value.clone()).to_string();
    match locator.kind {
        LocatorKind::XPath => format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            literal
        ),
        LocatorKind::Css => format!("document.querySelector({})", literal),
    }
}

/// `true` when at least one element matches
pub fn presence(locator: &Locator) -> String {
    format!("(() => {} !== null)()", first_match(locator))
}

/// `true` when the element is displayed, enabled and receives pointer events
/// at its centre
pub fn clickable(locator: &Locator) -> String {
    format!(
        r#"
        (() => {{
            const el = {};
            if (!el) return false;
            const style = window.getComputedStyle(el);
            if (style.display === 'none' || style.visibility === 'hidden') return false;
            if (el.disabled) return false;
            const rect = el.getBoundingClientRect();
            if (rect.width === 0 || rect.height === 0) return false;
            const top = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
            return top === null || top === el || el.contains(top);
        }})()
        "#,
        first_match(locator)
    )
}

/// Rendered text of the element; throws when nothing matches
pub fn text(locator: &Locator) -> String {
    format!(
        r#"
        (() => {{
            const el = {};
            if (!el) throw new Error('No element matches ' + {});
            return el.innerText !== undefined ? el.innerText : el.textContent;
        }})()
        "#,
        first_match(locator),
        serde_json::Value::String(locator.value.clone())
    )
}

/// Scroll the element into view, focus it and return its centre as JSON
pub fn center(locator: &Locator) -> String {
    format!(
        r#"
        (() => {{
            const el = {};
            if (!el) throw new Error('No element matches ' + {});
            el.scrollIntoView({{ block: 'center', inline: 'center' }});
            if (typeof el.focus === 'function') el.focus();
            const rect = el.getBoundingClientRect();
            return JSON.stringify({{ x: rect.left + rect.width / 2, y: rect.top + rect.height / 2 }});
        }})()
        "#,
        first_match(locator),
        serde_json::Value::String(locator.value.clone())
    )
}

/// Current document URL
pub const CURRENT_URL: &str = "window.location.href";

/// Current document title
pub const TITLE: &str = "document.title";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_uses_document_evaluate() {
        let script = presence(&Locator::from_raw("//button[@id='go']"));
        assert!(script.contains("document.evaluate(\"//button[@id='go']\""));
        assert!(!script.contains("querySelector"));
    }

    #[test]
    fn test_css_uses_query_selector() {
        let script = presence(&Locator::from_raw(".banner"));
        assert!(script.contains("document.querySelector(\".banner\")"));
    }

    #[test]
    fn test_selector_quotes_are_escaped() {
        let script = first_match(&Locator::from_raw(r#"input[name="q"]"#));
        assert_eq!(script, r#"document.querySelector("input[name=\"q\"]")"#);
    }

    #[test]
    fn test_text_and_center_throw_on_missing_element() {
        let locator = Locator::from_raw("#missing");
        assert!(text(&locator).contains("throw new Error"));
        assert!(center(&locator).contains("scrollIntoView"));
    }
}
