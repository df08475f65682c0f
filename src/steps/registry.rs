//! Step Registry: sentence patterns and their argument builders
//!
//! Templates are regular expressions with `{name}` placeholders. Each
//! placeholder expands to a quoted argument that accepts either `"..."` or
//! `'...'`, so `I go to "Login"."url"` and `I go to 'Login'.'url'` match the
//! same definition.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

use super::kind::{PageElement, Step, StepKind, TextSource};
use crate::config::MAX_EXPLICIT_WAIT_MS;
use crate::{Error, Result};

/// Builds a [`StepKind`] from the captured arguments
pub type StepBuilder = fn(&Args<'_>) -> Result<StepKind>;

/// One registered sentence pattern
pub struct StepDefinition {
    name: &'static str,
    pattern: Regex,
    argument_count: usize,
    timeout_override_ms: Option<u64>,
    build: StepBuilder,
}

impl StepDefinition {
    /// Compile `template` into an anchored pattern
    pub fn new(
        name: &'static str,
        template: &str,
        timeout_override_ms: Option<u64>,
        build: StepBuilder,
    ) -> Result<Self> {
        let pattern = Regex::new(&format!("^{}$", expand(template)))
            .map_err(|e| Error::internal(format!("Invalid step pattern for {}: {}", name, e)))?;

        // Quoted placeholders produce two groups; count each argument once.
        let argument_count = pattern
            .capture_names()
            .flatten()
            .filter(|name| !name.ends_with("_sq"))
            .count();

        Ok(Self {
            name,
            pattern,
            argument_count,
            timeout_override_ms,
            build,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn argument_count(&self) -> usize {
        self.argument_count
    }

    pub fn timeout_override_ms(&self) -> Option<u64> {
        self.timeout_override_ms
    }

    pub fn is_match(&self, sentence: &str) -> bool {
        self.pattern.is_match(sentence)
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("argument_count", &self.argument_count)
            .field("timeout_override_ms", &self.timeout_override_ms)
            .finish()
    }
}

/// Captured arguments of a matched sentence
pub struct Args<'s> {
    captures: Captures<'s>,
}

impl<'s> Args<'s> {
    /// Raw value of argument `name`, whichever quote style was used
    pub fn get(&self, name: &str) -> Option<&'s str> {
        self.captures
            .name(name)
            .or_else(|| self.captures.name(&format!("{}_dq", name)))
            .or_else(|| self.captures.name(&format!("{}_sq", name)))
            .map(|m| m.as_str())
    }

    /// Owned value of a required argument
    pub fn string(&self, name: &str) -> Result<String> {
        self.get(name)
            .map(str::to_string)
            .ok_or_else(|| Error::internal(format!("Missing step argument: {}", name)))
    }

    /// `(page, element)` pair from two arguments
    pub fn pair(&self, page: &str, element: &str) -> Result<PageElement> {
        Ok(PageElement::new(self.string(page)?, self.string(element)?))
    }
}

/// Ordered catalogue of step definitions; the first match wins
#[derive(Debug, Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the full sentence catalogue
    pub fn standard() -> Result<Self> {
        let mut registry = Self::new();

        // When
        registry.register("go_to_url", r"I go to URL {url}", None, |args| {
            Ok(StepKind::GoToUrl { url: args.string("url")? })
        })?;
        registry.register("go_to_page_object", r"I go to {page}\.{element}", None, |args| {
            Ok(StepKind::GoToPageObject { target: args.pair("page", "element")? })
        })?;
        registry.register("reload", r"I reload the page", None, |_| Ok(StepKind::Reload))?;
        registry.register("click", r"I click {page}\.{element}", None, |args| {
            Ok(StepKind::Click { target: args.pair("page", "element")? })
        })?;
        registry.register("deferred_click", r"I wait and click {page}\.{element}", None, |args| {
            Ok(StepKind::DeferredClick { target: args.pair("page", "element")? })
        })?;
        registry.register(
            "click_if_present",
            r"I click {page}\.{element} if present",
            None,
            |args| Ok(StepKind::ClickIfPresent { target: args.pair("page", "element")? }),
        )?;
        registry.register(
            "wait_for",
            r"I wait for (?P<ms>\d+) ms",
            Some(MAX_EXPLICIT_WAIT_MS),
            build_wait_for,
        )?;
        registry.register(
            "wait_for_present",
            r"I wait for {page}\.{element} to be present",
            None,
            |args| Ok(StepKind::WaitForPresent { target: args.pair("page", "element")? }),
        )?;
        registry.register("type", r"I type {text} in the {page}\.{element}", None, |args| {
            Ok(StepKind::Type {
                text: TextSource::Literal(args.string("text")?),
                target: args.pair("page", "element")?,
            })
        })?;
        registry.register(
            "type_page_object",
            r"I type {page2}\.{element2} in the {page}\.{element}",
            None,
            |args| {
                Ok(StepKind::Type {
                    text: TextSource::PageObject(args.pair("page2", "element2")?),
                    target: args.pair("page", "element")?,
                })
            },
        )?;

        // Then
        registry.register("title_equals", r"the title should be {text}", None, |args| {
            Ok(StepKind::TitleEquals { expected: args.string("text")? })
        })?;
        registry.register("present", r"{page}\.{element} should be present", None, |args| {
            Ok(StepKind::Present { target: args.pair("page", "element")? })
        })?;
        registry.register(
            "not_present",
            r"{page}\.{element} should not be present",
            None,
            |args| Ok(StepKind::NotPresent { target: args.pair("page", "element")? }),
        )?;
        registry.register(
            "text_equals",
            r"{page}\.{element} text should be {text}",
            None,
            |args| {
                Ok(StepKind::TextEquals {
                    target: args.pair("page", "element")?,
                    expected: TextSource::Literal(args.string("text")?),
                })
            },
        )?;
        registry.register(
            "text_equals_page_object",
            r"{page}\.{element} text should be {page2}\.{element2}",
            None,
            |args| {
                Ok(StepKind::TextEquals {
                    target: args.pair("page", "element")?,
                    expected: TextSource::PageObject(args.pair("page2", "element2")?),
                })
            },
        )?;
        registry.register(
            "text_contains",
            r"{page}\.{element} text should contain {text}",
            None,
            |args| {
                Ok(StepKind::TextContains {
                    target: args.pair("page", "element")?,
                    expected: TextSource::Literal(args.string("text")?),
                })
            },
        )?;
        registry.register(
            "text_contains_page_object",
            r"{page}\.{element} text should contain {page2}\.{element2}",
            None,
            |args| {
                Ok(StepKind::TextContains {
                    target: args.pair("page", "element")?,
                    expected: TextSource::PageObject(args.pair("page2", "element2")?),
                })
            },
        )?;
        registry.register("url_equals", r"URL should be {url}", None, |args| {
            Ok(StepKind::UrlEquals { expected: args.string("url")? })
        })?;
        registry.register("url_matches", r"URL should match /(?P<regexp>.*)/", None, |args| {
            let pattern = args.string("regexp")?;
            Regex::new(&pattern)
                .map_err(|e| Error::invalid_argument(format!("Invalid regexp /{}/: {}", pattern, e)))?;
            Ok(StepKind::UrlMatches { pattern })
        })?;
        registry.register("url_contains", r"URL should contain {text}", None, |args| {
            Ok(StepKind::UrlContains { expected: args.string("text")? })
        })?;
        registry.register("file_empty", r"the file {path} is empty", None, |args| {
            Ok(StepKind::FileEmpty { path: args.string("path")? })
        })?;

        debug!("Registered {} step definitions", registry.len());
        Ok(registry)
    }

    /// Append a definition; earlier definitions take precedence
    pub fn register(
        &mut self,
        name: &'static str,
        template: &str,
        timeout_override_ms: Option<u64>,
        build: StepBuilder,
    ) -> Result<()> {
        self.definitions
            .push(StepDefinition::new(name, template, timeout_override_ms, build)?);
        Ok(())
    }

    /// Match `sentence` and extract its arguments
    pub fn parse(&self, sentence: &str) -> Result<Step> {
        let sentence = strip_keyword(sentence.trim());

        for definition in &self.definitions {
            if let Some(captures) = definition.pattern.captures(sentence) {
                let kind = (definition.build)(&Args { captures })?;
                debug!("Matched {:?} as {}", sentence, definition.name);
                return Ok(Step {
                    sentence: sentence.to_string(),
                    kind,
                    timeout_override_ms: definition.timeout_override_ms,
                });
            }
        }

        Err(Error::undefined_step(sentence))
    }

    /// All definitions matching `sentence`, in registration order
    pub fn matching(&self, sentence: &str) -> Vec<&StepDefinition> {
        let sentence = strip_keyword(sentence.trim());
        self.definitions
            .iter()
            .filter(|definition| definition.is_match(sentence))
            .collect()
    }

    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn build_wait_for(args: &Args<'_>) -> Result<StepKind> {
    let raw = args.string("ms")?;
    let duration_ms: u64 = raw
        .parse()
        .map_err(|_| Error::invalid_argument(format!("Wait duration out of range: {}", raw)))?;

    if duration_ms > MAX_EXPLICIT_WAIT_MS {
        return Err(Error::invalid_argument(format!(
            "Wait of {}ms exceeds the {}ms maximum",
            duration_ms, MAX_EXPLICIT_WAIT_MS
        )));
    }

    Ok(StepKind::WaitFor { duration_ms })
}

/// Replace each `{name}` with a quoted capture accepting either quote style
fn expand(template: &str) -> String {
    static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();

    match PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z0-9]+)\}").ok()) {
        Some(placeholder) => placeholder
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                format!(
                    r#"(?:"(?P<{name}_dq>[^"]*)"|'(?P<{name}_sq>[^']*)')"#,
                    name = name
                )
            })
            .into_owned(),
        None => template.to_string(),
    }
}

fn strip_keyword(sentence: &str) -> &str {
    for keyword in ["Given", "When", "Then", "And", "But", "*"] {
        if let Some(rest) = sentence.strip_prefix(keyword) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    sentence
}
