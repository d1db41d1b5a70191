//! Inline insert-tag substitution.
//!
//! Markers look like `{{name}}`, `{{name::argument}}` or `{{name::argument|flag}}`.
//! A marker is looked up by its full inner text first, then by its name.
//! Unknown markers are left in place.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::debug;

/// Insert-tag expansion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertTagError {
    #[error("unclosed insert tag at byte {offset}")]
    Unclosed { offset: usize },

    #[error("nested insert tag at byte {offset}")]
    Nested { offset: usize },
}

/// Replaces embedded substitution markers in a text.
pub trait TextSubstitution: Send + Sync {
    fn replace_inline(&self, text: &str) -> Result<String, InsertTagError>;
}

/// `{{` ... `}}` with no braces in between.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap());

/// Map-backed insert-tag parser.
#[derive(Debug, Clone, Default)]
pub struct InsertTagParser {
    tags: FxHashMap<String, String>,
}

impl InsertTagParser {
    pub fn new(tags: FxHashMap<String, String>) -> Self {
        Self { tags }
    }

    /// Register a tag value (builder style).
    pub fn with_tag(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(tag.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Look up the replacement for a marker's inner text.
    fn lookup(&self, inner: &str) -> Option<&str> {
        let inner = inner.trim();
        if let Some(value) = self.tags.get(inner) {
            return Some(value);
        }
        let name = inner
            .split(['|', ':'])
            .next()
            .unwrap_or(inner)
            .trim_end();
        self.tags.get(name).map(String::as_str)
    }

    /// Reject markers that never close or open inside another marker.
    fn check_balanced(text: &str) -> Result<(), InsertTagError> {
        let mut open: Option<usize> = None;
        let mut i = 0;
        let bytes = text.as_bytes();
        while i + 1 < bytes.len() {
            match (bytes[i], bytes[i + 1], open) {
                (b'{', b'{', Some(_)) => return Err(InsertTagError::Nested { offset: i }),
                (b'{', b'{', None) => {
                    open = Some(i);
                    i += 2;
                }
                (b'}', b'}', Some(_)) => {
                    open = None;
                    i += 2;
                }
                _ => i += 1,
            }
        }
        match open {
            Some(offset) => Err(InsertTagError::Unclosed { offset }),
            None => Ok(()),
        }
    }
}

impl TextSubstitution for InsertTagParser {
    fn replace_inline(&self, text: &str) -> Result<String, InsertTagError> {
        if !text.contains("{{") {
            return Ok(text.to_string());
        }

        Self::check_balanced(text)?;

        let replaced = TAG.replace_all(text, |caps: &regex::Captures<'_>| {
            let inner = &caps[1];
            match self.lookup(inner) {
                Some(value) => value.to_string(),
                None => {
                    debug!("insert-tag"; "unknown tag {{{{{}}}}} left as is", inner);
                    caps[0].to_string()
                }
            }
        });

        Ok(replaced.into_owned())
    }
}
