//! Content references and resolution results.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// A literal URL, possibly containing insert-tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringUrl {
    pub value: String,
}

impl StringUrl {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// A page of the site tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReference {
    pub id: u32,
    /// URL alias without leading slash (`news/archive`). `index` is the root page.
    pub alias: String,
}

impl PageReference {
    pub fn new(id: u32, alias: impl Into<String>) -> Self {
        Self {
            id,
            alias: alias.into(),
        }
    }

    /// Check if this page is rendered at `/`.
    pub fn is_root(&self) -> bool {
        matches!(self.alias.trim_matches('/'), "" | "index")
    }
}

/// An article rendered on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleReference {
    pub id: u32,
    pub alias: Option<String>,
    pub page: PageReference,
}

impl ArticleReference {
    pub fn new(id: u32, alias: Option<String>, page: PageReference) -> Self {
        Self { id, alias, page }
    }

    /// Alias if set, id otherwise.
    pub fn slug(&self) -> String {
        match self.alias.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => self.id.to_string(),
        }
    }
}

/// Everything a URL can be generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentReference {
    String(StringUrl),
    Page(PageReference),
    Article(ArticleReference),
}

impl ContentReference {
    /// Short variant name, for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Page(_) => "page",
            Self::Article(_) => "article",
        }
    }
}

impl From<StringUrl> for ContentReference {
    fn from(value: StringUrl) -> Self {
        Self::String(value)
    }
}

impl From<PageReference> for ContentReference {
    fn from(value: PageReference) -> Self {
        Self::Page(value)
    }
}

impl From<ArticleReference> for ContentReference {
    fn from(value: ArticleReference) -> Self {
        Self::Article(value)
    }
}

/// A resolved absolute URL plus the routing parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentUrlResult {
    pub url: String,
    pub parameters: FxHashMap<String, String>,
}

impl ContentUrlResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            parameters: FxHashMap::default(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(ContentReference::from(StringUrl::new("/a")).kind(), "string");
        assert_eq!(
            ContentReference::from(PageReference::new(1, "index")).kind(),
            "page"
        );
    }

    #[test]
    fn test_page_is_root() {
        assert!(PageReference::new(1, "index").is_root());
        assert!(PageReference::new(1, "").is_root());
        assert!(!PageReference::new(2, "about").is_root());
    }

    #[test]
    fn test_article_slug() {
        let page = PageReference::new(1, "news");
        assert_eq!(
            ArticleReference::new(7, Some("team".into()), page.clone()).slug(),
            "team"
        );
        assert_eq!(ArticleReference::new(7, Some("  ".into()), page.clone()).slug(), "7");
        assert_eq!(ArticleReference::new(7, None, page).slug(), "7");
    }

    #[test]
    fn test_serialize_reference() {
        let json = serde_json::to_string(&ContentReference::from(StringUrl::new("/a"))).unwrap();
        assert_eq!(json, r#"{"type":"string","value":"/a"}"#);
    }
}
