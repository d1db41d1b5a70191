//! Content URL resolution.
//!
//! # Module Structure
//!
//! ```text
//! routing/
//! ├── content   # ContentReference variants, ContentUrlResult
//! ├── string    # StringResolver (insert-tags + absolute url)
//! ├── page      # PageResolver, ArticleResolver
//! └── mod.rs    # ContentUrlResolver trait, ResolverRegistry (this file)
//! ```
//!
//! A registry asks its resolvers in registration order. The first one that
//! returns a result wins; a reference nobody claims is unresolved, which is
//! not an error.

mod content;
mod page;
mod string;

pub use content::{ArticleReference, ContentReference, ContentUrlResult, PageReference, StringUrl};
pub use page::{ArticleResolver, PageResolver};
pub use string::StringResolver;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::{AbsoluteUrl, UrlError};
use crate::debug;
use crate::insert_tag::{InsertTagError, TextSubstitution};

/// Errors raised by the collaborators a resolver delegates to.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("insert tag expansion failed")]
    InsertTag(#[from] InsertTagError),

    #[error("url normalization failed")]
    Url(#[from] UrlError),
}

/// A strategy that recognizes one kind of content reference.
pub trait ContentUrlResolver: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Check if this resolver handles the reference.
    fn supports(&self, content: &ContentReference) -> bool;

    /// Resolve the reference, or `Ok(None)` if it is not handled here.
    fn resolve(&self, content: &ContentReference) -> Result<Option<ContentUrlResult>, ResolveError>;

    /// Routing parameters to add when `content` is rendered on `page`.
    fn parameters_for(
        &self,
        _content: &ContentReference,
        _page: &PageReference,
    ) -> FxHashMap<String, String> {
        FxHashMap::default()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered set of resolvers, fixed once built.
#[derive(Default)]
pub struct ResolverRegistry {
    resolvers: Vec<Box<dyn ContentUrlResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the string, page and article resolvers, in that order.
    pub fn with_defaults(
        insert_tags: Arc<dyn TextSubstitution>,
        urls: Arc<dyn AbsoluteUrl>,
        url_suffix: &str,
    ) -> Self {
        Self::new()
            .register(StringResolver::new(insert_tags, Arc::clone(&urls)))
            .register(PageResolver::new(Arc::clone(&urls), url_suffix))
            .register(ArticleResolver::new(urls, url_suffix))
    }

    /// Append a resolver. Earlier registrations take precedence.
    pub fn register(mut self, resolver: impl ContentUrlResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Resolver names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resolvers.iter().map(|resolver| resolver.name())
    }

    /// Resolve with the first resolver that returns a result.
    pub fn resolve(
        &self,
        content: &ContentReference,
    ) -> Result<Option<ContentUrlResult>, ResolveError> {
        for resolver in &self.resolvers {
            if let Some(result) = resolver.resolve(content)? {
                debug!("resolve"; "{} reference resolved by {}", content.kind(), resolver.name());
                return Ok(Some(result));
            }
        }
        debug!("resolve"; "no resolver for {} reference", content.kind());
        Ok(None)
    }

    /// Routing parameters from the first resolver supporting `content`.
    pub fn parameters_for(
        &self,
        content: &ContentReference,
        page: &PageReference,
    ) -> FxHashMap<String, String> {
        self.resolvers
            .iter()
            .find(|resolver| resolver.supports(content))
            .map(|resolver| resolver.parameters_for(content, page))
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UrlHelper;
    use crate::insert_tag::InsertTagParser;

    /// Claims every reference and answers with a fixed URL.
    struct Fixed(&'static str, &'static str);

    impl ContentUrlResolver for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn supports(&self, _content: &ContentReference) -> bool {
            true
        }

        fn resolve(
            &self,
            _content: &ContentReference,
        ) -> Result<Option<ContentUrlResult>, ResolveError> {
            Ok(Some(ContentUrlResult::new(self.1)))
        }

        fn parameters_for(
            &self,
            _content: &ContentReference,
            _page: &PageReference,
        ) -> FxHashMap<String, String> {
            FxHashMap::from_iter([("by".to_string(), self.0.to_string())])
        }
    }

    fn defaults() -> ResolverRegistry {
        let tags = InsertTagParser::default().with_tag("link_url::12", "/contact");
        let urls = UrlHelper::for_request("https://example.com/", "").unwrap();
        ResolverRegistry::with_defaults(Arc::new(tags), Arc::new(urls), ".html")
    }

    #[test]
    fn test_first_match_wins() {
        let registry = ResolverRegistry::new()
            .register(Fixed("first", "https://a.test/"))
            .register(Fixed("second", "https://b.test/"));
        let content = ContentReference::from(StringUrl::new("/x"));

        for _ in 0..3 {
            let result = registry.resolve(&content).unwrap().unwrap();
            assert_eq!(result.url, "https://a.test/");
        }
        assert_eq!(
            registry.parameters_for(&content, &PageReference::new(1, "index"))["by"],
            "first"
        );
    }

    #[test]
    fn test_empty_registry_is_unresolved() {
        let registry = ResolverRegistry::new();
        assert!(registry.is_empty());
        let content = ContentReference::from(StringUrl::new("/x"));
        assert!(registry.resolve(&content).unwrap().is_none());
        assert!(
            registry
                .parameters_for(&content, &PageReference::new(1, "index"))
                .is_empty()
        );
    }

    #[test]
    fn test_defaults_order() {
        let registry = defaults();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["string", "page", "article"]
        );
        assert_eq!(format!("{registry:?}"), r#"["string", "page", "article"]"#);
    }

    #[test]
    fn test_defaults_dispatch_by_variant() {
        let registry = defaults();

        let string = ContentReference::from(StringUrl::new("{{link_url::12}}"));
        assert_eq!(
            registry.resolve(&string).unwrap().unwrap().url,
            "https://example.com/contact"
        );

        let page = ContentReference::from(PageReference::new(3, "about"));
        assert_eq!(
            registry.resolve(&page).unwrap().unwrap().url,
            "https://example.com/about.html"
        );

        let article = ContentReference::from(ArticleReference::new(
            9,
            Some("team".into()),
            PageReference::new(3, "about"),
        ));
        let result = registry.resolve(&article).unwrap().unwrap();
        assert_eq!(result.url, "https://example.com/about/articles/team.html");
        assert_eq!(result.parameters["parameters"], "/articles/team");
    }

    #[test]
    fn test_defaults_parameters_for() {
        let registry = defaults();
        let page = PageReference::new(3, "about");

        let string = ContentReference::from(StringUrl::new("/x"));
        assert!(registry.parameters_for(&string, &page).is_empty());

        let article =
            ContentReference::from(ArticleReference::new(9, None, PageReference::new(3, "about")));
        assert_eq!(
            registry.parameters_for(&article, &page)["parameters"],
            "/articles/9"
        );
    }

    #[test]
    fn test_collaborator_errors_propagate() {
        let registry = defaults();
        let broken = ContentReference::from(StringUrl::new("{{link_url::12"));
        assert!(matches!(
            registry.resolve(&broken),
            Err(ResolveError::InsertTag(InsertTagError::Unclosed { .. }))
        ));
    }
}
