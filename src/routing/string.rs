//! Resolver for literal string URLs.

use std::sync::Arc;

use super::{ContentReference, ContentUrlResolver, ContentUrlResult, ResolveError};
use crate::core::AbsoluteUrl;
use crate::insert_tag::TextSubstitution;

/// Expands insert-tags in a [`StringUrl`](super::StringUrl) and makes it absolute.
pub struct StringResolver {
    insert_tags: Arc<dyn TextSubstitution>,
    urls: Arc<dyn AbsoluteUrl>,
}

impl StringResolver {
    pub fn new(insert_tags: Arc<dyn TextSubstitution>, urls: Arc<dyn AbsoluteUrl>) -> Self {
        Self { insert_tags, urls }
    }
}

impl ContentUrlResolver for StringResolver {
    fn name(&self) -> &'static str {
        "string"
    }

    fn supports(&self, content: &ContentReference) -> bool {
        matches!(content, ContentReference::String(_))
    }

    fn resolve(
        &self,
        content: &ContentReference,
    ) -> Result<Option<ContentUrlResult>, ResolveError> {
        let ContentReference::String(content) = content else {
            return Ok(None);
        };

        let url = self.insert_tags.replace_inline(&content.value)?;
        let url = self.urls.absolute_url(&url)?;

        Ok(Some(ContentUrlResult::new(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UrlHelper;
    use crate::insert_tag::InsertTagParser;
    use crate::routing::{ArticleReference, PageReference, StringUrl};

    fn resolver() -> StringResolver {
        let tags = InsertTagParser::default()
            .with_tag("link_url::5", "/contact")
            .with_tag("env::url", "https://example.com");
        let urls = UrlHelper::for_request("https://example.com", "").unwrap();
        StringResolver::new(Arc::new(tags), Arc::new(urls))
    }

    fn resolve(value: &str) -> String {
        resolver()
            .resolve(&StringUrl::new(value).into())
            .unwrap()
            .unwrap()
            .url
    }

    #[test]
    fn test_other_variants_not_applicable() {
        let resolver = resolver();
        let page = PageReference::new(1, "about");
        let article = ArticleReference::new(2, None, page.clone());

        for content in [ContentReference::from(page), ContentReference::from(article)] {
            assert!(!resolver.supports(&content));
            assert!(resolver.resolve(&content).unwrap().is_none());
        }
    }

    #[test]
    fn test_literal_value() {
        assert_eq!(resolve("/about"), "https://example.com/about");
    }

    #[test]
    fn test_insert_tag_same_as_literal() {
        assert_eq!(resolve("{{link_url::5}}"), resolve("/contact"));
        assert_eq!(resolve("{{link_url::5}}"), "https://example.com/contact");
    }

    #[test]
    fn test_insert_tag_to_absolute() {
        assert_eq!(
            resolve("{{env::url}}/imprint"),
            "https://example.com/imprint"
        );
    }

    #[test]
    fn test_literal_content_unchanged() {
        assert_eq!(
            resolve("/x/{{unknown::1}}"),
            "https://example.com/x/{{unknown::1}}"
        );
        assert_eq!(resolve("/news/../about"), "https://example.com/news/../about");
        assert_eq!(resolve("/a b"), "https://example.com/a b");
    }

    #[test]
    fn test_parameters_always_empty() {
        let resolver = resolver();
        let page = PageReference::new(1, "about");
        for content in [
            ContentReference::from(StringUrl::new("/about")),
            ContentReference::from(StringUrl::new("{{link_url::5}}")),
            ContentReference::from(page.clone()),
        ] {
            assert!(resolver.parameters_for(&content, &page).is_empty());
        }
    }

    #[test]
    fn test_without_request_context() {
        let resolver = StringResolver::new(
            Arc::new(InsertTagParser::default()),
            Arc::new(UrlHelper::default()),
        );
        let result = resolver
            .resolve(&StringUrl::new("/about").into())
            .unwrap()
            .unwrap();
        assert_eq!(result.url, "/about");
        assert!(result.parameters.is_empty());
    }
}
