//! Resolvers for pages and the articles on them.
//!
//! Page URLs are `/{alias}{suffix}`, the root page is `/`. Articles add the
//! routing parameter `/articles/{slug}` between alias and suffix.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{ContentReference, ContentUrlResolver, ContentUrlResult, PageReference, ResolveError};
use crate::core::{AbsoluteUrl, UrlError, encode_path};

/// Routing parameter name used by the article resolver.
const PARAMETERS: &str = "parameters";

/// Build the absolute URL of a page with optional routing parameters.
fn page_url(
    urls: &dyn AbsoluteUrl,
    suffix: &str,
    page: &PageReference,
    parameters: &str,
) -> Result<String, UrlError> {
    let path = if page.is_root() && parameters.is_empty() {
        "/".to_string()
    } else {
        let alias = match page.alias.trim_matches('/') {
            "" => page.id.to_string(),
            alias => alias.to_string(),
        };
        encode_path(&format!("/{alias}{parameters}{suffix}"))
    };
    urls.absolute_url(&path)
}

// ============================================================================
// Page
// ============================================================================

pub struct PageResolver {
    urls: Arc<dyn AbsoluteUrl>,
    url_suffix: String,
}

impl PageResolver {
    pub fn new(urls: Arc<dyn AbsoluteUrl>, url_suffix: &str) -> Self {
        Self {
            urls,
            url_suffix: url_suffix.to_string(),
        }
    }
}

impl ContentUrlResolver for PageResolver {
    fn name(&self) -> &'static str {
        "page"
    }

    fn supports(&self, content: &ContentReference) -> bool {
        matches!(content, ContentReference::Page(_))
    }

    fn resolve(
        &self,
        content: &ContentReference,
    ) -> Result<Option<ContentUrlResult>, ResolveError> {
        let ContentReference::Page(page) = content else {
            return Ok(None);
        };

        let url = page_url(self.urls.as_ref(), &self.url_suffix, page, "")?;
        Ok(Some(ContentUrlResult::new(url)))
    }
}

// ============================================================================
// Article
// ============================================================================

pub struct ArticleResolver {
    urls: Arc<dyn AbsoluteUrl>,
    url_suffix: String,
}

impl ArticleResolver {
    pub fn new(urls: Arc<dyn AbsoluteUrl>, url_suffix: &str) -> Self {
        Self {
            urls,
            url_suffix: url_suffix.to_string(),
        }
    }
}

impl ContentUrlResolver for ArticleResolver {
    fn name(&self) -> &'static str {
        "article"
    }

    fn supports(&self, content: &ContentReference) -> bool {
        matches!(content, ContentReference::Article(_))
    }

    fn resolve(
        &self,
        content: &ContentReference,
    ) -> Result<Option<ContentUrlResult>, ResolveError> {
        let ContentReference::Article(article) = content else {
            return Ok(None);
        };

        let parameters = format!("/articles/{}", article.slug());
        let url = page_url(
            self.urls.as_ref(),
            &self.url_suffix,
            &article.page,
            &parameters,
        )?;

        Ok(Some(
            ContentUrlResult::new(url).with_parameter(PARAMETERS, parameters),
        ))
    }

    fn parameters_for(
        &self,
        content: &ContentReference,
        _page: &PageReference,
    ) -> FxHashMap<String, String> {
        let mut parameters = FxHashMap::default();
        if let ContentReference::Article(article) = content {
            parameters.insert(
                PARAMETERS.to_string(),
                format!("/articles/{}", article.slug()),
            );
        }
        parameters
    }
}
