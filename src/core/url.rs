//! Absolute URL normalization against the current request.
//!
//! - Values that already carry a scheme (or are protocol-relative) pass through
//! - Without a request context, values pass through unchanged
//! - Everything else is resolved against scheme, host, base path and path info

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

use super::link::LinkKind;

/// Characters left as-is when encoding a single path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URL normalization errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid url `{url}`")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("url `{0}` has no host")]
    MissingHost(String),
}

/// Turns a possibly relative URL into an absolute one.
pub trait AbsoluteUrl: Send + Sync {
    fn absolute_url(&self, path: &str) -> Result<String, UrlError>;
}

// ============================================================================
// Request Context
// ============================================================================

/// The request the URLs are generated for.
///
/// Invariants:
/// - `base_path` is empty or starts with `/` and has no trailing slash
/// - `path_info` always starts with `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    scheme_and_host: String,
    base_path: String,
    path_info: String,
    query: Option<String>,
}

impl RequestContext {
    /// Build a context from the full request URL and the application base path.
    ///
    /// `https://example.com/app/news/item.html?x=1` with base path `/app`
    /// yields path info `/news/item.html` and query `x=1`.
    pub fn from_url(request_url: &str, base_path: &str) -> Result<Self, UrlError> {
        let parsed = url::Url::parse(request_url).map_err(|source| UrlError::Invalid {
            url: request_url.to_string(),
            source,
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| UrlError::MissingHost(request_url.to_string()))?;

        let scheme_and_host = match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        };

        let base_path = base_path.trim_end_matches('/').to_string();
        let path = parsed.path();
        let path_info = match path.strip_prefix(base_path.as_str()) {
            Some(rest) if !base_path.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                rest
            }
            _ => path,
        };
        let path_info = if path_info.is_empty() {
            "/".to_string()
        } else {
            path_info.to_string()
        };

        Ok(Self {
            scheme_and_host,
            base_path,
            path_info,
            query: parsed.query().map(str::to_string),
        })
    }

    #[inline]
    pub fn scheme_and_host(&self) -> &str {
        &self.scheme_and_host
    }

    #[inline]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[inline]
    pub fn path_info(&self) -> &str {
        &self.path_info
    }

    /// Base path + path info + query, as the browser requested it.
    pub fn request_uri(&self) -> String {
        match &self.query {
            Some(query) => format!("{}{}?{}", self.base_path, self.path_info, query),
            None => format!("{}{}", self.base_path, self.path_info),
        }
    }

    /// Absolute URI for a path below the base path.
    pub fn uri_for_path(&self, path: &str) -> String {
        format!("{}{}{}", self.scheme_and_host, self.base_path, path)
    }

    /// Directory part of the path info (`/news/item.html` -> `/news/`).
    fn path_info_dir(&self) -> &str {
        match self.path_info.rfind('/') {
            Some(idx) => &self.path_info[..=idx],
            None => "/",
        }
    }
}

// ============================================================================
// Url Helper
// ============================================================================

/// Default [`AbsoluteUrl`] implementation.
#[derive(Debug, Clone, Default)]
pub struct UrlHelper {
    request: Option<RequestContext>,
}

impl UrlHelper {
    pub const fn new(request: Option<RequestContext>) -> Self {
        Self { request }
    }

    /// Helper bound to the given request URL.
    pub fn for_request(request_url: &str, base_path: &str) -> Result<Self, UrlError> {
        RequestContext::from_url(request_url, base_path).map(|ctx| Self::new(Some(ctx)))
    }

    pub const fn request(&self) -> Option<&RequestContext> {
        self.request.as_ref()
    }
}

impl AbsoluteUrl for UrlHelper {
    fn absolute_url(&self, path: &str) -> Result<String, UrlError> {
        let kind = LinkKind::parse(path);
        if kind.is_absolute() {
            return Ok(path.to_string());
        }

        let Some(request) = &self.request else {
            return Ok(path.to_string());
        };

        let composed = match kind {
            LinkKind::Fragment(_) => {
                format!("{}{}", request.scheme_and_host(), request.request_uri() + path)
            }
            LinkKind::Query(_) => request.uri_for_path(&format!("{}{}", request.path_info(), path)),
            LinkKind::SiteRoot(_) => format!("{}{}", request.scheme_and_host(), path),
            LinkKind::Relative(rel) => {
                request.uri_for_path(&format!("{}{}", request.path_info_dir(), rel))
            }
            LinkKind::Absolute(_) | LinkKind::ProtocolRelative(_) => return Ok(path.to_string()),
        };

        // Validate only; the serialized form would re-encode the value.
        match url::Url::parse(&composed) {
            Ok(_) => Ok(composed),
            Err(source) => Err(UrlError::Invalid {
                url: composed,
                source,
            }),
        }
    }
}

/// Percent-encode every segment of a decoded path, keeping the slashes.
///
/// `/news/über uns/` -> `/news/%C3%BCber%20uns/`
pub fn encode_path(decoded: &str) -> String {
    decoded
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
