//! Link classification utilities.

/// Check if a link has a URL scheme (`https:`, `mailto:`, `tel:`, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Start with an ASCII letter
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
#[inline]
pub fn has_scheme(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link.starts_with(|c: char| c.is_ascii_alphabetic())
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Syntactic classification of a (possibly relative) URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Already absolute: has a scheme (https://, mailto:, tel:, etc.)
    Absolute(&'a str),
    /// Protocol-relative (//cdn.example.com/x), keeps the caller's scheme.
    ProtocolRelative(&'a str),
    /// Pure fragment (#section). Value is the anchor without `#`.
    Fragment(&'a str),
    /// Pure query (?page=2). Value is the query without `?`.
    Query(&'a str),
    /// Site-root-relative path (/about, /news/item).
    SiteRoot(&'a str),
    /// Path relative to the current document (item.html, ../other, empty).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if link.contains("://") || has_scheme(link) {
            Self::Absolute(link)
        } else if link.starts_with("//") {
            Self::ProtocolRelative(link)
        } else if let Some(anchor) = link.strip_prefix('#') {
            Self::Fragment(anchor)
        } else if let Some(query) = link.strip_prefix('?') {
            Self::Query(query)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::Relative(link)
        }
    }

    /// Check if the link needs no request context to be absolute.
    #[inline]
    pub const fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute(_) | Self::ProtocolRelative(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://example.com"));
        assert!(has_scheme("mailto:user@example.com"));
        assert!(has_scheme("tel:+1234567890"));
        assert!(has_scheme("git+ssh://host/repo"));
        assert!(!has_scheme("/about"));
        assert!(!has_scheme("./file.txt"));
        assert!(!has_scheme(":foo"));
        assert!(!has_scheme("1abc:foo"));
        assert!(!has_scheme("news/item?time=12:00"));
    }

    #[test]
    fn test_parse_absolute() {
        assert!(matches!(
            LinkKind::parse("https://example.com"),
            LinkKind::Absolute("https://example.com")
        ));
        assert!(matches!(
            LinkKind::parse("mailto:user@example.com"),
            LinkKind::Absolute(_)
        ));
    }

    #[test]
    fn test_parse_protocol_relative() {
        assert!(matches!(
            LinkKind::parse("//cdn.example.com/app.js"),
            LinkKind::ProtocolRelative("//cdn.example.com/app.js")
        ));
    }

    #[test]
    fn test_parse_fragment_and_query() {
        assert!(matches!(
            LinkKind::parse("#section"),
            LinkKind::Fragment("section")
        ));
        assert!(matches!(LinkKind::parse("#"), LinkKind::Fragment("")));
        assert!(matches!(
            LinkKind::parse("?page=2"),
            LinkKind::Query("page=2")
        ));
    }

    #[test]
    fn test_parse_site_root() {
        assert!(matches!(
            LinkKind::parse("/about"),
            LinkKind::SiteRoot("/about")
        ));
        assert!(matches!(
            LinkKind::parse("/about#team"),
            LinkKind::SiteRoot("/about#team")
        ));
    }

    #[test]
    fn test_parse_relative() {
        assert!(matches!(
            LinkKind::parse("item.html"),
            LinkKind::Relative("item.html")
        ));
        assert!(matches!(
            LinkKind::parse("../other"),
            LinkKind::Relative("../other")
        ));
        assert!(matches!(LinkKind::parse(""), LinkKind::Relative("")));
    }

    #[test]
    fn test_is_absolute() {
        assert!(LinkKind::parse("https://example.com").is_absolute());
        assert!(LinkKind::parse("//example.com").is_absolute());
        assert!(!LinkKind::parse("/about").is_absolute());
        assert!(!LinkKind::parse("#top").is_absolute());
    }
}
