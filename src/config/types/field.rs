//! Config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, used to point diagnostics at it.
///
/// ```ignore
/// diag.error_with_hint(RequestConfig::URL, "required", "set [request] url");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
