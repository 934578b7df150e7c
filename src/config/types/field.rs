//! Config field path used in diagnostics.

use owo_colors::OwoColorize;
use std::borrow::Cow;
use std::fmt;

/// A config field path such as `css_root` or `aliases.reset`.
///
/// Static paths are `const`, keyed paths (one entry of a table) are built
/// with [`FieldPath::key`].
///
/// # Example
///
/// ```ignore
/// diag.error(StylesheetConfig::FIELDS.css_root, "required");
/// diag.error(StylesheetConfig::FIELDS.aliases.key("reset"), "absolute paths not allowed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Cow<'static, str>);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(Cow::Borrowed(path))
    }

    /// Path of one entry inside a table field.
    pub fn key(&self, key: &str) -> Self {
        Self(Cow::Owned(format!("{}.{key}", self.0)))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
