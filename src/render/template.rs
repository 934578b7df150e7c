//! Pluggable href → markup templates.

use std::fmt;
use std::sync::Arc;

/// Placeholder replaced by the href in pattern templates.
pub const HREF_PLACEHOLDER: &str = "__HREF__";

const LINK_PATTERN: &str = r#"<link rel="stylesheet" href="__HREF__">"#;
const PRELOAD_PATTERN: &str = r#"<link rel="preload" as="style" href="__HREF__" onload="this.onload=null;this.rel='stylesheet'">"#;

/// Renders one tag for an href.
#[derive(Clone)]
pub struct HtmlTemplate(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl HtmlTemplate {
    /// Template backed by an arbitrary function.
    pub fn new(render: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(render))
    }

    /// Template substituting every `__HREF__` in `pattern`.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self::new(move |href| pattern.replace(HREF_PLACEHOLDER, href))
    }

    /// `<link rel="stylesheet" href="HREF">`
    pub fn link() -> Self {
        Self::pattern(LINK_PATTERN)
    }

    /// `<link rel="preload" as="style" href="HREF" onload="...">`
    pub fn preload() -> Self {
        Self::pattern(PRELOAD_PATTERN)
    }

    #[inline]
    pub fn render(&self, href: &str) -> String {
        (self.0)(href)
    }
}

impl fmt::Debug for HtmlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HtmlTemplate(..)")
    }
}
