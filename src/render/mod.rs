//! The configured stylesheet set: lazy resolution plus HTML rendering.
//!
//! # Module Structure
//!
//! - `template` - Pluggable link/preload templates
//! - `html` - `href`, `link_html`, `inline_html`, `link_or_inline_html`, `deferred_link_html`
//!
//! # Example
//!
//! ```ignore
//! let config = StylesheetConfig::new("public/css").alias("reset", true);
//! let sheets = Stylesheets::builder(config).build()?;
//! let head = sheets.deferred_link_html(&["reset", "main"])?;
//! ```

mod html;
pub mod template;

pub use template::HtmlTemplate;

use crate::asset::{Asset, FileSystem, ResolvedTable, Resolver, StdFs};
use crate::config::StylesheetConfig;
use crate::embed::{AssetLocator, BundledLocator, FixedLocator};
use crate::error::{Result, StyleError};
use crate::sink::{LogSink, RaiseOnError, Severity};
use parking_lot::Mutex;
use std::sync::OnceLock;

/// Resolves aliases once and renders markup for them.
///
/// Shareable across threads: the resolved table is built at most once and is
/// read-only afterwards.
pub struct Stylesheets {
    config: StylesheetConfig,
    link_template: HtmlTemplate,
    preload_template: HtmlTemplate,
    sink: Box<dyn LogSink>,
    fs: Box<dyn FileSystem>,
    locator: Box<dyn AssetLocator>,
    files: OnceLock<ResolvedTable>,
    build_lock: Mutex<()>,
}

impl Stylesheets {
    pub fn builder(config: StylesheetConfig) -> StylesheetsBuilder {
        StylesheetsBuilder::new(config)
    }

    pub fn config(&self) -> &StylesheetConfig {
        &self.config
    }

    /// The resolved asset table, built on first use.
    ///
    /// Later calls return the same table without touching the file system.
    /// A failed build is not cached.
    pub fn css_files(&self) -> Result<&ResolvedTable> {
        if let Some(table) = self.files.get() {
            return Ok(table);
        }

        let _guard = self.build_lock.lock();
        // Another thread may have finished while we waited
        if let Some(table) = self.files.get() {
            return Ok(table);
        }

        let table = Resolver::new(&self.config, self.fs.as_ref(), self.sink.as_ref()).resolve_all()?;
        Ok(self.files.get_or_init(|| table))
    }

    /// Look up one resolved alias.
    pub fn asset(&self, name: &str) -> Result<Option<&Asset>> {
        Ok(self.css_files()?.get(name))
    }

    /// Resolve everything and make sure something is left to render.
    pub fn check(&self) -> Result<()> {
        if self.css_files()?.is_empty() {
            self.sink.report(
                Severity::Error,
                StyleError::Configuration("no aliases".into()),
            )?;
        }
        Ok(())
    }
}

/// Builder for [`Stylesheets`].
pub struct StylesheetsBuilder {
    config: StylesheetConfig,
    link_template: HtmlTemplate,
    preload_template: HtmlTemplate,
    sink: Box<dyn LogSink>,
    fs: Box<dyn FileSystem>,
    locator: Option<Box<dyn AssetLocator>>,
}

impl StylesheetsBuilder {
    fn new(config: StylesheetConfig) -> Self {
        Self {
            config,
            link_template: HtmlTemplate::link(),
            preload_template: HtmlTemplate::preload(),
            sink: Box::new(RaiseOnError),
            fs: Box::new(StdFs),
            locator: None,
        }
    }

    pub fn link_template(mut self, template: HtmlTemplate) -> Self {
        self.link_template = template;
        self
    }

    pub fn preload_template(mut self, template: HtmlTemplate) -> Self {
        self.preload_template = template;
        self
    }

    pub fn log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    /// Overrides both the bundled shim and `preload_script`.
    pub fn asset_locator(mut self, locator: impl AssetLocator + 'static) -> Self {
        self.locator = Some(Box::new(locator));
        self
    }

    /// Validate `css_root` and assemble the set. Nothing is resolved yet.
    pub fn build(self) -> Result<Stylesheets> {
        let root = &self.config.css_root;
        if root.as_os_str().is_empty() {
            self.sink.report(
                Severity::Error,
                StyleError::Configuration("css_root is not configured".into()),
            )?;
        } else if !self.fs.is_dir(root) {
            self.sink.report(
                Severity::Error,
                StyleError::Configuration(format!(
                    "css_root `{}` is not a readable directory",
                    root.display()
                )),
            )?;
        }

        let locator = match (self.locator, &self.config.preload_script) {
            (Some(locator), _) => locator,
            (None, Some(script)) => Box::new(FixedLocator(script.clone())),
            (None, None) => Box::new(BundledLocator),
        };

        Ok(Stylesheets {
            config: self.config,
            link_template: self.link_template,
            preload_template: self.preload_template,
            sink: self.sink,
            fs: self.fs,
            locator,
            files: OnceLock::new(),
            build_lock: Mutex::new(()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::fs::CountingFs;
    use crate::sink::MemorySink;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn css_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("reset.min.css"), "html{margin:0}").unwrap();
        fs::write(dir.path().join("main.css"), "body { color: #333 }").unwrap();
        dir
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let config = StylesheetConfig::new("/no/such/css/root").alias("reset", true);
        let err = Stylesheets::builder(config).build().err().unwrap();
        assert!(matches!(err, StyleError::Configuration(_)));

        let err = Stylesheets::builder(StylesheetConfig::default())
            .build()
            .err()
            .unwrap();
        assert!(err.to_string().contains("css_root is not configured"));
    }

    #[test]
    fn test_missing_root_lenient_sink() {
        let sink = Arc::new(MemorySink::new());
        let config = StylesheetConfig::new("/no/such/css/root");
        assert!(Stylesheets::builder(config).log_sink(sink.clone()).build().is_ok());
        assert_eq!(sink.messages(Severity::Error).len(), 1);
    }

    #[test]
    fn test_css_files_built_once() {
        let dir = css_dir();
        let fs = Arc::new(CountingFs::default());
        let config = StylesheetConfig::new(dir.path())
            .alias("reset", true)
            .alias("main", true);
        let sheets = Stylesheets::builder(config)
            .file_system(fs.clone())
            .build()
            .unwrap();

        let first = sheets.css_files().unwrap();
        let calls = fs.calls();
        let second = sheets.css_files().unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(first, second);
        assert_eq!(fs.calls(), calls);
    }

    #[test]
    fn test_css_files_concurrent_first_access() {
        let dir = css_dir();
        let fs = Arc::new(CountingFs::default());
        let config = StylesheetConfig::new(dir.path()).alias("reset", true);
        let sheets = Stylesheets::builder(config)
            .file_system(fs.clone())
            .build()
            .unwrap();
        let after_build = fs.calls();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    assert!(sheets.css_files().unwrap().contains("reset"));
                });
            }
        });

        // One probe hit (reset.min.css) plus one size stat
        assert_eq!(fs.calls() - after_build, 2);
    }

    #[test]
    fn test_failed_build_not_cached() {
        let dir = TempDir::new().unwrap();
        let config = StylesheetConfig::new(dir.path()).alias("late", true);
        let sheets = Stylesheets::builder(config).build().unwrap();

        assert!(sheets.css_files().is_err());
        fs::write(dir.path().join("late.css"), "a{}").unwrap();
        assert!(sheets.css_files().unwrap().contains("late"));
    }

    #[test]
    fn test_asset_lookup() {
        let dir = css_dir();
        let config = StylesheetConfig::new(dir.path()).alias("reset", true);
        let sheets = Stylesheets::builder(config).build().unwrap();

        assert_eq!(
            sheets.asset("reset").unwrap().unwrap().canonical_name(),
            "reset.min.css"
        );
        assert!(sheets.asset("nope").unwrap().is_none());
    }

    #[test]
    fn test_check_reports_no_aliases() {
        let dir = css_dir();
        let config = StylesheetConfig::new(dir.path()).alias("legacy", false);
        let sheets = Stylesheets::builder(config).build().unwrap();
        let err = sheets.check().unwrap_err();
        assert!(err.to_string().contains("no aliases"));

        let config = StylesheetConfig::new(dir.path()).alias("reset", true);
        let sheets = Stylesheets::builder(config).build().unwrap();
        assert!(sheets.check().is_ok());
    }

    #[test]
    fn test_stylesheets_is_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Stylesheets>();
    }
}
