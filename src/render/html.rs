//! Markup rendering for resolved aliases.
//!
//! | Operation             | Output                                          |
//! |-----------------------|-------------------------------------------------|
//! | `href`                | URL only                                        |
//! | `link_html`           | `<link rel="stylesheet">`                       |
//! | `inline_html`         | `<style>` with the raw file contents            |
//! | `link_or_inline_html` | inline when small and local, link otherwise     |
//! | `deferred_link_html`  | inline when small, preload otherwise + fallback |
//!
//! Nothing here is cached: every call renders from the resolved table, and
//! the preload shim is re-read on every deferred render.

use super::Stylesheets;
use crate::asset::Asset;
use crate::error::{Result, StyleError};
use crate::sink::Severity;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};

impl Stylesheets {
    /// URL for an alias.
    ///
    /// Local: `url_base_path + name [+ "?" + asset_id]`, or the CDN link when
    /// CDN links are on. Remote: the URL as declared.
    pub fn href(&self, name: &str) -> Result<String> {
        Ok(match self.lookup(name)? {
            Some(asset) => self.href_for(name, asset),
            None => String::new(),
        })
    }

    /// `link_template(href(name))`.
    pub fn link_html(&self, name: &str) -> Result<String> {
        Ok(match self.lookup(name)? {
            Some(asset) => self.link_template.render(&self.href_for(name, asset)),
            None => String::new(),
        })
    }

    /// `<style>` block with the file contents. Remote aliases cannot be inlined.
    pub fn inline_html(&self, name: &str) -> Result<String> {
        match self.lookup(name)? {
            Some(asset) => self.inline_asset(name, asset),
            None => Ok(String::new()),
        }
    }

    /// Inline every small local alias, link everything else.
    ///
    /// Repeated names render once, at their first position.
    pub fn link_or_inline_html<S: AsRef<str>>(&self, names: &[S]) -> Result<String> {
        let mut html = String::new();
        for name in unique(names) {
            let Some(asset) = self.lookup(name)? else {
                continue;
            };
            match asset {
                Asset::Local { size, .. } if *size <= self.config.inline_max => {
                    html.push_str(&self.inline_asset(name, asset)?);
                }
                _ => html.push_str(&self.link_template.render(&self.href_for(name, asset))),
            }
        }
        Ok(html)
    }

    /// Inline small aliases and preload the rest.
    ///
    /// Deferred hrefs are repeated as plain links inside `<noscript>` (when
    /// enabled), followed by the preload shim in a `<script>` block.
    ///
    /// Remote aliases report size 0 and so take the inline branch, which
    /// fails with "refers to a URI".
    pub fn deferred_link_html<S: AsRef<str>>(&self, names: &[S]) -> Result<String> {
        let mut html = String::new();
        let mut deferred = Vec::new();

        for name in unique(names) {
            let Some(asset) = self.lookup(name)? else {
                continue;
            };
            if asset.byte_size() <= self.config.inline_max {
                html.push_str(&self.inline_asset(name, asset)?);
                continue;
            }

            let href = self.href_for(name, asset);
            if self.config.defer_css {
                html.push_str(&self.preload_template.render(&href));
                deferred.push(href);
            } else {
                html.push_str(&self.link_template.render(&href));
            }
        }

        if deferred.is_empty() {
            return Ok(html);
        }

        crate::debug!("render"; "deferred {} stylesheet(s)", deferred.len());
        if self.config.noscript_enabled() {
            html.push_str("<noscript>");
            for href in &deferred {
                html.push_str(&self.link_template.render(href));
            }
            html.push_str("</noscript>");
        }
        if let Some(script) = self.preload_shim()? {
            html.push_str("<script>");
            html.push_str(&script);
            html.push_str("</script>");
        }
        Ok(html)
    }

    // ========================================================================
    // helpers
    // ========================================================================

    /// Find a resolved alias; unknown names go to the sink at `Error`.
    fn lookup(&self, name: &str) -> Result<Option<&Asset>> {
        if name.is_empty() {
            return self.report(Severity::Error, StyleError::UndefinedAlias).map(|()| None);
        }
        match self.css_files()?.get(name) {
            Some(asset) => Ok(Some(asset)),
            None => self
                .report(Severity::Error, StyleError::InvalidAlias(name.to_owned()))
                .map(|()| None),
        }
    }

    fn href_for(&self, name: &str, asset: &Asset) -> String {
        match asset {
            Asset::Remote { url } => url.clone(),
            Asset::Local { name: relative, .. } => {
                if self.config.cdn_enabled()
                    && let Some(cdn) = self.config.cdn_links.get(name)
                {
                    return cdn.clone();
                }
                match &self.config.asset_id {
                    Some(id) => format!("{}{relative}?{id}", self.config.url_base_path),
                    None => format!("{}{relative}", self.config.url_base_path),
                }
            }
        }
    }

    fn inline_asset(&self, name: &str, asset: &Asset) -> Result<String> {
        let path = match asset {
            Asset::Local { path, .. } => path,
            Asset::Remote { url } => {
                return self.skip(
                    Severity::Error,
                    StyleError::UriInline {
                        alias: name.to_owned(),
                        url: url.clone(),
                    },
                );
            }
        };

        let css = match self.read_text(path) {
            Ok(css) => css,
            Err(err) => return self.skip(Severity::Error, err),
        };
        if css.is_empty() {
            return self.skip(
                Severity::Warning,
                StyleError::EmptyFile {
                    alias: name.to_owned(),
                    path: path.clone(),
                },
            );
        }
        Ok(format!("<style>{css}</style>"))
    }

    /// Current contents of the preload shim, `None` if the sink let a
    /// read failure pass.
    fn preload_shim(&self) -> Result<Option<String>> {
        let path = match self.locator.preload_script() {
            Ok(path) => path,
            Err(err) => {
                return self
                    .report(Severity::Error, StyleError::io(PathBuf::from("preload.js"), err))
                    .map(|()| None);
            }
        };
        match self.read_text(&path) {
            Ok(script) => Ok(Some(script)),
            Err(err) => self.report(Severity::Error, err).map(|()| None),
        }
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        let bytes = self.fs.read(path).map_err(|err| StyleError::io(path, err))?;
        String::from_utf8(bytes).map_err(|err| {
            StyleError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, err),
            )
        })
    }

    #[inline]
    fn report(&self, severity: Severity, error: StyleError) -> Result<()> {
        self.sink.report(severity, error)
    }

    /// Report and render nothing for this item.
    fn skip(&self, severity: Severity, error: StyleError) -> Result<String> {
        self.report(severity, error).map(|()| String::new())
    }
}

/// Names in first-occurrence order, duplicates dropped.
fn unique<S: AsRef<str>>(names: &[S]) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| seen.insert(*name))
        .collect()
}
