//! Stylesheet configuration and `csslink.toml` loading.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── alias.rs       # AliasSpec (normalized alias targets)
//! ├── types/         # Utility types
//! │   ├── error      # ConfigDiagnostics
//! │   └── field      # FieldPath
//! ├── util.rs        # Config file discovery, path normalization
//! └── mod.rs         # StylesheetConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! css_root = "public/css"     # Directory aliases resolve against (required)
//! url_base_path = "/css/"     # Prefix for local hrefs
//! prefer_min = true           # Probe `x.min.css` before `x.css`
//! inline_max = 1024           # Inline files up to this many bytes
//! defer_css = true            # Preload large stylesheets
//! asset_id = "20240101"       # Cache-busting query suffix
//!
//! [aliases]
//! reset = true
//! main = "site/main"
//!
//! [cdn_links]
//! reset = "https://cdn.example.com/reset.min.css"
//! ```

pub mod alias;
pub mod types;
pub mod util;

pub use alias::AliasSpec;
pub use types::{ConfigDiagnostic, ConfigDiagnostics, FieldPath};

use crate::error::{Result, StyleError};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Component, Path, PathBuf},
};

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "csslink.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Everything needed to resolve and render stylesheet aliases.
///
/// The config is never mutated once a [`Stylesheets`] owns it.
///
/// [`Stylesheets`]: crate::render::Stylesheets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetConfig {
    /// Alias name → target.
    pub aliases: BTreeMap<String, AliasSpec>,

    /// Directory every local alias resolves against.
    pub css_root: PathBuf,

    /// Prefix of every local href.
    pub url_base_path: String,

    /// Probe `x.min.css` before `x.css`.
    pub prefer_min: bool,

    /// Alias name → URL used instead of the local href.
    pub cdn_links: BTreeMap<String, String>,

    /// Whether `cdn_links` apply (default: `cdn_links` is non-empty).
    pub use_cdn_links: Option<bool>,

    /// Largest file size (bytes) still inlined.
    pub inline_max: u64,

    /// Render large stylesheets as preload links.
    pub defer_css: bool,

    /// Emit the `<noscript>` fallback block (default: `defer_css`).
    pub include_noscript: Option<bool>,

    /// Cache-busting token appended as `?asset_id` to local hrefs.
    pub asset_id: Option<String>,

    /// Preload shim to embed instead of the bundled one.
    pub preload_script: Option<PathBuf>,
}

impl Default for StylesheetConfig {
    fn default() -> Self {
        Self {
            aliases: BTreeMap::new(),
            css_root: PathBuf::new(),
            url_base_path: "/".into(),
            prefer_min: true,
            cdn_links: BTreeMap::new(),
            use_cdn_links: None,
            inline_max: 1024,
            defer_css: true,
            include_noscript: None,
            asset_id: None,
            preload_script: None,
        }
    }
}

/// Field paths of [`StylesheetConfig`], for diagnostics.
pub struct StylesheetConfigFields {
    pub aliases: FieldPath,
    pub css_root: FieldPath,
    pub cdn_links: FieldPath,
    pub asset_id: FieldPath,
    pub preload_script: FieldPath,
}

impl StylesheetConfig {
    pub const FIELDS: StylesheetConfigFields = StylesheetConfigFields {
        aliases: FieldPath::new("aliases"),
        css_root: FieldPath::new("css_root"),
        cdn_links: FieldPath::new("cdn_links"),
        asset_id: FieldPath::new("asset_id"),
        preload_script: FieldPath::new("preload_script"),
    };

    /// Config rooted at `css_root` with no aliases yet.
    pub fn new(css_root: impl Into<PathBuf>) -> Self {
        Self {
            css_root: css_root.into(),
            ..Self::default()
        }
    }

    /// Declare an alias (builder style).
    pub fn alias(mut self, name: impl Into<String>, spec: impl Into<AliasSpec>) -> Self {
        self.aliases.insert(name.into(), spec.into());
        self
    }

    /// Declare a CDN override (builder style).
    pub fn cdn_link(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.cdn_links.insert(name.into(), url.into());
        self
    }

    /// Effective CDN switch.
    pub fn cdn_enabled(&self) -> bool {
        self.use_cdn_links.unwrap_or(!self.cdn_links.is_empty())
    }

    /// Effective noscript switch.
    pub fn noscript_enabled(&self) -> bool {
        self.include_noscript.unwrap_or(self.defer_css)
    }

    // ========================================================================
    // loading
    // ========================================================================

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load, normalize and validate a config file.
    ///
    /// Relative paths inside the file resolve against the file's directory.
    /// Unknown fields are reported as warnings.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| StyleError::io(path, err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        // Absolute-path checks must run before paths are joined with the root
        config.validate_aliases()?;

        let root = path.parent().unwrap_or(Path::new("."));
        config.normalize_paths(root);
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        crate::log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Join relative paths with `root` and make them absolute.
    pub fn normalize_paths(&mut self, root: &Path) {
        let root = util::normalize_path(root);
        self.css_root = util::normalize_path(&root.join(&self.css_root));
        if let Some(script) = self.preload_script.take() {
            self.preload_script = Some(util::normalize_path(&root.join(script)));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Check alias names and path fragments.
    fn validate_aliases(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.check_aliases(&mut diag);
        diag.into_result().map_err(StyleError::Diagnostics)
    }

    fn check_aliases(&self, diag: &mut ConfigDiagnostics) {
        for (name, spec) in &self.aliases {
            let field = Self::FIELDS.aliases.key(name);
            if name.trim().is_empty() {
                diag.error(field, "alias name must not be empty");
                continue;
            }
            if let AliasSpec::Path(target) = spec {
                Self::check_path_safety(Path::new(target), field, diag);
            }
        }

        if self.aliases.values().all(AliasSpec::is_disabled) {
            diag.error_with_hint(
                Self::FIELDS.aliases,
                "no aliases",
                "declare at least one enabled alias under [aliases]",
            );
        }
    }

    /// Reject `..` and absolute components in an alias path.
    fn check_path_safety(path: &Path, field: FieldPath, diag: &mut ConfigDiagnostics) {
        for comp in path.components() {
            let reason = match comp {
                Component::ParentDir => "parent directory '..' not allowed",
                Component::Prefix(_) | Component::RootDir => "absolute paths not allowed",
                _ => continue,
            };
            diag.error_with_hint(
                field,
                format!("path '{}': {reason}", path.display()),
                "use a path relative to css_root",
            );
            return;
        }
    }

    /// Validate the whole configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.check_aliases(&mut diag);
        self.check_css_root(&mut diag);
        self.check_cdn_links(&mut diag);

        if self.asset_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            diag.error(Self::FIELDS.asset_id, "asset_id must not be empty when set");
        }

        if let Some(script) = &self.preload_script
            && !script.is_file()
        {
            diag.error(
                Self::FIELDS.preload_script,
                format!("file not found: {}", script.display()),
            );
        }

        diag.print_warnings();
        diag.into_result().map_err(StyleError::Diagnostics)
    }

    fn check_css_root(&self, diag: &mut ConfigDiagnostics) {
        let root = &self.css_root;
        if root.as_os_str().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.css_root,
                "css_root is not configured",
                "set css_root to the directory holding your stylesheets",
            );
        } else if !root.exists() {
            diag.error(
                Self::FIELDS.css_root,
                format!("directory not found: {}", root.display()),
            );
        } else if !root.is_dir() {
            diag.error(
                Self::FIELDS.css_root,
                format!("not a directory: {}", root.display()),
            );
        }
    }

    fn check_cdn_links(&self, diag: &mut ConfigDiagnostics) {
        for (name, link) in &self.cdn_links {
            let field = Self::FIELDS.cdn_links.key(name);

            // Protocol-relative links need a scheme to parse
            let parsed = if link.starts_with("//") {
                url::Url::parse(&format!("https:{link}"))
            } else {
                url::Url::parse(link)
            };
            if let Err(err) = parsed {
                diag.error(field, format!("invalid URL '{link}': {err}"));
                continue;
            }

            if !self.aliases.contains_key(name) {
                diag.warn(field, format!("no alias named `{name}`, link is never used"));
            }
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config from TOML.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> StylesheetConfig {
    let (parsed, ignored) = StylesheetConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
