//! Alias resolution.
//!
//! Turns the declared alias table into a [`ResolvedTable`]:
//!
//! | Spec         | Result                                               |
//! |--------------|------------------------------------------------------|
//! | `Disabled`   | absent                                               |
//! | `Url`        | `Asset::Remote`, no file system access               |
//! | `SameAsName` | like `Path(name)`                                    |
//! | `Path`       | first existing candidate under `css_root`            |
//! | `Absolute`   | the path itself, if it exists under `css_root`       |
//!
//! Candidate order for stem `x` (after stripping `.min.css` / `.css`):
//! - `prefer_min`: `x.min.css`, `x.css`, `x`
//! - otherwise:   `x.css`, `x.min.css`, `x`

use super::{Asset, FileSystem, ResolvedTable};
use crate::config::{AliasSpec, StylesheetConfig};
use crate::error::{Result, StyleError};
use crate::sink::{LogSink, Severity};
use std::path::{Path, PathBuf};

/// Resolves aliases against `css_root` through a [`FileSystem`].
pub struct Resolver<'a> {
    config: &'a StylesheetConfig,
    fs: &'a dyn FileSystem,
    sink: &'a dyn LogSink,
}

impl<'a> Resolver<'a> {
    pub fn new(
        config: &'a StylesheetConfig,
        fs: &'a dyn FileSystem,
        sink: &'a dyn LogSink,
    ) -> Self {
        Self { config, fs, sink }
    }

    /// Resolve every declared alias.
    ///
    /// A fatal report from the sink aborts the whole table. Non-fatal
    /// reports leave the offending alias out.
    pub fn resolve_all(&self) -> Result<ResolvedTable> {
        let mut table = ResolvedTable::default();
        for (name, spec) in &self.config.aliases {
            if let Some(asset) = self.resolve(name, spec)? {
                crate::debug!("resolve"; "`{}` -> {} ({} bytes)", name, asset.canonical_name(), asset.byte_size());
                table.insert(name.clone(), asset);
            }
        }
        Ok(table)
    }

    /// Resolve a single alias. `Ok(None)` means "not in the table".
    pub fn resolve(&self, name: &str, spec: &AliasSpec) -> Result<Option<Asset>> {
        match spec {
            AliasSpec::Disabled => Ok(None),
            AliasSpec::Url(url) => Ok(Some(Asset::Remote { url: url.clone() })),
            AliasSpec::SameAsName => self.resolve_local(name, name),
            AliasSpec::Path(base) if Path::new(base).is_absolute() => {
                self.fail(StyleError::Configuration(format!(
                    "alias `{name}`: absolute paths not allowed ({base})"
                )))
            }
            AliasSpec::Path(base) => self.resolve_local(name, base),
            AliasSpec::Absolute(path) => self.resolve_absolute(name, path),
        }
    }

    /// Probe candidates in priority order; the first existing file wins.
    fn resolve_local(&self, name: &str, base: &str) -> Result<Option<Asset>> {
        let root = &self.config.css_root;
        let found = candidates(base, self.config.prefer_min)
            .into_iter()
            .find(|candidate| self.fs.is_file(&root.join(candidate)));

        let Some(candidate) = found else {
            return self.fail(StyleError::Resolution {
                alias: name.to_owned(),
                target: base.to_owned(),
            });
        };

        let path = root.join(&candidate);
        self.local(path, candidate)
    }

    /// Pass-through for already-resolved paths: no suffix search.
    fn resolve_absolute(&self, name: &str, path: &Path) -> Result<Option<Asset>> {
        if !self.fs.is_file(path) {
            return self.fail(StyleError::Resolution {
                alias: name.to_owned(),
                target: path.display().to_string(),
            });
        }

        // The name becomes part of the href, so it has to stay under css_root
        let Ok(relative) = path.strip_prefix(&self.config.css_root) else {
            return self.fail(StyleError::Configuration(format!(
                "alias `{name}`: `{}` is outside css_root `{}`",
                path.display(),
                self.config.css_root.display()
            )));
        };
        let relative = relative.to_string_lossy().into_owned();
        self.local(path.to_path_buf(), relative)
    }

    fn local(&self, path: PathBuf, name: String) -> Result<Option<Asset>> {
        match self.fs.size(&path) {
            Ok(size) => Ok(Some(Asset::Local { path, name, size })),
            Err(err) => self.fail(StyleError::io(path, err)),
        }
    }

    /// Report at `Error`; continue without the alias if the sink allows.
    fn fail(&self, error: StyleError) -> Result<Option<Asset>> {
        self.sink.report(Severity::Error, error).map(|()| None)
    }
}

/// Candidate file names for `base`, highest priority first.
pub fn candidates(base: &str, prefer_min: bool) -> [String; 3] {
    let stem = base
        .strip_suffix(".min.css")
        .or_else(|| base.strip_suffix(".css"))
        .unwrap_or(base);

    let min = format!("{stem}.min.css");
    let full = format!("{stem}.css");
    if prefer_min {
        [min, full, stem.to_owned()]
    } else {
        [full, min, stem.to_owned()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::StdFs;
    use crate::sink::{MemorySink, RaiseOnError};
    use std::fs;
    use tempfile::TempDir;

    fn css_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn resolve(config: &StylesheetConfig) -> Result<ResolvedTable> {
        Resolver::new(config, &StdFs, &RaiseOnError).resolve_all()
    }

    #[test]
    fn test_candidates() {
        assert_eq!(candidates("x", true), ["x.min.css", "x.css", "x"]);
        assert_eq!(candidates("x", false), ["x.css", "x.min.css", "x"]);
        assert_eq!(candidates("x.css", true), ["x.min.css", "x.css", "x"]);
        assert_eq!(candidates("x.min.css", false), ["x.css", "x.min.css", "x"]);
        assert_eq!(candidates("x.scss", true), ["x.scss.min.css", "x.scss.css", "x.scss"]);
    }

    #[test]
    fn test_prefer_min_picks_minified() {
        let dir = css_dir(&[("x.css", "a { }"), ("x.min.css", "a{}")]);
        let config = StylesheetConfig::new(dir.path()).alias("x", true);

        let table = resolve(&config).unwrap();
        assert_eq!(table.get("x").unwrap().canonical_name(), "x.min.css");
    }

    #[test]
    fn test_prefer_full_picks_full() {
        let dir = css_dir(&[("x.css", "a { }"), ("x.min.css", "a{}")]);
        let config = StylesheetConfig {
            prefer_min: false,
            ..StylesheetConfig::new(dir.path())
        }
        .alias("x", true);

        let table = resolve(&config).unwrap();
        assert_eq!(table.get("x").unwrap().canonical_name(), "x.css");
    }

    #[test]
    fn test_order_beats_size() {
        // The larger minified file still wins over the smaller full one
        let dir = css_dir(&[("x.css", "a{}"), ("x.min.css", "a { color: red }")]);
        let config = StylesheetConfig::new(dir.path()).alias("x", true);
        let table = resolve(&config).unwrap();
        assert_eq!(table.get("x").unwrap().canonical_name(), "x.min.css");
    }

    #[test]
    fn test_explicit_filename() {
        let dir = css_dir(&[("site/main.css", "body{}")]);
        let config = StylesheetConfig::new(dir.path()).alias("main", "site/main.css");

        let table = resolve(&config).unwrap();
        let asset = table.get("main").unwrap();
        assert_eq!(asset.canonical_name(), "site/main.css");
        assert_eq!(asset.local_path(), Some(dir.path().join("site/main.css").as_path()));
    }

    #[test]
    fn test_unusual_extension_falls_back_to_raw() {
        let dir = css_dir(&[("theme.pcss", "a{}")]);
        let config = StylesheetConfig::new(dir.path()).alias("theme", "theme.pcss");
        let table = resolve(&config).unwrap();
        assert_eq!(table.get("theme").unwrap().canonical_name(), "theme.pcss");
    }

    #[test]
    fn test_size_matches_disk() {
        let dir = css_dir(&[("reset.css", "html { margin: 0 }")]);
        let config = StylesheetConfig::new(dir.path()).alias("reset", true);
        let table = resolve(&config).unwrap();

        let on_disk = fs::metadata(dir.path().join("reset.css")).unwrap().len();
        assert_eq!(table.get("reset").unwrap().byte_size(), on_disk);
    }

    #[test]
    fn test_url_alias_is_remote() {
        let dir = css_dir(&[]);
        let config = StylesheetConfig::new(dir.path())
            .alias("fonts", "https://fonts.example.com/css?family=Sans")
            .alias("cdn", "//cdn.example.com/a.css");
        let table = resolve(&config).unwrap();

        assert_eq!(
            table.get("fonts"),
            Some(&Asset::Remote {
                url: "https://fonts.example.com/css?family=Sans".into()
            })
        );
        assert!(table.get("cdn").unwrap().is_remote());
    }

    #[test]
    fn test_disabled_alias_absent() {
        let dir = css_dir(&[("legacy.css", "a{}")]);
        let config = StylesheetConfig::new(dir.path()).alias("legacy", false);
        let table = resolve(&config).unwrap();
        assert!(!table.contains("legacy"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal_by_default() {
        let dir = css_dir(&[]);
        let config = StylesheetConfig::new(dir.path()).alias("ghost", true);
        let err = resolve(&config).unwrap_err();
        assert!(err.to_string().contains("refers to a non-existent file"));
    }

    #[test]
    fn test_missing_file_skipped_with_lenient_sink() {
        let dir = css_dir(&[("reset.css", "a{}")]);
        let config = StylesheetConfig::new(dir.path())
            .alias("ghost", true)
            .alias("reset", true);
        let sink = MemorySink::new();

        let table = Resolver::new(&config, &StdFs, &sink).resolve_all().unwrap();
        assert!(table.contains("reset"));
        assert!(!table.contains("ghost"));
        assert_eq!(sink.messages(Severity::Error).len(), 1);
    }

    #[test]
    fn test_absolute_string_rejected() {
        let dir = css_dir(&[]);
        let config = StylesheetConfig::new(dir.path()).alias("abs", "/etc/passwd");
        let err = resolve(&config).unwrap_err();
        assert!(matches!(err, StyleError::Configuration(_)));
    }

    #[test]
    fn test_absolute_path_passthrough() {
        let dir = css_dir(&[("vendor/x.css", "a{}")]);
        let path = dir.path().join("vendor/x.css");
        let config = StylesheetConfig::new(dir.path()).alias("x", path.clone());

        let table = resolve(&config).unwrap();
        let asset = table.get("x").unwrap();
        assert_eq!(asset.local_path(), Some(path.as_path()));
        assert_eq!(Path::new(asset.canonical_name()), Path::new("vendor/x.css"));
    }

    #[test]
    fn test_absolute_path_outside_root_rejected() {
        let dir = css_dir(&[]);
        let other = css_dir(&[("vendor.css", "a{}")]);
        let config =
            StylesheetConfig::new(dir.path()).alias("v", other.path().join("vendor.css"));

        let err = resolve(&config).unwrap_err();
        assert!(matches!(err, StyleError::Configuration(_)));
        assert!(err.to_string().contains("outside css_root"));

        let sink = MemorySink::new();
        let table = Resolver::new(&config, &StdFs, &sink).resolve_all().unwrap();
        assert!(!table.contains("v"));
        assert_eq!(sink.messages(Severity::Error).len(), 1);
    }

    #[test]
    fn test_absolute_path_skips_suffix_search() {
        let dir = css_dir(&[("x.min.css", "a{}")]);
        let config = StylesheetConfig::new(dir.path()).alias("x", dir.path().join("x.css"));
        assert!(resolve(&config).is_err());
    }
}
