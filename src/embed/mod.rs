//! Embedded static resources.
//!
//! The preload shim ships inside the binary. [`BundledLocator`] writes it out
//! once per process, into a private temporary directory, so the renderer can
//! read it like any other file.
//!
//! # Usage
//!
//! ```ignore
//! use csslink::embed::{AssetLocator, BundledLocator};
//!
//! let path = BundledLocator.preload_script()?;
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// `rel=preload` polyfill embedded after deferred stylesheet links.
pub const PRELOAD_JS: &str = include_str!("preload.js");

/// Finds packaged static assets on disk.
pub trait AssetLocator: Send + Sync {
    /// Path of the preload shim script.
    fn preload_script(&self) -> io::Result<PathBuf>;
}

/// Locator for the shim bundled with this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledLocator;

/// Owner-only directory holding the materialized shim, kept for the process lifetime.
static BUNDLED_DIR: OnceLock<(TempDir, PathBuf)> = OnceLock::new();

impl AssetLocator for BundledLocator {
    fn preload_script(&self) -> io::Result<PathBuf> {
        if let Some((_, path)) = BUNDLED_DIR.get() {
            return Ok(path.clone());
        }

        let dir = tempfile::Builder::new().prefix("csslink-").tempdir()?;
        let path = materialize(dir.path(), "preload.js", PRELOAD_JS)?;
        // A racing thread may have won; its directory is the one kept
        Ok(BUNDLED_DIR.get_or_init(|| (dir, path)).1.clone())
    }
}

/// Locator pointing at a user-supplied script.
#[derive(Debug, Clone)]
pub struct FixedLocator(pub PathBuf);

impl AssetLocator for FixedLocator {
    fn preload_script(&self) -> io::Result<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Write `content` to `dir/name` unless it is already there.
///
/// Goes through a temporary file and a rename, so concurrent readers never
/// see a partial script.
fn materialize(dir: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    if std::fs::read(&path).is_ok_and(|existing| existing == content.as_bytes()) {
        return Ok(path);
    }

    std::fs::create_dir_all(dir)?;
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = dir.join(format!(".{name}.{}.{seq}", std::process::id()));
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_locator_writes_shim() {
        let path = BundledLocator.preload_script().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), PRELOAD_JS);
        // Stable across calls
        assert_eq!(BundledLocator.preload_script().unwrap(), path);
    }

    #[test]
    fn test_bundled_locator_uses_private_dir() {
        let path = BundledLocator.preload_script().unwrap();
        let shared = std::env::temp_dir()
            .join(concat!("csslink-", env!("CARGO_PKG_VERSION")))
            .join("preload.js");
        assert_ne!(path, shared);

        let dir = path.parent().unwrap();
        let dir_name = dir.file_name().unwrap().to_string_lossy();
        assert!(dir_name.starts_with("csslink-"));
        assert_ne!(dir_name, concat!("csslink-", env!("CARGO_PKG_VERSION")));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dir).unwrap().permissions().mode();
            assert_eq!(mode & 0o077, 0, "shim directory must not be group/world accessible");
        }
    }

    #[test]
    fn test_materialize_overwrites_stale() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("shim.js"), "old").unwrap();

        let path = materialize(dir.path(), "shim.js", "new").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn test_fixed_locator() {
        let locator = FixedLocator(PathBuf::from("/srv/js/preload.js"));
        assert_eq!(
            locator.preload_script().unwrap(),
            PathBuf::from("/srv/js/preload.js")
        );
    }

    #[test]
    fn test_shim_mentions_preload() {
        assert!(PRELOAD_JS.contains("preload"));
    }
}
