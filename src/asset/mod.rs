//! Resolved stylesheet assets.
//!
//! # Module Structure
//!
//! - `fs` - File system provider used for probing and reading
//! - `resolve` - Alias table → resolved asset table

pub mod fs;
pub mod resolve;

pub use fs::{FileSystem, StdFs};
pub use resolve::Resolver;

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// What an alias resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    /// File under `css_root`.
    Local {
        path: PathBuf,
        /// Path relative to `css_root`, used to build the href.
        name: String,
        /// Size on disk at resolution time.
        size: u64,
    },
    /// Remote stylesheet, never fetched.
    Remote { url: String },
}

impl Asset {
    /// Filesystem path, `None` for remote assets.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local { path, .. } => Some(path),
            Self::Remote { .. } => None,
        }
    }

    /// Relative name for local files, the URL for remote ones.
    pub fn canonical_name(&self) -> &str {
        match self {
            Self::Local { name, .. } => name,
            Self::Remote { url } => url,
        }
    }

    /// Byte size; always 0 for remote assets.
    pub fn byte_size(&self) -> u64 {
        match self {
            Self::Local { size, .. } => *size,
            Self::Remote { .. } => 0,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

/// Alias name → resolved asset. Disabled aliases are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTable {
    assets: FxHashMap<String, Asset>,
}

impl ResolvedTable {
    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Entries sorted by alias name.
    pub fn sorted(&self) -> Vec<(&str, &Asset)> {
        let mut entries: Vec<_> = self.assets.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_unstable_by_key(|(name, _)| *name);
        entries
    }

    pub(crate) fn insert(&mut self, name: String, asset: Asset) {
        self.assets.insert(name, asset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let local = Asset::Local {
            path: PathBuf::from("/srv/css/reset.min.css"),
            name: "reset.min.css".into(),
            size: 120,
        };
        assert_eq!(local.local_path(), Some(Path::new("/srv/css/reset.min.css")));
        assert_eq!(local.canonical_name(), "reset.min.css");
        assert_eq!(local.byte_size(), 120);
        assert!(!local.is_remote());

        let remote = Asset::Remote {
            url: "//cdn.example.com/a.css".into(),
        };
        assert_eq!(remote.local_path(), None);
        assert_eq!(remote.canonical_name(), "//cdn.example.com/a.css");
        assert_eq!(remote.byte_size(), 0);
        assert!(remote.is_remote());
    }

    #[test]
    fn test_sorted() {
        let mut table = ResolvedTable::default();
        table.insert("b".into(), Asset::Remote { url: "//b".into() });
        table.insert("a".into(), Asset::Remote { url: "//a".into() });
        let names: Vec<_> = table.sorted().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
