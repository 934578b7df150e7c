//! File system provider.
//!
//! The resolver and renderer never touch `std::fs` directly, so callers can
//! swap in an in-memory or instrumented provider.

use std::io;
use std::path::Path;

/// The three file operations resolution and rendering need.
pub trait FileSystem: Send + Sync {
    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Size in bytes.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Whole file contents. The handle is closed before returning.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl FileSystem for StdFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        std::fs::metadata(path).map(|m| m.len())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for std::sync::Arc<F> {
    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        (**self).size(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}

/// [`StdFs`] that counts every call, for tests asserting on file access.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CountingFs {
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl CountingFs {
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl FileSystem for CountingFs {
    fn is_file(&self, path: &Path) -> bool {
        self.tick();
        StdFs.is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.tick();
        StdFs.is_dir(path)
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        self.tick();
        StdFs.size(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.tick();
        StdFs.read(path)
    }
}
