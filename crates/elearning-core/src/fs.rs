//! Storage abstraction over a package root.
//!
//! [`FileAccess`] gives parsers a uniform, case-insensitive, read-only view
//! over a package regardless of whether it lives on disk, inside a ZIP
//! archive, or behind a remote object store. Production code uses
//! [`DirectoryFileAccess`] or [`ZipFileAccess`]; tests use [`MockFileAccess`].

use crate::error::FileAccessError;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Opaque identifier for where a package lives. Semantics depend on the
/// `FileAccess` variant that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPath(pub String);

impl fmt::Display for RootPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalize a path for case-insensitive, separator-insensitive comparison:
/// lowercase, forward slashes, no leading slash.
fn normalize_key(path: &str) -> String {
    path.trim_start_matches(['/', '\\'])
        .replace('\\', "/")
        .to_lowercase()
}

/// Uniform random-access read over a package, addressed by paths relative to
/// the package root.
pub trait FileAccess: Send + Sync + fmt::Debug {
    /// True iff some stored entry matches `path`, case-insensitively.
    fn exists(&self, path: &str) -> bool {
        self.resolve_case(path).is_some()
    }

    /// All entries stored under `dir` (empty string means the root),
    /// in their stored casing. Order is not guaranteed.
    fn list(&self, dir: &str) -> Vec<String>;

    /// Open an independent byte stream for `path`. Every call yields its own
    /// reader; implementations must not share state across open streams.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, FileAccessError>;

    /// Where this access was rooted.
    fn root(&self) -> RootPath;

    /// Return the stored-casing form of `path` if a matching entry exists.
    fn resolve_case(&self, path: &str) -> Option<String>;

    /// A real filesystem path for `path`, if this variant is backed by
    /// one. Used only by the opt-in XSD validator (`xmlSchemaValidateFile`
    /// needs a path, not a byte buffer); archive/remote/mock variants
    /// return `None` and callers spill to a scratch file instead.
    fn local_path(&self, _path: &str) -> Option<PathBuf> {
        None
    }
}

/// A package laid out as a plain directory on local disk.
#[derive(Debug)]
pub struct DirectoryFileAccess {
    root: PathBuf,
    index: std::collections::HashMap<String, String>,
}

impl DirectoryFileAccess {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, FileAccessError> {
        let root = root.into();
        let mut index = std::collections::HashMap::new();
        for entry in walkdir::WalkDir::new(&root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
        {
            let rel = entry
                .path()
                .strip_prefix(&root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            index.insert(normalize_key(&rel), rel);
        }
        Ok(Self { root, index })
    }
}

impl FileAccess for DirectoryFileAccess {
    fn list(&self, dir: &str) -> Vec<String> {
        let prefix = normalize_key(dir);
        self.index
            .iter()
            .filter(|(k, _)| prefix.is_empty() || k.starts_with(&prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, FileAccessError> {
        let stored = self
            .resolve_case(path)
            .ok_or_else(|| FileAccessError::NotFound {
                root: self.root.display().to_string(),
                path: path.to_string(),
            })?;
        let full = self.root.join(&stored);
        let file = std::fs::File::open(&full).map_err(|source| FileAccessError::Io {
            path: path.to_string(),
            source,
        })?;
        Ok(Box::new(file))
    }

    fn root(&self) -> RootPath {
        RootPath(self.root.display().to_string())
    }

    fn resolve_case(&self, path: &str) -> Option<String> {
        self.index.get(&normalize_key(path)).cloned()
    }

    fn local_path(&self, path: &str) -> Option<PathBuf> {
        self.resolve_case(path).map(|stored| self.root.join(stored))
    }
}

/// A package packed into a ZIP archive.
///
/// `zip::ZipArchive` readers borrow the underlying file mutably, so rather
/// than hold one archive handle across calls, every [`open`](FileAccess::open)
/// reopens the archive file and seeks to the requested entry.
#[derive(Debug)]
pub struct ZipFileAccess {
    archive_path: PathBuf,
    index: std::collections::HashMap<String, String>,
}

impl ZipFileAccess {
    pub fn open(archive_path: impl Into<PathBuf>) -> Result<Self, FileAccessError> {
        let archive_path = archive_path.into();
        let file = std::fs::File::open(&archive_path).map_err(|source| FileAccessError::Io {
            path: archive_path.display().to_string(),
            source,
        })?;
        let archive = zip::ZipArchive::new(file).map_err(|e| FileAccessError::Io {
            path: archive_path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        })?;
        let mut index = std::collections::HashMap::new();
        for name in archive.file_names() {
            index.insert(normalize_key(name), name.to_string());
        }
        Ok(Self {
            archive_path,
            index,
        })
    }
}

impl FileAccess for ZipFileAccess {
    fn list(&self, dir: &str) -> Vec<String> {
        let prefix = normalize_key(dir);
        self.index
            .iter()
            .filter(|(k, _)| prefix.is_empty() || k.starts_with(&prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, FileAccessError> {
        let stored = self
            .resolve_case(path)
            .ok_or_else(|| FileAccessError::NotFound {
                root: self.archive_path.display().to_string(),
                path: path.to_string(),
            })?;
        let file = std::fs::File::open(&self.archive_path).map_err(|source| FileAccessError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| FileAccessError::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
        })?;
        let mut entry = archive
            .by_name(&stored)
            .map_err(|e| FileAccessError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
            })?;
        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|source| FileAccessError::Io {
                path: path.to_string(),
                source,
            })?;
        Ok(Box::new(std::io::Cursor::new(buf)))
    }

    fn root(&self) -> RootPath {
        RootPath(self.archive_path.display().to_string())
    }

    fn resolve_case(&self, path: &str) -> Option<String> {
        self.index.get(&normalize_key(path)).cloned()
    }
}

/// Object-storage capability a remote `FileAccess` is layered over. Kept
/// minimal and SDK-agnostic; a real S3 (or similar) client is a
/// caller-supplied implementation, not something this crate ships.
pub trait RemoteObjectStore: Send + Sync + fmt::Debug {
    fn list_with_prefix(&self, prefix: &str) -> Vec<String>;
    fn get(&self, key: &str) -> Result<Vec<u8>, FileAccessError>;
    fn bucket(&self) -> &str;
}

/// A package whose entries live behind a [`RemoteObjectStore`].
#[derive(Debug)]
pub struct RemoteFileAccess {
    store: Box<dyn RemoteObjectStore>,
    index: std::collections::HashMap<String, String>,
}

impl RemoteFileAccess {
    pub fn new(store: Box<dyn RemoteObjectStore>) -> Self {
        let mut index = std::collections::HashMap::new();
        for key in store.list_with_prefix("") {
            index.insert(normalize_key(&key), key);
        }
        Self { store, index }
    }
}

impl FileAccess for RemoteFileAccess {
    fn list(&self, dir: &str) -> Vec<String> {
        let prefix = normalize_key(dir);
        self.index
            .iter()
            .filter(|(k, _)| prefix.is_empty() || k.starts_with(&prefix))
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, FileAccessError> {
        let stored = self
            .resolve_case(path)
            .ok_or_else(|| FileAccessError::NotFound {
                root: self.store.bucket().to_string(),
                path: path.to_string(),
            })?;
        let bytes = self.store.get(&stored)?;
        Ok(Box::new(std::io::Cursor::new(bytes)))
    }

    fn root(&self) -> RootPath {
        RootPath(self.store.bucket().to_string())
    }

    fn resolve_case(&self, path: &str) -> Option<String> {
        self.index.get(&normalize_key(path)).cloned()
    }
}

/// In-memory `FileAccess` for tests; mirrors a real package's shape without
/// touching disk.
#[derive(Debug, Default)]
pub struct MockFileAccess {
    files: std::collections::HashMap<String, Vec<u8>>,
    root: String,
}

impl MockFileAccess {
    pub fn new() -> Self {
        Self {
            files: std::collections::HashMap::new(),
            root: "mock://package".to_string(),
        }
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileAccess for MockFileAccess {
    fn list(&self, dir: &str) -> Vec<String> {
        let prefix = normalize_key(dir);
        self.files
            .keys()
            .filter(|k| prefix.is_empty() || normalize_key(k).starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>, FileAccessError> {
        let stored = self
            .resolve_case(path)
            .ok_or_else(|| FileAccessError::NotFound {
                root: self.root.clone(),
                path: path.to_string(),
            })?;
        let bytes = self.files.get(&stored).expect("resolved key must exist").clone();
        Ok(Box::new(std::io::Cursor::new(bytes)))
    }

    fn root(&self) -> RootPath {
        RootPath(self.root.clone())
    }

    fn resolve_case(&self, path: &str) -> Option<String> {
        let key = normalize_key(path);
        self.files
            .keys()
            .find(|k| normalize_key(k) == key)
            .cloned()
    }
}

/// Read every byte of `path` through a [`FileAccess`], releasing the stream
/// as soon as the read completes.
pub fn read_all(access: &dyn FileAccess, path: &str) -> Result<Vec<u8>, FileAccessError> {
    let mut stream = access.open(path)?;
    let mut buf = Vec::new();
    stream
        .read_to_end(&mut buf)
        .map_err(|source| FileAccessError::Io {
            path: path.to_string(),
            source,
        })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_case_insensitive_lookup() {
        let mock = MockFileAccess::new().with_file("IMSManifest.xml", "<manifest/>");
        assert!(mock.exists("imsmanifest.xml"));
        assert_eq!(mock.resolve_case("imsmanifest.xml").unwrap(), "IMSManifest.xml");
    }

    #[test]
    fn mock_missing_file_is_not_found() {
        let mock = MockFileAccess::new();
        let err = mock.open("nope.xml").unwrap_err();
        assert!(matches!(err, FileAccessError::NotFound { .. }));
    }

    #[test]
    fn mock_list_filters_by_prefix() {
        let mock = MockFileAccess::new()
            .with_file("imsmanifest.xml", "a")
            .with_file("assets/index.html", "b")
            .with_file("assets/style.css", "c");
        let assets = mock.list("assets");
        assert_eq!(assets.len(), 2);
    }

    #[test]
    fn read_all_consumes_the_stream() {
        let mock = MockFileAccess::new().with_file("cmi5.xml", "<course/>");
        let bytes = read_all(&mock, "cmi5.xml").unwrap();
        assert_eq!(bytes, b"<course/>");
    }

    #[test]
    fn directory_file_access_indexes_nested_entries() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("assets")).unwrap();
        std::fs::write(temp.path().join("imsmanifest.xml"), "<manifest/>").unwrap();
        std::fs::write(temp.path().join("assets/index.html"), "<html/>").unwrap();

        let access = DirectoryFileAccess::open(temp.path()).unwrap();
        assert!(access.exists("IMSMANIFEST.XML"));
        assert!(access.exists("assets/index.html"));
        let bytes = read_all(&access, "imsmanifest.xml").unwrap();
        assert_eq!(bytes, b"<manifest/>");
    }
}
