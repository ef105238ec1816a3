use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Readable asset stream.
pub type AssetStream = Box<dyn Read + Send>;

/// Location of a resolved asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetUrl {
    /// Entry of the primary lookup that has no filesystem path (e.g. an embedded bundle).
    Resource(String),
    /// File on disk.
    File(PathBuf),
}

impl fmt::Display for AssetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetUrl::Resource(name) => write!(f, "resource:/{name}"),
            AssetUrl::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

/// Primary, classpath-like resource lookup.
///
/// Names always use `/` as separator and already carry the resolver's path
/// prefix. Absence is `Ok(None)`; `Err` is reserved for real I/O failures,
/// which abort resolution instead of falling through to search directories.
pub trait ResourceLookup: Send + Sync {
    fn open(&self, name: &str) -> io::Result<Option<AssetStream>>;

    fn url(&self, name: &str) -> io::Result<Option<AssetUrl>>;
}

/// Lookup rooted at a directory on disk, the desktop stand-in for a classpath root.
#[derive(Debug, Clone)]
pub struct DirectoryLookup {
    root: PathBuf,
}

impl DirectoryLookup {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file(&self, name: &str) -> Option<PathBuf> {
        let path = join_under(&self.root, name);
        path.is_file().then_some(path)
    }
}

impl ResourceLookup for DirectoryLookup {
    fn open(&self, name: &str) -> io::Result<Option<AssetStream>> {
        match self.file(name) {
            Some(path) => Ok(Some(Box::new(File::open(path)?))),
            None => Ok(None),
        }
    }

    fn url(&self, name: &str) -> io::Result<Option<AssetUrl>> {
        match self.file(name) {
            Some(path) => Ok(Some(AssetUrl::File(path.canonicalize()?))),
            None => Ok(None),
        }
    }
}

/// Joins `name` onto `dir`, dropping any root or drive prefix so the result
/// stays under `dir` even for absolute names.
pub(crate) fn join_under(dir: &Path, name: &str) -> PathBuf {
    let relative: PathBuf = Path::new(name)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    dir.join(relative)
}

/// In-memory bundle of named resources (e.g. built with `include_bytes!`).
#[derive(Debug, Clone, Default)]
pub struct EmbeddedLookup {
    entries: HashMap<String, Arc<[u8]>>,
}

impl EmbeddedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces `name`. Names are full lookup names, prefix included.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> &mut Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// `Read` over a shared byte slice, so opening an entry never copies it.
struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl ResourceLookup for EmbeddedLookup {
    fn open(&self, name: &str) -> io::Result<Option<AssetStream>> {
        Ok(self
            .entries
            .get(name)
            .map(|bytes| Box::new(Cursor::new(SharedBytes(Arc::clone(bytes)))) as AssetStream))
    }

    fn url(&self, name: &str) -> io::Result<Option<AssetUrl>> {
        Ok(self.contains(name).then(|| AssetUrl::Resource(name.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(mut stream: AssetStream) -> Vec<u8> {
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn embedded_entries_open_and_report_resource_urls() {
        let mut lookup = EmbeddedLookup::new();
        lookup.insert("assets/a.txt", b"hello".to_vec());

        let stream = lookup.open("assets/a.txt").unwrap().unwrap();
        assert_eq!(read_all(stream), b"hello");
        assert_eq!(
            lookup.url("assets/a.txt").unwrap(),
            Some(AssetUrl::Resource("assets/a.txt".into()))
        );
        assert!(lookup.open("assets/missing.txt").unwrap().is_none());
    }

    #[test]
    fn directory_lookup_ignores_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/file.bin"), [1u8, 2, 3]).unwrap();

        let lookup = DirectoryLookup::new(dir.path());
        assert!(lookup.open("sub").unwrap().is_none());
        assert!(lookup.open("nope.bin").unwrap().is_none());
        assert_eq!(read_all(lookup.open("sub/file.bin").unwrap().unwrap()), vec![1, 2, 3]);

        let url = lookup.url("sub/file.bin").unwrap().unwrap();
        assert!(matches!(url, AssetUrl::File(p) if p.is_absolute()));
    }

    #[test]
    fn directory_lookup_keeps_absolute_names_under_root() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("inside.txt"), b"in").unwrap();
        std::fs::write(outside.path().join("secret.txt"), b"out").unwrap();

        let lookup = DirectoryLookup::new(root.path());
        assert_eq!(read_all(lookup.open("/inside.txt").unwrap().unwrap()), b"in");

        let escaped = outside.path().join("secret.txt");
        let escaped = escaped.to_str().unwrap();
        assert!(lookup.open(escaped).unwrap().is_none());
        assert!(lookup.url(escaped).unwrap().is_none());
    }
}
