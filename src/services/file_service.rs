use std::path::Path;
use std::fs;
use log::{debug, info, warn, error};
use crate::errors::ReaderError;
use crate::types::{DirEntry, EntryKind, Listing};

/// How a single directory child shows up in a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryClass {
    Skip,
    Folder(String),
    MarkdownFile(String),
}

/// Decide what to do with a directory child from its name and type.
///
/// Dot entries and `cgi-bin` folders (any case) are skipped; only regular
/// files with the exact `.md` extension are listed as files.
pub fn classify_entry(name: &str, is_dir: bool, is_file: bool) -> EntryClass {
    if name.starts_with('.') {
        return EntryClass::Skip;
    }
    if is_dir {
        if name.eq_ignore_ascii_case("cgi-bin") {
            return EntryClass::Skip;
        }
        return EntryClass::Folder(name.to_string());
    }
    if is_file && Path::new(name).extension().is_some_and(|ext| ext == "md") {
        return EntryClass::MarkdownFile(name.to_string());
    }
    EntryClass::Skip
}

/// Service for handling file system operations
#[derive(Clone, Default)]
pub struct FileService;

impl FileService {
    /// Create a new file service
    pub fn new() -> Self {
        Self
    }

    /// List the folders and Markdown files directly inside `dir`.
    ///
    /// `request_path` is the normalized path the directory was requested
    /// under (empty for the root); entry URLs and paths are built from it.
    pub fn list_directory(&self, dir: &Path, request_path: &str) -> Result<Listing, ReaderError> {
        debug!("Listing directory: {:?} (request path: '{}')", dir, request_path);

        let entries = fs::read_dir(dir).map_err(|e| {
            error!("Failed to read directory {:?}: {}", dir, e);
            ReaderError::DirectoryUnreadable(e)
        })?;

        let url_prefix = if request_path.is_empty() {
            String::new()
        } else {
            format!("/{}", request_path)
        };

        let mut listing = Listing::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    debug!("Skipping non UTF-8 entry name {:?}", raw);
                    continue;
                }
            };
            // Follows symlinks, so a link to a folder lists as a folder.
            let (is_dir, is_file) = match fs::metadata(entry.path()) {
                Ok(meta) => (meta.is_dir(), meta.is_file()),
                Err(e) => {
                    warn!("Failed to stat {:?}: {}", entry.path(), e);
                    continue;
                }
            };

            match classify_entry(&name, is_dir, is_file) {
                EntryClass::Skip => {}
                EntryClass::Folder(name) => listing.folders.push(DirEntry {
                    url: format!("{}/{}", url_prefix, name),
                    name,
                    kind: EntryKind::Folder,
                    path: None,
                }),
                EntryClass::MarkdownFile(name) => {
                    let stem = name.strip_suffix(".md").unwrap_or(&name);
                    let path = if request_path.is_empty() {
                        name.clone()
                    } else {
                        format!("{}/{}", request_path, name)
                    };
                    listing.files.push(DirEntry {
                        url: format!("{}/{}", url_prefix, stem),
                        name,
                        kind: EntryKind::File,
                        path: Some(path),
                    });
                }
            }
        }

        listing.folders.sort_by(|a, b| a.name.cmp(&b.name));
        listing.files.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            "Listed directory {:?}, found {} folders and {} files",
            dir,
            listing.folders.len(),
            listing.files.len()
        );
        Ok(listing)
    }

    /// Read file content
    pub fn read_file(&self, path: &Path) -> Result<String, ReaderError> {
        debug!("Reading file: {:?}", path);
        let content = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read file {:?}: {}", path, e);
            ReaderError::Io(e)
        })?;
        info!("Read file {:?}, {} bytes", path, content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn classification_is_exhaustive() {
        assert_eq!(classify_entry(".git", true, false), EntryClass::Skip);
        assert_eq!(classify_entry(".hidden.md", false, true), EntryClass::Skip);
        assert_eq!(classify_entry("cgi-bin", true, false), EntryClass::Skip);
        assert_eq!(classify_entry("CGI-Bin", true, false), EntryClass::Skip);
        assert_eq!(classify_entry("notes.txt", false, true), EntryClass::Skip);
        assert_eq!(classify_entry("Parsedown.php", false, true), EntryClass::Skip);
        assert_eq!(classify_entry("shout.MD", false, true), EntryClass::Skip);
        assert_eq!(classify_entry("docs", true, false), EntryClass::Folder("docs".into()));
        assert_eq!(classify_entry("notes.md", false, true), EntryClass::MarkdownFile("notes.md".into()));
    }

    #[test]
    fn listing_sorts_bytewise_and_partitions() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for file in ["banana.md", "Apple.md", "notes.txt"] {
            fs::write(root.join(file), "x").unwrap();
        }
        for dir in ["zzz", "aaa", ".git", "cgi-bin"] {
            fs::create_dir(root.join(dir)).unwrap();
        }

        let listing = FileService::new().list_directory(root, "").unwrap();
        assert_eq!(names(&listing.folders), ["aaa", "zzz"]);
        assert_eq!(names(&listing.files), ["Apple.md", "banana.md"]);
    }

    #[test]
    fn urls_drop_the_markdown_extension() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("guides");
        fs::create_dir_all(dir.join("deep")).unwrap();
        fs::write(dir.join("notes.md"), "x").unwrap();

        let listing = FileService::new().list_directory(&dir, "guides").unwrap();
        assert_eq!(
            listing.files,
            vec![DirEntry {
                name: "notes.md".into(),
                url: "/guides/notes".into(),
                kind: EntryKind::File,
                path: Some("guides/notes.md".into()),
            }]
        );
        assert_eq!(listing.folders[0].url, "/guides/deep");
        assert_eq!(listing.folders[0].kind, EntryKind::Folder);
        assert!(listing.folders[0].path.is_none());
    }

    #[test]
    fn root_entries_have_single_slash_urls() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("index.md"), "x").unwrap();
        let listing = FileService::new().list_directory(temp_dir.path(), "").unwrap();
        assert_eq!(listing.files[0].url, "/index");
        assert_eq!(listing.files[0].path.as_deref(), Some("index.md"));
    }

    #[test]
    fn missing_directory_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileService::new().list_directory(&temp_dir.path().join("gone"), "gone");
        assert!(matches!(result, Err(ReaderError::DirectoryUnreadable(_))));
    }

    #[test]
    fn empty_directory_yields_empty_listing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FileService::new().list_directory(temp_dir.path(), "").unwrap().is_empty());
    }
}
