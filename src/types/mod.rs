use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config: Arc::new(config) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

/// Directory entry information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File or folder name as it appears on disk
    pub name: String,
    /// Clean URL, `.md` stripped for files
    pub url: String,
    pub kind: EntryKind,
    /// Relative path of the underlying file; `None` for folders
    pub path: Option<String>,
}

/// Visible contents of one directory, each half sorted by name
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub folders: Vec<DirEntry>,
    pub files: Vec<DirEntry>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// What a request path refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    RootListing { dir: PathBuf },
    DirectoryListing { request_path: String, dir: PathBuf },
    Document { request_path: String, file: PathBuf },
}

/// Markdown rendering result
#[derive(Debug, Clone)]
pub struct MarkdownResult {
    pub html: String,
    /// Text of the first `<h1>`, still HTML-escaped
    pub title: Option<String>,
}

/// Template rendering context
#[derive(Debug, Clone)]
pub struct TemplateContext {
    /// Already HTML-safe
    pub title: String,
    pub content: String,
    pub body_class: &'static str,
}
