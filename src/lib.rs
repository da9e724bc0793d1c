//! mdreader - serves a directory of Markdown files as HTML pages
//!
//! Requests map onto the tree under a root directory with clean URLs:
//! `/guides/setup` renders `guides/setup.md`, a directory path shows a
//! listing of its folders and Markdown files, and anything that would leave
//! the root is refused.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::Config;
pub use errors::ReaderError;
pub use types::{AppState, DirEntry, EntryKind, Listing, MarkdownResult, Resolution, TemplateContext};
pub use services::{FileService, MarkdownService, PathService};
pub use components::{ListingComponent, TemplateComponent};

use axum::Router;

/// Router that sends every request, whatever its path or method, to one handler
pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback(handlers::handle_request)
        .with_state(state)
}
