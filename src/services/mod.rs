pub mod file_service;
pub mod markdown_service;
pub mod path_service;

pub use file_service::FileService;
pub use markdown_service::MarkdownService;
pub use path_service::PathService;
