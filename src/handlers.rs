use axum::{
    extract::State,
    http::Uri,
    response::Html,
};

use crate::config::Config;
use crate::errors::ReaderError;
use crate::types::{AppState, Resolution};
use crate::utils::{escape_html, title_from_path};
use crate::services::{FileService, MarkdownService, PathService};
use crate::components::{ListingComponent, TemplateComponent};

/// Single entry point for every path and method
pub async fn handle_request(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Html<String>, ReaderError> {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    log::info!("Request received: '{}'", target);

    let start_time = std::time::Instant::now();
    let result = serve(&state.config, target);
    let duration = start_time.elapsed();

    match &result {
        Ok(_) => log::info!("Served '{}' in {}ms", target, duration.as_millis()),
        Err(e) => log::warn!("Request '{}' failed with {}: {}", target, e.status(), e),
    }
    result.map(Html)
}

/// Resolve `target` against the configured root and build the full page
pub fn serve(config: &Config, target: &str) -> Result<String, ReaderError> {
    let paths = PathService::new(config.root_dir.clone(), config.entry_prefix.clone());

    match paths.resolve(target)? {
        Resolution::RootListing { dir } => render_directory_listing(&dir, ""),
        Resolution::DirectoryListing { request_path, dir } => {
            render_directory_listing(&dir, &request_path)
        }
        Resolution::Document { request_path, file } => {
            let content = FileService::new().read_file(&file)?;
            let result = MarkdownService::new().render(&content);
            let title = result
                .title
                .unwrap_or_else(|| escape_html(&title_from_path(&request_path)));
            log::debug!("Serving document '{}' titled '{}'", request_path, title);
            Ok(TemplateComponent::new().render_document_page(&title, &result.html))
        }
    }
}

/// Render directory listing HTML
fn render_directory_listing(dir: &std::path::Path, request_path: &str) -> Result<String, ReaderError> {
    let listing = FileService::new().list_directory(dir, request_path)?;
    let component = ListingComponent::new();
    let body = component.build_listing_html(request_path, &listing);
    log::debug!("Serving directory listing for: '{}'", request_path);
    Ok(TemplateComponent::new().render_listing_page(&component.title(request_path), &body))
}
