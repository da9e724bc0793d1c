use log::debug;

use crate::types::{DirEntry, Listing};
use crate::utils::{encode_url_path, escape_attr, escape_html, title_from_path};

const ROOT_TITLE: &str = "Markdown Reader";

/// Component that turns a directory listing into page content
#[derive(Clone, Default)]
pub struct ListingComponent;

impl ListingComponent {
    /// Create a new listing component
    pub fn new() -> Self {
        debug!("Creating new ListingComponent");
        Self
    }

    /// Plain-text page title for a listing of `request_path`
    pub fn title(&self, request_path: &str) -> String {
        if request_path.is_empty() {
            ROOT_TITLE.to_string()
        } else {
            title_from_path(request_path)
        }
    }

    /// Build the listing HTML: heading, breadcrumb, then folders and files
    pub fn build_listing_html(&self, request_path: &str, listing: &Listing) -> String {
        let mut html = String::new();
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&self.title(request_path))));

        if !request_path.is_empty() {
            html.push_str(&self.build_breadcrumb(request_path));
        }

        if listing.is_empty() {
            let hint = if request_path.is_empty() {
                "No markdown files or folders found. Create a <code>.md</code> file or folder to get started."
            } else {
                "No markdown files or folders found in this directory."
            };
            html.push_str(&format!("<p class=\"empty\">{}</p>\n", hint));
            return html;
        }

        if !listing.folders.is_empty() {
            html.push_str("<h2>Folders</h2>\n<ul>\n");
            for folder in &listing.folders {
                html.push_str(&format!(
                    "  <li class=\"folder\"><a href=\"{}\">📁 {}</a></li>\n",
                    href(folder),
                    escape_html(&folder.name)
                ));
            }
            html.push_str("</ul>\n");
        }

        if !listing.files.is_empty() {
            html.push_str("<h2>Files</h2>\n<ul>\n");
            for file in &listing.files {
                html.push_str(&format!(
                    "  <li class=\"file\"><a href=\"{}\">{}</a><span class=\"path\">{}</span></li>\n",
                    href(file),
                    escape_html(&file.name),
                    escape_html(file.path.as_deref().unwrap_or_default())
                ));
            }
            html.push_str("</ul>\n");
        }

        html
    }

    /// `Home / Parent / Current`, every ancestor linked
    fn build_breadcrumb(&self, request_path: &str) -> String {
        let mut crumbs = vec!["<a href=\"/\">Home</a>".to_string()];
        let segments: Vec<&str> = request_path.split('/').collect();
        for (idx, segment) in segments.iter().enumerate() {
            let label = escape_html(&title_from_path(segment));
            if idx + 1 == segments.len() {
                crumbs.push(label);
            } else {
                let url = format!("/{}", segments[..=idx].join("/"));
                crumbs.push(format!("<a href=\"{}\">{}</a>", escape_attr(&encode_url_path(&url)), label));
            }
        }
        format!("<div class=\"breadcrumb\">{}</div>\n", crumbs.join(" / "))
    }
}

fn href(entry: &DirEntry) -> String {
    escape_attr(&encode_url_path(&entry.url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;

    fn folder(name: &str, url: &str) -> DirEntry {
        DirEntry { name: name.into(), url: url.into(), kind: EntryKind::Folder, path: None }
    }

    fn file(name: &str, url: &str, path: &str) -> DirEntry {
        DirEntry { name: name.into(), url: url.into(), kind: EntryKind::File, path: Some(path.into()) }
    }

    #[test]
    fn root_listing_has_no_breadcrumb() {
        let listing = Listing { folders: vec![folder("docs", "/docs")], files: vec![] };
        let html = ListingComponent::new().build_listing_html("", &listing);
        assert!(html.starts_with("<h1>Markdown Reader</h1>"));
        assert!(!html.contains("breadcrumb"));
        assert!(html.contains("<a href=\"/docs\">📁 docs</a>"));
        assert!(!html.contains("<h2>Files</h2>"));
    }

    #[test]
    fn nested_listing_links_ancestors() {
        let listing = Listing {
            folders: vec![],
            files: vec![file("my notes.md", "/user-guides/setup/my notes", "user-guides/setup/my notes.md")],
        };
        let html = ListingComponent::new().build_listing_html("user-guides/setup", &listing);
        assert!(html.starts_with("<h1>Setup</h1>"));
        assert!(html.contains(
            "<div class=\"breadcrumb\"><a href=\"/\">Home</a> / <a href=\"/user-guides\">User Guides</a> / Setup</div>"
        ));
        assert!(html.contains("<a href=\"/user-guides/setup/my%20notes\">my notes.md</a>"));
        assert!(html.contains("<span class=\"path\">user-guides/setup/my notes.md</span>"));
    }

    #[test]
    fn empty_listing_shows_a_hint() {
        let html = ListingComponent::new().build_listing_html("", &Listing::default());
        assert!(html.contains("class=\"empty\""));
        assert!(!html.contains("<ul>"));
    }
}
