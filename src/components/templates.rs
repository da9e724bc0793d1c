use log::debug;

use crate::errors::ReaderError;
use crate::types::TemplateContext;
use crate::utils::escape_html;

const BASE_TEMPLATE: &str = include_str!("../../static/html/base.html");
const STYLESHEET: &str = include_str!("../../static/css/reader.css");

/// Component for handling HTML template rendering
#[derive(Clone, Default)]
pub struct TemplateComponent;

impl TemplateComponent {
    /// Create a new template component
    pub fn new() -> Self {
        Self
    }

    /// Fill the page shell. Content is spliced in last so nothing inside it is
    /// mistaken for a placeholder.
    pub fn render_shell_template(&self, context: &TemplateContext) -> String {
        let (head, tail) = BASE_TEMPLATE
            .split_once("{{CONTENT}}")
            .unwrap_or((BASE_TEMPLATE, ""));

        let head = head
            .replace("{{STYLE}}", STYLESHEET)
            .replace("{{BODY_CLASS}}", context.body_class)
            .replace("{{TITLE}}", &context.title);

        let mut html = String::with_capacity(head.len() + context.content.len() + tail.len());
        html.push_str(&head);
        html.push_str(&context.content);
        html.push_str(tail);
        html
    }

    /// Page holding a rendered Markdown document; `title` must be HTML-safe
    pub fn render_document_page(&self, title: &str, body: &str) -> String {
        self.render_shell_template(&TemplateContext {
            title: title.to_string(),
            content: body.to_string(),
            body_class: "document",
        })
    }

    /// Page holding a directory listing; `title` is plain text
    pub fn render_listing_page(&self, title: &str, body: &str) -> String {
        self.render_shell_template(&TemplateContext {
            title: escape_html(title),
            content: body.to_string(),
            body_class: "listing",
        })
    }

    /// Complete error page for a failed request
    pub fn render_error_page(&self, error: &ReaderError) -> String {
        debug!("Rendering error page for: {}", error);
        let (heading, message) = match error {
            ReaderError::FileNotFound(path) => (
                "404 - File Not Found",
                format!(
                    "The requested markdown file <code>{}</code> could not be found.",
                    escape_html(path)
                ),
            ),
            ReaderError::TraversalRejected
            | ReaderError::OutsideRoot
            | ReaderError::DirectoryUnreadable(_) => {
                ("403 - Forbidden", escape_html(&forbidden_reason(error)))
            }
            ReaderError::Io(_) => (
                "500 - Internal Server Error",
                "The page could not be rendered.".to_string(),
            ),
        };

        let body = format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">&larr; Back to home</a></p>",
            heading, message
        );
        self.render_shell_template(&TemplateContext {
            title: heading.to_string(),
            content: body,
            body_class: "error",
        })
    }
}

fn forbidden_reason(error: &ReaderError) -> String {
    match error {
        // Keep OS error details out of the page.
        ReaderError::DirectoryUnreadable(_) => "Forbidden: Cannot access directory".to_string(),
        other => other.to_string(),
    }
}
