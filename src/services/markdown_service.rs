use std::collections::HashSet;
use std::sync::LazyLock;

use log::debug;
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};

use crate::types::MarkdownResult;
use crate::utils::escape_attr;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").expect("heading pattern")
});

static FIRST_H1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("h1 pattern")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

static TABLE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<table[^>]*>").expect("table open pattern")
});

static TABLE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</table>").expect("table close pattern")
});

/// Anchor ids already handed out within one document
#[derive(Debug, Default)]
pub struct HeadingIds {
    used: HashSet<String>,
}

impl HeadingIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `base`, or the first free `base-1`, `base-2`, ... when taken.
    ///
    /// An empty base is a key like any other: the first empty heading keeps
    /// `""`, later ones get `-1`, `-2`.
    pub fn assign(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut counter = 1usize;
        while self.used.contains(&id) {
            id = format!("{}-{}", base, counter);
            counter += 1;
        }
        self.used.insert(id.clone());
        id
    }
}

/// Service for handling markdown rendering
#[derive(Clone, Default)]
pub struct MarkdownService;

impl MarkdownService {
    /// Create a new markdown service
    pub fn new() -> Self {
        Self
    }

    /// Render a Markdown document to annotated HTML and pick out its title
    pub fn render(&self, content: &str) -> MarkdownResult {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut rendered = String::with_capacity(content.len() * 3 / 2);
        html::push_html(&mut rendered, Parser::new_ext(content, options));

        let mut ids = HeadingIds::new();
        let annotated = annotate_headings(&rendered, &mut ids);
        let html = wrap_tables(&annotated);
        let title = extract_title(&html);

        debug!("Rendered {} bytes of markdown into {} bytes of HTML", content.len(), html.len());
        MarkdownResult { html, title }
    }
}

/// Remove every tag, keeping the text between them
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Create URL-friendly slug from heading text
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let c = ch.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else if matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C' | '_' | '-') {
            if !out.ends_with('-') {
                out.push('-');
            }
        }
    }
    out.trim_matches('-').to_string()
}

/// Give every `<h1>`..`<h6>` a unique `id`, in document order.
///
/// The opening tag is rewritten so it carries only the `id`; inner markup is
/// kept verbatim.
pub fn annotate_headings(html: &str, ids: &mut HeadingIds) -> String {
    HEADING_RE
        .replace_all(html, |caps: &Captures| {
            let level = &caps[1];
            let inner = &caps[2];
            let id = ids.assign(&slugify(&strip_tags(inner)));
            format!("<h{} id=\"{}\">{}</h{}>", level, escape_attr(&id), inner, level)
        })
        .into_owned()
}

/// Put each table inside a horizontally scrollable wrapper
pub fn wrap_tables(html: &str) -> String {
    let opened = TABLE_OPEN_RE.replace_all(html, "<div class=\"table-wrapper\">${0}");
    TABLE_CLOSE_RE.replace_all(&opened, "</table></div>").into_owned()
}

/// Text of the first `<h1>`, if there is one with any text in it
pub fn extract_title(html: &str) -> Option<String> {
    let caps = FIRST_H1_RE.captures(html)?;
    let text = strip_tags(&caps[1]);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_match_anchor_conventions() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Multiple   Spaces_here "), "multiple-spaces-here");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("a-!-b"), "a-b");
        assert_eq!(slugify("snake__case"), "snake-case");
        assert_eq!(slugify("Café 2024"), "caf-2024");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn duplicate_headings_get_numbered() {
        let mut ids = HeadingIds::new();
        let html = annotate_headings("<h2>Intro</h2>\n<h3>Intro</h3>\n<h1>Intro</h1>", &mut ids);
        assert_eq!(
            html,
            "<h2 id=\"intro\">Intro</h2>\n<h3 id=\"intro-1\">Intro</h3>\n<h1 id=\"intro-2\">Intro</h1>"
        );
    }

    #[test]
    fn suffix_picks_the_smallest_unused_number() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.assign("intro-1"), "intro-1");
        assert_eq!(ids.assign("intro"), "intro");
        assert_eq!(ids.assign("intro"), "intro-2");
    }

    #[test]
    fn empty_slugs_are_deduplicated_too() {
        let mut ids = HeadingIds::new();
        let html = annotate_headings("<h2>!!!</h2><h2>???</h2><h2>***</h2>", &mut ids);
        assert_eq!(html, "<h2 id=\"\">!!!</h2><h2 id=\"-1\">???</h2><h2 id=\"-2\">***</h2>");
    }

    #[test]
    fn existing_attributes_are_replaced_and_inner_markup_kept() {
        let mut ids = HeadingIds::new();
        let html = annotate_headings(
            "<h2 class=\"x\" id=\"old\">Using <code>cargo_run</code></h2>",
            &mut ids,
        );
        assert_eq!(html, "<h2 id=\"using-cargo-run\">Using <code>cargo_run</code></h2>");
    }

    #[test]
    fn each_render_starts_with_fresh_ids() {
        let service = MarkdownService::new();
        let first = service.render("# Intro\n");
        let second = service.render("# Intro\n");
        assert_eq!(first.html, second.html);
        assert!(second.html.contains("<h1 id=\"intro\">Intro</h1>"));
    }

    #[test]
    fn tables_are_wrapped() {
        assert_eq!(
            wrap_tables("<table><tr>...</tr></table>"),
            "<div class=\"table-wrapper\"><table><tr>...</tr></table></div>"
        );
        assert_eq!(
            wrap_tables("<TABLE class=\"t\"></TABLE>"),
            "<div class=\"table-wrapper\"><TABLE class=\"t\"></table></div>"
        );
    }

    #[test]
    fn rendered_markdown_tables_are_wrapped() {
        let result = MarkdownService::new().render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(result.html.starts_with("<div class=\"table-wrapper\"><table>"));
        assert!(result.html.trim_end().ends_with("</table></div>"));
    }

    #[test]
    fn title_comes_from_the_first_h1() {
        let result = MarkdownService::new().render("## Before\n\n# The *Real* Title\n\n# Second\n");
        assert_eq!(result.title.as_deref(), Some("The Real Title"));
    }

    #[test]
    fn no_h1_means_no_title() {
        let result = MarkdownService::new().render("## Only a subsection\n");
        assert!(result.title.is_none());
    }

    #[test]
    fn headings_are_annotated_once_per_render() {
        let result = MarkdownService::new().render("# Intro\n\n## Intro\n\n### Usage\n");
        assert!(result.html.contains("<h1 id=\"intro\">Intro</h1>"));
        assert!(result.html.contains("<h2 id=\"intro-1\">Intro</h2>"));
        assert!(result.html.contains("<h3 id=\"usage\">Usage</h3>"));
        assert_eq!(result.html.matches(" id=\"").count(), 3);
    }
}
