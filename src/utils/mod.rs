use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters that cannot appear raw inside one URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape HTML attribute values
pub fn escape_attr(text: &str) -> String {
    escape_html(text)
}

/// Percent-encode each segment of a slash-separated URL path
pub fn encode_url_path(url: &str) -> String {
    url.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Turn the last segment of a request path into a display title:
/// `getting-started_guide` becomes `Getting Started Guide`.
pub fn title_from_path(request_path: &str) -> String {
    let segment = request_path.rsplit('/').next().unwrap_or_default();
    let spaced = segment.replace(['-', '_'], " ");

    let mut title = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        if at_word_start {
            title.push(ch.to_ascii_uppercase());
        } else {
            title.push(ch);
        }
        at_word_start = matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C');
    }
    title
}
