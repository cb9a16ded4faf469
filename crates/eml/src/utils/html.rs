//! HTML helpers for rendering email bodies

use log::warn;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b.*?</script>").expect("script regex must compile"))
}

fn iframe_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<iframe\b.*?</iframe>").expect("iframe regex must compile"))
}

fn event_handler_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)on\w+="[^"]*""#).expect("handler regex must compile"))
}

fn javascript_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)javascript:").expect("javascript regex must compile"))
}

/// Strip the most common script vectors from an email body
///
/// This is a narrow filter, not a sanitizer in the allow-list sense. It
/// removes, case-insensitively and in this order:
/// - `<script ...>...</script>` blocks, up to the first closing tag
/// - `<iframe ...>...</iframe>` blocks, up to the first closing tag
/// - `on<word>="..."` attributes
/// - the substring `javascript:`
///
/// Each step is a single left-to-right pass over the previous step's output.
pub fn sanitize_html(html: &str) -> String {
    let html = script_re().replace_all(html, "");
    let html = iframe_re().replace_all(&html, "");
    let html = event_handler_re().replace_all(&html, "");
    javascript_url_re().replace_all(&html, "").into_owned()
}

/// Wrap every case-insensitive occurrence of `keyword` in `<mark>`
///
/// The keyword is matched literally and the matched text keeps its
/// original casing. An empty keyword or text returns the text as is.
pub fn highlight_keyword(text: &str, keyword: &str) -> String {
    if text.is_empty() || keyword.is_empty() {
        return text.to_string();
    }

    match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(text, "<mark>$0</mark>").into_owned(),
        Err(e) => {
            warn!("Cannot highlight keyword {:?}: {}", keyword, e);
            text.to_string()
        }
    }
}
