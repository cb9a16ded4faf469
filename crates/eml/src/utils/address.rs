//! Parsing for `Name <addr@host>` style address strings

use regex::Regex;
use std::sync::OnceLock;

/// Default number of recipients shown by [`format_recipients`]
pub const DEFAULT_MAX_RECIPIENTS: usize = 3;

fn angle_address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([^>]+)>").expect("address regex must compile"))
}

fn named_address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)\s*<([^>]+)>$").expect("named address regex must compile"))
}

/// The address inside the first non-empty `<...>`, or the trimmed input
pub fn extract_email(input: &str) -> String {
    match angle_address_re().captures(input) {
        Some(caps) => caps[1].to_string(),
        None => input.trim().to_string(),
    }
}

/// Split `Name <addr>` into its name and address parts
///
/// The string must end in `>` with a non-empty name before the `<`.
fn split_named_address(input: &str) -> Option<(&str, &str)> {
    let caps = named_address_re().captures(input)?;
    let name = caps.get(1)?.as_str();
    let address = caps.get(2)?.as_str();
    Some((name, address))
}

/// Display name for an address string
///
/// `"Jane Doe" <jane@x.com>` gives `Jane Doe`. Quotes are stripped from the
/// name, and an empty name falls back to the address. Strings without a
/// trailing `<...>` are returned trimmed.
pub fn get_email_display_name(input: &str) -> String {
    match split_named_address(input) {
        Some((name, address)) => {
            let name: String = name
                .trim()
                .chars()
                .filter(|c| *c != '"' && *c != '\'')
                .collect();
            if name.is_empty() {
                address.to_string()
            } else {
                name
            }
        }
        None => input.trim().to_string(),
    }
}

/// Shape check for `local@domain.tld`
///
/// No whitespace, exactly one `@`, and a dot in the domain with text on
/// both sides of it.
pub fn is_valid_email(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .match_indices('.')
        .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
}

/// Comma-joined display names, capped at `max_display` entries
///
/// A truncated list ends with ` +K more`, K being the entries left out.
pub fn format_recipients<S: AsRef<str>>(recipients: &[S], max_display: usize) -> String {
    let shown: Vec<String> = recipients
        .iter()
        .take(max_display)
        .map(|r| get_email_display_name(r.as_ref()))
        .collect();
    let mut out = shown.join(", ");

    let hidden = recipients.len().saturating_sub(max_display);
    if hidden > 0 {
        out.push_str(&format!(" +{} more", hidden));
    }
    out
}
