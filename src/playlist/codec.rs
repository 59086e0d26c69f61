//! Attribute-list codec
//!
//! Decodes tag payloads such as `BANDWIDTH=800000,CODECS="avc1.4d401f,mp4a.40.2"`
//! into key/value pairs and encodes them back in a stable order.

use std::collections::HashMap;

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Decode an attribute list into ordered `(KEY, value)` pairs.
///
/// Keys are upper-cased and quotes are stripped. A quoted value may contain
/// commas; an unquoted one ends at the next comma. Entries without `=` are
/// skipped.
pub fn decode(text: &str) -> Vec<(String, String)> {
    regex!(r#"([A-Za-z0-9_-]+)=("[^"]*"|[^,]*)"#)
        .captures_iter(text)
        .map(|caps| {
            let raw = &caps[2];
            let value = match raw.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
                Some(inner) => inner,
                None => raw.trim(),
            };
            (caps[1].to_uppercase(), value.to_string())
        })
        .collect()
}

/// Decode an attribute list into a map. Later duplicates win.
pub fn decode_map(text: &str) -> HashMap<String, String> {
    decode(text).into_iter().collect()
}

/// Per-key quoting rule. Every key is quoted unless listed as unquoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteRule<'a> {
    unquoted: &'a [&'a str],
}

impl<'a> QuoteRule<'a> {
    pub const fn unquoted(keys: &'a [&'a str]) -> Self {
        Self { unquoted: keys }
    }

    pub fn quotes(&self, key: &str) -> bool {
        !self.unquoted.contains(&key)
    }
}

/// Format one `KEY=value` or `KEY="value"` pair.
pub fn format_attribute(key: &str, value: &str, rule: QuoteRule<'_>) -> String {
    if rule.quotes(key) {
        format!("{}=\"{}\"", key, value)
    } else {
        format!("{}={}", key, value)
    }
}

/// Encode attributes as a comma-separated list.
///
/// Keys named in `order` come first, in that order; the rest follow sorted
/// lexicographically. Keys with empty values are left out.
pub fn encode(attrs: &HashMap<String, String>, order: &[&str], rule: QuoteRule<'_>) -> String {
    let mut formatted = Vec::with_capacity(attrs.len());

    for key in order {
        if let Some(value) = attrs.get(*key).filter(|v| !v.is_empty()) {
            formatted.push(format_attribute(key, value, rule));
        }
    }

    let mut rest: Vec<&String> = attrs
        .iter()
        .filter(|(k, v)| !v.is_empty() && !order.contains(&k.as_str()))
        .map(|(k, _)| k)
        .collect();
    rest.sort();
    for key in rest {
        formatted.push(format_attribute(key, &attrs[key], rule));
    }

    formatted.join(",")
}

/// Write `KEYWORD:<attribute-list>\n`, or just `KEYWORD\n` when nothing
/// is left to encode.
pub fn write_tag_with_attributes(
    out: &mut String,
    keyword: &str,
    attrs: &HashMap<String, String>,
    order: &[&str],
    rule: QuoteRule<'_>,
) {
    let list = encode(attrs, order, rule);
    out.push_str(keyword);
    if !list.is_empty() {
        out.push(':');
        out.push_str(&list);
    }
    out.push('\n');
}
