//! Plain-text extraction from rendered HTML.
//!
//! Good enough for the controlled markup our own templates produce; it is
//! not a general HTML parser.

use std::sync::LazyLock;

use regex::Regex;

static DROPPED_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<head\b.*?</head\s*>|<style\b.*?</style\s*>|<script\b.*?</script\s*>|<!--.*?-->")
        .expect("valid regex")
});

static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr|table|ul|ol|dl|dt|dd|section|header|footer|article|address)\s*>",
    )
    .expect("valid regex")
});

static CELL_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</t[dh]\s*>").expect("valid regex"));

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Visible text of `html`, one entry per rendered line.
///
/// Block-level closing tags end a line and cells of a table row share one.
/// Whitespace runs collapse to a single space, consecutive blank lines to a
/// single blank line; leading and trailing blank lines are dropped.
pub fn extract_lines(html: &str) -> Vec<String> {
    let text = DROPPED_ELEMENTS.replace_all(html, "");
    let text = LINE_BREAKS.replace_all(&text, "\n");
    let text = CELL_BREAKS.replace_all(&text, "  ");
    let text = TAGS.replace_all(&text, "");

    let mut lines: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let line = SPACES
            .replace_all(&decode_entities(raw), " ")
            .trim()
            .to_string();
        let previous_blank = lines.last().is_none_or(|l| l.is_empty());
        if line.is_empty() && previous_blank {
            continue;
        }
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Greedy word wrap at `width` characters. Words longer than `width` are
/// split. An empty line stays a single empty line.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > width {
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            wrapped.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if !current.is_empty() && current_len + 1 + word.len() > width {
            wrapped.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&")
}
