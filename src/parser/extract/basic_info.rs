use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^ref\s*:\s*(\S+)").unwrap());
static STOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bstock\b.*?\b(\w*\d\w*)\b").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BasicInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_number: Option<String>,
}

/// Listing URLs end in `<stock_id>-<make>-<model words...>` with a numeric
/// stock id; any other URL yields nothing.
pub fn from_url(url: &str) -> BasicInfo {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let slug = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let parts: Vec<&str> = slug.split('-').filter(|p| !p.is_empty()).collect();
    if parts.len() < 3 || !parts[0].bytes().all(|b| b.is_ascii_digit()) {
        return BasicInfo::default();
    }
    BasicInfo {
        stock_id: Some(parts[0].to_string()),
        make: Some(title_case(parts[1])),
        model: Some(
            parts[2..]
                .iter()
                .map(|p| title_case(p))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        stock_number: None,
    }
}

/// Stock/reference number printed on the page (`REF: 10398AC`, `Stock No. 10398AC`).
pub fn stock_number<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines.iter().map(|l| l.as_ref().trim()).find_map(|l| {
        REF_RE
            .captures(l)
            .or_else(|| STOCK_RE.captures(l))
            .map(|c| c[1].to_string())
    })
}

pub fn extract<S: AsRef<str>>(url: Option<&str>, lines: &[S]) -> BasicInfo {
    let mut info = url.map(from_url).unwrap_or_default();
    info.stock_number = stock_number(lines);
    info
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}
