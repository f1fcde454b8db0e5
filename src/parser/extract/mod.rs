pub mod basic_info;
pub mod description;
pub mod faqs;
pub mod features;
pub mod images;
pub mod offers;
pub mod pricing;
pub mod specs;

/// Lines strictly after the first line equal to `start` (case-insensitive)
/// up to, not including, the first line equal to any of `ends`.
/// Empty when `start` never appears.
pub fn block_between<'a, S: AsRef<str>>(lines: &'a [S], start: &str, ends: &[&str]) -> &'a [S] {
    let Some(from) = lines
        .iter()
        .position(|l| l.as_ref().trim().eq_ignore_ascii_case(start))
    else {
        return &[];
    };
    let body = &lines[from + 1..];
    let to = body
        .iter()
        .position(|l| {
            let l = l.as_ref().trim();
            ends.iter().any(|e| l.eq_ignore_ascii_case(e))
        })
        .unwrap_or(body.len());
    &body[..to]
}

pub fn is_url_like(line: &str) -> bool {
    let lower = line.trim_start().to_lowercase();
    ["http", "www", "tel:", "mailto:"]
        .iter()
        .any(|p| lower.starts_with(p))
}
