use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::record::ListingInput;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(([^)\s]*)[^)]*\)").unwrap());
static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:#{1,6}\s+|[*\->]+\s+)").unwrap());
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*{1,2}(.+?)\*{1,2}$").unwrap());

/// Ordered, trimmed, non-blank lines of a captured page, with leading
/// markdown heading/bullet markers and whole-line emphasis removed.
pub fn prepare_lines(raw: &str) -> Vec<String> {
    raw.replace("\r\n", "\n")
        .split('\n')
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect()
}

fn clean_line(line: &str) -> String {
    let line = line.trim();
    let line = MARKER_RE.replace(line, "");
    let line = match EMPHASIS_RE.captures(&line) {
        Some(caps) => caps[1].to_string(),
        None => line.to_string(),
    };
    line.trim().to_string()
}

/// Image targets of `![alt](url)` in document order.
pub fn image_urls(md: &str) -> Vec<String> {
    IMAGE_RE
        .captures_iter(md)
        .map(|c| c[1].to_string())
        .filter(|u| !u.is_empty())
        .collect()
}

/// Page text with every `![alt](url)` dropped and runs of blank lines
/// collapsed to one.
pub fn strip_images(md: &str) -> String {
    let cleaned = IMAGE_RE.replace_all(md, "");
    BLANKS_RE.replace_all(&cleaned, "\n\n").to_string()
}

/// A captured listing page. `text` is the page markdown; `lines` and
/// `images` override what would be derived from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageCapture {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl PageCapture {
    pub fn to_input(&self) -> ListingInput {
        let images = if self.images.is_empty() {
            image_urls(&self.text)
        } else {
            self.images.clone()
        };
        let lines = if self.lines.is_empty() {
            prepare_lines(&strip_images(&self.text))
        } else {
            self.lines.clone()
        };
        ListingInput {
            url: self.url.clone(),
            lines,
            images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepares_lines() {
        let raw = "## Exterior\r\n\n  * Hood Condition  \n**Good**\n> Rear right door\n- Passed\n\n";
        assert_eq!(
            prepare_lines(raw),
            vec!["Exterior", "Hood Condition", "Good", "Rear right door", "Passed"]
        );
    }

    #[test]
    fn keeps_plain_punctuation() {
        assert_eq!(prepare_lines("AED 2,154/Month"), vec!["AED 2,154/Month"]);
        assert_eq!(prepare_lines("-5% off"), vec!["-5% off"]);
    }

    #[test]
    fn collects_images_in_order() {
        let md = "![front](https://cdn.x/a.jpg?width=3840&quality=75)\ntext\n![](https://cdn.x/b.jpg \"title\")";
        assert_eq!(
            image_urls(md),
            vec!["https://cdn.x/a.jpg?width=3840&quality=75", "https://cdn.x/b.jpg"]
        );
    }

    #[test]
    fn strips_images() {
        let md = "Title\n![a](https://x/a.jpg)\n\n\n\nBody";
        assert_eq!(strip_images(md), "Title\n\nBody");
        assert!(!strip_images("[![a](https://x/a.jpg)](https://x)").contains("a.jpg"));
    }

    #[test]
    fn capture_derives_lines_and_images() {
        let capture = PageCapture {
            text: "## Exterior\n![a](https://x/a.jpg)\nHood Condition\nGood".into(),
            ..Default::default()
        };
        let input = capture.to_input();
        assert_eq!(input.lines, vec!["Exterior", "Hood Condition", "Good"]);
        assert_eq!(input.images, vec!["https://x/a.jpg"]);

        let explicit = PageCapture {
            lines: vec!["Engine".into()],
            images: vec!["https://x/b.jpg".into()],
            ..capture
        };
        let input = explicit.to_input();
        assert_eq!(input.lines, vec!["Engine"]);
        assert_eq!(input.images, vec!["https://x/b.jpg"]);
    }

    #[test]
    fn empty_page() {
        assert!(prepare_lines("").is_empty());
        assert!(prepare_lines("\n \n\t\n").is_empty());
    }
}
