use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{block_between, is_url_like};
use crate::settings::{KeywordGroup, Vocabulary, OTHER};

/// Lines tagged by keyword group, in group order with `other` last.
/// Empty groups are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordBuckets {
    buckets: Vec<(String, Vec<String>)>,
}

impl KeywordBuckets {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.buckets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(n, _)| n.as_str())
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, l)| l.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Serialize for KeywordBuckets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (name, lines) in &self.buckets {
            map.serialize_entry(name, lines)?;
        }
        map.end()
    }
}

/// Assign each line to the first group whose keyword it contains, else to
/// `other`. Within a bucket trimmed duplicates are kept once.
pub fn tag_lines<S: AsRef<str>>(lines: &[S], groups: &[KeywordGroup]) -> KeywordBuckets {
    let mut buckets: Vec<(String, Vec<String>)> = groups
        .iter()
        .map(|g| (g.name.clone(), Vec::new()))
        .chain(std::iter::once((OTHER.to_string(), Vec::new())))
        .collect();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        let idx = groups
            .iter()
            .position(|g| g.keywords.iter().any(|k| lower.contains(k.as_str())))
            .unwrap_or(groups.len());
        let bucket = &mut buckets[idx].1;
        if !bucket.iter().any(|l| l == line) {
            bucket.push(line.to_string());
        }
    }

    buckets.retain(|(_, lines)| !lines.is_empty());
    KeywordBuckets { buckets }
}

/// Feature lines of a page: the `Key Features` block when present, otherwise
/// short keyword-bearing lines anywhere on the page.
pub fn candidates<'a, S: AsRef<str>>(lines: &'a [S], vocab: &Vocabulary) -> Vec<&'a str> {
    let (start, end) = &vocab.feature_block;
    let block: Vec<&str> = block_between(lines, start, &[end.as_str()])
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !is_url_like(l) && !looks_like_media(l))
        .collect();
    if !block.is_empty() {
        return block;
    }

    lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| {
            let len = l.chars().count();
            len > 5
                && len < 50
                && !l.chars().take(3).any(|c| c.is_ascii_digit())
                && !is_url_like(l)
        })
        .filter(|l| {
            let lower = l.to_lowercase();
            vocab
                .feature_groups
                .iter()
                .flat_map(|g| &g.keywords)
                .any(|k| lower.contains(k.as_str()))
        })
        .collect()
}

fn looks_like_media(line: &str) -> bool {
    let lower = line.to_lowercase();
    ["image", ".png", ".jpg", ".jpeg", ".webp", "format="]
        .iter()
        .any(|m| lower.contains(m))
}

pub fn extract<S: AsRef<str>>(lines: &[S], vocab: &Vocabulary) -> KeywordBuckets {
    tag_lines(&candidates(lines, vocab), &vocab.feature_groups)
}
