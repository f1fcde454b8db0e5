use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::lines::{classify, section_name, LineKind};
use crate::settings::Vocabulary;

/// Key used for a status line that directly follows an empty category header.
pub const DIRECT_STATUS_KEY: &str = "condition";
/// Per-section bucket for lines seen before any category opened.
pub const GENERAL_KEY: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: String,
    pub value: String,
    /// Stored under an `item_N` key because it fit no pair.
    pub numbered: bool,
}

/// Insertion-ordered item map. Keys are unique; a repeated key gets a
/// ` (2)`, ` (3)`, ... suffix so no line is overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMap {
    items: Vec<Item>,
}

impl ItemMap {
    pub fn insert(&mut self, key: &str, value: &str) {
        self.push(key, value, false);
    }

    /// Store under the next `item_N` key.
    pub fn insert_numbered(&mut self, value: &str) {
        let key = format!("item_{}", self.items.len() + 1);
        self.push(&key, value, true);
    }

    fn push(&mut self, key: &str, value: &str, numbered: bool) {
        let key = self.unique_key(key);
        self.items.push(Item {
            key,
            value: value.to_string(),
            numbered,
        });
    }

    fn unique_key(&self, key: &str) -> String {
        if self.get(key).is_none() {
            return key.to_string();
        }
        (2..)
            .map(|n| format!("{} ({})", key, n))
            .find(|k| self.get(k).is_none())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.key == key)
            .map(|i| i.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

impl Serialize for ItemMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            map.serialize_entry(&item.key, &item.value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub items: ItemMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub categories: Vec<Category>,
    pub general: ItemMap,
}

impl Section {
    fn new(name: &str) -> Self {
        Section {
            name: name.to_string(),
            categories: Vec::new(),
            general: ItemMap::default(),
        }
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Index of the named category, creating it if this section lacks one.
    fn open_category(&mut self, name: &str) -> usize {
        if let Some(idx) = self.categories.iter().position(|c| c.name == name) {
            debug!(section = %self.name, category = name, "merging repeated category");
            return idx;
        }
        self.categories.push(Category {
            name: name.to_string(),
            items: ItemMap::default(),
        });
        self.categories.len() - 1
    }

    pub fn item_count(&self) -> usize {
        self.general.len() + self.categories.iter().map(|c| c.items.len()).sum::<usize>()
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for cat in &self.categories {
            map.serialize_entry(&cat.name, &cat.items)?;
        }
        if !self.general.is_empty() {
            map.serialize_entry(GENERAL_KEY, &self.general)?;
        }
        map.end()
    }
}

/// Sections serialize as the report; `unclassified` holds lines seen before
/// any section opened and is surfaced by the caller at record level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionReport {
    pub sections: Vec<Section>,
    pub unclassified: Vec<String>,
}

impl InspectionReport {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.unclassified.is_empty()
    }

    /// Stored items across every section (pairs count once).
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(Section::item_count).sum()
    }

    /// Values that did not land in a named item, in document order within
    /// each bucket: unclassified lines, then per section its general bucket
    /// and the numbered items of each category.
    pub fn fallback_lines(&self) -> Vec<String> {
        let mut out = self.unclassified.clone();
        for section in &self.sections {
            out.extend(section.general.iter().map(|i| i.value.clone()));
            for cat in &section.categories {
                out.extend(
                    cat.items
                        .iter()
                        .filter(|i| i.numbered)
                        .map(|i| i.value.clone()),
                );
            }
        }
        out
    }
}

impl Serialize for InspectionReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for section in &self.sections {
            map.serialize_entry(&section.name, section)?;
        }
        map.end()
    }
}

/// How each input line was consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParseStats {
    pub section_headers: usize,
    pub category_headers: usize,
    /// Item/value pairs; each consumed two lines.
    pub pairs: usize,
    pub direct_statuses: usize,
    pub numbered_items: usize,
    pub general_items: usize,
    pub inline_pairs: usize,
    pub unclassified: usize,
    pub blank: usize,
}

impl ParseStats {
    /// Number of input lines accounted for. Equals the input length.
    pub fn consumed(&self) -> usize {
        self.section_headers
            + self.category_headers
            + 2 * self.pairs
            + self.direct_statuses
            + self.numbered_items
            + self.general_items
            + self.inline_pairs
            + self.unclassified
            + self.blank
    }
}

#[derive(Debug, Clone, Copy)]
enum Cursor {
    NoSection,
    InSection(usize),
    InCategory(usize, usize),
}

/// Single pass over `lines` building `section → category → item → value`.
/// Every line ends up in exactly one place; see `ParseStats::consumed`.
pub fn parse_inspection<S: AsRef<str>>(
    lines: &[S],
    vocab: &Vocabulary,
) -> (InspectionReport, ParseStats) {
    let mut report = InspectionReport::default();
    let mut stats = ParseStats::default();
    let mut cursor = Cursor::NoSection;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].as_ref().trim();

        if line.is_empty() {
            stats.blank += 1;
            i += 1;
            continue;
        }

        let kind = classify(line, vocab);

        if kind == LineKind::SectionHeader {
            if let Some(name) = section_name(line, vocab) {
                cursor = Cursor::InSection(open_section(&mut report, &name));
                stats.section_headers += 1;
                i += 1;
                continue;
            }
        }

        match cursor {
            Cursor::NoSection => {
                report.unclassified.push(line.to_string());
                stats.unclassified += 1;
            }

            Cursor::InSection(s) | Cursor::InCategory(s, _)
                if kind == LineKind::CategoryHeader =>
            {
                let c = report.sections[s].open_category(line);
                debug!(section = %report.sections[s].name, category = line, "category");
                cursor = Cursor::InCategory(s, c);
                stats.category_headers += 1;
            }

            Cursor::InCategory(s, c) => {
                let next_is_status = lines
                    .get(i + 1)
                    .map(|n| n.as_ref().trim())
                    .filter(|n| !n.is_empty())
                    .is_some_and(|n| classify(n, vocab) == LineKind::StatusValue);
                let items = &mut report.sections[s].categories[c].items;

                if kind == LineKind::PlainContent && next_is_status {
                    let value = lines[i + 1].as_ref().trim();
                    items.insert(line, value);
                    stats.pairs += 1;
                    i += 2;
                    continue;
                }

                if kind == LineKind::StatusValue && items.is_empty() {
                    items.insert(DIRECT_STATUS_KEY, line);
                    stats.direct_statuses += 1;
                } else if let Some((k, v)) = inline_pair(line, vocab) {
                    items.insert(k, v);
                    stats.inline_pairs += 1;
                } else {
                    debug!(line, "numbered category item");
                    items.insert_numbered(line);
                    stats.numbered_items += 1;
                }
            }

            Cursor::InSection(s) => {
                let general = &mut report.sections[s].general;
                if let Some((k, v)) = inline_pair(line, vocab) {
                    general.insert(k, v);
                    stats.inline_pairs += 1;
                } else {
                    general.insert_numbered(line);
                    stats.general_items += 1;
                }
            }
        }

        i += 1;
    }

    (report, stats)
}

fn open_section(report: &mut InspectionReport, name: &str) -> usize {
    if let Some(idx) = report.sections.iter().position(|s| s.name == name) {
        debug!(section = name, "re-entering section");
        return idx;
    }
    debug!(section = name, "section");
    report.sections.push(Section::new(name));
    report.sections.len() - 1
}

fn inline_pair<'a>(line: &'a str, vocab: &Vocabulary) -> Option<(&'a str, &'a str)> {
    if !vocab.inline_pairs {
        return None;
    }
    let (k, v) = line.split_once(':')?;
    let (k, v) = (k.trim(), v.trim());
    if k.is_empty() || v.is_empty() {
        return None;
    }
    Some((k, v))
}

// ── Tests ──
