use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::settings::ImagePolicy;

static QUALITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]quality=(\d+)").unwrap());
static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]width=(\d+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    Exterior,
    Interior,
    Engine,
    Wheels,
    Other,
}

impl ImageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::Exterior => "exterior",
            ImageCategory::Interior => "interior",
            ImageCategory::Engine => "engine",
            ImageCategory::Wheels => "wheels",
            ImageCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub url: String,
    pub category: ImageCategory,
    pub angle: String,
    pub quality: Quality,
    #[serde(serialize_with = "width_or_unknown")]
    pub resolution_width: Option<u32>,
    /// 1-based, after de-duplication.
    pub position: usize,
}

fn width_or_unknown<S: Serializer>(width: &Option<u32>, s: S) -> Result<S::Ok, S::Error> {
    match width {
        Some(w) => s.serialize_str(&w.to_string()),
        None => s.serialize_str("unknown"),
    }
}

fn query_number(re: &Regex, url: &str) -> Option<u32> {
    re.captures(url).and_then(|c| c[1].parse().ok())
}

/// Positional categorisation: the first `exterior_count` images are exterior
/// shots, the next `interior_count` interior; the rest are classified by URL
/// substring only. Content is otherwise not inspected.
pub fn annotate<S: AsRef<str>>(urls: &[S], policy: &ImagePolicy) -> Vec<ImageRecord> {
    let mut seen = HashSet::new();
    let urls: Vec<&str> = urls
        .iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .filter(|u| !policy.dedupe || seen.insert(*u))
        .collect();

    let interior_end = policy.exterior_count + policy.interior_count;

    urls.into_iter()
        .enumerate()
        .map(|(idx, url)| {
            let position = idx + 1;
            let (category, angle) = if idx < policy.exterior_count {
                let angle = policy
                    .exterior_labels
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| format!("exterior_{}", position));
                (ImageCategory::Exterior, angle)
            } else if idx < interior_end {
                (
                    ImageCategory::Interior,
                    format!("interior_{}", idx - policy.exterior_count + 1),
                )
            } else {
                by_url(url, position, policy)
            };

            let quality = match query_number(&QUALITY_RE, url) {
                Some(q) if policy.high_quality.contains(&q) => Quality::High,
                _ => Quality::Medium,
            };

            ImageRecord {
                url: url.to_string(),
                category,
                angle,
                quality,
                resolution_width: query_number(&WIDTH_RE, url),
                position,
            }
        })
        .collect()
}

fn by_url(url: &str, position: usize, policy: &ImagePolicy) -> (ImageCategory, String) {
    let lower = url.to_lowercase();
    policy
        .url_categories
        .iter()
        .find(|c| c.markers.iter().any(|m| lower.contains(&m.to_lowercase())))
        .map(|c| (c.category, format!("{}_{}", c.category.as_str(), position)))
        .unwrap_or_else(|| (ImageCategory::Other, format!("misc_{}", position)))
}

/// Records grouped by category, input order kept within a group.
pub fn group(records: &[ImageRecord]) -> BTreeMap<ImageCategory, Vec<ImageRecord>> {
    let mut groups: BTreeMap<ImageCategory, Vec<ImageRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.category).or_default().push(r.clone());
    }
    groups
}
