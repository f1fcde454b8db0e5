//! Vocabularies and policies driving every extraction pass.
//!
//! `Settings` is the serde-facing shape (file + environment); `Vocabulary` is
//! the validated, precompiled form handed by reference to the pure passes.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ListingError, Result};
use crate::parser::extract::images::ImageCategory;
use crate::parser::score::{default_checks, Check};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub inspection: InspectionSettings,
    pub features: FeatureSettings,
    pub offers: Vec<String>,
    pub faqs: Vec<String>,
    pub images: ImagePolicy,
    pub specs: SpecSettings,
    pub description: DescriptionSettings,
    pub completeness: Vec<Check>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inspection: InspectionSettings::default(),
            features: FeatureSettings::default(),
            offers: strings(&[
                r"0% Downpayment",
                r"1 Year free warranty",
                r"Downpayment for all cars",
                r"free warranty",
                r"special deal",
                r"campaign",
                r"\boffers?\b",
            ]),
            faqs: strings(&[
                r"how\s+(?:often|quickly|long)",
                r"what\s+(?:warranty|financing|documentation)",
                r"can\s+(?:alba|expats|we)",
                r"does\s+alba\s+(?:cars|offer|provide|handle)",
                r"why\s+choose\s+alba",
                r"are\s+(?:vehicles|cars).*(?:inspected|certified)",
            ]),
            images: ImagePolicy::default(),
            specs: SpecSettings::default(),
            description: DescriptionSettings::default(),
            completeness: default_checks(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionSettings {
    pub sections: Vec<String>,
    pub category_indicators: Vec<String>,
    pub status_tokens: Vec<String>,
    pub indicator_match: IndicatorMatch,
    /// Store `Key: Value` plain lines as named items instead of numbered ones.
    pub inline_pairs: bool,
}

/// How a category indicator is found in a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMatch {
    /// Anywhere in the line, so "Aircondition" and "Brake Pretest" qualify.
    #[default]
    Contains,
    /// Only as a separate word; "Latest arrivals" does not qualify.
    WholeWord,
}

impl Default for InspectionSettings {
    fn default() -> Self {
        Self {
            sections: strings(&[
                "exterior",
                "engine",
                "electricals",
                "suspension",
                "interior",
                "mechanical",
            ]),
            category_indicators: strings(&[
                "condition",
                "conditions",
                "assessment",
                "check",
                "test",
                "evaluation",
            ]),
            status_tokens: strings(&[
                "passed",
                "failed",
                "good",
                "excellent",
                "poor",
                "fair",
                "warning",
                "attention",
                "needs attention",
            ]),
            indicator_match: IndicatorMatch::default(),
            inline_pairs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Checked in order; a line goes to the first group it matches.
    pub groups: Vec<KeywordGroup>,
    pub block_start: String,
    pub block_end: String,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        let group = |name: &str, keywords: &[&str]| KeywordGroup {
            name: name.to_string(),
            keywords: strings(keywords),
        };
        Self {
            groups: vec![
                group(
                    "safety",
                    &[
                        "camera", "sensor", "airbag", "abs", "stability", "traction",
                        "blind spot", "collision", "emergency", "brake assist", "lane",
                        "isofix",
                    ],
                ),
                group(
                    "technology",
                    &[
                        "wireless", "bluetooth", "apple car", "android auto", "navigation",
                        "gps", "usb", "aux", "audio", "speaker", "sound", "display",
                        "touchscreen", "infotainment", "connectivity",
                    ],
                ),
                group(
                    "comfort",
                    &[
                        "climate", "air conditioning", "rear ac", "heated", "ventilated",
                        "leather", "fabric", "seat", "cruise control", "keyless",
                        "electric", "power", "memory", "massage",
                    ],
                ),
                group(
                    "exterior",
                    &[
                        "sunroof", "moonroof", "panoramic", "alloy", "wheel", "tire",
                        "led", "xenon", "fog", "light", "chrome", "roof rack",
                    ],
                ),
            ],
            block_start: "Key Features".to_string(),
            block_end: "About".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlCategory {
    pub category: ImageCategory,
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePolicy {
    pub exterior_count: usize,
    pub interior_count: usize,
    pub exterior_labels: Vec<String>,
    /// Categories decided by URL substring once the positional slots are used up.
    pub url_categories: Vec<UrlCategory>,
    pub high_quality: Vec<u32>,
    pub dedupe: bool,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            exterior_count: 8,
            interior_count: 8,
            exterior_labels: strings(&[
                "front",
                "front_angle",
                "side",
                "rear",
                "rear_angle",
                "side_profile",
                "detail1",
                "detail2",
            ]),
            url_categories: vec![
                UrlCategory {
                    category: ImageCategory::Engine,
                    markers: strings(&["engine"]),
                },
                UrlCategory {
                    category: ImageCategory::Wheels,
                    markers: strings(&["wheel"]),
                },
            ],
            high_quality: vec![75, 100],
            dedupe: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecLabel {
    pub label: String,
    pub field: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecSettings {
    pub block_start: String,
    pub labels: Vec<SpecLabel>,
}

impl Default for SpecSettings {
    fn default() -> Self {
        let labels = [
            ("Year", "year"),
            ("Mileage", "mileage"),
            ("Warranty", "warranty"),
            ("Transmission", "transmission"),
            ("Engine Size", "engine_size"),
            ("Cylinders", "cylinders"),
            ("Fuel Type", "fuel_type"),
            ("Spec", "spec"),
            ("Service Contract", "service_contract"),
            ("Color", "color"),
        ];
        Self {
            block_start: "Car Overview".to_string(),
            labels: labels
                .iter()
                .map(|(label, field)| SpecLabel {
                    label: label.to_string(),
                    field: field.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionSettings {
    pub start: String,
    pub stop_prefixes: Vec<String>,
    pub stop_contains: Vec<String>,
}

impl Default for DescriptionSettings {
    fn default() -> Self {
        Self {
            start: "About".to_string(),
            stop_prefixes: strings(&["REF:"]),
            stop_contains: strings(&["inspection report", "inspection-report"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Settings {
    /// Defaults, overlaid by an optional file, overlaid by `LISTING__*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("LISTING").separator("__"))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    /// Validate and precompile into the form the passes consume.
    pub fn compile(&self) -> Result<Vocabulary> {
        if self.inspection.sections.is_empty() {
            return Err(ListingError::InvalidSettings(
                "inspection.sections must not be empty".into(),
            ));
        }
        if self.inspection.status_tokens.is_empty() {
            return Err(ListingError::InvalidSettings(
                "inspection.status_tokens must not be empty".into(),
            ));
        }
        if let Some(g) = self.features.groups.iter().find(|g| g.name == OTHER) {
            return Err(ListingError::InvalidSettings(format!(
                "feature group name {:?} is reserved",
                g.name
            )));
        }

        if let Some(c) = self
            .completeness
            .iter()
            .find(|c| !c.weight.is_finite() || c.weight < 0.0)
        {
            return Err(ListingError::InvalidSettings(format!(
                "completeness check {:?} has invalid weight {}",
                c.path, c.weight
            )));
        }

        let category_re = if self.inspection.category_indicators.is_empty() {
            None
        } else {
            let alternation = self
                .inspection
                .category_indicators
                .iter()
                .map(|w| regex::escape(&w.to_lowercase()))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = match self.inspection.indicator_match {
                IndicatorMatch::Contains => format!("(?:{})", alternation),
                IndicatorMatch::WholeWord => format!(r"\b(?:{})\b", alternation),
            };
            Some(build_regex("category indicator", &pattern)?)
        };

        let offers = self
            .offers
            .iter()
            .map(|p| build_regex("offer", p))
            .collect::<Result<Vec<_>>>()?;
        let faqs = self
            .faqs
            .iter()
            .map(|p| build_regex("faq", p))
            .collect::<Result<Vec<_>>>()?;

        let lower = |v: &[String]| v.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();

        Ok(Vocabulary {
            sections: lower(&self.inspection.sections),
            category_re,
            status_tokens: lower(&self.inspection.status_tokens),
            inline_pairs: self.inspection.inline_pairs,
            feature_groups: self
                .features
                .groups
                .iter()
                .map(|g| KeywordGroup {
                    name: g.name.clone(),
                    keywords: lower(&g.keywords),
                })
                .collect(),
            feature_block: (
                self.features.block_start.clone(),
                self.features.block_end.clone(),
            ),
            offers,
            faqs,
            images: self.images.clone(),
            specs: self.specs.clone(),
            description: self.description.clone(),
            completeness: self.completeness.clone(),
        })
    }
}

/// Name of the catch-all feature bucket.
pub const OTHER: &str = "other";

fn build_regex(kind: &'static str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ListingError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
            source,
        })
}

/// Immutable, validated vocabulary. Built once per run, shared by reference.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub sections: Vec<String>,
    pub category_re: Option<Regex>,
    pub status_tokens: Vec<String>,
    pub inline_pairs: bool,
    pub feature_groups: Vec<KeywordGroup>,
    pub feature_block: (String, String),
    pub offers: Vec<Regex>,
    pub faqs: Vec<Regex>,
    pub images: ImagePolicy,
    pub specs: SpecSettings,
    pub description: DescriptionSettings,
    pub completeness: Vec<Check>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Settings::default()
            .compile()
            .unwrap_or_else(|e| panic!("built-in settings must compile: {e}"))
    }
}
