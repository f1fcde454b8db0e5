use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::extract::basic_info::BasicInfo;
use crate::parser::extract::faqs::Faq;
use crate::parser::extract::features::KeywordBuckets;
use crate::parser::extract::images::{ImageCategory, ImageRecord};
use crate::parser::extract::pricing::Pricing;
use crate::parser::inspection::{InspectionReport, ParseStats};

/// One listing as handed over by the capture layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingInput {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataQuality {
    pub total_lines: usize,
    pub inspection_items: usize,
    pub image_count: usize,
    pub feature_count: usize,
    pub line_routing: ParseStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub basic_info: BasicInfo,
    pub pricing: Pricing,
    pub specifications: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub features: KeywordBuckets,
    pub images: BTreeMap<ImageCategory, Vec<ImageRecord>>,
    pub inspection_report: InspectionReport,
    /// Lines seen before the first inspection section.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unclassified: Vec<String>,
    pub offers: Vec<String>,
    pub faqs: Vec<Faq>,
    pub data_quality: DataQuality,
    pub completeness_score: f64,
}

impl VehicleRecord {
    pub fn image_count(&self) -> usize {
        self.images.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub total_vehicles: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_images: usize,
    pub average_completeness: f64,
    pub makes: Vec<String>,
}

/// Batch output: every record plus a roll-up.
#[derive(Debug, Clone, Serialize)]
pub struct Database {
    pub database_info: DatabaseInfo,
    pub vehicles: Vec<VehicleRecord>,
    pub summary: Summary,
}

impl Database {
    pub fn assemble(vehicles: Vec<VehicleRecord>, created_at: DateTime<Utc>) -> Self {
        let total_images = vehicles.iter().map(VehicleRecord::image_count).sum();
        let average_completeness = if vehicles.is_empty() {
            0.0
        } else {
            vehicles.iter().map(|v| v.completeness_score).sum::<f64>() / vehicles.len() as f64
        };
        let makes: BTreeSet<String> = vehicles
            .iter()
            .filter_map(|v| v.basic_info.make.clone())
            .collect();

        Database {
            database_info: DatabaseInfo {
                version: env!("CARGO_PKG_VERSION").to_string(),
                created_at,
                total_vehicles: vehicles.len(),
            },
            summary: Summary {
                total_images,
                average_completeness,
                makes: makes.into_iter().collect(),
            },
            vehicles,
        }
    }
}
