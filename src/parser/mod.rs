pub mod extract;
pub mod inspection;
pub mod lines;
pub mod score;

use tracing::info;

use crate::record::{DataQuality, ListingInput, VehicleRecord};
use crate::settings::Vocabulary;
use extract::{basic_info, description, faqs, features, images, offers, pricing, specs};

/// Three-pass pipeline: lines → inspection sections + field extractors,
/// image URLs → annotated images, assembled record → completeness score.
pub fn process_listing(input: &ListingInput, vocab: &Vocabulary) -> VehicleRecord {
    let lines = &input.lines;

    let (mut inspection, routing) = inspection::parse_inspection(lines, vocab);
    let unclassified = std::mem::take(&mut inspection.unclassified);
    let feature_buckets = features::extract(lines, vocab);
    let annotated = images::annotate(&input.images, &vocab.images);

    let data_quality = DataQuality {
        total_lines: lines.len(),
        inspection_items: inspection.item_count(),
        image_count: annotated.len(),
        feature_count: feature_buckets.total(),
        line_routing: routing,
    };

    let mut record = VehicleRecord {
        source_url: input.url.clone(),
        basic_info: basic_info::extract(input.url.as_deref(), lines),
        pricing: pricing::extract(lines),
        specifications: specs::extract(lines, vocab),
        description: description::extract(lines, vocab),
        features: feature_buckets,
        images: images::group(&annotated),
        inspection_report: inspection,
        unclassified,
        offers: offers::extract(lines, &vocab.offers),
        faqs: faqs::extract(lines, &vocab.faqs),
        data_quality,
        completeness_score: 0.0,
    };

    let as_value = serde_json::to_value(&record).unwrap_or_default();
    record.completeness_score = score::score(&as_value, &vocab.completeness);

    info!(
        url = input.url.as_deref().unwrap_or("-"),
        lines = lines.len(),
        sections = record.inspection_report.sections.len(),
        images = record.data_quality.image_count,
        score = record.completeness_score,
        "processed listing"
    );

    record
}

// ── Tests ──
