//! Weighted completeness score over a serialized record.
//!
//! Checks are data: each names a dotted path into the record's JSON form and
//! a rule. A check contributes `weight / total_weight` when it passes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Value exists and is non-empty.
    Present,
    /// Measured size is at least n.
    AtLeast(usize),
    /// Measured size is strictly greater than n.
    LongerThan(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub path: String,
    pub rule: Rule,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub path: String,
    pub passed: bool,
    pub weight: f64,
}

fn check(path: &str, rule: Rule) -> Check {
    Check {
        path: path.to_string(),
        rule,
        weight: default_weight(),
    }
}

pub fn default_checks() -> Vec<Check> {
    vec![
        check("basic_info.make", Rule::Present),
        check("basic_info.model", Rule::Present),
        check("basic_info.stock_number", Rule::Present),
        check("pricing.full_price_aed", Rule::Present),
        check("pricing.monthly_payment_aed", Rule::Present),
        check("specifications.year", Rule::Present),
        check("specifications.mileage", Rule::Present),
        check("specifications.warranty", Rule::Present),
        check("specifications.transmission", Rule::Present),
        check("features", Rule::AtLeast(5)),
        check("description", Rule::LongerThan(50)),
        check("images", Rule::AtLeast(10)),
        check("inspection_report", Rule::Present),
    ]
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|p| !p.is_empty())
        .try_fold(root, |v, key| v.get(key))
}

/// Size of a value: string length in chars, array length, and for objects
/// either the summed length of array members (grouped lists) or the key count.
pub fn measure(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Bool(_) | Value::Number(_) => 1,
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        Value::Object(map) => {
            if !map.is_empty() && map.values().all(Value::is_array) {
                map.values().map(measure).sum()
            } else {
                map.len()
            }
        }
    }
}

impl Check {
    pub fn passes(&self, record: &Value) -> bool {
        let size = lookup(record, &self.path).map(measure).unwrap_or(0);
        match self.rule {
            Rule::Present => size > 0,
            Rule::AtLeast(n) => size >= n,
            Rule::LongerThan(n) => size > n,
        }
    }
}

pub fn evaluate(record: &Value, checks: &[Check]) -> Vec<CheckOutcome> {
    checks
        .iter()
        .map(|c| CheckOutcome {
            path: c.path.clone(),
            passed: c.passes(record),
            weight: c.weight,
        })
        .collect()
}

/// Weighted pass ratio in `[0, 1]`; 0 when there is nothing to weigh.
pub fn score(record: &Value, checks: &[Check]) -> f64 {
    let total: f64 = checks.iter().map(|c| c.weight).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let passed: f64 = evaluate(record, checks)
        .iter()
        .filter(|o| o.passed)
        .map(|o| o.weight)
        .sum();
    (passed / total).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> Value {
        json!({
            "basic_info": { "make": "Volvo", "model": "Xc40", "stock_id": "10194", "stock_number": "10398AC" },
            "pricing": { "full_price_aed": 109999, "monthly_payment_aed": 2154 },
            "specifications": {
                "year": "2022", "mileage": "59,000 km",
                "warranty": "Under Warranty", "transmission": "Automatic"
            },
            "features": { "safety": ["ISOFIX", "Rear Camera"], "comfort": ["Cruise Control", "Leather Seats", "Keyless Entry"] },
            "description": "This 2022 Volvo XC40 in stunning Blue delivers style, safety, and sophistication.",
            "images": { "exterior": [1, 2, 3, 4, 5, 6, 7, 8], "interior": [9, 10] },
            "inspection_report": { "exterior": { "Paint Condition": { "condition": "Good" } } }
        })
    }

    #[test]
    fn fully_populated_scores_one() {
        assert_eq!(score(&full_record(), &default_checks()), 1.0);
    }

    #[test]
    fn partial_credit() {
        let record = json!({
            "basic_info": { "make": "Volvo", "model": "Xc40", "stock_number": "10398AC" },
            "images": {},
            "inspection_report": {}
        });
        let s = score(&record, &default_checks());
        assert!(s > 0.0 && s < 1.0, "{s}");
        assert!((s - 3.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn empty_record_scores_zero() {
        assert_eq!(score(&json!({}), &default_checks()), 0.0);
        assert_eq!(score(&full_record(), &[]), 0.0);
    }

    #[test]
    fn image_threshold_in_isolation() {
        let only_images = [check("images", Rule::AtLeast(10))];
        let nine = json!({ "images": { "exterior": [1, 2, 3, 4, 5, 6, 7, 8], "other": [9] } });
        let ten = json!({ "images": { "exterior": [1, 2, 3, 4, 5, 6, 7, 8], "other": [9, 10] } });
        assert_eq!(score(&nine, &only_images), 0.0);
        assert_eq!(score(&ten, &only_images), 1.0);
    }

    #[test]
    fn feature_and_description_thresholds() {
        let features = check("features", Rule::AtLeast(5));
        assert!(!features.passes(&json!({ "features": { "other": ["a", "b", "c", "d"] } })));
        assert!(features.passes(&json!({ "features": { "other": ["a", "b", "c"], "safety": ["d", "e"] } })));

        let description = check("description", Rule::LongerThan(50));
        assert!(!description.passes(&json!({ "description": "x".repeat(50) })));
        assert!(description.passes(&json!({ "description": "x".repeat(51) })));
    }

    #[test]
    fn weights_shift_the_score() {
        let checks = [
            Check { path: "a".into(), rule: Rule::Present, weight: 3.0 },
            Check { path: "b".into(), rule: Rule::Present, weight: 1.0 },
        ];
        assert_eq!(score(&json!({ "a": "x" }), &checks), 0.75);
    }

    #[test]
    fn stock_number_is_checked_not_slug_id() {
        let only_slug = json!({ "basic_info": { "stock_id": "10194" } });
        let outcomes = evaluate(&only_slug, &default_checks());
        let stock = outcomes.iter().find(|o| o.path == "basic_info.stock_number").unwrap();
        assert!(!stock.passed);
        assert!(outcomes.iter().all(|o| o.path != "basic_info.stock_id"));
    }

    #[test]
    fn outcomes_name_each_check() {
        let outcomes = evaluate(&full_record(), &default_checks());
        assert_eq!(outcomes.len(), 13);
        assert!(outcomes.iter().all(|o| o.passed));
    }

    #[test]
    fn checks_round_trip_through_config_shape() {
        let parsed: Vec<Check> = serde_json::from_value(json!([
            { "path": "images", "rule": { "at_least": 10 } },
            { "path": "inspection_report", "rule": "present", "weight": 2.0 }
        ]))
        .unwrap();
        assert_eq!(parsed[0].rule, Rule::AtLeast(10));
        assert_eq!(parsed[0].weight, 1.0);
        assert_eq!(parsed[1].weight, 2.0);
    }
}
