use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static AED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)aed\s*([\d,]+)").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pricing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_price_aed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_payment_aed: Option<u64>,
}

fn has_amount(line: &str) -> bool {
    line.to_lowercase().contains("aed") || line.chars().any(|c| c.is_ascii_digit())
}

/// First `AED 109,999` style amount in `text`.
pub fn parse_aed(text: &str) -> Option<u64> {
    let caps = AED_RE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

pub fn extract<S: AsRef<str>>(lines: &[S]) -> Pricing {
    let mut p = Pricing::default();
    let next_amount = |i: usize| {
        lines
            .get(i + 1)
            .map(|n| n.as_ref().trim())
            .filter(|n| has_amount(n))
            .map(str::to_string)
    };

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        let lower = line.to_lowercase();

        if lower.contains("starts from") {
            if p.starts_from.is_none() {
                p.starts_from = next_amount(i);
            }
        } else if lower.contains("full price") {
            if p.full_price.is_none() {
                p.full_price = next_amount(i).or_else(|| {
                    parse_aed(line).map(|_| line.to_string())
                });
            }
        } else if lower.contains("month") && lower.contains("aed") {
            p.monthly_payment.get_or_insert_with(|| line.to_string());
        } else if lower.contains("aed")
            && (lower.contains("exclusive") || lower.contains("inclusive"))
        {
            p.price_display.get_or_insert_with(|| line.to_string());
        } else if lower.starts_with("aed") && line.chars().any(|c| c.is_ascii_digit()) {
            p.price.get_or_insert_with(|| line.to_string());
        }
    }

    p.full_price_aed = [&p.full_price, &p.price_display, &p.price]
        .into_iter()
        .flatten()
        .find_map(|s| parse_aed(s));
    p.monthly_payment_aed = p.monthly_payment.as_deref().and_then(parse_aed);
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_prices() {
        let lines = [
            "Starts from",
            "AED 2,154/Month",
            "AED 109,999(Exclusive of VAT)",
            "Full Price",
            "AED 109,999",
            "AED 95,000",
        ];
        let p = extract(&lines);
        assert_eq!(p.starts_from.as_deref(), Some("AED 2,154/Month"));
        assert_eq!(p.monthly_payment.as_deref(), Some("AED 2,154/Month"));
        assert_eq!(p.price_display.as_deref(), Some("AED 109,999(Exclusive of VAT)"));
        assert_eq!(p.full_price.as_deref(), Some("AED 109,999"));
        assert_eq!(p.full_price_aed, Some(109_999));
        assert_eq!(p.monthly_payment_aed, Some(2_154));
        assert_eq!(p.price.as_deref(), Some("AED 109,999"));
    }

    #[test]
    fn label_without_amount() {
        let p = extract(&["Full Price", "Call for price"]);
        assert_eq!(p.full_price, None);
        assert_eq!(p.full_price_aed, None);
    }

    #[test]
    fn bare_price_fills_numeric() {
        let p = extract(&["AED 45,500"]);
        assert_eq!(p.price.as_deref(), Some("AED 45,500"));
        assert_eq!(p.full_price_aed, Some(45_500));
    }

    #[test]
    fn aed_amounts() {
        assert_eq!(parse_aed("aed 1,234,567 total"), Some(1_234_567));
        assert_eq!(parse_aed("AED2154"), Some(2154));
        assert_eq!(parse_aed("no price"), None);
    }

    #[test]
    fn empty_serializes_to_empty_object() {
        let p = extract::<&str>(&[]);
        assert_eq!(serde_json::to_value(&p).unwrap(), serde_json::json!({}));
    }
}
