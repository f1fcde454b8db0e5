use regex::Regex;

/// Lines matching any offer pattern, deduplicated, first-seen order.
/// Questions are left to the FAQ pass.
pub fn extract<S: AsRef<str>>(lines: &[S], patterns: &[Regex]) -> Vec<String> {
    let mut offers: Vec<String> = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.ends_with('?') {
            continue;
        }
        if patterns.iter().any(|re| re.is_match(line)) && !offers.iter().any(|o| o == line) {
            offers.push(line.to_string());
        }
    }
    offers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Vocabulary;

    #[test]
    fn finds_offers() {
        let vocab = Vocabulary::default();
        let lines = [
            "0% Downpayment",
            "1 Year free warranty",
            "Volvo XC40",
            "1 Year free warranty",
            "Special Deal this week",
            "Does Alba Cars offer financing?",
        ];
        assert_eq!(
            extract(&lines, &vocab.offers),
            vec!["0% Downpayment", "1 Year free warranty", "Special Deal this week"]
        );
    }

    #[test]
    fn no_patterns_no_offers() {
        assert!(extract(&["0% Downpayment"], &[]).is_empty());
    }
}
