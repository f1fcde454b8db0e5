use crate::settings::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    SectionHeader,
    CategoryHeader,
    StatusValue,
    PlainContent,
}

impl LineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::SectionHeader => "section",
            LineKind::CategoryHeader => "category",
            LineKind::StatusValue => "status",
            LineKind::PlainContent => "plain",
        }
    }
}

/// Trimmed, lower-cased form used for every vocabulary comparison.
pub fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Classify one line against the vocabulary.
///
/// Priority: section vocabulary, then category indicators (only when the line
/// carries no status token), then status tokens, else plain content. Total and
/// position-independent; the caller decides what an empty category means.
pub fn classify(line: &str, vocab: &Vocabulary) -> LineKind {
    let norm = normalize(line);

    if vocab.sections.iter().any(|s| *s == norm) {
        return LineKind::SectionHeader;
    }

    let has_status = contains_status(&norm, vocab);

    if !has_status {
        if let Some(re) = &vocab.category_re {
            if re.is_match(&norm) {
                return LineKind::CategoryHeader;
            }
        }
    }

    if has_status {
        LineKind::StatusValue
    } else {
        LineKind::PlainContent
    }
}

fn contains_status(norm: &str, vocab: &Vocabulary) -> bool {
    vocab.status_tokens.iter().any(|t| norm.contains(t.as_str()))
}

/// Section key for a header line, or `None` if it is not one.
pub fn section_name(line: &str, vocab: &Vocabulary) -> Option<String> {
    let norm = normalize(line);
    vocab.sections.iter().find(|s| **s == norm).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{IndicatorMatch, Settings};

    fn kind(line: &str) -> LineKind {
        classify(line, &Vocabulary::default())
    }

    #[test]
    fn section_headers_exact_only() {
        assert_eq!(kind("Exterior"), LineKind::SectionHeader);
        assert_eq!(kind("  ENGINE "), LineKind::SectionHeader);
        assert_eq!(kind("Electricals"), LineKind::SectionHeader);
        assert_ne!(kind("Exterior trim"), LineKind::SectionHeader);
    }

    #[test]
    fn category_headers() {
        assert_eq!(kind("Hood Condition"), LineKind::CategoryHeader);
        assert_eq!(kind("Oil Level Check"), LineKind::CategoryHeader);
        assert_eq!(kind("Battery Test"), LineKind::CategoryHeader);
        assert_eq!(kind("Tyre Conditions"), LineKind::CategoryHeader);
        assert_eq!(kind("Underbody Assessment"), LineKind::CategoryHeader);
    }

    #[test]
    fn indicator_as_suffix_or_inside_a_word() {
        assert_eq!(kind("Aircondition"), LineKind::CategoryHeader);
        assert_eq!(kind("AC Precondition"), LineKind::CategoryHeader);
        assert_eq!(kind("Brake Pretest"), LineKind::CategoryHeader);
        assert_eq!(kind("Pre-delivery checklist"), LineKind::CategoryHeader);
    }

    #[test]
    fn whole_word_indicators_when_configured() {
        let mut settings = Settings::default();
        settings.inspection.indicator_match = IndicatorMatch::WholeWord;
        let vocab = settings.compile().unwrap();
        assert_eq!(classify("Latest arrivals", &vocab), LineKind::PlainContent);
        assert_eq!(classify("Aircondition", &vocab), LineKind::PlainContent);
        assert_eq!(classify("Hood Condition", &vocab), LineKind::CategoryHeader);
    }

    #[test]
    fn status_token_blocks_category() {
        assert_eq!(kind("Good condition"), LineKind::StatusValue);
        assert_eq!(kind("Check failed"), LineKind::StatusValue);
    }

    #[test]
    fn status_values() {
        for line in ["Passed", "Excellent", "needs attention", "Poor", "FAIR", "Warning"] {
            assert_eq!(kind(line), LineKind::StatusValue, "{line}");
        }
    }

    #[test]
    fn plain_content() {
        assert_eq!(kind("Rear right door"), LineKind::PlainContent);
        assert_eq!(kind(""), LineKind::PlainContent);
        assert_eq!(kind("AED 109,999"), LineKind::PlainContent);
    }

    #[test]
    fn classification_is_position_independent() {
        let vocab = Vocabulary::default();
        let lines = ["Exterior", "Paint Condition", "Good", "Door", "Passed"];
        let first: Vec<_> = lines.iter().map(|l| classify(l, &vocab)).collect();
        let reversed: Vec<_> = lines.iter().rev().map(|l| classify(l, &vocab)).collect();
        let mut again = reversed.clone();
        again.reverse();
        assert_eq!(first, again);
    }

    #[test]
    fn section_name_is_normalized() {
        let vocab = Vocabulary::default();
        assert_eq!(section_name(" Suspension", &vocab).as_deref(), Some("suspension"));
        assert_eq!(section_name("Suspension parts", &vocab), None);
    }
}
