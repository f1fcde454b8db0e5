use crate::parser::lines::{classify, LineKind};
use crate::settings::Vocabulary;

/// The `About` paragraph, joined with single spaces.
pub fn extract<S: AsRef<str>>(lines: &[S], vocab: &Vocabulary) -> Option<String> {
    let cfg = &vocab.description;
    let start = lines
        .iter()
        .position(|l| l.as_ref().trim().eq_ignore_ascii_case(&cfg.start))?;

    let parts: Vec<&str> = lines[start + 1..]
        .iter()
        .map(|l| l.as_ref().trim())
        .take_while(|l| !is_stop(l, vocab))
        .filter(|l| !l.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn is_stop(line: &str, vocab: &Vocabulary) -> bool {
    let cfg = &vocab.description;
    let lower = line.to_lowercase();
    cfg.stop_prefixes.iter().any(|p| line.starts_with(p.as_str()))
        || cfg.stop_contains.iter().any(|c| lower.contains(&c.to_lowercase()))
        || classify(line, vocab) == LineKind::SectionHeader
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_paragraph() {
        let vocab = Vocabulary::default();
        let lines = [
            "Key Features",
            "ISOFIX",
            "About",
            "2022 Volvo XC40: Experience the Thrill of Modern Luxury",
            "This 2022 Volvo XC40 in stunning Blue delivers style.",
            "REF: 10398AC",
            "Exterior",
        ];
        assert_eq!(
            extract(&lines, &vocab).as_deref(),
            Some(
                "2022 Volvo XC40: Experience the Thrill of Modern Luxury \
                 This 2022 Volvo XC40 in stunning Blue delivers style."
            )
        );
    }

    #[test]
    fn stops_at_section_header() {
        let vocab = Vocabulary::default();
        let lines = ["About", "Well maintained.", "Exterior", "Hood Condition"];
        assert_eq!(extract(&lines, &vocab).as_deref(), Some("Well maintained."));
    }

    #[test]
    fn missing_or_empty() {
        let vocab = Vocabulary::default();
        assert_eq!(extract(&["Exterior"], &vocab), None);
        assert_eq!(extract(&["About", "View full inspection report"], &vocab), None);
    }
}
