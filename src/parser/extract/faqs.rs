use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

fn is_question(line: &str, patterns: &[Regex]) -> bool {
    patterns.iter().any(|re| re.is_match(line))
}

/// A line matching a FAQ pattern opens a question; the next line answers it
/// unless that line is itself a question.
pub fn extract<S: AsRef<str>>(lines: &[S], patterns: &[Regex]) -> Vec<Faq> {
    let mut faqs: Vec<Faq> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].as_ref().trim();
        if !is_question(line, patterns) {
            i += 1;
            continue;
        }

        let answer = lines
            .get(i + 1)
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty() && !is_question(n, patterns) && !n.ends_with('?'));

        if !faqs.iter().any(|f| f.question == line) {
            faqs.push(Faq {
                question: line.to_string(),
                answer: answer.unwrap_or_default().to_string(),
            });
        }
        i += if answer.is_some() { 2 } else { 1 };
    }
    faqs
}
