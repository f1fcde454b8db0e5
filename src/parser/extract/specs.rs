use std::collections::BTreeMap;

use super::block_between;
use crate::settings::Vocabulary;

/// Overview label/value pairs: a line equal to a configured label, value on
/// the next line. Searches the overview block when the page has one.
pub fn extract<S: AsRef<str>>(lines: &[S], vocab: &Vocabulary) -> BTreeMap<String, String> {
    let ends = [vocab.feature_block.0.as_str()];
    let block = block_between(lines, &vocab.specs.block_start, &ends);
    let scope = if block.is_empty() { lines } else { block };

    let mut specs = BTreeMap::new();
    let mut i = 0;
    while i < scope.len() {
        let line = scope[i].as_ref().trim();
        let label = vocab
            .specs
            .labels
            .iter()
            .find(|l| l.label.eq_ignore_ascii_case(line));
        let value = scope.get(i + 1).map(|v| v.as_ref().trim());

        match (label, value) {
            (Some(label), Some(value)) if !value.is_empty() && !is_label(value, vocab) => {
                specs
                    .entry(label.field.clone())
                    .or_insert_with(|| value.to_string());
                i += 2;
            }
            _ => i += 1,
        }
    }
    specs
}

fn is_label(line: &str, vocab: &Vocabulary) -> bool {
    vocab
        .specs
        .labels
        .iter()
        .any(|l| l.label.eq_ignore_ascii_case(line))
}
