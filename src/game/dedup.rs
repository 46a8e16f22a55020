use super::normalize::normalize;
use crate::types::Hint;
use std::collections::HashMap;

/// Recompute duplicate flags over the whole hint set.
///
/// Only submitted, not manually removed hints take part. Every member of a
/// canonical-form group larger than one is marked duplicate and removed; all
/// other hints have both flags cleared. Nothing carries over between calls,
/// so running it twice is the same as running it once.
pub fn detect_duplicates(hints: &mut [Hint]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for hint in hints.iter().filter(|h| is_candidate(h)) {
        *counts.entry(normalize(&hint.text)).or_insert(0) += 1;
    }

    for hint in hints.iter_mut() {
        let is_duplicate = is_candidate(hint)
            && counts
                .get(&normalize(&hint.text))
                .is_some_and(|count| *count > 1);
        hint.is_duplicate = is_duplicate;
        hint.is_removed = is_duplicate;
    }
}

fn is_candidate(hint: &Hint) -> bool {
    hint.is_submitted() && !hint.manually_removed
}
