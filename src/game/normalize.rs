//! Text canonicalization for hint comparison and guess grading

/// Katakana range folded onto hiragana (ァ..=ヶ)
const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_END: u32 = 0x30F6;
/// Distance from a katakana code point to its hiragana counterpart
const KANA_OFFSET: u32 = 0x30A1 - 0x3041;

/// Canonical form used to decide whether two hints are the same idea:
/// trimmed, lowercased, katakana folded to hiragana.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase().chars().map(fold_kana).collect()
}

/// Looser form for grading guesses: trim and case-fold only
pub fn normalize_guess(text: &str) -> String {
    text.trim().to_lowercase()
}

fn fold_kana(c: char) -> char {
    let code = c as u32;
    if (KATAKANA_START..=KATAKANA_END).contains(&code) {
        char::from_u32(code - KANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// Lenient grading: exact match or either side containing the other.
/// "Tower" is accepted for "Tokyo Tower".
pub fn is_correct_guess(guess: &str, topic: &str) -> bool {
    let guess = normalize_guess(guess);
    let topic = normalize_guess(topic);
    if guess.is_empty() || topic.is_empty() {
        return false;
    }
    guess == topic || topic.contains(&guess) || guess.contains(&topic)
}
