//! Text normalization and tokenization.
//!
//! The one rule that matters: **query text and indexed text go through the
//! exact same functions.** A query token must be comparable byte-for-byte to
//! an indexed token, so there is a single `tokenize()` and everything calls it.
//!
//! Both functions are pure. Calling them twice on the same input yields the
//! same output; nothing here consults locale state.

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for search: lowercase, strip diacritics, collapse
/// whitespace.
///
/// This makes ASCII and accented spellings comparable:
/// - "café" → "cafe"
/// - "naïve" → "naive"
///
/// # Algorithm
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks (category Mn = Mark, Nonspacing)
/// 3. Lowercase
/// 4. Collapse whitespace
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Check if a character belongs to a CJK script.
///
/// No dictionary-based segmenter is available, so runs of CJK characters are
/// tokenized one character at a time. That is a coarse approximation, but it
/// is applied identically to indexed text and query text, so matching stays
/// consistent.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}' |   // Hiragana
        '\u{30A0}'..='\u{30FF}' |   // Katakana
        '\u{3400}'..='\u{4DBF}' |   // CJK Unified Ideographs Extension A
        '\u{4E00}'..='\u{9FFF}' |   // CJK Unified Ideographs
        '\u{F900}'..='\u{FAFF}' |   // CJK Compatibility Ideographs
        '\u{AC00}'..='\u{D7AF}'     // Hangul Syllables
    )
}

/// Word boundary detection: anything that is neither alphanumeric nor CJK
/// separates tokens.
fn is_word_boundary(c: char) -> bool {
    !c.is_alphanumeric() && !is_cjk(c)
}

/// Fold one character the way [`normalize`] folds text: decompose, drop
/// combining marks, lowercase. Returns `None` when the character normalizes
/// away entirely (it was a bare combining mark).
///
/// Used by the highlighter to locate a normalized term inside original,
/// un-normalized text without losing track of character positions.
pub(crate) fn fold_char(c: char) -> Option<char> {
    std::iter::once(c)
        .nfd()
        .filter(|m| !is_combining_mark(*m))
        .flat_map(char::to_lowercase)
        .next()
}

/// Tokenize text into normalized terms.
///
/// Splits on Unicode whitespace and punctuation, lowercases, strips
/// diacritics, and emits each CJK character as its own token. Tokens that
/// normalize to the empty string (pure punctuation) are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in normalized.chars() {
        if is_cjk(c) {
            // A CJK character ends any pending word and is a token by itself.
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            tokens.push(c.to_string());
        } else if is_word_boundary(c) {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}
