//! Sentence splitting and claim text heuristics

use citeaudit_domain::ClaimFlags;
use once_cell::sync::Lazy;
use regex::Regex;

static CAUSAL_OR_NORMATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(lead(?:s|ing)?\s+to|cause(?:s|d)?|result(?:s|ed)?\s+in|should|must|best\s+practice|therefore|hence)\b",
    )
    .unwrap()
});

static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"["“](.+?)["”]"#).unwrap());

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: [&str; 9] = ["et al.", "e.g.", "i.e.", "cf.", "p.", "pp.", "vs.", "no.", "vol."];

/// Split text into sentences
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace and then an
/// uppercase letter, `(`, `[` or an opening quote. Periods closing a common
/// scholarly abbreviation or a single initial do not end a sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            let end = pos + c.len_utf8();
            if j > i + 1
                && j < chars.len()
                && opens_sentence(chars[j].1)
                && !(c == '.' && ends_with_abbreviation(&text[start..end]))
            {
                sentences.push(text[start..end].trim());
                start = chars[j].0;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    sentences.push(text[start..].trim());
    sentences.retain(|s| !s.is_empty());
    sentences
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || matches!(c, '(' | '[' | '"' | '“')
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let lower = fragment.to_lowercase();
    let bounded = |abbr: &str| {
        lower.ends_with(abbr)
            && lower[..lower.len() - abbr.len()]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric())
    };
    if ABBREVIATIONS.iter().any(|abbr| bounded(abbr)) {
        return true;
    }

    // Single initial such as "J."
    let mut rev = fragment.chars().rev();
    if rev.next() != Some('.') {
        return false;
    }
    match (rev.next(), rev.next()) {
        (Some(l), None) => l.is_uppercase(),
        (Some(l), Some(before)) => l.is_uppercase() && !before.is_alphanumeric(),
        _ => false,
    }
}

/// Whether the text contains any digit
pub fn has_numbers(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

/// Whether the text uses causal or normative language
pub fn is_causal_or_normative(text: &str) -> bool {
    CAUSAL_OR_NORMATIVE.is_match(text)
}

/// Replace curly quotes with their straight forms
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '“' | '”' | '„' => '"',
            '‘' | '’' => '\'',
            other => other,
        })
        .collect()
}

/// Quoted spans in the text, quote characters normalized, in order of appearance
pub fn quoted_spans(text: &str) -> Vec<String> {
    QUOTED
        .captures_iter(text)
        .map(|caps| normalize_quotes(caps[1].trim()))
        .filter(|q| !q.is_empty())
        .collect()
}

/// Whether the text quotes anything
pub fn contains_quotation(text: &str) -> bool {
    !quoted_spans(text).is_empty()
}

/// Compute the claim flags for a sentence
pub fn classify(sentence: &str) -> ClaimFlags {
    ClaimFlags {
        is_quote: contains_quotation(sentence),
        has_numbers: has_numbers(sentence),
        is_causal_or_normative: is_causal_or_normative(sentence),
    }
}
