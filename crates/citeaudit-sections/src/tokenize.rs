//! Tokenization for section scoring

use once_cell::sync::Lazy;
use std::collections::HashSet;

const STOPWORDS: [&str; 77] = [
    "the", "and", "a", "an", "of", "to", "in", "for", "on", "with", "as", "by", "from", "at",
    "that", "this", "these", "those", "is", "are", "was", "were", "be", "been", "being", "it",
    "its", "their", "there", "which", "or", "not", "but", "if", "than", "can", "may", "might",
    "should", "would", "could", "will", "shall", "do", "does", "did", "done", "such", "into",
    "over", "about", "across", "per", "vs", "via", "within", "between", "among", "both", "also",
    "more", "most", "much", "many", "some", "any", "each", "other", "another", "however",
    "therefore", "thus", "so", "because", "while", "where", "when",
];

static STOPWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| STOPWORDS.into_iter().collect());

/// Whether a lowercase token is a stopword
pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Lowercase, replace ASCII punctuation with spaces, and keep ASCII tokens
/// longer than one character that are not stopwords
pub fn tokenize(text: &str) -> Vec<String> {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    spaced
        .split_whitespace()
        .filter(|t| t.len() > 1 && t.is_ascii() && !is_stopword(t))
        .map(str::to_string)
        .collect()
}
