//! Token-set text similarity

use std::collections::BTreeSet;

/// Lowercased alphanumeric tokens
fn token_set(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Length of the longest common subsequence of two char slices
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Normalized indel similarity in 0.0..=100.0
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// Token-set similarity between two texts, 0-100
///
/// Texts are reduced to sorted sets of lowercase alphanumeric tokens. When
/// they share tokens and one set contains the other the score is 100.
/// Otherwise the score is the best [`ratio`] among the shared tokens and the
/// shared tokens extended by each side's remainder.
///
/// # Examples
///
/// ```
/// use citeaudit_evidence::token_set_ratio;
///
/// assert_eq!(token_set_ratio("budget cycles", "Budget cycles, ministries"), 100);
/// assert_eq!(token_set_ratio("", "anything"), 0);
/// assert!(token_set_ratio("evaluation use", "evaluation capacity") < 100);
/// ```
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let set_a = token_set(a);
    let set_b = token_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0;
    }

    let shared: Vec<&str> = set_a.intersection(&set_b).map(String::as_str).collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).map(String::as_str).collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).map(String::as_str).collect();

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100;
    }

    let base = shared.join(" ");
    let extend = |rest: &[&str]| {
        if base.is_empty() {
            rest.join(" ")
        } else {
            format!("{} {}", base, rest.join(" "))
        }
    };
    let with_a = extend(&only_a);
    let with_b = extend(&only_b);

    let best = if base.is_empty() {
        ratio(&with_a, &with_b)
    } else {
        ratio(&base, &with_a)
            .max(ratio(&base, &with_b))
            .max(ratio(&with_a, &with_b))
    };
    best.floor().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("abc", "abc"), 100.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("ab", "abcd"), 200.0 * 2.0 / 6.0);
    }

    #[test]
    fn test_subset_scores_full() {
        assert_eq!(token_set_ratio("the cat sat", "sat the cat on a mat"), 100);
        assert_eq!(token_set_ratio("Cat, SAT!", "sat cat"), 100);
    }

    #[test]
    fn test_disjoint_scores_low() {
        assert!(token_set_ratio("alpha", "omega") < 50);
    }

    #[test]
    fn test_partial_overlap() {
        // shared "evaluation"; remainders "use" and "capacity"
        let score = token_set_ratio("evaluation use", "evaluation capacity");
        let expected = ratio("evaluation", "evaluation use").floor() as u8;
        assert!(score >= expected);
        assert!(score < 100);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(token_set_ratio("", ""), 0);
        assert_eq!(token_set_ratio("...", "words"), 0);
    }
}
