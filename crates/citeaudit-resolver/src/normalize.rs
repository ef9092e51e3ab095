//! Author string normalization to surname keys

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Surname particles kept together with the surname that follows them
pub const PARTICLES: [&str; 9] = ["van", "von", "de", "den", "der", "del", "la", "le", "da"];

/// Non-leading tokens a key keeps when the name does not start with a particle
const MAX_PLAIN_TOKENS: usize = 2;

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Separator,
}

/// Normalize an author string to a surname key
///
/// Strips diacritics and curly punctuation, drops `et al.`, keeps only the
/// part before the first `and`, `&` or comma, keeps leading particles with
/// the surname after them, lowercases, and joins tokens with `_`.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use citeaudit_resolver::normalize;
///
/// assert_eq!(normalize("Johnson et al."), "johnson");
/// assert_eq!(normalize("van der Berg & Smith"), "van_der_berg");
/// assert_eq!(normalize("Gómez-Ruiz"), "gomez_ruiz");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(name: &str) -> String {
    let mut tokens = tokenize(&fold(name));
    drop_et_al(&mut tokens);

    let words: Vec<&str> = tokens
        .iter()
        .map_while(|t| match t {
            Token::Word(w) => Some(w.as_str()),
            Token::Separator => None,
        })
        .collect();

    surname_words(&words).join("_")
}

/// Decompose, drop combining marks, and fold typographic punctuation to ASCII
pub(crate) fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| {
            let folded: &str = match c {
                '’' | '‘' | '`' | '´' => "'",
                '“' | '”' | '„' => "\"",
                '–' | '—' | '‐' | '‑' => "-",
                'ø' | 'Ø' => "o",
                'ł' | 'Ł' => "l",
                'đ' | 'Đ' => "d",
                'ß' => "ss",
                'æ' | 'Æ' => "ae",
                'œ' | 'Œ' => "oe",
                _ => return vec![c],
            };
            folded.chars().collect()
        })
        .collect()
}

fn tokenize(folded: &str) -> Vec<Token> {
    let spaced: String = folded
        .chars()
        .flat_map(|c| match c {
            '&' => vec![' ', '&', ' '],
            ',' | ';' => vec![' ', ',', ' '],
            '-' | '_' | '/' | '(' | ')' | '[' | ']' => vec![' '],
            other => vec![other],
        })
        .collect();

    let mut tokens = Vec::new();
    for raw in spaced.split_whitespace() {
        if raw == "&" || raw == "," {
            tokens.push(Token::Separator);
            continue;
        }
        let word = clean_word(raw);
        if word.is_empty() {
            continue;
        }
        if word == "and" {
            tokens.push(Token::Separator);
        } else {
            tokens.push(Token::Word(word));
        }
    }
    tokens
}

/// Strip a possessive, keep ASCII letters, lowercase
fn clean_word(raw: &str) -> String {
    let stem = raw
        .strip_suffix("'s")
        .or_else(|| raw.strip_suffix("'S"))
        .unwrap_or(raw)
        .trim_end_matches('\'');
    stem.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn drop_et_al(tokens: &mut Vec<Token>) {
    tokens.retain(|t| *t != Token::Word("etal".to_string()));
    loop {
        let pos = tokens.windows(2).position(|pair| {
            matches!(pair, [Token::Word(a), Token::Word(b)] if a == "et" && b == "al")
        });
        match pos {
            Some(i) => {
                tokens.drain(i..i + 2);
            }
            None => break,
        }
    }
}

fn surname_words<'a>(words: &[&'a str]) -> Vec<&'a str> {
    let Some(first) = words.first() else {
        return Vec::new();
    };
    if PARTICLES.contains(first) {
        // particles, then the surname they belong to
        let particles = words.iter().take_while(|w| PARTICLES.contains(*w)).count();
        words.iter().take(particles + 1).copied().collect()
    } else {
        words.iter().take(MAX_PLAIN_TOKENS).copied().collect()
    }
}

/// Drop lowercase lead-in words (`see`, `e.g.`) that precede an author list
pub(crate) fn strip_lead_in(text: &str) -> &str {
    let trimmed = text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '(' | '['));
    let mut rest = trimmed;
    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        let starts_lower = word.chars().next().map_or(false, char::is_lowercase);
        if word.is_empty() || !starts_lower || PARTICLES.contains(&word) || word_end == rest.len() {
            return rest;
        }
        rest = rest[word_end..].trim_start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_et_al_and_joiners() {
        assert_eq!(normalize("Johnson et al."), "johnson");
        assert_eq!(normalize("Johnson et. al"), "johnson");
        assert_eq!(normalize("Smith & Jones"), "smith");
        assert_eq!(normalize("Smith and Jones"), "smith");
        assert_eq!(normalize("Smith, Jones, & Lee"), "smith");
    }

    #[test]
    fn test_and_inside_a_word_is_not_a_joiner() {
        assert_eq!(normalize("Anderson"), "anderson");
        assert_eq!(normalize("Sandberg et al."), "sandberg");
    }

    #[test]
    fn test_particles() {
        assert_eq!(normalize("van Wingerden"), "van_wingerden");
        assert_eq!(normalize("van der Berg"), "van_der_berg");
        assert_eq!(normalize("de la Cruz et al."), "de_la_cruz");
    }

    #[test]
    fn test_diacritics_and_punctuation() {
        assert_eq!(normalize("Kotzé"), "kotze");
        assert_eq!(normalize("Gómez–Ruiz"), "gomez_ruiz");
        assert_eq!(normalize("O’Neil"), "oneil");
        assert_eq!(normalize("Kirkhart’s"), "kirkhart");
        assert_eq!(normalize("Søren"), "soren");
    }

    #[test]
    fn test_organisations_and_file_stems_agree() {
        assert_eq!(normalize("World Bank"), "world_bank");
        assert_eq!(normalize("World_Bank"), "world_bank");
        assert_eq!(normalize("CLEAR_AA"), "clear_aa");
    }

    #[test]
    fn test_empty_and_junk() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("& and ,"), "");
        assert_eq!(normalize("(2010)"), "");
    }

    #[test]
    fn test_strip_lead_in() {
        assert_eq!(strip_lead_in("(see also Smith et al., "), "Smith et al., ");
        assert_eq!(strip_lead_in("van der Berg"), "van der Berg");
        assert_eq!(strip_lead_in("e.g., Jones"), "Jones");
        assert_eq!(strip_lead_in("lowercase"), "lowercase");
    }
}
