// File: src/nlp/inflect.rs
use super::Inflector;

/// Words whose singular and plural are spelled the same, and adverbs
/// that merely look plural.
const INVARIANT: &[&str] = &[
    "lunes", "martes", "miércoles", "jueves", "viernes", "crisis", "tesis", "paraguas",
    "cumpleaños", "sacapuntas", "abrelatas", "antes", "menos", "entonces", "mientras", "lejos",
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Rule-based Spanish number inflection.
///
/// Best effort only: regular `-s` / `-es` / `-ces` plurals, a few
/// invariant nouns, and a final accented syllable ending in `s`
/// (`después`, `autobús`) read as singular.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishInflector;

impl SpanishInflector {
    pub fn new() -> Self {
        Self
    }
}

impl Inflector for SpanishInflector {
    fn singularize(&self, word: &str) -> Option<String> {
        let lower = word.to_lowercase();
        if INVARIANT.contains(&lower.as_str()) {
            return None;
        }
        let chars: Vec<char> = lower.chars().collect();
        let n = chars.len();
        if n <= 3 || chars[n - 1] != 's' {
            return None;
        }

        let before_s = chars[n - 2];
        if before_s == 'e' {
            let before_e = chars[n - 3];
            let prev = chars[n - 4];
            // luces -> luz, but dulces -> dulce
            if before_e == 'c' && is_vowel(prev) {
                return Some(chars[..n - 3].iter().chain(['z'].iter()).collect());
            }
            // flores -> flor, but padres -> padre
            if "lnrdjy".contains(before_e) && is_vowel(prev) {
                return Some(chars[..n - 2].iter().collect());
            }
            return Some(chars[..n - 1].iter().collect());
        }
        if is_vowel(before_s) {
            return Some(chars[..n - 1].iter().collect());
        }
        None
    }

    fn pluralize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if INVARIANT.contains(&lower.as_str()) {
            return lower;
        }
        match lower.chars().last() {
            None => lower,
            Some('z') => {
                let stem = &lower[..lower.len() - 'z'.len_utf8()];
                format!("{}ces", stem)
            }
            Some(c) if is_vowel(c) || matches!(c, 'á' | 'é' | 'ó') => format!("{}s", lower),
            Some('í') | Some('ú') => format!("{}es", lower),
            Some('s') | Some('x') => lower,
            Some(_) => format!("{}es", lower),
        }
    }
}
