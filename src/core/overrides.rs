// File: src/core/overrides.rs
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Conjugated forms the pipeline gets wrong, with their infinitives.
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("estoy", "estar"),
    ("estás", "estar"),
    ("está", "estar"),
    ("estamos", "estar"),
    ("estáis", "estar"),
    ("están", "estar"),
    ("soy", "ser"),
    ("eres", "ser"),
    ("es", "ser"),
    ("somos", "ser"),
    ("sois", "ser"),
    ("son", "ser"),
    ("salta", "saltar"),
    ("salto", "saltar"),
    ("come", "comer"),
];

const UNITS: &[&str] = &[
    "cero", "uno", "dos", "tres", "cuatro", "cinco", "seis", "siete", "ocho", "nueve", "diez",
    "once", "doce", "trece", "catorce", "quince", "dieciséis", "diecisiete", "dieciocho",
    "diecinueve", "veinte", "veintiuno", "veintidós", "veintitrés", "veinticuatro",
    "veinticinco", "veintiséis", "veintisiete", "veintiocho", "veintinueve",
];

/// Lemmas the pipeline reduces to a singular that has no pictogram of its own.
const PLURAL_EXCEPTIONS: &[&str] = &["palomita", "despue", "patata", "frita", "lenteja"];

const LEMMA_CORRECTIONS: &[(&str, &str)] = &[("despué", "después")];

/// Static word tables consulted before (or instead of) the NLP pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalOverrides {
    pub irregular_verbs: HashMap<String, String>,
    pub numerals: HashMap<String, u64>,
    pub plural_exceptions: HashSet<String>,
    pub lemma_corrections: HashMap<String, String>,
}

impl LexicalOverrides {
    /// The tables shipped with the application.
    pub fn builtin() -> Self {
        let irregular_verbs = IRREGULAR_VERBS
            .iter()
            .map(|&(form, inf)| (form.to_string(), inf.to_string()))
            .collect();

        let mut numerals: HashMap<String, u64> = UNITS
            .iter()
            .enumerate()
            .map(|(n, &word)| (word.to_string(), n as u64))
            .collect();
        // Tens up to fifty, with the "treinta y uno" style compounds in between.
        for (tens, base) in [("treinta", 30u64), ("cuarenta", 40)] {
            numerals.insert(tens.to_string(), base);
            for (unit, &word) in UNITS[1..10].iter().enumerate() {
                numerals.insert(format!("{} y {}", tens, word), base + unit as u64 + 1);
            }
        }
        numerals.insert("cincuenta".to_string(), 50);

        Self {
            irregular_verbs,
            numerals,
            plural_exceptions: PLURAL_EXCEPTIONS.iter().map(|s| s.to_string()).collect(),
            lemma_corrections: LEMMA_CORRECTIONS
                .iter()
                .map(|&(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Merges `other` on top of `self`; entries in `other` win.
    pub fn merge(&mut self, other: LexicalOverrides) {
        self.irregular_verbs.extend(other.irregular_verbs);
        self.numerals.extend(other.numerals);
        self.plural_exceptions.extend(other.plural_exceptions);
        self.lemma_corrections.extend(other.lemma_corrections);
    }

    /// Case-insensitive lookup of a conjugated form.
    pub fn infinitive_of(&self, form: &str) -> Option<&str> {
        self.irregular_verbs
            .get(&form.to_lowercase())
            .map(String::as_str)
    }

    pub fn numeral_value(&self, lemma: &str) -> Option<u64> {
        self.numerals.get(lemma).copied()
    }

    pub fn is_plural_exception(&self, lemma: &str) -> bool {
        self.plural_exceptions.contains(lemma)
    }

    /// Lowercases a lemma and repairs known mis-lemmatizations.
    pub fn normalize_lemma(&self, lemma: &str) -> String {
        let lower = lemma.to_lowercase();
        match self.lemma_corrections.get(&lower) {
            Some(fixed) => fixed.clone(),
            None => lower,
        }
    }
}
