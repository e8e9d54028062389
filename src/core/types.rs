// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A normalized string used to look up a pictogram image file: a verb
/// infinitive, a singularized lemma, or the decimal form of a number.
pub type CanonicalKey = String;

/// Coarse part-of-speech classes the extractor cares about.
/// Every other universal tag collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Verb,
    Aux,
    Noun,
    Adj,
    Adv,
    Num,
    Other,
}

impl PartOfSpeech {
    /// Maps a universal POS tag (`VERB`, `NOUN`, ...) to its class.
    pub fn from_upos(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "VERB" => Self::Verb,
            "AUX" => Self::Aux,
            "NOUN" => Self::Noun,
            "ADJ" => Self::Adj,
            "ADV" => Self::Adv,
            "NUM" => Self::Num,
            _ => Self::Other,
        }
    }

    pub fn is_verbal(self) -> bool {
        matches!(self, Self::Verb | Self::Aux)
    }

    /// Nouns, adjectives, adverbs and numerals.
    pub fn is_content(self) -> bool {
        matches!(self, Self::Noun | Self::Adj | Self::Adv | Self::Num)
    }
}

/// One word of an annotated sentence, as produced by an NLP pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedWord {
    pub surface: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    /// The raw tag the pipeline emitted, kept for diagnostics.
    pub upos: String,
}

impl TaggedWord {
    pub fn new(surface: &str, lemma: &str, upos: &str) -> Self {
        Self {
            surface: surface.to_string(),
            lemma: lemma.to_string(),
            pos: PartOfSpeech::from_upos(upos),
            upos: upos.to_ascii_uppercase(),
        }
    }
}

/// Visual style of a pictogram, selected by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PictogramVariant {
    /// `{name}_BN.png`, falling back to `{name}.png`.
    #[default]
    Monochrome,
    /// `{name}.png`.
    Color,
}

impl PictogramVariant {
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Monochrome => Some("_BN"),
            Self::Color => None,
        }
    }
}

impl fmt::Display for PictogramVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monochrome => write!(f, "B/N"),
            Self::Color => write!(f, "Color"),
        }
    }
}

/// How keys are mapped to files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Each key on its own, bare name only.
    SingleKey,
    /// Adjacent pairs first, then each key with its neighbours, then the bare key.
    #[default]
    Pairwise,
}

/// What a resolved file stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictogramSource {
    Key(CanonicalKey),
    Pair(CanonicalKey, CanonicalKey),
}

impl fmt::Display for PictogramSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Pair(first, second) => write!(f, "{} {}", first, second),
        }
    }
}

/// A key (or key pair) together with the file that matched it and
/// whatever the loader produced from that file.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub source: PictogramSource,
    pub path: PathBuf,
    pub payload: T,
}

/// A pictogram ready for the gallery.
pub type ResolvedImage = Resolved<image::DynamicImage>;
