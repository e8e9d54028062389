//! Language collaborators: the tagging/lemmatizing pipeline and the
//! singular/plural oracle. The core only talks to the traits below.

pub mod inflect;
pub mod lexicon;

use crate::core::types::TaggedWord;
use crate::errors::PipelineError;
use std::sync::Arc;

pub use inflect::SpanishInflector;
pub use lexicon::LexiconPipeline;

/// An annotated text: sentences in order, words in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub sentences: Vec<Vec<TaggedWord>>,
}

impl Document {
    pub fn words(&self) -> impl Iterator<Item = &TaggedWord> {
        self.sentences.iter().flatten()
    }

    pub fn first_word(&self) -> Option<&TaggedWord> {
        self.sentences.first().and_then(|s| s.first())
    }
}

/// Part-of-speech tagging and lemmatization.
///
/// Implementations are built once and shared; `annotate` may be called
/// for whole sentences and for isolated words alike.
pub trait NlpPipeline {
    fn annotate(&self, text: &str) -> Result<Document, PipelineError>;
}

/// A pipeline built once at startup and handed to every component that needs it.
pub type SharedPipeline = Arc<dyn NlpPipeline + Send + Sync>;

/// Number inflection for nouns and adjectives.
pub trait Inflector {
    /// The singular of `word`, or `None` when it is not a recognizable plural.
    fn singularize(&self, word: &str) -> Option<String>;
    fn pluralize(&self, word: &str) -> String;
}
