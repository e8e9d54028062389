// File: src/core/verbs.rs
use crate::core::overrides::LexicalOverrides;
use crate::nlp::SharedPipeline;
use std::sync::Arc;
use tracing::debug;

/// Maps conjugated verb forms to their infinitives.
///
/// The override table is consulted first; otherwise the word is sent
/// through the pipeline on its own and the lemma of its first word is
/// taken as the infinitive.
pub struct VerbResolver {
    nlp: SharedPipeline,
    overrides: Arc<LexicalOverrides>,
}

impl VerbResolver {
    pub fn new(nlp: SharedPipeline, overrides: Arc<LexicalOverrides>) -> Self {
        Self { nlp, overrides }
    }

    /// Returns `None` when neither the table nor the pipeline changes the
    /// form. Pipeline failures are downgraded to `None`.
    pub fn resolve_infinitive(&self, form: &str) -> Option<String> {
        if let Some(infinitive) = self.overrides.infinitive_of(form) {
            return Some(infinitive.to_string());
        }

        match self.nlp.annotate(form) {
            Ok(doc) => match doc.first_word() {
                Some(word) if word.lemma != form => Some(word.lemma.to_lowercase()),
                _ => None,
            },
            Err(e) => {
                debug!("No infinitive for '{}': {}", form, e);
                None
            }
        }
    }
}
