// File: src/core/extractor.rs
use crate::core::overrides::LexicalOverrides;
use crate::core::types::{CanonicalKey, TaggedWord};
use crate::core::verbs::VerbResolver;
use crate::errors::PipelineError;
use crate::nlp::{Document, Inflector, SharedPipeline};
use std::collections::HashSet;
use std::sync::Arc;

const CONJUNCTION_Y: &str = "y";

/// Per-call scratch state. Built fresh for every extraction.
#[derive(Debug, Default)]
struct ExtractionState {
    verb_lemmas: HashSet<String>,
    pending_number: Option<u64>,
    keys: Vec<CanonicalKey>,
}

impl ExtractionState {
    fn flush_number(&mut self) {
        if let Some(n) = self.pending_number.take() {
            self.keys.push(n.to_string());
        }
    }

    fn finish(mut self) -> Vec<CanonicalKey> {
        self.flush_number();
        self.keys
    }
}

/// Turns a tagged sentence into the ordered keys used for pictogram lookup.
///
/// Verbs become infinitives (each lemma once), nouns, adjectives and
/// adverbs become singular lemmas, and runs of numerals collapse into
/// the decimal string of the last numeral seen.
pub struct ImportantWordExtractor {
    nlp: SharedPipeline,
    overrides: Arc<LexicalOverrides>,
    verbs: VerbResolver,
    inflector: Box<dyn Inflector + Send + Sync>,
}

impl ImportantWordExtractor {
    pub fn new(
        nlp: SharedPipeline,
        overrides: Arc<LexicalOverrides>,
        inflector: Box<dyn Inflector + Send + Sync>,
    ) -> Self {
        let verbs = VerbResolver::new(Arc::clone(&nlp), Arc::clone(&overrides));
        Self {
            nlp,
            overrides,
            verbs,
            inflector,
        }
    }

    /// Annotates `sentence` with one pipeline call and extracts its keys.
    pub fn extract(&self, sentence: &str) -> Result<Vec<CanonicalKey>, PipelineError> {
        let doc = self.nlp.annotate(sentence)?;
        Ok(self.extract_from(&doc))
    }

    /// Extracts keys from an already annotated document.
    pub fn extract_from(&self, doc: &Document) -> Vec<CanonicalKey> {
        let mut state = ExtractionState::default();
        for word in doc.words() {
            self.consume(&mut state, word);
        }
        state.finish()
    }

    fn consume(&self, state: &mut ExtractionState, word: &TaggedWord) {
        // "treinta y dos" reads as 30 then 2; the pending number is emitted
        // and the conjunction itself never becomes a key.
        if word.surface.to_lowercase() == CONJUNCTION_Y {
            state.flush_number();
            return;
        }

        let lemma = self.overrides.normalize_lemma(&word.lemma);

        if word.pos.is_verbal() {
            if !state.verb_lemmas.insert(lemma.clone()) {
                return;
            }
            let key = self.verbs.resolve_infinitive(&word.surface).unwrap_or(lemma);
            state.keys.push(key);
        } else if word.pos.is_content() {
            if let Some(n) = self.overrides.numeral_value(&lemma) {
                state.pending_number = Some(n);
            } else if let Some(n) = parse_digits(&word.surface) {
                state.pending_number = Some(n);
            } else {
                state.flush_number();
                let key = self.number_normalized(&word.surface, lemma);
                state.keys.push(key);
            }
        }
    }

    /// Plural exceptions are re-pluralized; everything else is
    /// singularized from its surface form when the inflector can.
    fn number_normalized(&self, surface: &str, lemma: String) -> CanonicalKey {
        if self.overrides.is_plural_exception(&lemma) {
            return self.inflector.pluralize(&lemma);
        }
        match self.inflector.singularize(surface) {
            Some(singular) => singular.to_lowercase(),
            None => lemma,
        }
    }
}

fn parse_digits(text: &str) -> Option<u64> {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{NlpPipeline, SpanishInflector};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed tagging for the sentence under test and a lemma
    /// table for isolated-word calls.
    struct ScriptedPipeline {
        sentence: String,
        words: Vec<TaggedWord>,
        isolated: HashMap<String, String>,
        isolated_calls: AtomicUsize,
    }

    impl NlpPipeline for ScriptedPipeline {
        fn annotate(&self, text: &str) -> Result<Document, PipelineError> {
            if text == self.sentence {
                return Ok(Document {
                    sentences: vec![self.words.clone()],
                });
            }
            self.isolated_calls.fetch_add(1, Ordering::SeqCst);
            let lemma = self.isolated.get(text).cloned().unwrap_or_else(|| text.to_string());
            Ok(Document {
                sentences: vec![vec![TaggedWord::new(text, &lemma, "VERB")]],
            })
        }
    }

    fn scripted(words: &[(&str, &str, &str)], isolated: &[(&str, &str)]) -> Arc<ScriptedPipeline> {
        let sentence = words.iter().map(|w| w.0).collect::<Vec<_>>().join(" ");
        Arc::new(ScriptedPipeline {
            sentence,
            words: words.iter().map(|&(s, l, p)| TaggedWord::new(s, l, p)).collect(),
            isolated: isolated
                .iter()
                .map(|&(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            isolated_calls: AtomicUsize::new(0),
        })
    }

    fn extractor_over(nlp: &Arc<ScriptedPipeline>) -> ImportantWordExtractor {
        let shared: SharedPipeline = Arc::<ScriptedPipeline>::clone(nlp);
        ImportantWordExtractor::new(
            shared,
            Arc::new(LexicalOverrides::builtin()),
            Box::new(SpanishInflector::new()),
        )
    }

    fn extractor(words: &[(&str, &str, &str)], isolated: &[(&str, &str)]) -> ImportantWordExtractor {
        extractor_over(&scripted(words, isolated))
    }

    #[test]
    fn auxiliary_and_verb_become_infinitives() {
        let ex = extractor(
            &[("Estoy", "estar", "AUX"), ("saltando", "saltar", "VERB")],
            &[("saltando", "saltar")],
        );
        assert_eq!(ex.extract("Estoy saltando").unwrap(), vec!["estar", "saltar"]);
    }

    #[test]
    fn isolated_lookup_uses_the_surface_form() {
        let nlp = scripted(&[("Bailamos", "bailar", "VERB")], &[("Bailamos", "danzar")]);
        let ex = extractor_over(&nlp);
        assert_eq!(ex.extract("Bailamos").unwrap(), vec!["danzar"]);
        assert_eq!(nlp.isolated_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn irregular_auxiliary_skips_the_isolated_call() {
        let nlp = scripted(
            &[("Estoy", "estar", "AUX"), ("saltando", "saltar", "VERB")],
            &[("saltando", "saltar")],
        );
        let ex = extractor_over(&nlp);
        assert_eq!(ex.extract("Estoy saltando").unwrap(), vec!["estar", "saltar"]);
        // Only "saltando" reaches the pipeline on its own.
        assert_eq!(nlp.isolated_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unresolved_verbs_fall_back_to_lemma() {
        let ex = extractor(&[("Bailamos", "bailar", "VERB")], &[]);
        assert_eq!(ex.extract("Bailamos").unwrap(), vec!["bailar"]);
    }

    #[test]
    fn repeated_verb_lemmas_appear_once() {
        let ex = extractor(
            &[
                ("como", "comer", "VERB"),
                ("pan", "pan", "NOUN"),
                ("y", "y", "CCONJ"),
                ("come", "comer", "VERB"),
                ("queso", "queso", "NOUN"),
            ],
            &[("como", "comer")],
        );
        assert_eq!(
            ex.extract("como pan y come queso").unwrap(),
            vec!["comer", "pan", "queso"]
        );
    }

    #[test]
    fn y_flushes_rather_than_sums() {
        let ex = extractor(
            &[("treinta", "treinta", "NUM"), ("y", "y", "NUM"), ("dos", "dos", "NUM")],
            &[],
        );
        assert_eq!(ex.extract("treinta y dos").unwrap(), vec!["30", "2"]);

        let ex = extractor(
            &[("treinta", "treinta", "NUM"), ("y", "y", "CCONJ"), ("dos", "dos", "NUM")],
            &[],
        );
        assert_eq!(ex.extract("treinta y dos").unwrap(), vec!["30", "2"]);
    }

    #[test]
    fn numerals_overwrite_and_flush_before_content_words() {
        let ex = extractor(
            &[
                ("tres", "tres", "NUM"),
                ("12", "12", "NUM"),
                ("perros", "perro", "NOUN"),
                ("cinco", "cinco", "NUM"),
            ],
            &[],
        );
        assert_eq!(
            ex.extract("tres 12 perros cinco").unwrap(),
            vec!["12", "perro", "5"]
        );
    }

    #[test]
    fn plural_exceptions_keep_their_plural_form() {
        let ex = extractor(
            &[
                ("palomitas", "palomita", "NOUN"),
                ("Perros", "perro", "NOUN"),
                ("agua", "agua", "NOUN"),
            ],
            &[],
        );
        assert_eq!(
            ex.extract("palomitas Perros agua").unwrap(),
            vec!["palomitas", "perro", "agua"]
        );
    }

    #[test]
    fn truncated_despues_lemma_is_corrected() {
        let ex = extractor(&[("después", "despué", "ADV")], &[]);
        assert_eq!(ex.extract("después").unwrap(), vec!["después"]);
    }

    #[test]
    fn other_tags_are_ignored_entirely() {
        let ex = extractor(
            &[
                ("dos", "dos", "NUM"),
                ("el", "el", "DET"),
                ("Madrid", "Madrid", "PROPN"),
                ("gatos", "gato", "NOUN"),
            ],
            &[],
        );
        assert_eq!(ex.extract("dos el Madrid gatos").unwrap(), vec!["2", "gato"]);
    }

    #[test]
    fn extraction_is_repeatable() {
        let ex = extractor(
            &[("Estoy", "estar", "AUX"), ("cuatro", "cuatro", "NUM")],
            &[],
        );
        let first = ex.extract("Estoy cuatro").unwrap();
        let second = ex.extract("Estoy cuatro").unwrap();
        assert_eq!(first, vec!["estar", "4"]);
        assert_eq!(first, second);
    }
}
