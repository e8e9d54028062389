// File: src/nlp/lexicon.rs
use super::{Document, NlpPipeline};
use crate::core::types::TaggedWord;
use crate::errors::{PictoError, PipelineError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const BUILTIN_LEXICON: &str = include_str!("../../data/lexicon_es.tsv");

/// Words, or single punctuation marks.
const TOKEN_PATTERN: &str = r"\w+|[^\w\s]";

const SENTENCE_END: &[&str] = &[".", "!", "?", "…"];

#[derive(Debug, Clone)]
struct LexEntry {
    lemma: String,
    upos: String,
}

/// A dictionary-lookup tagger.
///
/// Every token is looked up by its lowercased surface form in a
/// `surface<TAB>lemma<TAB>UPOS` lexicon. Tokens missing from the lexicon
/// are tagged by shape: digit strings as `NUM`, punctuation as `PUNCT`,
/// anything else as a `NOUN` whose lemma is the lowercased surface.
pub struct LexiconPipeline {
    entries: HashMap<String, LexEntry>,
    token_re: Regex,
}

impl LexiconPipeline {
    /// A pipeline over the built-in Spanish lexicon.
    pub fn new() -> Result<Self> {
        let mut pipeline = Self::empty()?;
        pipeline.load_str(BUILTIN_LEXICON)?;
        Ok(pipeline)
    }

    pub fn empty() -> Result<Self> {
        Ok(Self {
            entries: HashMap::new(),
            token_re: Regex::new(TOKEN_PATTERN)?,
        })
    }

    /// The built-in lexicon with the entries of `path` merged on top.
    pub fn with_extra_lexicon(path: &Path) -> Result<Self> {
        let mut pipeline = Self::new()?;
        let text = fs::read_to_string(path)?;
        let added = pipeline.load_str(&text)?;
        debug!("Loaded {} lexicon entries from {}", added, path.display());
        Ok(pipeline)
    }

    /// Parses lexicon lines and adds them, returning how many were read.
    /// Blank lines and `#` comments are skipped.
    pub fn load_str(&mut self, text: &str) -> Result<usize> {
        let mut added = 0;
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            match fields.as_slice() {
                [surface, lemma, upos] if !surface.is_empty() && !lemma.is_empty() => {
                    self.insert(surface, lemma, upos);
                    added += 1;
                }
                _ => {
                    return Err(PictoError::Lexicon {
                        line: idx + 1,
                        message: format!("expected 'surface<TAB>lemma<TAB>UPOS', got '{}'", line),
                    })
                }
            }
        }
        Ok(added)
    }

    pub fn insert(&mut self, surface: &str, lemma: &str, upos: &str) {
        self.entries.insert(
            surface.to_lowercase(),
            LexEntry {
                lemma: lemma.to_string(),
                upos: upos.to_ascii_uppercase(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tag(&self, token: &str) -> TaggedWord {
        if let Some(entry) = self.entries.get(&token.to_lowercase()) {
            return TaggedWord::new(token, &entry.lemma, &entry.upos);
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            TaggedWord::new(token, token, "NUM")
        } else if token.chars().all(|c| !c.is_alphanumeric()) {
            TaggedWord::new(token, token, "PUNCT")
        } else {
            TaggedWord::new(token, &token.to_lowercase(), "NOUN")
        }
    }
}

impl NlpPipeline for LexiconPipeline {
    fn annotate(&self, text: &str) -> Result<Document, PipelineError> {
        let mut doc = Document::default();
        let mut current = Vec::new();

        for token in self.token_re.find_iter(text).map(|m| m.as_str()) {
            current.push(self.tag(token));
            if SENTENCE_END.contains(&token) {
                doc.sentences.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            doc.sentences.push(current);
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PartOfSpeech;

    #[test]
    fn builtin_lexicon_tags_known_words() {
        let nlp = LexiconPipeline::new().unwrap();
        let doc = nlp.annotate("Estoy saltando").unwrap();
        let words: Vec<_> = doc.words().collect();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].surface, "Estoy");
        assert_eq!(words[0].lemma, "estar");
        assert_eq!(words[0].pos, PartOfSpeech::Aux);
        assert_eq!(words[1].lemma, "saltar");
        assert_eq!(words[1].pos, PartOfSpeech::Verb);
    }

    #[test]
    fn unknown_tokens_are_tagged_by_shape() {
        let nlp = LexiconPipeline::empty().unwrap();
        let doc = nlp.annotate("Tengo 12 Cometas,").unwrap();
        let words: Vec<_> = doc.words().collect();
        assert_eq!(words[1].pos, PartOfSpeech::Num);
        assert_eq!(words[1].lemma, "12");
        assert_eq!(words[2].pos, PartOfSpeech::Noun);
        assert_eq!(words[2].lemma, "cometas");
        assert_eq!(words[3].upos, "PUNCT");
        assert_eq!(words[3].pos, PartOfSpeech::Other);
    }

    #[test]
    fn sentences_split_on_terminal_punctuation() {
        let nlp = LexiconPipeline::new().unwrap();
        let doc = nlp.annotate("Bebo agua. ¿Quieres pan?").unwrap();
        assert_eq!(doc.sentences.len(), 2);
        assert_eq!(doc.sentences[0].len(), 3);
        assert_eq!(doc.sentences[1].first().unwrap().surface, "¿");

        assert!(nlp.annotate("   ").unwrap().sentences.is_empty());
    }

    #[test]
    fn malformed_lexicon_lines_report_their_number() {
        let mut nlp = LexiconPipeline::empty().unwrap();
        let err = nlp
            .load_str("# header\nagua\tagua\tNOUN\nroto\n")
            .unwrap_err();
        match err {
            PictoError::Lexicon { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn later_entries_override_earlier_ones() {
        let mut nlp = LexiconPipeline::empty().unwrap();
        nlp.load_str("vaso\tvaso\tNOUN\nVaso\tbaso\tADJ\n").unwrap();
        assert_eq!(nlp.len(), 1);
        let doc = nlp.annotate("vaso").unwrap();
        assert_eq!(doc.first_word().unwrap().lemma, "baso");
    }
}
