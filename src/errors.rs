//! Error types for the pictogram pipeline.

use std::path::PathBuf;

/// Result type defaulting to [`PictoError`].
pub type Result<T, E = PictoError> = std::result::Result<T, E>;

/// A failure reported by an NLP collaborator.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The pipeline could not annotate the given text.
    #[error("pipeline failed on '{text}': {reason}")]
    Annotation { text: String, reason: String },
}

/// Everything the library can report to a caller.
///
/// Resolution misses are not errors: they surface as `None` and a warning.
#[derive(Debug, thiserror::Error)]
pub enum PictoError {
    /// The sentence was empty or blank.
    #[error("empty sentence")]
    EmptyInput,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON document (configuration or overrides) failed to parse.
    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A lexicon line did not have the `surface<TAB>lemma<TAB>UPOS` shape.
    #[error("lexicon line {line}: {message}")]
    Lexicon { line: usize, message: String },

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// The temporary gallery file could not be moved into place.
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}
