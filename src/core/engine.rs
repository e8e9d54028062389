use crate::config::PictoConfig;
use crate::core::extractor::ImportantWordExtractor;
use crate::core::overrides::LexicalOverrides;
use crate::core::resolver::{PictogramDirectory, PictogramResolver};
use crate::core::types::{CanonicalKey, PictogramVariant, Resolved, ResolvedImage, ResolutionPolicy};
use crate::errors::{PictoError, Result};
use crate::nlp::{Inflector, LexiconPipeline, SharedPipeline, SpanishInflector};
use crate::persistence::load_overrides;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

// The engine owns one pipeline for its whole life; extraction and
// resolution are independent so a miss in one key never aborts the rest.
pub struct PictoEngine {
    extractor: ImportantWordExtractor,
    pictogram_dir: PathBuf,
    policy: ResolutionPolicy,
}

impl PictoEngine {
    pub fn new(
        nlp: SharedPipeline,
        overrides: LexicalOverrides,
        inflector: Box<dyn Inflector + Send + Sync>,
        pictogram_dir: &Path,
        policy: ResolutionPolicy,
    ) -> Self {
        Self {
            extractor: ImportantWordExtractor::new(nlp, Arc::new(overrides), inflector),
            pictogram_dir: pictogram_dir.to_path_buf(),
            policy,
        }
    }

    /// Builds the default collaborators described by `config`: the lexicon
    /// pipeline (plus any extra lexicon), the built-in overrides (plus any
    /// overrides file) and the Spanish inflector.
    pub fn from_config(config: &PictoConfig) -> Result<Self> {
        let nlp = match &config.lexicon_path {
            Some(path) => LexiconPipeline::with_extra_lexicon(path)?,
            None => LexiconPipeline::new()?,
        };
        info!("Lexicon pipeline ready with {} entries", nlp.len());

        let mut overrides = LexicalOverrides::builtin();
        if let Some(path) = &config.overrides_path {
            overrides.merge(load_overrides(path)?);
        }

        Ok(Self::new(
            Arc::new(nlp),
            overrides,
            Box::new(SpanishInflector::new()),
            &config.pictogram_dir,
            config.policy,
        ))
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ResolutionPolicy) {
        self.policy = policy;
    }

    /// The ordered lookup keys for `sentence`.
    pub fn important_words(&self, sentence: &str) -> Result<Vec<CanonicalKey>> {
        if sentence.trim().is_empty() {
            return Err(PictoError::EmptyInput);
        }
        Ok(self.extractor.extract(sentence)?)
    }

    /// A resolver over a fresh listing of the pictogram directory.
    pub fn resolver(&self) -> PictogramResolver {
        PictogramResolver::new(PictogramDirectory::scan(&self.pictogram_dir), self.policy)
    }

    /// Which files would be shown for `keys`, without decoding them.
    pub fn plan(&self, keys: &[CanonicalKey], variant: PictogramVariant) -> Vec<Resolved<()>> {
        self.resolver().resolve_sequence(keys, variant, |_| Some(()))
    }

    /// Resolves and decodes the pictograms for `keys`, in order.
    /// Files that fail to decode are logged and left out.
    pub fn load_pictograms(&self, keys: &[CanonicalKey], variant: PictogramVariant) -> Vec<ResolvedImage> {
        self.resolver().resolve_sequence(keys, variant, |path| match image::open(path) {
            Ok(img) => Some(img),
            Err(e) => {
                error!("Error processing image {}: {}", path.display(), e);
                None
            }
        })
    }
}
