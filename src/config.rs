// File: src/config.rs
use crate::core::types::{PictogramVariant, ResolutionPolicy};
use crate::errors::Result;
use crate::gallery::GalleryLayout;
use crate::persistence::read_json;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "picto-tea";
const CONFIG_FILE: &str = "config.json";

/// Points the application at a config file other than the default one.
pub const CONFIG_ENV: &str = "PICTO_TEA_CONFIG";
/// Overrides the pictogram directory after the config file is read.
pub const IMAGES_ENV: &str = "PICTO_TEA_IMAGES";

fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Runtime settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PictoConfig {
    /// Flat directory holding `{name}.png` / `{name}_BN.png` pictograms.
    pub pictogram_dir: PathBuf,
    /// Extra `surface<TAB>lemma<TAB>UPOS` entries merged over the built-in lexicon.
    pub lexicon_path: Option<PathBuf>,
    /// JSON tables merged over the built-in overrides.
    pub overrides_path: Option<PathBuf>,
    /// Where the gallery strip is written while it is on display.
    pub gallery_path: PathBuf,
    pub tile_height: u32,
    pub tile_spacing: u32,
    pub policy: ResolutionPolicy,
    pub variant: PictogramVariant,
    /// Log file; stderr when unset.
    pub log_path: Option<PathBuf>,
}

impl Default for PictoConfig {
    fn default() -> Self {
        let layout = GalleryLayout::default();
        Self {
            pictogram_dir: data_dir().join("Images"),
            lexicon_path: None,
            overrides_path: None,
            gallery_path: env::temp_dir().join("picto-tea-gallery.png"),
            tile_height: layout.tile_height,
            tile_spacing: layout.spacing,
            policy: ResolutionPolicy::default(),
            variant: PictogramVariant::default(),
            log_path: None,
        }
    }
}

impl PictoConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// `$PICTO_TEA_CONFIG`, else `<config_dir>/picto-tea/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Defaults, then the config file if there is one, then the
    /// environment override for the pictogram directory.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("Reading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };
        if let Some(dir) = env::var_os(IMAGES_ENV) {
            config.pictogram_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    pub fn layout(&self) -> GalleryLayout {
        GalleryLayout {
            tile_height: self.tile_height,
            spacing: self.tile_spacing,
        }
        .clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"pictogram_dir": "/srv/pictos", "variant": "color", "policy": "single_key"}"#,
        )
        .unwrap();

        let config = PictoConfig::from_file(&path).unwrap();
        assert_eq!(config.pictogram_dir, PathBuf::from("/srv/pictos"));
        assert_eq!(config.variant, PictogramVariant::Color);
        assert_eq!(config.policy, ResolutionPolicy::SingleKey);
        assert_eq!(config.tile_height, 200);
        assert_eq!(config.layout().spacing, 8);
        assert!(config.lexicon_path.is_none());
    }

    #[test]
    fn layout_clamps_configured_geometry() {
        let config = PictoConfig {
            tile_height: 0,
            tile_spacing: 3_000_000_000,
            ..PictoConfig::default()
        };
        let layout = config.layout();
        assert_eq!(layout.tile_height, 1);
        assert_eq!(layout.spacing, crate::gallery::MAX_SPACING);
    }

    #[test]
    fn defaults_are_pairwise_monochrome() {
        let config = PictoConfig::default();
        assert_eq!(config.policy, ResolutionPolicy::Pairwise);
        assert_eq!(config.variant, PictogramVariant::Monochrome);
        assert!(config.pictogram_dir.ends_with("Images"));
    }
}
