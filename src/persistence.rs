// File: src/persistence.rs
use crate::core::overrides::LexicalOverrides;
use crate::errors::{PictoError, Result};
use image::{ImageFormat, RgbaImage};
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `canvas` as a PNG at `path` without ever exposing a half-written file.
pub fn save_strip(canvas: &RgbaImage, path: &Path) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        canvas.write_to(&mut writer, ImageFormat::Png)?;
        writer.flush()?;
    }

    temp_file.persist(path)?;
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| PictoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads override tables to be merged over the built-in ones.
pub fn load_overrides(path: &Path) -> Result<LexicalOverrides> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_is_written_and_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out").join("strip.png");

        save_strip(&RgbaImage::new(3, 2), &path).unwrap();
        assert_eq!(image::open(&path).unwrap().width(), 3);

        save_strip(&RgbaImage::new(7, 2), &path).unwrap();
        assert_eq!(image::open(&path).unwrap().width(), 7);
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn overrides_file_errors_name_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("overrides.json");
        fs::write(&path, "{ not json").unwrap();
        match load_overrides(&path) {
            Err(PictoError::Json { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn partial_overrides_file_fills_missing_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("overrides.json");
        fs::write(&path, r#"{"numerals": {"cien": 100}}"#).unwrap();
        let o = load_overrides(&path).unwrap();
        assert_eq!(o.numeral_value("cien"), Some(100));
        assert!(o.irregular_verbs.is_empty());
    }
}
