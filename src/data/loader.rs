// ============================================================
// Layer 4 - Annotation Loader
// ============================================================
// Finds the training captions file inside the annotations
// directory and parses it.
//
// A COCO annotations folder usually looks like:
//   annotations/
//     captions_train2017.json   <- the one we want
//     captions_val2017.json
//     instances_train2017.json
//
// Any file whose name contains "captions_train" is accepted.
// Entries are visited in sorted order so the same folder always
// picks the same file. If nothing matches, the run stops here,
// before any output is written.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::annotation::CocoCaptions;
use crate::domain::traits::AnnotationSource;

/// Substring that marks the training captions file
pub const ANNOTATION_MARKER: &str = "captions_train";

/// Loads the training captions file from a directory.
/// Implements the AnnotationSource trait from Layer 3.
pub struct AnnotationLoader {
    dir: PathBuf,
}

impl AnnotationLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Locate the captions file without parsing it.
    pub fn find_annotation_file(&self) -> Result<PathBuf> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)
            .with_context(|| format!("Cannot read annotations directory '{}'", self.dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.contains(ANNOTATION_MARKER))
            .collect();
        names.sort();

        let Some(first) = names.first() else {
            anyhow::bail!(
                "{}*.json not found in annotations directory '{}'",
                ANNOTATION_MARKER,
                self.dir.display()
            );
        };

        for ignored in &names[1..] {
            tracing::warn!("Ignoring additional annotation file '{}'", ignored);
        }

        Ok(self.dir.join(first))
    }
}

impl AnnotationSource for AnnotationLoader {
    fn load(&self) -> Result<CocoCaptions> {
        let path = self.find_annotation_file()?;
        tracing::info!("Reading annotations from '{}'", path.display());

        let coco = parse_annotation_file(&path)?;
        tracing::info!(
            "Parsed {} images and {} annotations",
            coco.images.len(),
            coco.annotations.len()
        );
        Ok(coco)
    }
}

/// Parse one annotation file. No schema validation beyond what
/// serde needs to fill the domain structs.
fn parse_annotation_file(path: &Path) -> Result<CocoCaptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    serde_json::from_str(&text)
        .with_context(|| format!("Malformed annotation JSON in '{}'", path.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "images": [{"id": 1, "file_name": "one.jpg"}],
        "annotations": [{"image_id": 1, "caption": "A dog runs."}]
    }"#;

    #[test]
    fn test_finds_training_captions_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("instances_train2017.json"), "{}").unwrap();
        fs::write(dir.path().join("captions_val2017.json"), "{}").unwrap();
        fs::write(dir.path().join("captions_train2017.json"), SAMPLE).unwrap();

        let loader = AnnotationLoader::new(dir.path());
        let path   = loader.find_annotation_file().unwrap();
        assert!(path.ends_with("captions_train2017.json"));

        let coco = loader.load().unwrap();
        assert_eq!(coco.images.len(), 1);
        assert_eq!(coco.annotations[0].caption, "A dog runs.");
    }

    #[test]
    fn test_picks_first_match_in_sorted_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("captions_train2017.json"), SAMPLE).unwrap();
        fs::write(dir.path().join("captions_train2014.json"), SAMPLE).unwrap();

        let path = AnnotationLoader::new(dir.path()).find_annotation_file().unwrap();
        assert!(path.ends_with("captions_train2014.json"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("captions_val2017.json"), SAMPLE).unwrap();

        let err = AnnotationLoader::new(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains("captions_train"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("captions_train2017.json"), "{ not json").unwrap();

        let err = AnnotationLoader::new(dir.path()).load().unwrap_err();
        assert!(format!("{err:#}").contains("Malformed annotation JSON"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let loader = AnnotationLoader::new(dir.path().join("nope"));
        assert!(loader.find_annotation_file().is_err());
    }
}
