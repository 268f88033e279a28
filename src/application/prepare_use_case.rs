// ============================================================
// Layer 2 - PrepareUseCase
// ============================================================
// Orchestrates the full preprocessing run in order:
//
//   Step 1: Load the annotation file        (Layer 4 - data)
//   Step 2: Build feature-backed pairs      (Layer 4 - data)
//   Step 3: Apply the optional subset       (Layer 4 - data)
//   Step 4: Fit and save the vocabulary     (Layer 4 + Layer 6)
//   Step 5: Encode, pad, and save captions  (Layer 4 + Layer 6)
//
// Nothing is retried. If Step 5 fails, the tokenizer written
// in Step 4 stays on disk.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::PathBuf};

use crate::data::{
    loader::AnnotationLoader,
    pairs::{apply_subset, PairBuilder},
    sequences::SequenceEncoder,
    vocabulary::{TokenizerConfig, Vocabulary},
};
use crate::domain::traits::{AnnotationSource, FeatureCatalog};
use crate::infra::{
    feature_dir::FeatureDir,
    npz::{NpzWriter, CAPTION_DATA_FILE},
    tokenizer_store::{TokenizerStore, TOKENIZER_FILE},
};

// ─── Preprocessing Configuration ─────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Folder holding `captions_train*.json`
    pub annotations_dir: PathBuf,
    /// Folder holding one `<image stem>.npy` per image
    pub feature_dir:     PathBuf,
    /// Where `tokenizer.json` and `captions_data.npz` are written
    pub out_dir:         PathBuf,
    pub vocab_size:      usize,
    pub max_len:         usize,
    /// Keep only the first N pairs
    pub subset:          Option<usize>,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            annotations_dir: PathBuf::from("annotations"),
            feature_dir:     PathBuf::from("features"),
            out_dir:         PathBuf::from("."),
            vocab_size:      10_000,
            max_len:         50,
            subset:          None,
        }
    }
}

/// What a finished run produced, for the CLI to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepSummary {
    pub total_pairs:    usize,
    pub used_pairs:     usize,
    /// Images behind the kept pairs
    pub distinct_images: usize,
    pub vocab_words:    usize,
    pub max_len:        usize,
    pub tokenizer_path: PathBuf,
    pub data_path:      PathBuf,
}

pub struct PrepareUseCase {
    config: PrepConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    /// Run against the real filesystem.
    pub fn execute(&self) -> Result<PrepSummary> {
        let loader   = AnnotationLoader::new(&self.config.annotations_dir);
        let features = FeatureDir::new(&self.config.feature_dir);
        self.execute_with(&loader, &features)
    }

    /// Run with explicit sources; outputs still go to `out_dir`.
    pub fn execute_with<S, C>(&self, source: &S, features: &C) -> Result<PrepSummary>
    where
        S: AnnotationSource,
        C: FeatureCatalog,
    {
        let cfg = &self.config;

        // ── Step 1: Load annotations ─────────────────────────────────────────
        let coco = source.load()?;

        // ── Step 2: Join captions to images with features ────────────────────
        let pairs       = PairBuilder::new(features).build(&coco);
        let total_pairs = pairs.len();

        // ── Step 3: Optional first-N subset ──────────────────────────────────
        let pairs = apply_subset(pairs, cfg.subset);

        let captions: Vec<&str> = pairs.iter().map(|p| p.caption.as_str()).collect();
        let distinct_images = pairs.iter().map(|p| p.image_id).collect::<HashSet<_>>().len();
        tracing::info!("Total captions: {} from {} images", captions.len(), distinct_images);

        // ── Step 4: Fit and persist the vocabulary ───────────────────────────
        let vocab = Vocabulary::fit(TokenizerConfig::new(cfg.vocab_size), &captions);
        let tokenizer_path = cfg.out_dir.join(TOKENIZER_FILE);
        TokenizerStore::new(&tokenizer_path).save(&vocab)?;

        // ── Step 5: Encode, pad, and persist ─────────────────────────────────
        let encoded   = SequenceEncoder::new(&vocab, cfg.max_len).encode(&pairs)?;
        let data_path = cfg.out_dir.join(CAPTION_DATA_FILE);

        let mut npz = NpzWriter::create(&data_path)?;
        npz.add_i32_matrix("padded", &encoded.padded)?;
        npz.add_str_vector("img_fnames", &encoded.img_fnames)?;
        npz.finish()?;
        tracing::info!("Caption dataset saved to '{}'", data_path.display());

        Ok(PrepSummary {
            total_pairs,
            used_pairs: encoded.rows(),
            distinct_images,
            vocab_words: vocab.len(),
            max_len: encoded.max_len(),
            tokenizer_path,
            data_path,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::{tempdir, TempDir};
    use zip::ZipArchive;

    /// annotations/ + features/ + out/ under one temp root
    fn fixture(images: usize, with_features: &[usize]) -> (TempDir, PrepConfig) {
        let root = tempdir().unwrap();
        let ann  = root.path().join("annotations");
        let feat = root.path().join("features");
        let out  = root.path().join("out");
        for d in [&ann, &feat, &out] {
            fs::create_dir_all(d).unwrap();
        }

        let imgs: Vec<serde_json::Value> = (0..images)
            .map(|i| serde_json::json!({"id": i, "file_name": format!("{i:012}.jpg")}))
            .collect();
        let anns: Vec<serde_json::Value> = (0..images)
            .flat_map(|i| {
                [
                    serde_json::json!({"image_id": i, "caption": format!("Photo {i}.")}),
                    serde_json::json!({"image_id": i, "caption": "  Something ELSE entirely "}),
                ]
            })
            .collect();
        fs::write(
            ann.join("captions_train2017.json"),
            serde_json::json!({"images": imgs, "annotations": anns}).to_string(),
        )
        .unwrap();

        for &i in with_features {
            fs::write(feat.join(format!("{i:012}.npy")), b"").unwrap();
        }

        let config = PrepConfig {
            annotations_dir: ann,
            feature_dir:     feat,
            out_dir:         out,
            vocab_size:      100,
            max_len:         50,
            subset:          None,
        };
        (root, config)
    }

    fn read_npy(path: &std::path::Path, member: &str) -> String {
        let mut archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
        let mut bytes   = Vec::new();
        archive.by_name(member).unwrap().read_to_end(&mut bytes).unwrap();
        let hlen = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        String::from_utf8(bytes[10..10 + hlen].to_vec()).unwrap()
    }

    #[test]
    fn test_end_to_end_writes_both_artifacts() {
        let (_root, config) = fixture(4, &[0, 2, 3]);
        let summary = PrepareUseCase::new(config).execute().unwrap();

        assert_eq!(summary.total_pairs, 6);
        assert_eq!(summary.used_pairs, 6);
        assert_eq!(summary.distinct_images, 3);
        // "<start> something else entirely <end>" is the longest caption
        assert_eq!(summary.max_len, 5);
        assert!(summary.tokenizer_path.exists());

        let header = read_npy(&summary.data_path, "padded.npy");
        assert!(header.contains("'shape': (6, 5)"));
        let header = read_npy(&summary.data_path, "img_fnames.npy");
        assert!(header.contains("'shape': (6,)"));
        assert!(header.contains("'descr': '<U16'"));
    }

    #[test]
    fn test_subset_limits_rows() {
        let (_root, mut config) = fixture(5, &[0, 1, 2, 3, 4]);
        config.subset = Some(3);
        let summary = PrepareUseCase::new(config).execute().unwrap();

        assert_eq!(summary.total_pairs, 10);
        assert_eq!(summary.used_pairs, 3);
        let header = read_npy(&summary.data_path, "padded.npy");
        assert!(header.contains("'shape': (3, 5)"));
    }

    #[test]
    fn test_max_len_caps_columns() {
        let (_root, mut config) = fixture(2, &[0, 1]);
        config.max_len = 3;
        let summary = PrepareUseCase::new(config).execute().unwrap();
        assert_eq!(summary.max_len, 3);
    }

    #[test]
    fn test_no_features_leaves_only_the_tokenizer() {
        let (_root, config) = fixture(3, &[]);
        let out = config.out_dir.clone();

        let err = PrepareUseCase::new(config).execute().unwrap_err();
        assert!(err.to_string().contains("No caption sequences"));
        assert!(out.join(TOKENIZER_FILE).exists());
        assert!(!out.join(CAPTION_DATA_FILE).exists());
    }

    #[test]
    fn test_missing_annotations_writes_nothing() {
        let (_root, config) = fixture(1, &[0]);
        fs::remove_file(config.annotations_dir.join("captions_train2017.json")).unwrap();
        let out = config.out_dir.clone();

        assert!(PrepareUseCase::new(config).execute().is_err());
        assert!(!out.join(TOKENIZER_FILE).exists());
    }
}
