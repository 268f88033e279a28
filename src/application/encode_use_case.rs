// ============================================================
// Layer 2 - EncodeUseCase
// ============================================================
// Reloads a saved `tokenizer.json` and encodes ad-hoc captions
// exactly the way the prepare run did: clean, tokenize, pad.
// Handy for checking what the training data will look like.

use anyhow::Result;
use ndarray::Array2;
use std::path::PathBuf;

use crate::data::{
    preprocessor::Preprocessor,
    sequences::{effective_len, pad_sequences},
};
use crate::infra::tokenizer_store::TokenizerStore;

pub struct EncodeUseCase {
    tokenizer_path: PathBuf,
    max_len:        usize,
}

impl EncodeUseCase {
    pub fn new(tokenizer_path: impl Into<PathBuf>, max_len: usize) -> Self {
        Self { tokenizer_path: tokenizer_path.into(), max_len }
    }

    /// Clean and encode raw captions; one padded row per caption.
    pub fn encode(&self, captions: &[String]) -> Result<Array2<i32>> {
        let vocab = TokenizerStore::new(&self.tokenizer_path).load()?;
        let prep  = Preprocessor::new();

        let sequences: Vec<Vec<usize>> = captions
            .iter()
            .map(|c| vocab.encode(&prep.clean(c)))
            .collect();

        let len = effective_len(&sequences, self.max_len)?;
        pad_sequences(&sequences, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocabulary::{TokenizerConfig, Vocabulary};
    use ndarray::array;
    use tempfile::tempdir;

    #[test]
    fn test_matches_the_prepare_encoding() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        let vocab = Vocabulary::fit(
            TokenizerConfig::new(100),
            &["<start> a dog <end>", "<start> a cat <end>"],
        );
        TokenizerStore::new(&path).save(&vocab).unwrap();

        // <unk>=1, <start>=2, a=3, <end>=4, dog=5, cat=6
        let rows = EncodeUseCase::new(&path, 10)
            .encode(&["A Dog!".to_string(), "a bird".to_string()])
            .unwrap();
        assert_eq!(rows, array![[2, 3, 5, 4], [2, 3, 1, 4]]);
    }

    #[test]
    fn test_missing_tokenizer_is_an_error() {
        let dir = tempdir().unwrap();
        let uc  = EncodeUseCase::new(dir.path().join("tokenizer.json"), 10);
        assert!(uc.encode(&["a".to_string()]).is_err());
    }
}
