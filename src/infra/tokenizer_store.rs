// ============================================================
// Layer 6 - Tokenizer Store
// ============================================================
// Saves and loads the fitted vocabulary as `tokenizer.json`.
//
// The document follows the Keras `Tokenizer.to_json()` layout,
// so `tokenizer_from_json` can load it. Only the layout matches:
// Keras turns filter characters into spaces while we delete them,
// so "dog's" is one token here and two in Keras.
//
//   {
//     "class_name": "Tokenizer",
//     "config": {
//       "num_words": 10000, "filters": "...", "lower": true,
//       "split": " ", "char_level": false, "oov_token": "<unk>",
//       "document_count": 591753,
//       "word_counts": "{\"<start>\": 591753, ...}",   <- JSON in a string
//       "word_docs":   "{...}",
//       "index_docs":  "{\"2\": 591753, ...}",
//       "index_word":  "{\"1\": \"<unk>\", ...}",
//       "word_index":  "{\"<unk>\": 1, ...}"
//     }
//   }
//
// The five count/index maps are stored as JSON strings inside
// the JSON document. `word_index` plus the config fields are
// enough to rebuild the exact same encoder.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, path::PathBuf};

use crate::data::vocabulary::{FitStats, TokenizerConfig, Vocabulary};

/// Default output file name
pub const TOKENIZER_FILE: &str = "tokenizer.json";

const CLASS_NAME: &str = "Tokenizer";
const SPLIT: &str = " ";

#[derive(Debug, Serialize, Deserialize)]
struct TokenizerDocument {
    class_name: String,
    config:     TokenizerFields,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenizerFields {
    num_words:      Option<usize>,
    filters:        String,
    lower:          bool,
    split:          String,
    char_level:     bool,
    oov_token:      Option<String>,
    document_count: usize,
    word_counts:    String,
    word_docs:      String,
    index_docs:     String,
    index_word:     String,
    word_index:     String,
}

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    /// `path` is the tokenizer file itself, not its directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the vocabulary document, replacing any previous file.
    pub fn save(&self, vocab: &Vocabulary) -> Result<()> {
        let doc  = to_document(vocab)?;
        let json = serde_json::to_string(&doc)?;

        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write tokenizer to '{}'", self.path.display()))?;

        tracing::info!(
            "Tokenizer saved to '{}' ({} indexed words)",
            self.path.display(),
            vocab.len()
        );
        Ok(())
    }

    /// Load a previously saved tokenizer file.
    pub fn load(&self) -> Result<Vocabulary> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read tokenizer from '{}'", self.path.display()))?;

        let doc: TokenizerDocument = serde_json::from_str(&json)
            .with_context(|| format!("Malformed tokenizer file '{}'", self.path.display()))?;

        let vocab = from_document(doc)
            .with_context(|| format!("Invalid tokenizer file '{}'", self.path.display()))?;

        tracing::debug!("Loaded tokenizer with {} indexed words", vocab.len());
        Ok(vocab)
    }
}

fn to_document(vocab: &Vocabulary) -> Result<TokenizerDocument> {
    let cfg   = vocab.config();
    let stats = vocab.stats();

    let index_docs: Vec<(String, usize)> = stats
        .word_docs
        .iter()
        .filter_map(|(w, c)| vocab.index_of(w).map(|i| (i.to_string(), *c)))
        .collect();

    let index_word: Map<String, Value> = vocab
        .word_index()
        .iter()
        .map(|(w, i)| (i.to_string(), Value::from(w.as_str())))
        .collect();

    Ok(TokenizerDocument {
        class_name: CLASS_NAME.to_string(),
        config: TokenizerFields {
            num_words:      cfg.num_words,
            filters:        cfg.filters.clone(),
            lower:          cfg.lower,
            split:          SPLIT.to_string(),
            char_level:     false,
            oov_token:      cfg.oov_token.clone(),
            document_count: stats.document_count,
            word_counts:    counts_to_json(&stats.word_counts)?,
            word_docs:      counts_to_json(&stats.word_docs)?,
            index_docs:     counts_to_json(&index_docs)?,
            index_word:     serde_json::to_string(&index_word)?,
            word_index:     counts_to_json(vocab.word_index())?,
        },
    })
}

fn from_document(doc: TokenizerDocument) -> Result<Vocabulary> {
    if doc.class_name != CLASS_NAME {
        anyhow::bail!("expected class_name '{CLASS_NAME}', found '{}'", doc.class_name);
    }
    let f = doc.config;
    if f.char_level {
        anyhow::bail!("character-level tokenizers are not supported");
    }

    let config = TokenizerConfig {
        num_words: f.num_words,
        filters:   f.filters,
        lower:     f.lower,
        oov_token: f.oov_token,
    };
    let stats = FitStats {
        document_count: f.document_count,
        word_counts:    counts_from_json(&f.word_counts).context("word_counts")?,
        word_docs:      counts_from_json(&f.word_docs).context("word_docs")?,
    };
    let word_index = counts_from_json(&f.word_index).context("word_index")?;

    Ok(Vocabulary::from_parts(config, stats, word_index))
}

/// Ordered `[(key, n)]` -> `{"key": n, ...}` as a string.
fn counts_to_json(entries: &[(String, usize)]) -> Result<String> {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(*v)))
        .collect();
    Ok(serde_json::to_string(&map)?)
}

/// Inverse of [`counts_to_json`], keeping the stored key order.
fn counts_from_json(text: &str) -> Result<Vec<(String, usize)>> {
    let map: Map<String, Value> = serde_json::from_str(text)?;
    map.into_iter()
        .map(|(k, v)| -> Result<(String, usize)> {
            let n = v
                .as_u64()
                .with_context(|| format!("value for '{k}' is not a non-negative integer"))?;
            Ok((k, usize::try_from(n)?))
        })
        .collect()
}
