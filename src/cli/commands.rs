// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Two subcommands:
//   `prepare` - build tokenizer.json and captions_data.npz
//   `encode`  - encode captions with a saved tokenizer.json
//
// The `prepare` defaults are the same values as
// PrepConfig::default(), so running with no flags from a
// folder holding `annotations/` and `features/` just works.

use clap::{builder::RangedU64ValueParser, Args, Subcommand};
use std::path::PathBuf;

use crate::application::prepare_use_case::PrepConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the vocabulary and padded caption sequences
    Prepare(PrepareArgs),

    /// Encode captions with a previously saved tokenizer
    Encode(EncodeArgs),
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Directory containing captions_train*.json
    #[arg(long, default_value = "annotations")]
    pub annotations_dir: PathBuf,

    /// Directory containing one <image stem>.npy per image
    #[arg(long, default_value = "features")]
    pub feature_dir: PathBuf,

    /// Directory that receives tokenizer.json and captions_data.npz
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Only the most frequent words below this index are kept;
    /// everything else becomes <unk>
    #[arg(
        long,
        default_value_t = 10_000,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub vocab_size: usize,

    /// Upper bound on the padded caption length
    #[arg(long, default_value_t = 50)]
    pub max_len: usize,

    /// Keep only the first N image-caption pairs (0 = all)
    #[arg(long)]
    pub subset: Option<usize>,
}

/// Boundary between Layer 1 and Layer 2: the application
/// layer never sees clap types.
impl From<PrepareArgs> for PrepConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepConfig {
            annotations_dir: a.annotations_dir,
            feature_dir:     a.feature_dir,
            out_dir:         a.out_dir,
            vocab_size:      a.vocab_size,
            max_len:         a.max_len,
            subset:          a.subset,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Path to a tokenizer.json written by `prepare`
    #[arg(long, default_value = "tokenizer.json")]
    pub tokenizer: PathBuf,

    /// Upper bound on the padded caption length
    #[arg(long, default_value_t = 50)]
    pub max_len: usize,

    /// Raw captions to encode
    #[arg(required = true)]
    pub captions: Vec<String>,
}
