// ============================================================
// Layer 4 - Sequence Encoder
// ============================================================
// Turns cleaned captions into one rectangular int32 matrix:
//
//   "<start> a dog runs <end>"  ──►  [1, 4, 9, 31, 2]
//   "<start> a cat <end>"       ──►  [1, 4, 12, 2]
//                                        │
//                                        ▼  pad to L = min(max_len, 5)
//                               [[1, 4, 9, 31, 2],
//                                [1, 4, 12, 2,  0]]
//
// Padding goes on the right with 0. Rows longer than L lose
// their rightmost tokens. Row i always belongs to the image in
// `img_fnames[i]`.

use anyhow::{Context, Result};
use ndarray::Array2;

use crate::data::vocabulary::Vocabulary;
use crate::domain::pair::Pair;

/// Sentinel written into unused positions
pub const PAD_VALUE: i32 = 0;

/// The encoded dataset: one padded row per pair plus the
/// image file name for each row.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCaptions {
    pub padded:     Array2<i32>,
    pub img_fnames: Vec<String>,
}

impl EncodedCaptions {
    pub fn rows(&self) -> usize {
        self.padded.nrows()
    }

    pub fn max_len(&self) -> usize {
        self.padded.ncols()
    }
}

pub struct SequenceEncoder<'a> {
    vocab:   &'a Vocabulary,
    max_len: usize,
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(vocab: &'a Vocabulary, max_len: usize) -> Self {
        Self { vocab, max_len }
    }

    /// Encode every pair's caption and pad to a shared length.
    pub fn encode(&self, pairs: &[Pair]) -> Result<EncodedCaptions> {
        let sequences: Vec<Vec<usize>> = pairs
            .iter()
            .map(|p| self.vocab.encode(&p.caption))
            .collect();

        let len = effective_len(&sequences, self.max_len)?;
        tracing::info!("Using max_len = {}", len);

        let padded     = pad_sequences(&sequences, len)?;
        let img_fnames = pairs.iter().map(|p| p.file_name.clone()).collect();

        Ok(EncodedCaptions { padded, img_fnames })
    }
}

/// `min(max_len, longest sequence)`. Fails on an empty dataset,
/// since there is no longest sequence to measure.
pub fn effective_len(sequences: &[Vec<usize>], max_len: usize) -> Result<usize> {
    let longest = sequences
        .iter()
        .map(Vec::len)
        .max()
        .context("No caption sequences to encode: no image-caption pairs survived the feature filter")?;
    Ok(longest.min(max_len))
}

/// Right-pad with [`PAD_VALUE`] and truncate from the end.
pub fn pad_sequences(sequences: &[Vec<usize>], len: usize) -> Result<Array2<i32>> {
    let mut padded = Array2::from_elem((sequences.len(), len), PAD_VALUE);

    for (mut row, seq) in padded.rows_mut().into_iter().zip(sequences) {
        for (slot, &id) in row.iter_mut().zip(seq.iter()) {
            *slot = i32::try_from(id)
                .with_context(|| format!("Token index {id} does not fit in int32"))?;
        }
    }

    Ok(padded)
}
