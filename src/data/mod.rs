// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the raw annotation file to the padded
// integer matrix.
//
//   captions_train*.json
//       │
//       ▼
//   AnnotationLoader  → finds and parses the annotation file
//       │
//       ▼
//   Preprocessor      → trims, lowercases, adds <start>/<end>
//       │
//       ▼
//   PairBuilder       → joins captions to images with features
//       │
//       ▼
//   Vocabulary        → fits word ranks, maps words to indices
//       │
//       ▼
//   SequenceEncoder   → pads every row to one shared length
//
// Each module is responsible for exactly one step.

/// Locates and parses `captions_train*.json`
pub mod loader;

/// Cleans individual captions
pub mod preprocessor;

/// Builds feature-backed (image, caption) pairs
pub mod pairs;

/// Word-level vocabulary with an OOV slot
pub mod vocabulary;

/// Encodes and pads caption sequences
pub mod sequences;
