// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The pipeline only needs two things from the outside world:
// the annotation document, and a yes/no answer to "does this
// image have a precomputed feature file?".
//
// Keeping both behind traits lets the pair builder be tested
// against an in-memory catalog, while the real run uses the
// filesystem implementations in Layer 4 and Layer 6.

use anyhow::Result;

use crate::domain::annotation::CocoCaptions;

// ─── AnnotationSource ─────────────────────────────────────────────────────────
/// Anything that can produce the parsed annotation document.
///
/// Implementations:
///   - AnnotationLoader -> scans a directory for `captions_train*.json`
pub trait AnnotationSource {
    fn load(&self) -> Result<CocoCaptions>;
}

// ─── FeatureCatalog ───────────────────────────────────────────────────────────
/// Answers whether an image has a cached feature file.
///
/// Implementations:
///   - FeatureDir -> checks `<dir>/<stem>.npy` on every call
pub trait FeatureCatalog {
    /// `file_name` is the image file name from the annotation file,
    /// e.g. `000000391895.jpg`.
    fn has_features(&self, file_name: &str) -> bool;
}
