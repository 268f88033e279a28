// ============================================================
// Layer 6 - Feature Directory
// ============================================================
// Precomputed image features live next to each other as
// `<image stem>.npy`. We never open them; we only ask whether
// the file for a given image exists.
//
//   file_name "000000391895.jpg"  ->  <dir>/000000391895.npy
//   file_name "a.b.jpg"           ->  <dir>/a.b.npy
//   file_name "noext"             ->  <dir>/noext.npy
//
// Only the final extension is swapped. The check hits the
// filesystem on every call; no directory listing is cached.

use std::path::{Path, PathBuf};

use crate::domain::traits::FeatureCatalog;

/// Extension of the cached feature files
pub const FEATURE_EXT: &str = "npy";

pub struct FeatureDir {
    dir: PathBuf,
}

impl FeatureDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the feature file for an image.
    pub fn feature_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(feature_file_name(file_name))
    }
}

impl FeatureCatalog for FeatureDir {
    fn has_features(&self, file_name: &str) -> bool {
        let path = self.feature_path(file_name);
        let found = path.exists();
        if !found {
            tracing::trace!("No features for '{}' at '{}'", file_name, path.display());
        }
        found
    }
}

/// Replace the final extension of an image file name with `.npy`.
pub fn feature_file_name(file_name: &str) -> PathBuf {
    Path::new(file_name).with_extension(FEATURE_EXT)
}
