// ============================================================
// Layer 4 - Pair Builder
// ============================================================
// Joins captions to images and keeps only images that have a
// precomputed feature file.
//
//   annotations ──► group_captions ──► image_id -> [cleaned caption]
//   images      ──► image_index    ──► [(image_id, file_name)] (ordered)
//                                         │
//                     FeatureCatalog ◄────┤ has_features(file_name)?
//                                         ▼
//                               one Pair per caption
//
// Emission order follows the image list (first time each id is
// seen), then annotation order within an image. It does NOT
// follow annotation order globally.

use std::collections::HashMap;

use crate::data::preprocessor::Preprocessor;
use crate::domain::annotation::{AnnotationRecord, CocoCaptions, ImageRecord};
use crate::domain::pair::Pair;
use crate::domain::traits::FeatureCatalog;

pub struct PairBuilder<'a, C: FeatureCatalog> {
    catalog:      &'a C,
    preprocessor: Preprocessor,
}

impl<'a, C: FeatureCatalog> PairBuilder<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog, preprocessor: Preprocessor::new() }
    }

    /// Map every image id to its cleaned captions, in annotation order.
    pub fn group_captions(&self, annotations: &[AnnotationRecord]) -> HashMap<i64, Vec<String>> {
        let mut by_image: HashMap<i64, Vec<String>> = HashMap::new();
        for ann in annotations {
            by_image
                .entry(ann.image_id)
                .or_default()
                .push(self.preprocessor.clean(&ann.caption));
        }
        by_image
    }

    /// Build every pair whose image has a feature file.
    pub fn build(&self, coco: &CocoCaptions) -> Vec<Pair> {
        let captions = self.group_captions(&coco.annotations);
        let mut pairs = Vec::new();

        for (image_id, file_name) in image_index(&coco.images) {
            // Checked per image, never cached: the directory may be
            // filling up while we run.
            if !self.catalog.has_features(&file_name) {
                continue;
            }

            let Some(caps) = captions.get(&image_id) else {
                continue;
            };

            for caption in caps {
                pairs.push(Pair::new(image_id, file_name.as_str(), caption.as_str()));
            }
        }

        tracing::info!("Total image-caption pairs with cached features: {}", pairs.len());
        pairs
    }
}

/// Ordered id -> file_name index.
///
/// An id keeps the position where it first appeared; if it
/// appears again, the later file name replaces the earlier one.
pub fn image_index(images: &[ImageRecord]) -> Vec<(i64, String)> {
    let mut order: Vec<(i64, String)> = Vec::with_capacity(images.len());
    let mut slot:  HashMap<i64, usize> = HashMap::with_capacity(images.len());

    for img in images {
        match slot.get(&img.id) {
            Some(&i) => order[i].1 = img.file_name.clone(),
            None => {
                slot.insert(img.id, order.len());
                order.push((img.id, img.file_name.clone()));
            }
        }
    }
    order
}

/// Keep the first `subset` pairs. `None` and `Some(0)` keep everything.
pub fn apply_subset(mut pairs: Vec<Pair>, subset: Option<usize>) -> Vec<Pair> {
    if let Some(n) = subset.filter(|&n| n > 0) {
        pairs.truncate(n);
        tracing::info!("Using subset: {}", pairs.len());
    }
    pairs
}
