// ============================================================
// Layer 3 - Annotation Domain Types
// ============================================================
// Mirrors the parts of a COCO captions file we actually read:
//
//   {
//     "images":      [{ "id": 391895, "file_name": "000000391895.jpg", ... }],
//     "annotations": [{ "image_id": 391895, "caption": "A man ...", ... }]
//   }
//
// Every other field (licenses, info, width, height, ...) is
// ignored by serde, so a full COCO file deserialises as-is.

use serde::Deserialize;

/// One entry of the `images` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub file_name: String,
}

/// One entry of the `annotations` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnnotationRecord {
    pub image_id: i64,
    pub caption: String,
}

/// The whole annotation document, read once and never mutated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CocoCaptions {
    pub images: Vec<ImageRecord>,
    pub annotations: Vec<AnnotationRecord>,
}

#[cfg(test)]
impl ImageRecord {
    pub fn new(id: i64, file_name: impl Into<String>) -> Self {
        Self { id, file_name: file_name.into() }
    }
}

#[cfg(test)]
impl AnnotationRecord {
    pub fn new(image_id: i64, caption: impl Into<String>) -> Self {
        Self { image_id, caption: caption.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_unknown_fields() {
        let json = r#"{
            "info": {"year": 2017},
            "images": [{"id": 7, "file_name": "a.jpg", "width": 640, "height": 480}],
            "annotations": [{"id": 1, "image_id": 7, "caption": "A cat."}]
        }"#;
        let coco: CocoCaptions = serde_json::from_str(json).unwrap();
        assert_eq!(coco.images, vec![ImageRecord::new(7, "a.jpg")]);
        assert_eq!(coco.annotations, vec![AnnotationRecord::new(7, "A cat.")]);
    }
}
