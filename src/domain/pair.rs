// ============================================================
// Layer 3 - Pair Domain Type
// ============================================================
// A pair joins one cleaned caption to the image it describes.
// Pairs only exist for images whose feature file was found,
// so every pair can later be matched to `<stem>.npy`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub image_id: i64,

    /// Image file name exactly as given in the annotation file
    pub file_name: String,

    /// Cleaned caption, already wrapped in `<start>` / `<end>`
    pub caption: String,
}

impl Pair {
    pub fn new(image_id: i64, file_name: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            image_id,
            file_name: file_name.into(),
            caption: caption.into(),
        }
    }
}
