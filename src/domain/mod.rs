// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust structs and traits describing the captioning
// dataset: what the annotation file contains, what a pair is,
// and the seams the data layer is written against.
//
// Rules for this layer:
//   - NO file I/O
//   - NO serialization formats beyond serde derives
//   - Only plain structs, enums, and traits

// Image and caption records as they appear in the annotation JSON
pub mod annotation;

// One (image, caption) pair that survived the feature filter
pub mod pair;

// Core abstractions (traits) that other layers implement
pub mod traits;
