// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Filesystem-facing pieces the pipeline is wired to:
//
//   feature_dir.rs     - answers "is there a .npy for this
//                        image?" by checking the disk
//
//   tokenizer_store.rs - writes and reads `tokenizer.json`
//                        in the Keras Tokenizer layout
//
//   npz.rs             - writes `captions_data.npz`, the
//                        compressed numpy archive
//
// Keeping these here lets Layer 4 stay pure string and
// integer work that can be tested without touching disk.

/// Feature file existence checks
pub mod feature_dir;

/// Tokenizer persistence
pub mod tokenizer_store;

/// Compressed numpy archive writer
pub mod npz;
