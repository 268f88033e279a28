// ============================================================
// Layer 4 - Caption Preprocessor
// ============================================================
// Turns a raw COCO caption into the form every later stage sees:
//
//   "  A man riding a Wave on top of a surfboard. "
//       │
//       ▼
//   "<start> a man riding a wave on top of a surfboard. <end>"
//
// Steps (applied in order):
//   1. Trim leading/trailing whitespace
//   2. Lowercase
//   3. Wrap with the start and end markers
//
// Punctuation is NOT touched here. It is removed later by the
// vocabulary's filter set, so the caption text stored in each
// pair stays readable.

/// Marker prepended to every caption
pub const START_TOKEN: &str = "<start>";

/// Marker appended to every caption
pub const END_TOKEN: &str = "<end>";

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one caption. Takes a &str and returns an owned String.
    pub fn clean(&self, caption: &str) -> String {
        let body = caption.trim().to_lowercase();
        format!("{START_TOKEN} {body} {END_TOKEN}")
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_with_markers() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("a cat"), "<start> a cat <end>");
    }

    #[test]
    fn test_trims_and_lowercases() {
        let p = Preprocessor::new();
        assert_eq!(
            p.clean("  A Man riding a WAVE.\n"),
            "<start> a man riding a wave. <end>"
        );
    }

    #[test]
    fn test_keeps_punctuation_for_the_tokenizer() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("Don't stop!"), "<start> don't stop! <end>");
    }

    #[test]
    fn test_empty_caption() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("   "), "<start>  <end>");
    }
}
