// ============================================================
// Layer 4 - Vocabulary (word-level tokenizer)
// ============================================================
// A frequency-ranked word vocabulary with one reserved
// out-of-vocabulary slot, in the style of the classic Keras
// `Tokenizer`.
//
// Tokenizing one caption:
//   1. Lowercase (if `lower` is set)
//   2. Delete every character of the filter set. Deleted, not
//      replaced: "don't" -> "dont", "sky." -> "sky"
//   3. Split on whitespace, drop empty pieces
//
// Index layout after fitting:
//   0          padding, never issued by the encoder
//   1          the OOV token ("<unk>")
//   2, 3, ...  words by descending count, ties in the order
//              they were first seen
//
// Every fitted word keeps an index, but the encoder only
// issues indices below `num_words`; the rest fall back to OOV.

use std::collections::HashMap;

/// Characters removed from captions before splitting into words.
/// `<` and `>` are absent so `<start>` and `<end>` survive.
pub const DEFAULT_FILTERS: &str = "!\"#$%&'()*+.,-/:;=?@[\\]^_`{|}~\t\n";

/// Placeholder for words outside the capped vocabulary
pub const OOV_TOKEN: &str = "<unk>";

/// Settings that decide how text maps to indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Only indices strictly below this are issued. `None` = no cap
    pub num_words: Option<usize>,
    pub filters:   String,
    pub lower:     bool,
    pub oov_token: Option<String>,
}

impl TokenizerConfig {
    /// Default filters, lowercasing, and `<unk>` as the OOV token.
    /// A cap of 0 means no cap.
    pub fn new(num_words: usize) -> Self {
        Self {
            num_words: Some(num_words).filter(|&n| n > 0),
            filters:   DEFAULT_FILTERS.to_string(),
            lower:     true,
            oov_token: Some(OOV_TOKEN.to_string()),
        }
    }

    /// Split one text into words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered;
        let text = if self.lower {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };

        let kept: String = text.chars().filter(|c| !self.filters.contains(*c)).collect();
        kept.split_whitespace().map(str::to_string).collect()
    }
}

/// Counts gathered while fitting. Kept so a saved vocabulary
/// carries the full picture of the corpus it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FitStats {
    pub document_count: usize,
    /// Total occurrences per word, first-seen order
    pub word_counts:    Vec<(String, usize)>,
    /// Number of captions containing each word, first-seen order
    pub word_docs:      Vec<(String, usize)>,
}

/// An immutable, fitted vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    config:     TokenizerConfig,
    stats:      FitStats,
    /// (word, index) in index order
    word_index: Vec<(String, usize)>,
    lookup:     HashMap<String, usize>,
}

impl Vocabulary {
    /// Fit a vocabulary on a corpus of (already cleaned) captions.
    pub fn fit<S: AsRef<str>>(config: TokenizerConfig, texts: &[S]) -> Self {
        let mut stats = FitStats::default();
        let mut count_slot: HashMap<String, usize> = HashMap::new();
        let mut doc_slot:   HashMap<String, usize> = HashMap::new();

        for text in texts {
            stats.document_count += 1;
            let words = config.tokenize(text.as_ref());

            for word in &words {
                bump(&mut stats.word_counts, &mut count_slot, word);
            }

            // Each word counts once per caption for word_docs
            let mut seen: Vec<&String> = Vec::new();
            for word in &words {
                if !seen.contains(&word) {
                    seen.push(word);
                    bump(&mut stats.word_docs, &mut doc_slot, word);
                }
            }
        }

        // Stable sort: equal counts keep first-seen order
        let mut ranked: Vec<&(String, usize)> = stats.word_counts.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut order: Vec<String> = Vec::with_capacity(ranked.len() + 1);
        if let Some(oov) = &config.oov_token {
            order.push(oov.clone());
        }
        for (word, _) in ranked {
            if Some(word) != config.oov_token.as_ref() {
                order.push(word.clone());
            }
        }

        let word_index = order
            .into_iter()
            .enumerate()
            .map(|(i, w)| (w, i + 1))
            .collect();

        let vocab = Self::from_parts(config, stats, word_index);
        tracing::debug!(
            "Fitted vocabulary: {} documents, {} distinct words",
            vocab.stats.document_count,
            vocab.stats.word_counts.len()
        );
        vocab
    }

    /// Rebuild a vocabulary from stored pieces (e.g. a saved
    /// tokenizer file). `word_index` is taken as authoritative.
    pub fn from_parts(
        config:     TokenizerConfig,
        stats:      FitStats,
        mut word_index: Vec<(String, usize)>,
    ) -> Self {
        word_index.sort_by_key(|(_, i)| *i);
        let lookup = word_index.iter().map(|(w, i)| (w.clone(), *i)).collect();
        Self { config, stats, word_index, lookup }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    pub fn stats(&self) -> &FitStats {
        &self.stats
    }

    /// All (word, index) entries in index order, uncapped.
    pub fn word_index(&self) -> &[(String, usize)] {
        &self.word_index
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.lookup.get(word).copied()
    }

    /// Index of the OOV token, if one is configured and indexed.
    pub fn oov_index(&self) -> Option<usize> {
        self.config
            .oov_token
            .as_deref()
            .and_then(|t| self.index_of(t))
    }

    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    /// Map one caption to indices. Unknown and capped-out words
    /// become the OOV index; with no OOV token they are dropped.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        let oov = self.oov_index();
        self.config
            .tokenize(text)
            .iter()
            .filter_map(|word| match self.index_of(word) {
                Some(i) if self.is_capped(i) => oov,
                Some(i) => Some(i),
                None => oov,
            })
            .collect()
    }

    fn is_capped(&self, index: usize) -> bool {
        self.config.num_words.is_some_and(|n| index >= n)
    }
}

/// Increment `word` in an ordered count list.
fn bump(counts: &mut Vec<(String, usize)>, slot: &mut HashMap<String, usize>, word: &str) {
    match slot.get(word) {
        Some(&i) => counts[i].1 += 1,
        None => {
            slot.insert(word.to_string(), counts.len());
            counts.push((word.to_string(), 1));
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fit(num_words: usize, texts: &[&str]) -> Vocabulary {
        Vocabulary::fit(TokenizerConfig::new(num_words), texts)
    }

    #[test]
    fn test_filters_are_deleted_not_replaced() {
        let cfg = TokenizerConfig::new(100);
        assert_eq!(
            cfg.tokenize("<start> Don't stop, a-ha! <end>"),
            vec!["<start>", "dont", "stop", "aha", "<end>"]
        );
    }

    #[test]
    fn test_oov_first_then_by_frequency() {
        let v = fit(100, &["b a a", "c a b"]);
        assert_eq!(v.index_of("<unk>"), Some(1));
        assert_eq!(v.index_of("a"), Some(2));
        assert_eq!(v.index_of("b"), Some(3));
        assert_eq!(v.index_of("c"), Some(4));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let v = fit(100, &["z y x", "x y z"]);
        assert_eq!(v.index_of("z"), Some(2));
        assert_eq!(v.index_of("y"), Some(3));
        assert_eq!(v.index_of("x"), Some(4));
    }

    #[test]
    fn test_higher_frequency_never_ranks_lower() {
        let texts = ["the cat sat on the mat", "the dog sat", "a cat and a dog"];
        let v = fit(1000, &texts);
        let counts: HashMap<&str, usize> = v
            .stats()
            .word_counts
            .iter()
            .map(|(w, c)| (w.as_str(), *c))
            .collect();

        for (a, ca) in &counts {
            for (b, cb) in &counts {
                if ca > cb {
                    assert!(v.index_of(a) < v.index_of(b), "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_cap_maps_rare_words_to_oov() {
        // index: <unk>=1, a=2, b=3, c=4; num_words=3 keeps only 1 and 2
        let v = fit(3, &["a a a b b c"]);
        assert_eq!(v.encode("a b c d"), vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_zero_cap_means_uncapped() {
        let v = fit(0, &["a a b c"]);
        assert_eq!(v.config().num_words, None);
        assert_eq!(v.encode("a b c d"), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_issued_indices_bounded_by_cap() {
        let texts: Vec<String> = (0..50).map(|i| format!("w{i} w{i} common")).collect();
        let v = Vocabulary::fit(TokenizerConfig::new(10), &texts);

        let issued: HashSet<usize> = texts.iter().flat_map(|t| v.encode(t)).collect();
        assert!(issued.len() <= 10 + 1);
        assert!(issued.iter().all(|&i| i < 10));
    }

    #[test]
    fn test_document_frequencies() {
        let v = fit(100, &["a a b", "a c"]);
        assert_eq!(v.stats().document_count, 2);
        assert_eq!(
            v.stats().word_docs,
            vec![("a".to_string(), 2), ("b".to_string(), 1), ("c".to_string(), 1)]
        );
        assert_eq!(
            v.stats().word_counts,
            vec![("a".to_string(), 3), ("b".to_string(), 1), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_explicit_vocabulary_with_unseen_word() {
        let v = Vocabulary::from_parts(
            TokenizerConfig::new(100),
            FitStats::default(),
            vec![("a".into(), 1), ("b".into(), 2), ("<unk>".into(), 3)],
        );
        assert_eq!(v.oov_index(), Some(3));
        assert_eq!(v.encode("<start> a c <end>"), vec![3, 1, 3, 3]);
    }

    #[test]
    fn test_empty_fit_has_only_oov() {
        let v = fit(100, &[] as &[&str]);
        assert_eq!(v.word_index(), &[("<unk>".to_string(), 1)]);
        assert_eq!(v.encode("<start> anything <end>"), vec![1, 1, 1]);
    }

    #[test]
    fn test_oov_token_in_corpus_keeps_reserved_slot() {
        let v = fit(100, &["<unk> <unk> a"]);
        assert_eq!(v.index_of("<unk>"), Some(1));
        assert_eq!(v.index_of("a"), Some(2));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_without_oov_token_unknown_words_are_dropped() {
        let mut cfg = TokenizerConfig::new(100);
        cfg.oov_token = None;
        let v = Vocabulary::fit(cfg, &["a b"]);
        assert_eq!(v.index_of("a"), Some(1));
        assert_eq!(v.encode("a x b"), vec![1, 2]);
    }
}
