//! Feature-hashing text embedder.
//!
//! Lower-cased word unigrams and bigrams are hashed (FNV-1a) into a fixed
//! number of buckets with a hash-derived sign, then the vector is
//! L2-normalised. Texts sharing vocabulary land close together, which is
//! enough to rank company data chunks against a question without a model
//! download.

use std::sync::OnceLock;

use regex::Regex;

use crate::port::outbound::embedding::Embedder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Weight of a bigram relative to a unigram.
const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic bag-of-words embedder.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of `dimension` components.
    /// A zero dimension is bumped to one.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn add(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = fnv1a(feature.as_bytes());
        // usize fits the modulus because dimension is a usize
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Lower-cased alphanumeric tokens. `%`, `.` and `/` inside a token are
/// kept so figures like `12.5%` or `p/e` stay intact.
fn tokenize(text: &str) -> Vec<String> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let token = TOKEN
        .get_or_init(|| Regex::new(r"[\p{Alphabetic}\p{N}%./]+").expect("valid token pattern"));
    token
        .find_iter(text)
        .map(|m| m.as_str().trim_matches(|c: char| matches!(c, '.' | '/')))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        let tokens = tokenize(text);

        for token in &tokens {
            self.add(&mut vector, token, 1.0);
        }
        for pair in tokens.windows(2) {
            self.add(&mut vector, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f32>().sqrt()
    }

    #[test]
    fn vectors_have_configured_dimension_and_unit_norm() {
        let embedder = HashingEmbedder::new(64);
        let vector = embedder.embed("Revenue grew 12.5% year on year");

        assert_eq!(vector.len(), 64);
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_is_the_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        assert!(embedder.embed("  ,, ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn embedding_is_deterministic_and_case_insensitive() {
        let embedder = HashingEmbedder::new(128);
        assert_eq!(embedder.embed("Debt to Equity"), embedder.embed("debt TO equity"));
    }

    #[test]
    fn shared_vocabulary_is_closer() {
        let embedder = HashingEmbedder::new(384);
        let query = embedder.embed("cash flow from operating activities");
        let near = embedder.embed("Cash Flow: cash from operating activities 2024");
        let far = embedder.embed("Shareholding pattern promoters FIIs DIIs public");

        assert!(distance(&query, &near) < distance(&query, &far));
    }

    #[test]
    fn tokens_keep_figures_intact() {
        assert_eq!(tokenize("P/E: 24.3, ROE 12%."), vec!["p/e", "24.3", "roe", "12%"]);
    }

    #[test]
    fn batch_matches_single_embeddings() {
        let embedder = HashingEmbedder::new(32);
        let texts = vec!["alpha".to_string(), "beta gamma".to_string()];
        let batch = embedder.embed_batch(&texts);
        assert_eq!(batch[1], embedder.embed("beta gamma"));
    }
}
