//! Text embedding port for the knowledge base.

/// Maps text to a fixed-dimension vector.
///
/// Vectors from the same embedder must be comparable by L2 distance.
pub trait Embedder: Send + Sync {
    /// Output dimension.
    fn dimension(&self) -> usize;

    /// Embed one text.
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Embed a batch of texts.
    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
