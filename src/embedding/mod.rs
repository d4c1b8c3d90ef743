//! Embedding + model utilities.
//!
//! - [`TextEmbedder`] is the seam the scoring engine consumes.
//! - [`sentence`] provides the MiniLM-style sentence embedder.
//! - [`bert`] holds the BERT loaders shared with the primary classifiers.

/// BERT encoder/classifier loading shared by embedder and classifiers.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Sentence embedder (mean-pooled BERT).
pub mod sentence;
/// Tokenizer loading helpers.
pub mod utils;

pub use error::EmbeddingError;
pub use sentence::{EmbedderConfig, SentenceEmbedder};

/// Maps text to a fixed-length dense vector.
///
/// Implementations must be deterministic for identical input within a process
/// and safe to share across concurrently scored sessions.
pub trait TextEmbedder: Send + Sync {
    /// Embeds a single string.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds each string independently (no joint context).
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Length of every vector this embedder produces.
    fn embedding_dim(&self) -> usize;

    /// Returns `true` when embeddings come from a stand-in rather than a model.
    fn is_stub(&self) -> bool {
        false
    }
}

/// Scales `embedding` to unit length in place (zero vectors are left as-is).
pub fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
