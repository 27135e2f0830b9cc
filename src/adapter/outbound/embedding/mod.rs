//! Embedding backends for the knowledge base.

mod hashing;

pub use hashing::HashingEmbedder;
