//! Retrieval-augmented context for the assistant.
//!
//! Company records are split into typed chunks, embedded through the
//! [`Embedder`](crate::port::outbound::embedding::Embedder) port and
//! searched with an exact L2 index.

mod base;
pub mod chunk;
pub mod index;

pub use base::{KnowledgeBase, KnowledgeStats, SearchHit, NO_DATA};
pub use chunk::{build_chunks, Chunk, ChunkKind};
pub use index::FlatIndex;
