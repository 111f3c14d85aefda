//! Docent Index crate - persisted storage layout, vector index, loader, and retriever.
//!
//! Reads the directory written by a LlamaIndex-style ingestion run
//! (`docstore.json`, `index_store.json`, `default__vector_store.json`),
//! rebuilds an in-memory cosine-similarity index from it, and answers
//! top-k retrieval queries through an embedding service.

pub mod error;
pub mod index;
pub mod loader;
pub mod retriever;
pub mod storage;

pub use error::{LoadError, RetrieveError};
pub use index::{NodeWithScore, TextNode, VectorIndex};
pub use loader::load_index_from_storage;
pub use retriever::Retriever;
