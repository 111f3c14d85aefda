//! Query-time retrieval over a loaded index.

use std::sync::Arc;

use docent_llm::DynEmbeddingService;
use tracing::debug;

use crate::error::RetrieveError;
use crate::index::{NodeWithScore, VectorIndex};

/// Embeds a query and returns the `top_k` most similar nodes.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn DynEmbeddingService>,
    top_k: usize,
}

impl Retriever {
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn DynEmbeddingService>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }

    /// Retrieve the best matching nodes for `query`, highest score first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<NodeWithScore>, RetrieveError> {
        let embedding = self.embedder.embed_boxed(query).await?;
        if embedding.len() != self.index.dimensions() {
            return Err(RetrieveError::DimensionMismatch {
                expected: self.index.dimensions(),
                found: embedding.len(),
            });
        }

        let hits = self.index.search(&embedding, self.top_k);
        debug!(
            top_k = self.top_k,
            hits = hits.len(),
            "Retrieved nodes for query"
        );
        Ok(hits)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("index_id", &self.index.index_id())
            .field("nodes", &self.index.len())
            .field("top_k", &self.top_k)
            .finish()
    }
}
