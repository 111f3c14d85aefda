//! In-memory vector index with brute-force cosine similarity search.
//!
//! Built once by the loader and then only read. Search is O(n) over all
//! nodes, which is fine for a single manual's worth of chunks.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::{Map, Value};

/// One persisted document chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    /// Node identifier from the docstore.
    pub id: String,
    /// Chunk text.
    pub text: String,
    /// Metadata recorded at ingestion time (file name, page, ...).
    pub metadata: Map<String, Value>,
    /// Metadata keys hidden from the LLM.
    pub excluded_llm_metadata_keys: Vec<String>,
}

impl TextNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Map::new(),
            excluded_llm_metadata_keys: Vec::new(),
        }
    }

    /// Node content as shown to the LLM: visible metadata as `key: value`
    /// lines, a blank line, then the text. Without visible metadata only the
    /// text is returned.
    pub fn content_for_llm(&self) -> String {
        let metadata_str = self
            .metadata
            .iter()
            .filter(|(k, _)| !self.excluded_llm_metadata_keys.contains(k))
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}: {}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect::<Vec<_>>()
            .join("\n");

        if metadata_str.is_empty() {
            self.text.clone()
        } else {
            format!("{}\n\n{}", metadata_str, self.text)
        }
    }
}

/// A node returned from a search, with its similarity score.
#[derive(Debug, Clone)]
pub struct NodeWithScore {
    pub node: TextNode,
    /// Cosine similarity in [-1.0, 1.0].
    pub score: f64,
}

#[derive(Debug, Clone)]
struct VectorEntry {
    node: TextNode,
    embedding: Vec<f32>,
}

/// Read-only vector index over the loaded nodes.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    index_id: String,
    dimensions: usize,
    entries: HashMap<String, VectorEntry>,
}

impl VectorIndex {
    /// Create an empty index expecting vectors of `dimensions` length.
    pub fn new(index_id: impl Into<String>, dimensions: usize) -> Self {
        Self {
            index_id: index_id.into(),
            dimensions,
            entries: HashMap::new(),
        }
    }

    /// Add a node with its embedding. Overwrites any node with the same ID.
    ///
    /// Callers validate the embedding length; the loader rejects mismatches
    /// before they reach the index.
    pub fn insert(&mut self, node: TextNode, embedding: Vec<f32>) {
        self.entries
            .insert(node.id.clone(), VectorEntry { node, embedding });
    }

    /// Top-`k` nodes by cosine similarity to `query`, highest first.
    ///
    /// Ties are broken by node ID so results are stable across runs.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<NodeWithScore> {
        let mut scored: Vec<NodeWithScore> = self
            .entries
            .values()
            .map(|entry| NodeWithScore {
                node: entry.node.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.node.id.cmp(&b.node.id))
        });
        scored.truncate(k);
        scored
    }

    /// Look up a node by ID.
    pub fn get(&self, id: &str) -> Option<&TextNode> {
        self.entries.get(id).map(|e| &e.node)
    }

    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    /// Embedding dimension shared by every node.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Return the number of nodes in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the index contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();

    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}
