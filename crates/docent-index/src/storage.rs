//! On-disk layout of a persisted index directory.
//!
//! Three JSON files make up a storage directory:
//!
//! - `docstore.json` holds node text and metadata, keyed by node ID.
//! - `index_store.json` holds index structs; a vector index maps embedding
//!   IDs to docstore node IDs in `nodes_dict`.
//! - `default__vector_store.json` holds the embedding vectors.
//!
//! Several `__data__` payloads are written either as a JSON object or as a
//! JSON-encoded string containing that object; both forms are accepted.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::LoadError;

pub const DOCSTORE_FILE: &str = "docstore.json";
pub const INDEX_STORE_FILE: &str = "index_store.json";
pub const VECTOR_STORE_FILE: &str = "default__vector_store.json";

/// Index struct type for a vector store index.
pub const VECTOR_STORE_INDEX_TYPE: &str = "vector_store";

// ---------------------------------------------------------------------------
// Docstore
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DocstoreFile {
    #[serde(rename = "docstore/data", default)]
    pub data: HashMap<String, StoredEnvelope>,
}

/// `{"__data__": ..., "__type__": ...}` wrapper used by both stores.
#[derive(Debug, Deserialize)]
pub struct StoredEnvelope {
    #[serde(rename = "__data__")]
    pub data: Value,
    #[serde(rename = "__type__", default)]
    pub kind: Option<String>,
}

/// A node record from the docstore.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredNode {
    #[serde(default)]
    pub id_: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub excluded_llm_metadata_keys: Vec<String>,
}

// ---------------------------------------------------------------------------
// Index store
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct IndexStoreFile {
    #[serde(rename = "index_store/data", default)]
    pub data: BTreeMap<String, StoredEnvelope>,
}

/// Payload of a `vector_store` index struct.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorIndexStruct {
    #[serde(default)]
    pub index_id: Option<String>,
    /// Embedding ID to docstore node ID.
    #[serde(default)]
    pub nodes_dict: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Vector store
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VectorStoreFile {
    #[serde(default)]
    pub embedding_dict: HashMap<String, Vec<f32>>,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read and decode one storage file, mapping failures to [`LoadError`].
pub fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, LoadError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(LoadError::MissingFile(path));
    }
    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| corrupted(file, e))
}

/// Decode an envelope payload that may be an object or a JSON string.
pub fn decode_payload<T: DeserializeOwned>(file: &str, data: &Value) -> Result<T, LoadError> {
    match data {
        Value::String(encoded) => serde_json::from_str(encoded).map_err(|e| corrupted(file, e)),
        other => T::deserialize(other).map_err(|e| corrupted(file, e)),
    }
}

pub(crate) fn corrupted(file: &str, reason: impl ToString) -> LoadError {
    LoadError::Corrupted {
        file: file.to_string(),
        reason: reason.to_string(),
    }
}
