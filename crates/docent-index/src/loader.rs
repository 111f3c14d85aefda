//! Rebuild a [`VectorIndex`] from a persisted storage directory.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::index::{TextNode, VectorIndex};
use crate::storage::{
    corrupted, decode_payload, read_json, DocstoreFile, IndexStoreFile, StoredEnvelope,
    StoredNode, VectorIndexStruct, VectorStoreFile, DOCSTORE_FILE, INDEX_STORE_FILE,
    VECTOR_STORE_FILE, VECTOR_STORE_INDEX_TYPE,
};

/// Load the vector index persisted under `dir`.
///
/// When the index store holds more than one index, `index_id` selects which
/// one to load. Every stored embedding must be `expected_dim` long; a
/// mismatch means the index was built with a different embedding model.
///
/// Only reads files. An empty index is returned with a warning.
pub fn load_index_from_storage(
    dir: &Path,
    index_id: Option<&str>,
    expected_dim: usize,
) -> Result<VectorIndex, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::MissingStorage(dir.to_path_buf()));
    }

    let index_store: IndexStoreFile = read_json(dir, INDEX_STORE_FILE)?;
    let docstore: DocstoreFile = read_json(dir, DOCSTORE_FILE)?;
    let vector_store: VectorStoreFile = read_json(dir, VECTOR_STORE_FILE)?;

    let (id, envelope) = select_index(&index_store, index_id)?;
    if let Some(kind) = envelope.kind.as_deref() {
        if kind != VECTOR_STORE_INDEX_TYPE {
            return Err(LoadError::UnsupportedIndex(kind.to_string()));
        }
    }
    let index_struct: VectorIndexStruct = decode_payload(INDEX_STORE_FILE, &envelope.data)?;
    let index_id = index_struct.index_id.clone().unwrap_or_else(|| id.to_string());

    let mut index = VectorIndex::new(index_id, expected_dim);
    for (embedding_id, node_id) in &index_struct.nodes_dict {
        let node = load_node(&docstore, node_id)?;
        let embedding = vector_store
            .embedding_dict
            .get(embedding_id)
            .or_else(|| vector_store.embedding_dict.get(node_id))
            .ok_or_else(|| {
                corrupted(
                    VECTOR_STORE_FILE,
                    format!("no embedding for node {}", node_id),
                )
            })?;

        if embedding.len() != expected_dim {
            return Err(LoadError::DimensionMismatch {
                node_id: node_id.clone(),
                expected: expected_dim,
                found: embedding.len(),
            });
        }

        debug!(node_id = %node_id, chars = node.text.len(), "Loaded node");
        index.insert(node, embedding.clone());
    }

    if index.is_empty() {
        warn!(
            index_id = %index.index_id(),
            dir = %dir.display(),
            "Loaded index contains no nodes; searches will return nothing"
        );
    } else {
        info!(
            index_id = %index.index_id(),
            nodes = index.len(),
            dimensions = expected_dim,
            "Index loaded from {}",
            dir.display()
        );
    }

    Ok(index)
}

fn select_index<'a>(
    store: &'a IndexStoreFile,
    index_id: Option<&str>,
) -> Result<(&'a str, &'a StoredEnvelope), LoadError> {
    if let Some(wanted) = index_id {
        return store
            .data
            .get_key_value(wanted)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| LoadError::IndexNotFound(wanted.to_string()));
    }

    match store.data.len() {
        0 => Err(LoadError::NoIndex),
        1 => store
            .data
            .iter()
            .next()
            .map(|(k, v)| (k.as_str(), v))
            .ok_or(LoadError::NoIndex),
        n => Err(LoadError::AmbiguousIndex(n)),
    }
}

fn load_node(docstore: &DocstoreFile, node_id: &str) -> Result<TextNode, LoadError> {
    let envelope = docstore
        .data
        .get(node_id)
        .ok_or_else(|| corrupted(DOCSTORE_FILE, format!("no document for node {}", node_id)))?;
    let stored: StoredNode = decode_payload(DOCSTORE_FILE, &envelope.data)?;

    Ok(TextNode {
        id: stored.id_.unwrap_or_else(|| node_id.to_string()),
        text: stored.text,
        metadata: stored.metadata,
        excluded_llm_metadata_keys: stored.excluded_llm_metadata_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn write(dir: &Path, file: &str, value: serde_json::Value) {
        std::fs::write(dir.join(file), value.to_string()).unwrap();
    }

    fn write_storage(dir: &Path, embeddings: serde_json::Value) {
        write(
            dir,
            DOCSTORE_FILE,
            json!({"docstore/data": {
                "n1": {"__data__": {"id_": "n1", "text": "first"}, "__type__": "1"},
                "n2": {"__data__": {"id_": "n2", "text": "second"}, "__type__": "1"}
            }}),
        );
        let index_struct = json!({"index_id": "idx", "nodes_dict": {"n1": "n1", "n2": "n2"}});
        write(
            dir,
            INDEX_STORE_FILE,
            json!({"index_store/data": {
                "idx": {"__type__": "vector_store", "__data__": index_struct.to_string()}
            }}),
        );
        write(
            dir,
            VECTOR_STORE_FILE,
            json!({"embedding_dict": embeddings, "text_id_to_ref_doc_id": {}, "metadata_dict": {}}),
        );
    }

    #[test]
    fn test_load_valid_storage() {
        let dir = tempfile::tempdir().unwrap();
        write_storage(dir.path(), json!({"n1": [1.0, 0.0], "n2": [0.0, 1.0]}));

        let index = load_index_from_storage(dir.path(), None, 2).unwrap();
        assert_eq!(index.index_id(), "idx");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("n2").unwrap().text, "second");
    }

    #[test]
    fn test_missing_directory() {
        let err = load_index_from_storage(&PathBuf::from("/nonexistent/storage"), None, 2)
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingStorage(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_storage(dir.path(), json!({"n1": [1.0, 0.0], "n2": [0.0, 1.0]}));
        std::fs::remove_file(dir.path().join(DOCSTORE_FILE)).unwrap();

        let err = load_index_from_storage(dir.path(), None, 2).unwrap_err();
        assert!(matches!(err, LoadError::MissingFile(p) if p.ends_with(DOCSTORE_FILE)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_storage(dir.path(), json!({"n1": [1.0, 0.0, 0.0], "n2": [0.0, 1.0, 0.0]}));

        let err = load_index_from_storage(dir.path(), None, 2).unwrap_err();
        assert!(matches!(
            err,
            LoadError::DimensionMismatch { expected: 2, found: 3, .. }
        ));
    }

    #[test]
    fn test_dangling_embedding_reference() {
        let dir = tempfile::tempdir().unwrap();
        write_storage(dir.path(), json!({"n1": [1.0, 0.0]}));

        let err = load_index_from_storage(dir.path(), None, 2).unwrap_err();
        assert!(matches!(err, LoadError::Corrupted { ref file, .. } if file == VECTOR_STORE_FILE));
    }

    #[test]
    fn test_select_index_by_id() {
        let store: IndexStoreFile = serde_json::from_value(json!({"index_store/data": {
            "a": {"__type__": "vector_store", "__data__": {"index_id": "a", "nodes_dict": {}}},
            "b": {"__type__": "vector_store", "__data__": {"index_id": "b", "nodes_dict": {}}}
        }}))
        .unwrap();

        assert!(matches!(
            select_index(&store, None),
            Err(LoadError::AmbiguousIndex(2))
        ));
        let (id, _) = select_index(&store, Some("b")).unwrap();
        assert_eq!(id, "b");
        assert!(matches!(
            select_index(&store, Some("c")),
            Err(LoadError::IndexNotFound(_))
        ));
    }

    #[test]
    fn test_empty_index_store() {
        let store: IndexStoreFile =
            serde_json::from_value(json!({"index_store/data": {}})).unwrap();
        assert!(matches!(select_index(&store, None), Err(LoadError::NoIndex)));
    }

    #[test]
    fn test_unsupported_index_type() {
        let dir = tempfile::tempdir().unwrap();
        write_storage(dir.path(), json!({"n1": [1.0, 0.0], "n2": [0.0, 1.0]}));
        write(
            dir.path(),
            INDEX_STORE_FILE,
            json!({"index_store/data": {
                "kw": {"__type__": "keyword_table", "__data__": {"index_id": "kw"}}
            }}),
        );

        let err = load_index_from_storage(dir.path(), None, 2).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedIndex(ref t) if t == "keyword_table"));
    }
}
