//! System message construction for context-augmented answers.

use docent_index::NodeWithScore;

const CONTEXT_HEADER: &str = "Context information is below.";
const CONTEXT_SEPARATOR: &str = "--------------------";

/// Join retrieved nodes into the context string, one blank line apart.
pub fn context_str(nodes: &[NodeWithScore]) -> String {
    nodes
        .iter()
        .map(|n| n.node.content_for_llm())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the system message: the optional chat prompt, then the context block.
pub fn context_system_message(system_prompt: Option<&str>, nodes: &[NodeWithScore]) -> String {
    let block = format!(
        "{header}\n{sep}\n{context}\n{sep}\n",
        header = CONTEXT_HEADER,
        sep = CONTEXT_SEPARATOR,
        context = context_str(nodes),
    );

    match system_prompt.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prompt) => format!("{}\n{}", prompt, block),
        None => block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_index::TextNode;
    use serde_json::json;

    fn hit(id: &str, text: &str) -> NodeWithScore {
        NodeWithScore {
            node: TextNode::new(id, text),
            score: 0.5,
        }
    }

    #[test]
    fn test_context_block_layout() {
        let msg = context_system_message(None, &[hit("a", "First."), hit("b", "Second.")]);
        assert_eq!(
            msg,
            "Context information is below.\n--------------------\nFirst.\n\nSecond.\n--------------------\n"
        );
    }

    #[test]
    fn test_system_prompt_precedes_context() {
        let msg = context_system_message(Some("Answer briefly."), &[hit("a", "Body")]);
        assert!(msg.starts_with("Answer briefly.\nContext information is below."));
    }

    #[test]
    fn test_blank_system_prompt_ignored() {
        let msg = context_system_message(Some("   "), &[]);
        assert!(msg.starts_with("Context information is below."));
    }

    #[test]
    fn test_context_includes_metadata() {
        let mut node = TextNode::new("a", "Body");
        node.metadata.insert("page_label".to_string(), json!("4"));
        let nodes = vec![NodeWithScore { node, score: 0.9 }];
        assert_eq!(context_str(&nodes), "page_label: 4\n\nBody");
    }
}
