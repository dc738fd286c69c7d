//! Rich-text serializer: renders an authored document tree to plain text,
//! resolving entity mentions against display values.
//!
//! The tree is a Slate-style JSON value. Text nodes carry `leaves` (or a
//! plain `text` string); inline nodes with type `mention-inline` reference an
//! entity by `data.option.id`; inline nodes with type `optional-inline` wrap a
//! contingent phrase that is dropped when any entity inside it is unfilled.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Entity key → rendered display text.
pub type EntityDisplayValues = HashMap<String, String>;

const MENTION_INLINE: &str = "mention-inline";
const OPTIONAL_INLINE: &str = "optional-inline";

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("entity '{name}' ({entity_id}) has no value")]
    MissingEntityValue { entity_id: String, name: String },
    #[error("malformed document node: {0}")]
    MalformedNode(String),
}

/// Per-call rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SerializerOptions {
    /// Keep the `[` `]` around a satisfied optional phrase.
    pub preserve_optional_node_wrapping_characters: bool,
    /// Render an unfilled mention as its authored text instead of failing.
    pub fallback_to_original: bool,
}

/// Render `document` to plain text.
pub fn serialize(
    document: &Value,
    values: &EntityDisplayValues,
    options: SerializerOptions,
) -> Result<String, SerializeError> {
    let root = document.get("document").unwrap_or(document);

    match root.get("nodes").and_then(Value::as_array) {
        Some(blocks) if is_container(root) => {
            let lines = blocks
                .iter()
                .map(|block| render_node(block, values, options))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(lines.join("\n"))
        }
        _ => render_node(root, values, options),
    }
}

/// The document root and plain wrappers have children but no `type`.
fn is_container(node: &Value) -> bool {
    matches!(
        node.get("object").and_then(Value::as_str),
        None | Some("document") | Some("value")
    ) && node.get("type").is_none()
}

fn render_node(
    node: &Value,
    values: &EntityDisplayValues,
    options: SerializerOptions,
) -> Result<String, SerializeError> {
    match node.get("type").and_then(Value::as_str) {
        Some(MENTION_INLINE) => render_mention(node, values, options),
        Some(OPTIONAL_INLINE) => render_optional(node, values, options),
        _ => {
            if let Some(text) = leaf_text(node) {
                return Ok(text);
            }
            render_children(node, values, options)
        }
    }
}

fn render_children(
    node: &Value,
    values: &EntityDisplayValues,
    options: SerializerOptions,
) -> Result<String, SerializeError> {
    let mut out = String::new();
    if let Some(children) = node.get("nodes").and_then(Value::as_array) {
        for child in children {
            out.push_str(&render_node(child, values, options)?);
        }
    }
    Ok(out)
}

fn render_mention(
    node: &Value,
    values: &EntityDisplayValues,
    options: SerializerOptions,
) -> Result<String, SerializeError> {
    let option = node.pointer("/data/option");
    let entity_id = option
        .and_then(|o| o.get("id"))
        .and_then(Value::as_str)
        .ok_or_else(|| SerializeError::MalformedNode("mention without entity id".to_string()))?;

    if let Some(value) = values.get(entity_id) {
        return Ok(value.clone());
    }

    if options.fallback_to_original {
        return Ok(plain_text(node));
    }

    let name = option
        .and_then(|o| o.get("name"))
        .and_then(Value::as_str)
        .unwrap_or(entity_id);
    Err(SerializeError::MissingEntityValue {
        entity_id: entity_id.to_string(),
        name: name.to_string(),
    })
}

fn render_optional(
    node: &Value,
    values: &EntityDisplayValues,
    options: SerializerOptions,
) -> Result<String, SerializeError> {
    // Fallback would make every phrase satisfiable, so it is off inside.
    let strict = SerializerOptions {
        fallback_to_original: false,
        ..options
    };

    let text = match render_children(node, values, strict) {
        Ok(text) => text,
        Err(SerializeError::MissingEntityValue { entity_id, .. }) => {
            tracing::trace!(%entity_id, "dropping optional phrase with unfilled entity");
            return Ok(String::new());
        }
        Err(e) => return Err(e),
    };

    if options.preserve_optional_node_wrapping_characters {
        return Ok(text);
    }

    let inner = text.strip_prefix('[').unwrap_or(&text);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    Ok(inner.to_string())
}

/// Text carried directly by a text node, if `node` is one.
fn leaf_text(node: &Value) -> Option<String> {
    if let Some(leaves) = node.get("leaves").and_then(Value::as_array) {
        return Some(
            leaves
                .iter()
                .filter_map(|leaf| leaf.get("text").and_then(Value::as_str))
                .collect(),
        );
    }
    node.get("text").and_then(Value::as_str).map(str::to_string)
}

/// Authored text of a subtree with no entity resolution.
fn plain_text(node: &Value) -> String {
    if let Some(text) = leaf_text(node) {
        return text;
    }
    node.get("nodes")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(plain_text).collect())
        .unwrap_or_default()
}
