//! Structural JSON view of a document.
//!
//! Trivia is dropped. Bare strings become JSON strings, blocks become
//! `{"name", "content"}` objects and pairs become `{"key", "value"}` objects,
//! all with decoded text. Order and duplicate keys are kept, which is why
//! content maps to an array rather than a JSON object.

use conf_cst::{Node, ObjectValue, Value};
use serde_json::{Value as Json, json};

/// Convert a content sequence to a JSON array.
pub fn content_to_json(content: &[Node<'_>]) -> Json {
    Json::Array(content.iter().filter_map(node_to_json).collect())
}

fn node_to_json(node: &Node<'_>) -> Option<Json> {
    match node {
        Node::WhiteSpace(_) | Node::Comment(_) | Node::Separator(_) => None,
        Node::String(s) => Some(Json::String(s.text().into_owned())),
        Node::Object(o) => Some(object_to_json(o)),
        Node::KeyValue(kv) => {
            let value = match kv.value() {
                Value::String(s) => Json::String(s.text().into_owned()),
                Value::Object(o) => object_to_json(o),
            };
            Some(json!({ "key": kv.key_text(), "value": value }))
        }
    }
}

fn object_to_json(object: &ObjectValue<'_>) -> Json {
    json!({
        "name": object.name_text(),
        "content": content_to_json(object.content()),
    })
}
