// src/interop.rs

//! Conversions between value trees and `serde_json` documents.

use crate::value::{Path, Segment, Value};
use serde_json::Value as Json;
use thiserror::Error;

/// Failure to export a tree as JSON.
#[derive(Error, Debug)]
pub enum InteropError {
    /// The tree still holds a leaf JSON cannot represent.
    #[error("Cannot export a {kind} at '{path}' as JSON. Resolve the tree first.")]
    NotPlainData {
        /// Location of the leaf.
        path: Path,
        /// Kind of the leaf.
        kind: &'static str,
    },
}

type InteropResult<T> = Result<T, InteropError>;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or_default(),
            Json::String(s) => Self::String(s),
            Json::Array(items) => Self::seq(items),
            Json::Object(entries) => Self::map(entries),
        }
    }
}

impl TryFrom<&Value> for Json {
    type Error = InteropError;

    /// Exports plain data. Fails on the first callable, pending or opaque
    /// leaf found in discovery order.
    fn try_from(value: &Value) -> InteropResult<Self> {
        let mut cursor = Path::root();
        export(value, &mut cursor)
    }
}

impl TryFrom<Value> for Json {
    type Error = InteropError;

    fn try_from(value: Value) -> InteropResult<Self> {
        Self::try_from(&value)
    }
}

fn export(node: &Value, cursor: &mut Path) -> InteropResult<Json> {
    let json = match node {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::from(*n),
        // Non-finite floats become null, as in serde_json.
        Value::Float(x) => Json::from(*x),
        Value::String(s) => Json::String(s.clone()),
        Value::Seq(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                cursor.push(Segment::Index(index));
                out.push(export(item, cursor)?);
                cursor.pop();
            }
            Json::Array(out)
        }
        Value::Map(entries) => {
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (key, item) in entries.iter() {
                cursor.push(Segment::Key(key.clone()));
                out.insert(key.clone(), export(item, cursor)?);
                cursor.pop();
            }
            Json::Object(out)
        }
        Value::Callable(_) | Value::Pending(_) | Value::Opaque(_) => {
            return Err(InteropError::NotPlainData {
                path: cursor.clone(),
                kind: node.kind_name(),
            });
        }
    };
    Ok(json)
}
