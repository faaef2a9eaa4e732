// src/core/patch.rs

//! Persistent writes into value trees.

use crate::value::{Path, Segment, Value};
use std::sync::Arc;

/// Returns `tree` with `value` written at `path`.
///
/// Only the containers on the way from the root to `path` are copied, and only
/// when they are shared with another tree; every sibling keeps pointing at the
/// original substructure. A missing step is created as an empty container of
/// the kind the segment addresses.
pub fn assoc_path(mut tree: Value, path: &Path, value: Value) -> Value {
    write_at(&mut tree, path.segments(), value);
    tree
}

/// Applies every `(path, value)` patch to the same tree, in order.
pub fn apply_patches<I>(tree: Value, patches: I) -> Value
where
    I: IntoIterator<Item = (Path, Value)>,
{
    patches
        .into_iter()
        .fold(tree, |acc, (path, value)| assoc_path(acc, &path, value))
}

fn write_at(node: &mut Value, segments: &[Segment], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    let slot = match head {
        Segment::Index(index) => {
            if !matches!(node, Value::Seq(_)) {
                *node = Value::Seq(Arc::default());
            }
            let Value::Seq(items) = node else { return };
            let items = Arc::make_mut(items);
            if items.len() <= *index {
                items.resize(*index + 1, Value::Null);
            }
            items.get_mut(*index)
        }
        Segment::Key(key) => {
            if !matches!(node, Value::Map(_)) {
                *node = Value::Map(Arc::default());
            }
            let Value::Map(entries) = node else { return };
            Some(
                Arc::make_mut(entries)
                    .entry(key.clone())
                    .or_insert(Value::Null),
            )
        }
    };

    if let Some(slot) = slot {
        write_at(slot, rest, value);
    }
}
