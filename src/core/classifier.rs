// src/core/classifier.rs

//! Classification of tree nodes and discovery of the work in a pass.

use crate::value::{Callable, Map, OpKind, Operation, Path, Pending, Segment, Value};

/// Role of a node during discovery.
///
/// Variants are listed in the priority they are tested in: a callable wins over
/// everything, an opaque instance is never torn open, and a pending value is
/// never mistaken for a container.
#[derive(Debug, Clone, Copy)]
pub enum Leaf<'a> {
    /// To be invoked.
    Callable(&'a Callable),
    /// Kept as is.
    Opaque,
    /// To be awaited.
    Pending(&'a Pending),
    /// Descended into by index.
    Seq(&'a [Value]),
    /// Descended into by key.
    Map(&'a Map),
    /// Scalar data.
    Plain,
}

/// Role of `node`.
pub fn classify(node: &Value) -> Leaf<'_> {
    match node {
        Value::Callable(f) => Leaf::Callable(f),
        Value::Opaque(_) => Leaf::Opaque,
        Value::Pending(p) => Leaf::Pending(p),
        Value::Seq(items) => Leaf::Seq(items),
        Value::Map(entries) => Leaf::Map(entries),
        Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
            Leaf::Plain
        }
    }
}

/// Collects every callable and pending leaf under `node`, in pre-order:
/// ascending index for sequences, insertion order for mappings.
///
/// Paths are relative to the tree root, with `prefix` being the path of `node`.
/// A callable or pending `node` yields a single operation at `prefix`.
pub fn discover(node: &Value, prefix: &Path) -> Vec<Operation> {
    let mut operations = Vec::new();
    let mut cursor = prefix.clone();
    walk(node, &mut cursor, &mut operations);
    operations
}

fn walk(node: &Value, cursor: &mut Path, out: &mut Vec<Operation>) {
    match classify(node) {
        Leaf::Callable(f) => out.push(Operation {
            path: cursor.clone(),
            kind: OpKind::Callable(f.clone()),
        }),
        Leaf::Opaque | Leaf::Plain => {}
        Leaf::Pending(p) => out.push(Operation {
            path: cursor.clone(),
            kind: OpKind::Pending(p.clone()),
        }),
        Leaf::Seq(items) => {
            for (index, item) in items.iter().enumerate() {
                cursor.push(Segment::Index(index));
                walk(item, cursor, out);
                cursor.pop();
            }
        }
        Leaf::Map(entries) => {
            for (key, item) in entries {
                cursor.push(Segment::Key(key.clone()));
                walk(item, cursor, out);
                cursor.pop();
            }
        }
    }
}

/// Operations of one pass, split by kind. Both lists keep discovery order.
#[derive(Debug, Default)]
pub struct Batch {
    /// Leaves to await.
    pub pending: Vec<(Path, Pending)>,
    /// Leaves to invoke.
    pub callables: Vec<(Path, Callable)>,
}

impl Batch {
    /// Whether the pass has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.callables.is_empty()
    }
}

/// Splits operations by kind.
pub fn partition(operations: Vec<Operation>) -> Batch {
    let mut batch = Batch::default();
    for op in operations {
        match op.kind {
            OpKind::Pending(p) => batch.pending.push((op.path, p)),
            OpKind::Callable(f) => batch.callables.push((op.path, f)),
        }
    }
    batch
}
