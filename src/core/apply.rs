// src/core/apply.rs

//! Invoking the callable leaves of a pass.

use crate::core::patch;
use crate::value::{Callable, Failure, Path, Value};

/// Invokes every callable with `args` and writes each result at its path.
///
/// Callables run one after the other, in discovery order. The first failure
/// stops the stage: it is annotated with the callable's path (when
/// error-shaped) and returned, and the remaining callables are not invoked.
/// A callable returning a pending value leaves it in the tree for the next pass.
pub fn apply_sync(
    tree: Value,
    callables: Vec<(Path, Callable)>,
    args: &[Value],
) -> Result<Value, Failure> {
    log::trace!("Applying {} callable(s).", callables.len());

    callables
        .into_iter()
        .try_fold(tree, |acc, (path, callable)| match callable.call(args) {
            Ok(result) => Ok(patch::assoc_path(acc, &path, result)),
            Err(failure) => {
                log::debug!("Callable at '{}' failed: {}", path, failure);
                Err(failure.annotate(&path))
            }
        })
}
