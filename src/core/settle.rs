// src/core/settle.rs

//! Settling the pending leaves of a pass.

use crate::constants::{AGGREGATE_BULLET, AGGREGATE_HEADER};
use crate::core::patch;
use crate::value::{Failure, Path, Pending, Value};
use futures_util::future::{FutureExt, join_all};
use thiserror::Error;

/// Every failure of a pass's pending leaves, in discovery order.
#[derive(Debug, Clone, Error)]
#[error("{}", summarize(.errors))]
pub struct AggregatedFailure {
    errors: Vec<Failure>,
}

impl AggregatedFailure {
    /// Wraps failures already in discovery order.
    pub fn new(errors: Vec<Failure>) -> Self {
        Self { errors }
    }

    /// The failures, in discovery order.
    pub fn errors(&self) -> &[Failure] {
        &self.errors
    }

    /// Takes the failures out.
    pub fn into_errors(self) -> Vec<Failure> {
        self.errors
    }

    /// Number of failed leaves.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn summarize(errors: &[Failure]) -> String {
    errors.iter().fold(AGGREGATE_HEADER.to_string(), |mut acc, e| {
        acc.push_str(AGGREGATE_BULLET);
        acc.push_str(&e.message());
        acc
    })
}

/// Settles every pending leaf of the pass and writes the values into `tree`.
///
/// All leaves are polled together and every one is awaited, even after a
/// failure. If any leaf fails, the failures (annotated with their paths when
/// error-shaped) are returned in discovery order and no value is written.
pub async fn resolve_async(
    tree: Value,
    pending: Vec<(Path, Pending)>,
) -> Result<Value, AggregatedFailure> {
    if pending.is_empty() {
        return Ok(tree);
    }
    log::trace!("Settling {} pending value(s).", pending.len());

    let settled = join_all(
        pending
            .into_iter()
            .map(|(path, leaf)| leaf.settle().map(move |outcome| (path, outcome))),
    )
    .await;

    let mut patches = Vec::with_capacity(settled.len());
    let mut failures = Vec::new();
    for (path, outcome) in settled {
        match outcome {
            Ok(value) => patches.push((path, value)),
            Err(failure) => {
                log::trace!("Pending value at '{}' rejected: {}", path, failure);
                failures.push(failure.annotate(&path));
            }
        }
    }

    if !failures.is_empty() {
        log::debug!(
            "{} of {} pending value(s) rejected; discarding the pass.",
            failures.len(),
            failures.len() + patches.len()
        );
        return Err(AggregatedFailure::new(failures));
    }

    Ok(patch::apply_patches(tree, patches))
}
