// src/presets.rs

//! Ready-made flag combinations over [`resolve`].

use crate::core::controller::{Outcome, ResolveResult, resolve};
use crate::core::options::PartialOptions;
use crate::value::Value;

/// Settles every pending leaf, including the ones revealed along the way.
/// Callables are left in place.
///
/// # Errors
/// See [`resolve`].
pub fn all(spec: Value) -> ResolveResult<Outcome> {
    resolve(spec, None, PartialOptions::new().apply(false))
}

/// Settles the pending leaves present in `spec`, in a single pass.
///
/// # Errors
/// See [`resolve`].
pub fn once(spec: Value) -> ResolveResult<Outcome> {
    resolve(spec, None, PartialOptions::new().apply(false).once(true))
}

/// Invokes the callables of `spec` with `args`, in a single pass and without
/// touching pending leaves. The outcome is `Ready` unless `spec` is itself
/// pending.
///
/// # Errors
/// See [`resolve`].
pub fn apply_spec(spec: Value, args: Option<Value>) -> ResolveResult<Outcome> {
    resolve(spec, args, PartialOptions::new().resolve(false).once(true))
}

/// Settles and invokes leaves until none is left.
///
/// # Errors
/// See [`resolve`].
pub fn unravel(spec: Value, args: Option<Value>) -> ResolveResult<Outcome> {
    resolve(spec, args, PartialOptions::new())
}

/// Settles and invokes the leaves present in `spec`, in a single pass.
///
/// # Errors
/// See [`resolve`].
pub fn unravel_once(spec: Value, args: Option<Value>) -> ResolveResult<Outcome> {
    resolve(spec, args, PartialOptions::new().once(true))
}
