//! Recursive resolution of value trees whose leaves may be pending values or
//! callables.
//!
//! [`resolve`] walks a tree of sequences and mappings, settles every pending
//! leaf, invokes every callable leaf with a shared argument list, and writes
//! each result back at the leaf's location. By default it repeats until the
//! tree holds neither.

pub mod constants;
pub mod core;
pub mod dev_utils;
pub mod fluent;
pub mod interop;
pub mod presets;
pub mod value;

pub use crate::core::controller::{Outcome, ResolveError, ResolveResult, resolve};
pub use crate::core::options::{Options, OptionsError, PartialOptions};
pub use crate::core::settle::AggregatedFailure;
pub use crate::fluent::Unravel;
pub use crate::interop::InteropError;
pub use crate::value::{Callable, Failure, LeafError, Opaque, Path, Pending, Segment, Value};
