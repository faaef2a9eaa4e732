// src/fluent.rs

//! Chainable configuration of a resolve call.

use crate::core::controller::{Outcome, ResolveResult, resolve};
use crate::core::options::PartialOptions;
use crate::value::Value;

/// An immutable builder accumulating a spec, its arguments and the options of
/// a [`resolve`] call. Every setter returns a new builder and leaves the
/// receiver unchanged, so a partially configured builder can be reused.
#[derive(Debug, Clone, Default)]
pub struct Unravel {
    spec: Option<Value>,
    args: Option<Value>,
    options: PartialOptions,
}

impl Unravel {
    /// A builder with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-scans the output until nothing is left (`true`) or stops after a
    /// single pass (`false`).
    pub fn repeat(&self, enabled: bool) -> Self {
        self.with_options(self.options.once(!enabled))
    }

    /// Turns invoking callables on or off.
    pub fn apply(&self, enabled: bool) -> Self {
        self.with_options(self.options.apply(enabled))
    }

    /// Turns settling pending values on or off.
    pub fn resolve(&self, enabled: bool) -> Self {
        self.with_options(self.options.resolve(enabled))
    }

    /// Sets the callable arguments. Also turns applying on.
    pub fn apply_to(&self, args: impl Into<Value>) -> Self {
        Self {
            args: Some(args.into()),
            ..self.with_options(self.options.apply(true))
        }
    }

    /// Sets the tree to resolve.
    pub fn with_spec(&self, spec: impl Into<Value>) -> Self {
        Self {
            spec: Some(spec.into()),
            ..self.clone()
        }
    }

    /// Options accumulated so far.
    pub fn options(&self) -> PartialOptions {
        self.options
    }

    /// Runs [`resolve`] with everything accumulated so far. A missing spec
    /// resolves as null.
    ///
    /// # Errors
    /// See [`resolve`].
    pub fn exec(&self) -> ResolveResult<Outcome> {
        self.exec_with(None, None, None)
    }

    /// Like [`Unravel::exec`], with every supplied argument taking the place
    /// of the accumulated one. Supplied options replace the builder's options
    /// entirely; unset fields fall back to the defaults, not to the builder.
    ///
    /// # Errors
    /// See [`resolve`].
    pub fn exec_with(
        &self,
        spec: Option<Value>,
        args: Option<Value>,
        options: Option<PartialOptions>,
    ) -> ResolveResult<Outcome> {
        let spec = spec.or_else(|| self.spec.clone()).unwrap_or_default();
        let args = args.or_else(|| self.args.clone());
        let options = options.unwrap_or(self.options);
        log::trace!("Executing builder with {:?}", options);
        resolve(spec, args, options)
    }

    fn with_options(&self, options: PartialOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }
}
