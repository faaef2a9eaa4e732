// src/core/controller.rs

//! The resolve entry point and its pass loop.

use crate::core::apply::apply_sync;
use crate::core::classifier::{Leaf, classify, discover, partition};
use crate::core::options::{Options, PartialOptions};
use crate::core::settle::{AggregatedFailure, resolve_async};
use crate::dev_utils::PassTimer;
use crate::value::{Failure, Path, Value};
use futures_util::future::{self, BoxFuture, FutureExt};
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a [`resolve`] call.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Arguments were supplied but are not a sequence.
    #[error("Arguments must be an ordered sequence, got a {found}.")]
    InvalidArgument {
        /// Kind of the value supplied instead.
        found: &'static str,
    },
    /// A callable leaf, or the root callable, failed.
    #[error("Callable failed: {0}")]
    Callable(#[source] Failure),
    /// The root itself was a pending value and it failed. Carried unannotated.
    #[error("{0}")]
    Rejected(#[source] Failure),
    /// One or more pending leaves of a pass failed.
    #[error(transparent)]
    Aggregated(#[from] AggregatedFailure),
}

impl ResolveError {
    /// Origin path of a callable failure, when it was error-shaped.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Callable(failure) => failure.path(),
            Self::InvalidArgument { .. } | Self::Rejected(_) | Self::Aggregated(_) => None,
        }
    }

    /// Leaf failures carried by this error, in discovery order.
    pub fn failures(&self) -> &[Failure] {
        match self {
            Self::Callable(failure) | Self::Rejected(failure) => std::slice::from_ref(failure),
            Self::Aggregated(aggregated) => aggregated.errors(),
            Self::InvalidArgument { .. } => &[],
        }
    }
}

/// Result alias used across the resolution engine.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result of [`resolve`]: either already available, or still to be awaited.
///
/// Both shapes can be awaited through `IntoFuture`; a `Ready` outcome then
/// completes immediately.
pub enum Outcome {
    /// Finished without suspending.
    Ready(Value),
    /// Remaining passes, driven when awaited.
    Deferred(BoxFuture<'static, ResolveResult<Value>>),
}

impl Outcome {
    /// Whether the caller has to await the outcome to get the value.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// The value of a `Ready` outcome.
    pub fn ready(self) -> Option<Value> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl IntoFuture for Outcome {
    type Output = ResolveResult<Value>;
    type IntoFuture = BoxFuture<'static, ResolveResult<Value>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Ready(value) => future::ready(Ok(value)).boxed(),
            Self::Deferred(work) => work,
        }
    }
}

// --- PUBLIC API ---

/// Resolves every pending leaf and invokes every callable leaf of `spec`.
///
/// `args` is the argument sequence handed to each callable; `None` or a null
/// value mean no arguments. With default options the tree is re-scanned after
/// each pass until no operation is left.
///
/// # Errors
/// Fails before any traversal if `args` is not a sequence, and fails
/// synchronously if a callable raises before the first suspension point.
/// Later failures are delivered through the deferred outcome.
pub fn resolve(
    spec: Value,
    args: Option<Value>,
    options: impl Into<PartialOptions>,
) -> ResolveResult<Outcome> {
    let args = match args {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Seq(items)) => Arc::unwrap_or_clone(items),
        Some(other) => {
            return Err(ResolveError::InvalidArgument {
                found: other.kind_name(),
            });
        }
    };
    let options = options.into().normalize();
    log::debug!(
        "Resolving a {} with {} argument(s) and {:?}",
        spec.kind_name(),
        args.len(),
        options
    );

    Controller {
        args: Arc::new(args),
        options,
    }
    .drive(spec)
}

// --- Pass state machine ---

/// How the loop continues once deferred work completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Then {
    Restart,
    Finish,
}

enum Step {
    /// No operation left to run. Handed back wrapped when resolving.
    Settled(Value),
    /// Stopped after a one-shot pass. Handed back as is.
    Finished(Value),
    /// Feed the tree back for another pass.
    Again(Value),
    /// The pass has to wait for pending values.
    Suspend {
        work: BoxFuture<'static, ResolveResult<Value>>,
        then: Then,
    },
}

struct Controller {
    args: Arc<Vec<Value>>,
    options: Options,
}

impl Controller {
    /// Runs passes synchronously until one has to wait; the remainder of the
    /// loop then moves into the deferred outcome.
    fn drive(self, mut tree: Value) -> ResolveResult<Outcome> {
        let mut pass = 0usize;
        loop {
            pass += 1;
            match self.step(tree, pass)? {
                Step::Settled(value) if self.options.resolve => {
                    return Ok(Outcome::Deferred(future::ready(Ok(value)).boxed()));
                }
                Step::Settled(value) | Step::Finished(value) => return Ok(Outcome::Ready(value)),
                Step::Again(next) => tree = next,
                Step::Suspend { work, then } => {
                    return Ok(Outcome::Deferred(self.drive_async(work, then, pass).boxed()));
                }
            }
        }
    }

    async fn drive_async(
        self,
        mut work: BoxFuture<'static, ResolveResult<Value>>,
        mut then: Then,
        mut pass: usize,
    ) -> ResolveResult<Value> {
        loop {
            let mut tree = work.await?;
            if then == Then::Finish {
                return Ok(tree);
            }
            loop {
                pass += 1;
                match self.step(tree, pass)? {
                    Step::Settled(value) | Step::Finished(value) => return Ok(value),
                    Step::Again(next) => tree = next,
                    Step::Suspend {
                        work: next_work,
                        then: next_then,
                    } => {
                        work = next_work;
                        then = next_then;
                        break;
                    }
                }
            }
        }
    }

    /// Classifies the root and runs, or schedules, one pass over `tree`.
    /// A scheduled pass carries its timer until the deferred work completes.
    fn step(&self, tree: Value, pass: usize) -> ResolveResult<Step> {
        let timer = PassTimer::new(pass);

        match classify(&tree) {
            Leaf::Callable(callable) => {
                log::trace!("Pass {}: invoking root callable.", pass);
                let result = callable.call(&self.args).map_err(ResolveError::Callable)?;
                Ok(self.after_pass(result))
            }
            Leaf::Pending(pending) => {
                log::trace!("Pass {}: awaiting root pending value.", pass);
                let work = pending
                    .settle()
                    .map(move |outcome| {
                        drop(timer);
                        outcome.map_err(ResolveError::Rejected)
                    })
                    .boxed();
                Ok(Step::Suspend {
                    work,
                    then: Then::Restart,
                })
            }
            Leaf::Seq(_) | Leaf::Map(_) => self.container_pass(tree, timer),
            Leaf::Opaque | Leaf::Plain => Ok(Step::Settled(tree)),
        }
    }

    fn container_pass(&self, tree: Value, timer: PassTimer) -> ResolveResult<Step> {
        let pass = timer.pass();
        let mut batch = partition(discover(&tree, &Path::root()));
        if !self.options.resolve {
            batch.pending.clear();
        }
        if !self.options.apply {
            batch.callables.clear();
        }
        if batch.is_empty() {
            log::trace!("Pass {}: no operations left.", pass);
            return Ok(Step::Settled(tree));
        }
        log::debug!(
            "Pass {}: {} pending value(s), {} callable(s).",
            pass,
            batch.pending.len(),
            batch.callables.len()
        );

        if !self.options.resolve {
            let patched =
                apply_sync(tree, batch.callables, &self.args).map_err(ResolveError::Callable)?;
            return Ok(self.after_pass(patched));
        }

        // Callables run against the tree with this pass's settled values in it.
        let args = Arc::clone(&self.args);
        let work = async move {
            let _timer = timer;
            let resolved = resolve_async(tree, batch.pending).await?;
            apply_sync(resolved, batch.callables, &args).map_err(ResolveError::Callable)
        }
        .boxed();

        Ok(Step::Suspend {
            work,
            then: if self.options.once {
                Then::Finish
            } else {
                Then::Restart
            },
        })
    }

    fn after_pass(&self, tree: Value) -> Step {
        if self.options.once {
            Step::Finished(tree)
        } else {
            Step::Again(tree)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Failure, Segment};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn no_resolve() -> PartialOptions {
        PartialOptions::new().resolve(false)
    }

    fn test_data() -> Value {
        Value::seq([
            Value::ready(1),
            Value::map([
                ("a", Value::ready(2)),
                ("b", Value::func(|_| 3)),
                (
                    "c",
                    Value::map([("d", Value::seq([Value::from(4), Value::ready(5), Value::from(6)]))]),
                ),
            ]),
            Value::seq([Value::ready(7), Value::from(8)]),
        ])
    }

    fn output_data() -> Value {
        Value::seq([
            Value::from(1),
            Value::map([
                ("a", Value::from(2)),
                ("b", Value::from(3)),
                ("c", Value::map([("d", Value::seq([4, 5, 6]))])),
            ]),
            Value::seq([7, 8]),
        ])
    }

    fn add_one() -> Value {
        Value::callable(|args: &[Value]| match args.first() {
            Some(Value::Int(n)) => Ok(Value::Int(n + 1)),
            other => Err(Failure::error(format!("expected an int, got {:?}", other))),
        })
    }

    // --- Entry point validation ---

    #[test]
    fn test_args_must_be_a_sequence() {
        let result = resolve(test_data(), Some(Value::from(5)), PartialOptions::new());
        assert!(matches!(
            result,
            Err(ResolveError::InvalidArgument { found: "int" })
        ));
    }

    #[test]
    fn test_null_args_mean_no_args() {
        let spec = Value::func(|args: &[Value]| args.len() as i64);
        let out = resolve(spec, Some(Value::Null), no_resolve().once(true)).unwrap();
        assert_eq!(out.ready(), Some(Value::from(0)));
    }

    #[test]
    fn test_plain_specs_without_resolving_are_returned_synchronously() {
        for spec in [
            Value::from(5),
            Value::from(true),
            Value::from(false),
            Value::Null,
            Value::map(Vec::<(String, Value)>::new()),
            Value::seq(Vec::<Value>::new()),
            Value::from("blah"),
        ] {
            let out = resolve(spec.clone(), None, no_resolve()).unwrap();
            assert_eq!(out.ready(), Some(spec));
        }
    }

    // --- Root leaves ---

    #[tokio::test]
    async fn test_accepts_a_single_pending_value() {
        let out = resolve(Value::ready(5), None, PartialOptions::new()).unwrap();
        assert!(out.is_deferred());
        assert_eq!(out.await.unwrap(), Value::from(5));

        // The settled value is a callable, applied on the next pass.
        let identity = Value::func(|args: &[Value]| args.first().cloned().unwrap_or_default());
        let out = resolve(Value::ready(identity), Some(Value::seq([5])), PartialOptions::new());
        assert_eq!(out.unwrap().await.unwrap(), Value::from(5));
    }

    #[tokio::test]
    async fn test_accepts_a_single_callable() {
        let identity = Value::func(|args: &[Value]| args.first().cloned().unwrap_or_default());
        let args = Some(Value::seq([output_data()]));

        let out = resolve(identity.clone(), args.clone(), no_resolve()).unwrap();
        assert_eq!(out.ready(), Some(output_data()));

        let out = resolve(identity, args, PartialOptions::new()).unwrap();
        assert!(out.is_deferred());
        assert_eq!(out.await.unwrap(), output_data());
    }

    #[test]
    fn test_root_callable_failure_is_synchronous() {
        let spec = Value::callable(|_| Err(Failure::error("root")));
        let error = resolve(spec, None, PartialOptions::new()).unwrap_err();
        assert!(matches!(error, ResolveError::Callable(_)));
        assert!(error.path().is_none());
    }

    #[tokio::test]
    async fn test_root_pending_rejection_surfaces_bare() {
        let out = resolve(Value::rejected("nope"), None, PartialOptions::new()).unwrap();
        let error = out.await.unwrap_err();
        assert!(matches!(&error, ResolveError::Rejected(failure) if failure.path().is_none()));
        assert_eq!(error.to_string(), "nope");
        assert_eq!(error.failures().len(), 1);

        let out = resolve(Value::rejected(Value::from(7)), None, PartialOptions::new()).unwrap();
        let error = out.await.unwrap_err();
        assert!(matches!(
            error,
            ResolveError::Rejected(Failure::Thrown(Value::Int(7)))
        ));
    }

    #[tokio::test]
    async fn test_root_pending_restarts_even_once() {
        let spec = Value::ready(Value::seq([Value::ready(1)]));
        let out = resolve(spec, None, PartialOptions::new().once(true)).unwrap();
        assert_eq!(out.await.unwrap(), Value::seq([1]));
    }

    // --- Passes ---

    #[test]
    fn test_noop_returns_data_untouched() {
        let spec = test_data();
        let out = resolve(spec.clone(), None, no_resolve().apply(false)).unwrap();
        assert_eq!(out.ready(), Some(spec));
    }

    #[tokio::test]
    async fn test_plain_data_resolves_to_itself() {
        let out = resolve(output_data(), None, PartialOptions::new()).unwrap();
        assert!(out.is_deferred());
        assert_eq!(out.await.unwrap(), output_data());
    }

    #[tokio::test]
    async fn test_unwraps_pending_values_in_nested_structures() {
        init_logger();
        let out = resolve(test_data(), None, PartialOptions::new()).unwrap();
        assert_eq!(out.await.unwrap(), output_data());
    }

    #[tokio::test]
    async fn test_pending_root_is_awaited_even_without_resolving() {
        let out = resolve(Value::ready(test_data()), None, no_resolve()).unwrap();
        assert!(out.is_deferred());

        // Callables were applied, nested pending values stayed.
        let result = out.await.unwrap();
        let b = Path::root().child(1usize).child("b");
        assert_eq!(result.get_path(&b), Some(&Value::from(3)));
        assert!(matches!(
            result.get_path(&Path::root().child(0usize)),
            Some(Value::Pending(_))
        ));
    }

    #[tokio::test]
    async fn test_recursively_unwraps_revealed_pending_values() {
        let extra = Value::map([
            ("a1", Value::ready(2.1)),
            ("a2", Value::ready(Value::func(|_| 2.2))),
        ]);
        let spec = crate::core::patch::assoc_path(
            test_data(),
            &Path::root().child(1usize).child("a"),
            Value::ready(extra),
        );

        let out = resolve(spec, None, PartialOptions::new()).unwrap();
        let expected = crate::core::patch::assoc_path(
            output_data(),
            &Path::root().child(1usize).child("a"),
            Value::map([("a1", 2.1), ("a2", 2.2)]),
        );
        assert_eq!(out.await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_interleaved_pending_values_and_callables() {
        let b = Value::func(|args: &[Value]| {
            let v = match args.first() {
                Some(Value::Int(n)) => *n,
                _ => 0,
            };
            Value::map([("c", Value::ready(1 + v))])
        });
        let spec = Value::map([
            ("a", Value::func(move |_| Value::ready(Value::map([("b", b.clone())])))),
            (
                "x",
                Value::ready(Value::map([(
                    "y",
                    Value::func(|_| Value::ready(Value::map([("z", add_one())]))),
                )])),
            ),
        ]);

        let out = resolve(spec, Some(Value::seq([1])), PartialOptions::new()).unwrap();
        assert_eq!(
            out.await.unwrap(),
            Value::map([
                ("a", Value::map([("b", Value::map([("c", 2)]))])),
                ("x", Value::map([("y", Value::map([("z", 2)]))])),
            ])
        );
    }

    #[test]
    fn test_callable_failure_carries_path() {
        let spec = Value::map([(
            "a",
            Value::map([("b", Value::callable(|_| Err(Failure::error("fail"))))]),
        )]);
        let error = resolve(spec, None, no_resolve()).unwrap_err();
        assert_eq!(error.path().map(Path::dotted).as_deref(), Some("a.b"));
    }

    #[test]
    fn test_thrown_values_are_not_annotated() {
        let spec = Value::map([(
            "a",
            Value::map([(
                "b",
                Value::callable(|args: &[Value]| {
                    Err(Failure::thrown(args.first().cloned().unwrap_or_default()))
                }),
            )]),
        )]);
        let error = resolve(spec, Some(Value::seq([5])), no_resolve()).unwrap_err();
        assert!(error.path().is_none());
        assert!(matches!(
            error.failures(),
            [Failure::Thrown(Value::Int(5))]
        ));
    }

    #[tokio::test]
    async fn test_aggregates_every_rejection() {
        let failing = Value::seq([
            Value::map([("more", Value::map([("props", Value::rejected("real"))]))]),
            test_data(),
            Value::rejected(Value::from(0)),
        ]);

        let error = resolve(failing, None, PartialOptions::new())
            .unwrap()
            .await
            .unwrap_err();

        let ResolveError::Aggregated(aggregated) = &error else {
            panic!("expected an aggregated failure, got {:?}", error);
        };
        assert_eq!(aggregated.len(), 2);
        assert_eq!(
            aggregated.errors()[0].path().map(Path::dotted).as_deref(),
            Some("0.more.props")
        );
        assert!(matches!(aggregated.errors()[1], Failure::Thrown(Value::Int(0))));
    }

    #[tokio::test]
    async fn test_rejection_skips_callables_of_the_same_pass() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let spec = Value::seq([
            Value::rejected("x"),
            Value::func(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                1
            }),
        ]);

        let error = resolve(spec, None, PartialOptions::new())
            .unwrap()
            .await
            .unwrap_err();
        assert!(matches!(error, ResolveError::Aggregated(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stops_expanding_after_a_failed_pass() {
        let unreached = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&unreached);
        let revealed = Value::map([(
            "more",
            Value::func(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                1
            }),
        )]);
        let spec = Value::seq([
            Value::rejected(Value::from(0)),
            Value::map([("a", Value::ready(revealed))]),
        ]);

        let error = resolve(spec, None, PartialOptions::new())
            .unwrap()
            .await
            .unwrap_err();
        assert_eq!(error.failures().len(), 1);
        assert_eq!(unreached.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_can_disable_applying_callables() {
        let out = resolve(test_data(), None, PartialOptions::new().apply(false)).unwrap();
        let result = out.await.unwrap();
        let b = Path::root().child(1usize).child("b");
        assert!(matches!(result.get_path(&b), Some(Value::Callable(_))));
        assert_eq!(
            crate::core::patch::assoc_path(result, &b, Value::from(3)),
            output_data()
        );
    }

    #[test]
    fn test_can_disable_resolving_pending_values() {
        let spec = test_data();
        let out = resolve(spec.clone(), None, no_resolve()).unwrap();
        let b = Path::root().child(1usize).child("b");
        assert_eq!(
            out.ready(),
            Some(crate::core::patch::assoc_path(spec, &b, Value::from(3)))
        );
    }

    #[tokio::test]
    async fn test_once_handles_only_the_top_level() {
        let b = Value::func(|args: &[Value]| {
            let v = match args.first() {
                Some(Value::Int(n)) => *n,
                _ => 0,
            };
            Value::map([("c", Value::ready(1 + v))])
        });
        let y = Value::func(|_| Value::ready(Value::map([("z", add_one())])));
        let once_a = Value::ready(Value::map([("b", b)]));
        let once_x = Value::map([("y", y)]);

        let returned = once_a.clone();
        let spec = Value::map([
            ("a", Value::func(move |_| returned.clone())),
            ("x", Value::ready(once_x.clone())),
        ]);

        let out = resolve(spec, Some(Value::seq([1])), PartialOptions::new().once(true)).unwrap();
        assert_eq!(
            out.await.unwrap(),
            Value::map([("a", once_a), ("x", once_x)])
        );
    }

    #[tokio::test]
    async fn test_settled_pending_is_shared_between_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let leaf = Value::pending(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1)).await;
            Ok::<_, Failure>(Value::from(1))
        });
        let spec = Value::seq([leaf.clone(), leaf]);

        let out = resolve(spec, None, PartialOptions::new()).unwrap();
        assert_eq!(out.await.unwrap(), Value::seq([1, 1]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_untouched_subtrees_are_shared() {
        let untouched = Value::seq([1, 2, 3]);
        let spec = Value::map([("left", untouched.clone()), ("right", Value::ready(1))]);
        let result = resolve(spec, None, PartialOptions::new())
            .unwrap()
            .await
            .unwrap();

        let (Value::Seq(before), Some(Value::Seq(after))) =
            (&untouched, result.get(&Segment::from("left")))
        else {
            panic!("expected sequences");
        };
        assert!(Arc::ptr_eq(before, after));
    }

    // --- Scenarios ---

    #[tokio::test]
    async fn test_scenario_mixed_tree() {
        let spec = Value::seq([
            Value::ready(1),
            Value::map([("a", Value::ready(2)), ("b", Value::func(|_| 3))]),
        ]);
        let out = resolve(spec, None, PartialOptions::new()).unwrap();
        assert_eq!(
            out.await.unwrap(),
            Value::seq([Value::from(1), Value::map([("a", 2), ("b", 3)])])
        );
    }

    #[test]
    fn test_scenario_sync_failure_path() {
        let spec = Value::map([("a", Value::map([("b", add_one())]))]);
        let error = resolve(spec, Some(Value::seq(["x"])), no_resolve()).unwrap_err();
        assert_eq!(error.path().map(Path::dotted).as_deref(), Some("a.b"));
    }

    #[tokio::test]
    async fn test_scenario_rejections_in_discovery_order() {
        let spec = Value::seq([
            Value::rejected("err1"),
            Value::map([("c", Value::rejected("err2"))]),
        ]);
        let error = resolve(spec, None, PartialOptions::new())
            .unwrap()
            .await
            .unwrap_err();
        let messages: Vec<String> = error.failures().iter().map(Failure::message).collect();
        assert_eq!(messages, ["err1", "err2"]);
    }

    #[tokio::test]
    async fn test_scenario_one_shot_root_callable() {
        let nested = Value::ready(1);
        let inner = nested.clone();
        let spec = Value::func(move |_| Value::map([("a", inner.clone())]));

        let out = resolve(spec, None, PartialOptions::new().once(true)).unwrap();
        let result = out.await.unwrap();
        assert_eq!(result, Value::map([("a", nested)]));
    }

    #[tokio::test]
    async fn test_continuous_mode_runs_revealed_callables() {
        let spec = Value::map([("a", Value::ready(Value::func(|_| "ran")))]);

        let continuous = resolve(spec.clone(), None, PartialOptions::new()).unwrap();
        assert_eq!(continuous.await.unwrap(), Value::map([("a", "ran")]));

        let one_shot = resolve(spec, None, PartialOptions::new().once(true))
            .unwrap()
            .await
            .unwrap();
        assert!(matches!(
            one_shot.get(&Segment::from("a")),
            Some(Value::Callable(_))
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn plain_tree() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(Value::Int),
                "[a-z]{0,6}".prop_map(Value::String),
            ];
            leaf.prop_recursive(4, 32, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                    prop::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(Value::map),
                ]
            })
        }

        proptest! {
            #[test]
            fn plain_trees_are_a_fixed_point(tree in plain_tree()) {
                prop_assert!(discover(&tree, &Path::root()).is_empty());
                let out = resolve(tree.clone(), None, PartialOptions::new().resolve(false))
                    .unwrap()
                    .ready();
                prop_assert_eq!(out, Some(tree));
            }
        }
    }
}
