// src/value.rs

//! The value tree and its leaf types.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use thiserror::Error;

use crate::constants::PATH_SEPARATOR;

/// Keyed mapping container. Iteration follows insertion order, which is the
/// intrinsic key order used during discovery.
pub type Map = IndexMap<String, Value>;

/// A node of the value tree.
///
/// Containers hold their children behind an `Arc`, so cloning a tree is cheap
/// and a pass only copies the container chain leading to the leaves it touches.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar. Equal to a `Float` of the same value.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// Text scalar.
    String(String),
    /// Ordered sequence.
    Seq(Arc<Vec<Value>>),
    /// Keyed mapping.
    Map(Arc<Map>),
    /// Deferred computation, invoked with the caller's arguments.
    Callable(Callable),
    /// In-flight value, eventually settling to a value or a failure.
    Pending(Pending),
    /// Instance with identity or behavior. Never descended into.
    Opaque(Opaque),
}

impl Value {
    /// Builds a sequence from anything convertible to values.
    pub fn seq<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Seq(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Builds a mapping, keeping the iteration order of `entries`.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Wraps a fallible function as a callable leaf.
    pub fn callable<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        Self::Callable(Callable::new(func))
    }

    /// Wraps an infallible function as a callable leaf.
    pub fn func<F, V>(func: F) -> Self
    where
        F: Fn(&[Value]) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::Callable(Callable::new(move |args| Ok(func(args).into())))
    }

    /// Wraps anything awaitable as a pending leaf.
    pub fn pending<F, T, E>(future: F) -> Self
    where
        F: IntoFuture<Output = Result<T, E>>,
        F::IntoFuture: Send + 'static,
        T: Into<Value> + 'static,
        E: Into<Failure> + 'static,
    {
        Self::Pending(Pending::new(future))
    }

    /// A pending leaf that settles successfully with `value`.
    pub fn ready(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::pending(async move { Ok::<_, Failure>(value) })
    }

    /// A pending leaf that settles with `failure`.
    pub fn rejected(failure: impl Into<Failure>) -> Self {
        let failure = failure.into();
        Self::pending(async move { Err::<Value, _>(failure) })
    }

    /// Wraps an instance that must be carried through untouched.
    pub fn opaque<T: Any + Send + Sync>(instance: T) -> Self {
        Self::Opaque(Opaque::new(instance))
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
            Self::Callable(_) => "callable",
            Self::Pending(_) => "pending",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Whether the node is a sequence or a mapping.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Seq(_) | Self::Map(_))
    }

    /// Items of a sequence node.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Entries of a mapping node.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Child addressed by a single path segment.
    pub fn get(&self, segment: &Segment) -> Option<&Value> {
        match (self, segment) {
            (Self::Seq(items), Segment::Index(i)) => items.get(*i),
            (Self::Map(entries), Segment::Key(k)) => entries.get(k),
            _ => None,
        }
    }

    /// Node found by walking `path` from this one.
    pub fn get_path(&self, path: &Path) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.get(segment))
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => f.write_str(s),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.render(f)?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: ", key)?;
                    item.render(f)?;
                }
                f.write_str("}")
            }
            Self::Callable(_) => f.write_str("<callable>"),
            Self::Pending(_) => f.write_str("<pending>"),
            Self::Opaque(o) => write!(f, "<opaque {}>", o.type_name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *a as f64 == *b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Map(a), Self::Map(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Callable(a), Self::Callable(b)) => a.ptr_eq(b),
            (Self::Pending(a), Self::Pending(b)) => a.ptr_eq(b),
            (Self::Opaque(a), Self::Opaque(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Seq(Arc::new(items))
    }
}

impl From<Map> for Value {
    fn from(entries: Map) -> Self {
        Self::Map(Arc::new(entries))
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

impl From<Pending> for Value {
    fn from(pending: Pending) -> Self {
        Self::Pending(pending)
    }
}

// --- Leaves with identity ---

type CallableFn = dyn Fn(&[Value]) -> Result<Value, Failure> + Send + Sync;

/// A callable leaf. Cloning shares the same function.
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
    /// Wraps a fallible function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// Invokes the function with the shared argument sequence.
    pub fn call(&self, args: &[Value]) -> Result<Value, Failure> {
        (self.0)(args)
    }

    /// Whether both handles share the same function.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

/// Future backing a pending leaf. Shared so that every clone observes the
/// same single outcome.
pub type Settlement = Shared<BoxFuture<'static, Result<Value, Failure>>>;

/// A pending leaf.
#[derive(Clone)]
pub struct Pending(Arc<Settlement>);

impl Pending {
    /// Accepts anything exposing a continuation: every `IntoFuture` whose
    /// output is a `Result` convertible into the tree's types.
    pub fn new<F, T, E>(future: F) -> Self
    where
        F: IntoFuture<Output = Result<T, E>>,
        F::IntoFuture: Send + 'static,
        T: Into<Value> + 'static,
        E: Into<Failure> + 'static,
    {
        let settlement = future
            .into_future()
            .map(|outcome| outcome.map(Into::into).map_err(Into::into))
            .boxed()
            .shared();
        Self(Arc::new(settlement))
    }

    /// A handle that can be awaited for the outcome. The underlying future is
    /// driven at most once, no matter how many handles exist.
    pub fn settle(&self) -> Settlement {
        Settlement::clone(&self.0)
    }

    /// The outcome, if the pending value already settled.
    pub fn peek(&self) -> Option<Result<Value, Failure>> {
        self.0.peek().cloned()
    }

    /// Whether both handles observe the same settlement.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pending({:p})", Arc::as_ptr(&self.0))
    }
}

/// An opaque instance: carried as atomic data, compared by identity.
#[derive(Clone)]
pub struct Opaque {
    instance: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Opaque {
    /// Wraps `instance`, recording its type name for diagnostics.
    pub fn new<T: Any + Send + Sync>(instance: T) -> Self {
        Self {
            instance: Arc::new(instance),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The wrapped instance, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }

    /// Type name of the wrapped instance.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both handles wrap the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.type_name)
    }
}

// --- Location paths ---

/// One step from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Position in a sequence.
    Index(usize),
    /// Key in a mapping.
    Key(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<&str> for Segment {
    fn from(k: &str) -> Self {
        Self::Key(k.to_string())
    }
}

impl From<String> for Segment {
    fn from(k: String) -> Self {
        Self::Key(k)
    }
}

/// Ordered segments from the root to a node. Displays dotted (`a.0.b`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The empty path, addressing the tree itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether the path has no segments.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// A new path extended by one segment.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(segment.into());
        Self(segments)
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    /// Removes the last segment.
    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    /// Segments joined with the path separator.
    pub fn dotted(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// --- Operations ---

/// What a discovered operation does to its leaf.
#[derive(Debug, Clone)]
pub enum OpKind {
    /// Invoke the callable with the call's arguments.
    Callable(Callable),
    /// Await the pending value.
    Pending(Pending),
}

/// A leaf that needs work in the current pass, addressed by its path.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Location of the leaf.
    pub path: Path,
    /// The leaf itself.
    pub kind: OpKind,
}

// --- Leaf failures ---

/// Failure of a single leaf, either raised by a callable or settled by a
/// pending value.
#[derive(Debug, Clone, Error)]
pub enum Failure {
    /// Error-shaped failure; receives the origin path when it surfaces.
    #[error(transparent)]
    Error(#[from] LeafError),
    /// Any other failure value. Passed through without annotation.
    #[error("{0}")]
    Thrown(Value),
}

impl Failure {
    /// An error-shaped failure carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(LeafError::new(message))
    }

    /// Wraps a concrete error, keeping it reachable through `source()`.
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Error(LeafError {
            message: error.to_string(),
            path: None,
            source: Some(Arc::new(error)),
        })
    }

    /// A non-error failure value.
    pub fn thrown(value: impl Into<Value>) -> Self {
        Self::Thrown(value.into())
    }

    /// Whether the failure receives a path annotation.
    pub fn is_error_shaped(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Origin path, once annotated.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Error(e) => e.path.as_ref(),
            Self::Thrown(_) => None,
        }
    }

    /// Records `path` as the origin if the failure is error-shaped.
    pub fn annotate(self, path: &Path) -> Self {
        match self {
            Self::Error(mut e) => {
                e.path = Some(path.clone());
                Self::Error(e)
            }
            thrown @ Self::Thrown(_) => thrown,
        }
    }

    /// The message used when listing failures.
    pub fn message(&self) -> String {
        match self {
            Self::Error(e) => e.message.clone(),
            Self::Thrown(v) => v.to_string(),
        }
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::error(message)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::error(message)
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        Self::Thrown(value)
    }
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        let message = format!("{:#}", error);
        let source: Box<dyn std::error::Error + Send + Sync> = error.into();
        Self::Error(LeafError {
            message,
            path: None,
            source: Some(Arc::from(source)),
        })
    }
}

/// An error-shaped leaf failure.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LeafError {
    message: String,
    path: Option<Path>,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl LeafError {
    /// A failure with `message` and no source.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// The failure message, without the path.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Origin path, once annotated.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }
}
