//! What names resolve to.

use weft_parse::NodeId;

/// Outcome of a lookup. `Unknown` is a real answer and is cached like
/// `Found`; a missing cache entry means the lookup never ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Unknown,
}

impl<T> Lookup<T> {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    #[inline]
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Unknown => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Unknown => Lookup::Unknown,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::Unknown, Lookup::Found)
    }
}

/// A resolved type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A type definition in the document.
    Declared(NodeId),
    /// A fully qualified type known to the [`ExternalScope`](crate::ExternalScope).
    External(String),
    /// A type variable of a generic type or method.
    Parameter { name: String, owner: NodeId },
    /// `int`, `boolean`, ... and `void`.
    Primitive(&'static str),
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// Wrap in `dims` array levels.
    pub(crate) fn with_dims(self, dims: usize) -> TypeRef {
        (0..dims).fold(self, |ty, _| TypeRef::Array(Box::new(ty)))
    }
}

/// What a name in value position refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A field, local variable, parameter or enum constant. The id is the
    /// declaring node; one node may declare several names.
    Variable(NodeId),
    /// A type used where a value was expected, e.g. `Math` in
    /// `Math.abs(x)`. Only static members are reachable through it.
    Type(TypeRef),
}
