//! Name resolution over a [`weft_parse::SyntaxTree`].
//!
//! A [`Resolver`] borrows an up-to-date tree and its text and answers two
//! kinds of question:
//!
//! - what a simple or qualified name refers to at a position
//!   ([`Resolver::resolve_value`], [`Resolver::resolve_type`]);
//! - what could be typed at a position ([`Resolver::expression_type`]).
//!
//! Scopes follow the tree. Block bodies, methods, loops and `try`/`catch`
//! only see declarations that start at or before the query position, and
//! the closest one wins. Type bodies and the compilation unit see all of
//! their members. Names the document does not declare are handed to an
//! [`ExternalScope`].
//!
//! Lookups at member scopes do not depend on the query position, so they
//! are memoized in a [`ResolveCache`]. The cache belongs to the caller and
//! must be cleared whenever the text changes.

mod cache;
mod entity;
mod external;
mod resolver;
mod suggest;

pub use cache::ResolveCache;
pub use entity::{Entity, Lookup, TypeRef};
pub use external::{ClassTable, ExternalMember, ExternalScope, MemberKind, NoExternal};
pub use resolver::Resolver;
pub use suggest::CodeSuggestions;
