//! Memoized member-scope lookups.

use rustc_hash::FxHashMap;
use weft_parse::NodeId;

use crate::entity::{Entity, Lookup, TypeRef};

#[derive(Debug, Default)]
struct ScopeEntries {
    values: FxHashMap<String, Lookup<Entity>>,
    types: FxHashMap<String, Lookup<TypeRef>>,
}

/// Lookup results keyed by `(name, scope node)`.
///
/// Only scopes that see all of their members are cached: the answer there
/// does not depend on where inside the scope the question was asked. Node
/// ids are recycled after destruction, so any edit to the text invalidates
/// every entry; call [`ResolveCache::clear`].
#[derive(Debug, Default)]
pub struct ResolveCache {
    scopes: FxHashMap<NodeId, ScopeEntries>,
    hits: u64,
    misses: u64,
}

impl ResolveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.scopes.clear();
    }

    /// Number of cached answers.
    pub fn len(&self) -> usize {
        self.scopes
            .values()
            .map(|s| s.values.len() + s.types.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Cached value lookup of `name` from `scope`.
    pub fn value(&self, scope: NodeId, name: &str) -> Option<&Lookup<Entity>> {
        self.scopes.get(&scope)?.values.get(name)
    }

    /// Cached type lookup of `name` from `scope`.
    pub fn type_named(&self, scope: NodeId, name: &str) -> Option<&Lookup<TypeRef>> {
        self.scopes.get(&scope)?.types.get(name)
    }

    pub(crate) fn cached_value(&mut self, scope: NodeId, name: &str) -> Option<Lookup<Entity>> {
        let hit = self.value(scope, name).cloned();
        self.count(hit.is_some());
        hit
    }

    pub(crate) fn cached_type(&mut self, scope: NodeId, name: &str) -> Option<Lookup<TypeRef>> {
        let hit = self.type_named(scope, name).cloned();
        self.count(hit.is_some());
        hit
    }

    pub(crate) fn insert_value(&mut self, scope: NodeId, name: &str, found: Lookup<Entity>) {
        self.scopes
            .entry(scope)
            .or_default()
            .values
            .insert(name.to_owned(), found);
    }

    pub(crate) fn insert_type(&mut self, scope: NodeId, name: &str, found: Lookup<TypeRef>) {
        self.scopes
            .entry(scope)
            .or_default()
            .types
            .insert(name.to_owned(), found);
    }

    fn count(&mut self, hit: bool) {
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}
