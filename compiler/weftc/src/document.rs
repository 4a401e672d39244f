//! An edited document: text buffer, structure, and query caches.

use weft_parse::{MarkTokens, ReparseStats, ReparseStep, SyntaxTree};
use weft_resolve::{ClassTable, CodeSuggestions, Entity, ExternalScope, Lookup, ResolveCache, Resolver};

use crate::config::WeftConfig;
use crate::edit::{Edit, EditError};

/// One open document.
///
/// Every edit goes through [`Document::apply_edit`], which mutates the
/// buffer and notifies the tree in the same order: removal first, then
/// insertion. Queries run pending reparses before answering.
pub struct Document {
    text: String,
    tree: SyntaxTree,
    cache: ResolveCache,
    external: Box<dyn ExternalScope>,
    config: WeftConfig,
}

impl Document {
    /// Parse `text`, resolving outside names against a small `java.lang`
    /// table.
    pub fn new(text: impl Into<String>, config: WeftConfig) -> Self {
        Self::with_external(text, config, Box::new(ClassTable::java_lang()))
    }

    pub fn with_external(
        text: impl Into<String>,
        config: WeftConfig,
        external: Box<dyn ExternalScope>,
    ) -> Self {
        let text = text.into();
        let tree = SyntaxTree::parse(&text);
        tracing::debug!(len = text.len(), nodes = tree.node_count(), "document opened");
        Document {
            text,
            tree,
            cache: ResolveCache::new(),
            external,
            config,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The structure as of the last reparse; may lag behind the text
    /// while [`Document::has_pending`] is true.
    #[inline]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    #[inline]
    pub fn config(&self) -> &WeftConfig {
        &self.config
    }

    #[inline]
    pub fn cache(&self) -> &ResolveCache {
        &self.cache
    }

    #[inline]
    pub fn stats(&self) -> &ReparseStats {
        self.tree.stats()
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.tree.has_pending()
    }

    /// Replace `removed` bytes at `pos` with `inserted`.
    ///
    /// Both ends of the removed range must lie on character boundaries.
    /// A rejected edit leaves the document untouched.
    #[tracing::instrument(level = "debug", skip(self, inserted), fields(inserted = inserted.len()))]
    pub fn apply_edit(&mut self, pos: usize, removed: usize, inserted: &str) -> Result<(), EditError> {
        let len = self.text.len();
        let end = pos
            .checked_add(removed)
            .filter(|&end| end <= len)
            .ok_or(EditError::OutOfBounds { pos, removed, len })?;
        for offset in [pos, end] {
            if !self.text.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }
        if removed == 0 && inserted.is_empty() {
            return Ok(());
        }
        self.cache.clear();
        if removed > 0 {
            self.text.replace_range(pos..end, "");
            self.tree.text_removed(pos, removed);
        }
        if !inserted.is_empty() {
            self.text.insert_str(pos, inserted);
            self.tree.text_inserted(pos, inserted.len());
        }
        if self.config.eager_reparse {
            self.flush();
        }
        Ok(())
    }

    pub fn apply(&mut self, edit: &Edit) -> Result<(), EditError> {
        self.apply_edit(edit.pos, edit.removed, &edit.inserted)
    }

    /// Run pending reparses for at most one configured chunk.
    pub fn step(&mut self) -> ReparseStep {
        self.tree.reparse_step(&self.text, self.config.reparse_chunk)
    }

    /// Run every pending reparse to completion.
    pub fn flush(&mut self) {
        while !matches!(self.step(), ReparseStep::Idle) {}
    }

    /// Highlight runs for `text[pos..pos + len]`.
    pub fn tokens_for(&mut self, pos: usize, len: usize) -> MarkTokens<'_> {
        self.flush();
        self.tree.tokens_for(&self.text, pos, len)
    }

    /// Completion candidates at `pos`.
    pub fn expression_type(&mut self, pos: usize) -> Option<CodeSuggestions> {
        self.with_resolver(|resolver| resolver.expression_type(pos))
    }

    /// What `name` denotes as a value at `pos`.
    pub fn resolve_value(&mut self, name: &str, pos: usize) -> Lookup<Entity> {
        self.with_resolver(|resolver| resolver.resolve_value(name, pos))
    }

    fn with_resolver<R>(&mut self, query: impl FnOnce(&mut Resolver<'_, dyn ExternalScope>) -> R) -> R {
        self.flush();
        let cache = std::mem::take(&mut self.cache);
        let mut resolver = Resolver::new(&self.tree, &self.text, self.external.as_ref(), cache);
        let answer = query(&mut resolver);
        self.cache = resolver.into_cache();
        answer
    }
}
