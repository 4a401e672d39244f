//! Highlight runs for the editor's painter.
//!
//! Lexing for a window has to begin on a token boundary. Node starts and
//! ends are always token boundaries, so the window is lexed from the
//! closest one at or before its start and then clipped.

use std::iter::FusedIterator;

use weft_lexer::{classify, HighlightTag, Lexer};

use crate::syntax_tree::SyntaxTree;

/// A run of `len` bytes painted with one class.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MarkToken {
    pub len: usize,
    pub tag: HighlightTag,
}

/// Runs covering a window, then a zero-length [`HighlightTag::End`].
///
/// Adjacent tokens of the same class are merged into one run. The
/// iterator cannot be restarted; ask the tree for a new one.
pub struct MarkTokens<'s> {
    lexer: Lexer<'s>,
    /// First byte not yet covered.
    at: usize,
    end: usize,
    held: Option<MarkToken>,
    finished: bool,
}

impl<'s> MarkTokens<'s> {
    fn new(src: &'s str, anchor: usize, pos: usize, end: usize) -> Self {
        MarkTokens {
            lexer: Lexer::starting_at(src, anchor),
            at: pos,
            end,
            held: None,
            finished: false,
        }
    }

    /// The next token clipped to the window.
    fn next_clipped(&mut self) -> Option<MarkToken> {
        if let Some(held) = self.held.take() {
            return Some(held);
        }
        while self.at < self.end {
            let tok = self.lexer.next_token();
            if tok.is_eof() {
                return None;
            }
            let start = tok.start.max(self.at);
            let stop = tok.end().min(self.end);
            if stop <= start {
                continue;
            }
            self.at = stop;
            return Some(MarkToken {
                len: stop - start,
                tag: classify(&tok),
            });
        }
        None
    }
}

impl Iterator for MarkTokens<'_> {
    type Item = MarkToken;

    fn next(&mut self) -> Option<MarkToken> {
        if self.finished {
            return None;
        }
        let Some(mut run) = self.next_clipped() else {
            self.finished = true;
            return Some(MarkToken {
                len: 0,
                tag: HighlightTag::End,
            });
        };
        loop {
            match self.next_clipped() {
                Some(tok) if tok.tag == run.tag => run.len += tok.len,
                other => {
                    self.held = other;
                    return Some(run);
                }
            }
        }
    }
}

impl FusedIterator for MarkTokens<'_> {}

impl SyntaxTree {
    /// Highlight runs covering `src[pos..pos + len]`, clamped to the text.
    ///
    /// The tree should be up to date with `src`; pending reparses make the
    /// runs near the edit unreliable.
    pub fn tokens_for<'s>(&self, src: &'s str, pos: usize, len: usize) -> MarkTokens<'s> {
        let pos = pos.min(src.len());
        let end = pos.saturating_add(len).min(src.len());
        MarkTokens::new(src, self.lex_anchor(pos), pos, end)
    }

    /// A lexer positioned on the closest token boundary at or before `pos`.
    pub fn lexer_at<'s>(&self, src: &'s str, pos: usize) -> Lexer<'s> {
        Lexer::starting_at(src, self.lex_anchor(pos.min(src.len())))
    }

    /// The closest token boundary at or before `pos` that the tree knows:
    /// the start of the innermost node holding `pos`, or the end of the
    /// child just before it.
    fn lex_anchor(&self, pos: usize) -> usize {
        let mut cur = self.root();
        let mut base = 0;
        loop {
            let tree = &self.node(cur).children;
            let rel = pos - base;
            let Some(loc) = tree.find_node_at_or_before(rel) else {
                return base;
            };
            if loc.end() <= rel {
                return base + loc.end();
            }
            base += loc.position;
            let Some(child) = self.payload(cur, loc.id) else {
                return base;
            };
            cur = child;
        }
    }
}
