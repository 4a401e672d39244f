//! Byte cursor over a window of the document.
//!
//! The window `[pos, end)` is usually the whole buffer, but the highlighter
//! scans isolated gaps between structural nodes, so the end is explicit.
//! Reading at or past `end` yields `0`, which dispatches to EOF.

/// Cursor over `bytes[pos..end]`.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor over `source[start..end]`, clamped to the source length.
    pub fn new(source: &'a str, start: usize, end: usize) -> Self {
        let bytes = source.as_bytes();
        let end = end.min(bytes.len());
        Cursor {
            bytes,
            pos: start.min(end),
            end,
        }
    }

    /// Absolute byte position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.end
    }

    /// Current byte, or `0` at the window end.
    #[inline]
    pub fn current(&self) -> u8 {
        self.peek_at(0)
    }

    /// Byte `n` positions ahead, or `0` past the window end.
    #[inline]
    pub fn peek_at(&self, n: usize) -> u8 {
        let at = self.pos + n;
        if at < self.end {
            self.bytes[at]
        } else {
            0
        }
    }

    /// Byte just before the current position, or `0` at the buffer start.
    #[inline]
    pub fn prev(&self) -> u8 {
        if self.pos == 0 {
            0
        } else {
            self.bytes[self.pos - 1]
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.end {
            self.pos += 1;
        }
    }

    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.end);
    }

    /// Advance while `pred` holds for the current byte.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// Bytes from the current position to the window end.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..self.end]
    }

    /// Jump to the window end.
    #[inline]
    pub fn skip_to_end(&mut self) {
        self.pos = self.end;
    }
}

#[cfg(test)]
mod tests;
