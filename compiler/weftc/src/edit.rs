//! Edits and edit scripts.
//!
//! An edit script has one edit per line: `pos removed text`. The text is
//! everything after the second space, with `\n`, `\t` and `\\` escapes.
//! Blank lines and lines starting with `#` are skipped.

/// A replacement of `removed` bytes at `pos` by `inserted`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    pub pos: usize,
    pub removed: usize,
    pub inserted: String,
}

impl Edit {
    pub fn new(pos: usize, removed: usize, inserted: impl Into<String>) -> Self {
        Edit {
            pos,
            removed,
            inserted: inserted.into(),
        }
    }
}

/// An edit the buffer cannot take.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("edit {pos}+{removed} runs past the end of the text ({len} bytes)")]
    OutOfBounds { pos: usize, removed: usize, len: usize },
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct ScriptError {
    pub line: usize,
    pub reason: &'static str,
}

/// Parse an edit script.
pub fn parse_script(script: &str) -> Result<Vec<Edit>, ScriptError> {
    let mut edits = Vec::new();
    for (index, raw) in script.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() || raw.starts_with('#') {
            continue;
        }
        let mut parts = raw.splitn(3, ' ');
        let pos = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or(ScriptError {
                line,
                reason: "expected a position",
            })?;
        let removed = parts
            .next()
            .and_then(|r| r.parse().ok())
            .ok_or(ScriptError {
                line,
                reason: "expected a removal length",
            })?;
        let inserted = unescape(parts.next().unwrap_or_default()).ok_or(ScriptError {
            line,
            reason: "unknown escape",
        })?;
        edits.push(Edit {
            pos,
            removed,
            inserted,
        });
    }
    Ok(edits)
}

fn unescape(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            '\\' => out.push('\\'),
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn script_lines_become_edits() {
        let script = "# typing\n12 0 int x;\\n\n\n3 4 \n0 1 a\\\\b\\tc";
        assert_eq!(
            parse_script(script).unwrap(),
            vec![
                Edit::new(12, 0, "int x;\n"),
                Edit::new(3, 4, ""),
                Edit::new(0, 1, "a\\b\tc"),
            ]
        );
    }

    #[test]
    fn deletions_may_omit_the_text() {
        assert_eq!(parse_script("5 2").unwrap(), vec![Edit::new(5, 2, "")]);
    }

    #[test]
    fn malformed_lines_are_reported() {
        assert_eq!(
            parse_script("1 0 a\nx 0 b"),
            Err(ScriptError {
                line: 2,
                reason: "expected a position"
            })
        );
        assert_eq!(parse_script("1").unwrap_err().reason, "expected a removal length");
        assert_eq!(parse_script("1 0 \\q").unwrap_err().to_string(), "line 1: unknown escape");
    }
}
