//! Property tests for incremental reparsing.
//!
//! Random edits are applied both to a reference `String` and to a
//! [`SyntaxTree`]. After the pending reparses run, the tree must be
//! indistinguishable from a fresh parse of the reference text.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use weft_parse::{ReparseStep, SyntaxTree};

const BASE: &str = "package p;\n\
import java.util.List;\n\
/** Doc. */\n\
public class Outer<T> extends Base implements Runnable {\n\
    private int count = 0, total;\n\
    static final String NAME = \"outer\";\n\
    enum Mode { ON, OFF; boolean on() { return this == ON; } }\n\
    public void run() {\n\
        int i = 0;\n\
        for (int j = 0; j < count; j++) { i += j; }\n\
        if (i > 2) { total = i; } else total = 0;\n\
        try { work(i); } catch (Exception e) { log(e); } finally { done(); }\n\
    }\n\
    // trailing\n\
    T get(List<T> xs) { return xs.get(0); }\n\
}\n\
interface Shape { double area(); }\n";

/// Snippets chosen to open and close constructs in awkward places.
const FRAGMENTS: &[&str] = &[
    "", " ", "\n", "{", "}", ";", "(", ")", ",", "x", "int y = 1;", "return;",
    "class B { }", "void m() {", "if (a) ", "else ", "while (b) {", "/*", "*/",
    "/** d */", "// c\n", "\"", "'", "enum E { A, B; }", "static ", "x.y(",
    "catch (E e) {}", "@Override ", "<T>", "new Object() { }",
];

#[derive(Clone, Debug)]
struct Edit {
    pos: prop::sample::Index,
    removed: usize,
    inserted: &'static str,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    (
        any::<prop::sample::Index>(),
        prop_oneof![Just(0usize), 1usize..4, 4usize..40],
        prop::sample::select(FRAGMENTS),
    )
        .prop_map(|(pos, removed, inserted)| Edit {
            pos,
            removed,
            inserted,
        })
}

/// Apply `edit` to both copies, keeping the removal inside the text.
fn apply(text: &mut String, tree: &mut SyntaxTree, edit: &Edit) {
    let pos = edit.pos.index(text.len() + 1);
    let removed = edit.removed.min(text.len() - pos);
    text.replace_range(pos..pos + removed, edit.inserted);
    tree.text_removed(pos, removed);
    tree.text_inserted(pos, edit.inserted.len());
}

fn check(text: &str, tree: &SyntaxTree) -> Result<(), TestCaseError> {
    prop_assert!(!tree.has_pending());
    prop_assert_eq!(tree.span(tree.root()).end, text.len());
    if let Err(err) = tree.check_invariants() {
        return Err(TestCaseError::fail(format!("{err} after edits, text:\n{text}")));
    }
    let fresh = SyntaxTree::parse(text);
    prop_assert_eq!(tree.dump(), fresh.dump(), "text:\n{}", text);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 2000,
        ..ProptestConfig::default()
    })]

    /// Flushing after every edit keeps the tree equal to a fresh parse.
    #[test]
    fn flush_after_each_edit(edits in prop::collection::vec(edit_strategy(), 1..16)) {
        let mut text = BASE.to_owned();
        let mut tree = SyntaxTree::parse(&text);
        for edit in &edits {
            apply(&mut text, &mut tree, edit);
            tree.flush(&text);
            check(&text, &tree)?;
        }
    }

    /// Edits may pile up before the reparses run.
    #[test]
    fn flush_after_a_batch(edits in prop::collection::vec(edit_strategy(), 1..8)) {
        let mut text = BASE.to_owned();
        let mut tree = SyntaxTree::parse(&text);
        for edit in &edits {
            apply(&mut text, &mut tree, edit);
        }
        tree.flush(&text);
        check(&text, &tree)?;
    }

    /// Small budgets interleave suspended reparses with further edits.
    #[test]
    fn chunked_reparse(
        edits in prop::collection::vec(edit_strategy(), 1..8),
        budget in 1usize..64,
    ) {
        let mut text = BASE.to_owned();
        let mut tree = SyntaxTree::parse(&text);
        for edit in &edits {
            apply(&mut text, &mut tree, edit);
            let _ = tree.reparse_step(&text, budget);
            if let Err(err) = tree.check_invariants() {
                return Err(TestCaseError::fail(format!("{err} mid-reparse, text:\n{text}")));
            }
        }
        let mut steps = 0;
        while !matches!(tree.reparse_step(&text, budget), ReparseStep::Idle) {
            if let Err(err) = tree.check_invariants() {
                return Err(TestCaseError::fail(format!("{err} mid-reparse, text:\n{text}")));
            }
            steps += 1;
            prop_assert!(steps < 100_000);
        }
        check(&text, &tree)?;
    }
}

#[test]
fn net_zero_edit_outside_nodes_keeps_ids() {
    let mut text = BASE.to_owned();
    let mut tree = SyntaxTree::parse(&text);
    let before: Vec<_> = tree.children(tree.root()).map(|c| c.id).collect();
    let pos = text.find("interface Shape").unwrap();

    text.insert_str(pos, "\n\n");
    tree.text_inserted(pos, 2);
    tree.flush(&text);
    text.replace_range(pos..pos + 2, "");
    tree.text_removed(pos, 2);
    tree.flush(&text);

    let after: Vec<_> = tree.children(tree.root()).map(|c| c.id).collect();
    assert_eq!(before, after);
    assert_eq!(tree.dump(), SyntaxTree::parse(&text).dump());
}

#[test]
fn rewriting_the_whole_document() {
    let mut text = BASE.to_owned();
    let mut tree = SyntaxTree::parse(&text);
    let len = text.len();
    text.replace_range(.., "class Z { int q; }");
    tree.text_removed(0, len);
    tree.text_inserted(0, text.len());
    tree.flush(&text);
    tree.check_invariants().unwrap();
    assert_eq!(tree.dump(), SyntaxTree::parse(&text).dump());
}

#[test]
fn single_byte_budget_keeps_members_inside_the_body() {
    let mut text = BASE.to_owned();
    let mut tree = SyntaxTree::parse(&text);
    let at = text.find("Mode {").unwrap();
    for (pos, inserted) in [(at, "while (b) {"), (at - 6, ";")] {
        text.insert_str(pos, inserted);
        tree.text_inserted(pos, inserted.len());
        let _ = tree.reparse_step(&text, 1);
        tree.check_invariants().unwrap();
    }
    while !matches!(tree.reparse_step(&text, 1), ReparseStep::Idle) {
        tree.check_invariants().unwrap();
    }
    assert_eq!(tree.dump(), SyntaxTree::parse(&text).dump());
}

#[test]
fn unclosed_statement_at_the_end_of_the_text() {
    let text = "class A { void f() { if (a) {\n";
    let mut tree = SyntaxTree::parse("class A { void f() { } }");
    tree.text_removed(21, 3);
    tree.text_inserted(21, "if (a) {\n".len());
    tree.flush(text);
    tree.check_invariants().unwrap();
    assert_eq!(tree.dump(), SyntaxTree::parse(text).dump());
}
