//! Edits and queries through the [`Document`] facade.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use std::io::Write as _;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use weft_parse::{HighlightTag, NodeKind, SyntaxTree};
use weft_resolve::{Entity, Lookup};
use weftc::{load_document, Document, EditError, WeftConfig};

fn top_level(doc: &Document) -> Vec<(NodeKind, usize, usize)> {
    let tree = doc.tree();
    tree.children(tree.root())
        .map(|c| (tree.node(c.id).kind(), c.start, c.end))
        .collect()
}

fn assert_fresh(doc: &Document) {
    assert!(!doc.has_pending());
    doc.tree().check_invariants().unwrap();
    assert_eq!(doc.tree().span(doc.tree().root()).end, doc.text().len());
    assert_eq!(doc.tree().dump(), SyntaxTree::parse(doc.text()).dump());
}

fn variable_start(doc: &mut Document, name: &str, pos: usize) -> Option<usize> {
    match doc.resolve_value(name, pos) {
        Lookup::Found(Entity::Variable(id)) => Some(doc.tree().start(id)),
        _ => None,
    }
}

#[test]
fn typing_inside_a_comment_shifts_its_neighbours() {
    let mut doc = Document::new("class AB{}/*b*//*c*/", WeftConfig::default());
    doc.apply_edit(12, 0, "xyz").unwrap();
    assert_eq!(doc.text(), "class AB{}/*xyzb*//*c*/");
    assert_eq!(
        top_level(&doc),
        vec![
            (NodeKind::TypeDef, 0, 10),
            (NodeKind::Comment, 10, 18),
            (NodeKind::Comment, 18, 23),
        ]
    );
    assert_fresh(&doc);
}

#[test]
fn deleting_across_nodes_reparses_the_tail() {
    let mut doc = Document::new("class AB{}/*b*//*c*//*d*/", WeftConfig::default());
    doc.apply_edit(8, 5, "").unwrap();
    assert_eq!(doc.text(), "class AB*//*c*//*d*/");
    assert_eq!(doc.tree().span(doc.tree().root()).end, 20);
    assert_fresh(&doc);
}

#[test]
fn locals_shadow_fields_from_their_declaration_on() {
    let src = "class A { int x; void f() { x = 1; int x = 2; x = 3; } }";
    let mut doc = Document::new(src, WeftConfig::default());
    let field = src.find("int x;").unwrap();
    let local = src.find("int x = 2").unwrap();
    let before = src.find("x = 1").unwrap();
    let after = src.find("x = 3").unwrap();
    assert_eq!(variable_start(&mut doc, "x", before), Some(field));
    assert_eq!(variable_start(&mut doc, "x", after), Some(local));

    // Deleting the local brings the field back.
    doc.apply_edit(local, "int x = 2; ".len(), "").unwrap();
    let after = doc.text().find("x = 3").unwrap();
    assert_eq!(variable_start(&mut doc, "x", after), Some(field));
}

#[test]
fn rejected_edits_leave_the_document_alone() {
    let mut doc = Document::new("class é {}", WeftConfig::default());
    assert_eq!(
        doc.apply_edit(5, 100, ""),
        Err(EditError::OutOfBounds {
            pos: 5,
            removed: 100,
            len: 11
        })
    );
    assert_eq!(
        doc.apply_edit(7, 0, "x"),
        Err(EditError::NotCharBoundary { offset: 7 })
    );
    assert_eq!(
        doc.apply_edit(6, 1, ""),
        Err(EditError::NotCharBoundary { offset: 7 })
    );
    assert_eq!(doc.text(), "class é {}");
    assert_fresh(&doc);

    doc.apply_edit(6, 2, "e").unwrap();
    assert_eq!(doc.text(), "class e {}");
    assert_eq!(doc.tree().dump()[0].name.as_deref(), Some("e"));
}

#[test]
fn empty_edit_is_a_no_op() {
    let mut doc = Document::new("class A {}", WeftConfig::default());
    let nodes = doc.tree().node_count();
    doc.apply_edit(3, 0, "").unwrap();
    assert_eq!(doc.tree().node_count(), nodes);
    assert_eq!(doc.stats().pieces, 0);
}

#[test]
fn edits_clear_the_resolver_cache() {
    let src = "class A { int x; void f() { x; } }";
    let mut doc = Document::new(src, WeftConfig::default());
    let use_site = src.find("x; }").unwrap();
    assert!(doc.resolve_value("x", use_site).is_found());
    assert!(!doc.cache().is_empty());

    doc.apply_edit(0, 0, " ").unwrap();
    assert!(doc.cache().is_empty());
}

#[test]
fn lazy_documents_reparse_in_steps() {
    let config = WeftConfig {
        reparse_chunk: 4,
        eager_reparse: false,
    };
    let src = "class A { void f() { int a = 1; } }\nclass B { int b; }\n";
    let mut doc = Document::new(src, config);
    let pos = src.find("int a").unwrap();
    doc.apply_edit(pos, 0, "while (a) { a--; } ").unwrap();
    assert!(doc.has_pending());

    let mut steps = 0;
    while doc.has_pending() {
        doc.step();
        steps += 1;
        assert!(steps < 10_000);
    }
    assert_fresh(&doc);
}

#[test]
fn queries_run_pending_reparses() {
    let config = WeftConfig {
        eager_reparse: false,
        ..WeftConfig::default()
    };
    let mut doc = Document::new("class A { int count; void f() { } }", config);
    let pos = doc.text().find("{ }").unwrap() + 1;
    doc.apply_edit(pos, 0, " c").unwrap();
    assert!(doc.has_pending());

    let found = doc.expression_type(pos + 2).unwrap();
    assert!(!doc.has_pending());
    assert_eq!(found.names, vec!["count".to_owned()]);
    assert_eq!(found.prefix, "c");
    assert_fresh(&doc);
}

#[test]
fn tokens_follow_the_edited_text() {
    let mut doc = Document::new("class A { }", WeftConfig::default());
    doc.apply_edit(6, 1, "int").unwrap();
    let runs: Vec<_> = doc.tokens_for(0, 9).map(|t| (t.len, t.tag)).collect();
    assert_eq!(
        runs,
        vec![
            (5, HighlightTag::KeywordSecondary),
            (1, HighlightTag::Default),
            (3, HighlightTag::PrimitiveType),
            (0, HighlightTag::End),
        ]
    );
}

#[test]
fn documents_load_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "class Loaded {{ }}").unwrap();
    let doc = load_document(file.path(), WeftConfig::default()).unwrap();
    assert_eq!(doc.text(), "class Loaded { }");
    assert_eq!(doc.tree().dump()[0].name.as_deref(), Some("Loaded"));

    let dir = tempfile::tempdir().unwrap();
    let missing = load_document(dir.path().join("Missing.java"), WeftConfig::default());
    assert_eq!(missing.err().map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
}

const BASE: &str = "import java.util.List;\n\
class Shape { int sides; static int count; Shape(int n) { sides = n; } }\n\
class Square extends Shape {\n\
    Shape inner;\n\
    void grow(int by) {\n\
        int next = sides + by;\n\
        for (int i = 0; i < next; i++) { inner. }\n\
        String name = \"sq\"; name.\n\
    }\n\
    static void make() { Square. }\n\
}\n";

const FRAGMENTS: &[&str] = &[
    "", " ", "\n", "{", "}", ";", "(", ")", ".", "x", "int y = 1;", "inner.", "this.",
    "class C { int z; }", "void m() {", "/*", "*/", "\"", "static ", "Shape s; s.",
];

#[derive(Clone, Debug)]
struct RandomEdit {
    pos: prop::sample::Index,
    removed: usize,
    inserted: &'static str,
}

fn edit_strategy() -> impl Strategy<Value = RandomEdit> {
    (
        any::<prop::sample::Index>(),
        prop_oneof![Just(0usize), 1usize..4, 4usize..30],
        prop::sample::select(FRAGMENTS),
    )
        .prop_map(|(pos, removed, inserted)| RandomEdit {
            pos,
            removed,
            inserted,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 2000,
        ..ProptestConfig::default()
    })]

    /// An edited document answers every query the way a freshly opened
    /// copy of the same text does.
    #[test]
    fn edited_documents_match_fresh_ones(
        edits in prop::collection::vec(edit_strategy(), 1..10),
        queries in prop::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        let mut doc = Document::new(BASE, WeftConfig::default());
        for edit in &edits {
            let pos = edit.pos.index(doc.text().len() + 1);
            let removed = edit.removed.min(doc.text().len() - pos);
            doc.apply_edit(pos, removed, edit.inserted).unwrap();
        }
        prop_assert_eq!(doc.tree().dump(), SyntaxTree::parse(doc.text()).dump(), "text:\n{}", doc.text());

        let mut fresh = Document::new(doc.text().to_owned(), WeftConfig::default());
        for query in &queries {
            let pos = query.index(doc.text().len() + 1);
            let edited = doc.expression_type(pos).map(|s| (s.names, s.prefix, s.static_only));
            let expected = fresh.expression_type(pos).map(|s| (s.names, s.prefix, s.static_only));
            prop_assert_eq!(edited, expected, "pos {} in:\n{}", pos, doc.text());
        }
    }
}
