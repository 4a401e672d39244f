use pretty_assertions::assert_eq;

use super::*;
use crate::syntax_tree::Span;

/// Text and tree kept in step.
struct Doc {
    text: String,
    tree: SyntaxTree,
}

impl Doc {
    fn new(src: &str) -> Self {
        Doc {
            text: src.to_owned(),
            tree: SyntaxTree::parse(src),
        }
    }

    fn edit(&mut self, pos: usize, removed: usize, inserted: &str) {
        self.text.replace_range(pos..pos + removed, inserted);
        self.tree.text_removed(pos, removed);
        self.tree.text_inserted(pos, inserted.len());
    }

    fn step(&mut self, budget: usize) -> ReparseStep {
        self.tree.reparse_step(&self.text, budget)
    }

    fn flush(&mut self) {
        self.tree.flush(&self.text);
    }

    /// The incremental tree matches a parse from scratch.
    fn assert_fresh(&self) {
        self.tree.check_invariants().unwrap();
        assert_eq!(self.tree.dump(), SyntaxTree::parse(&self.text).dump());
    }

    fn find(&self, kind: NodeKind, name: Option<&str>) -> NodeId {
        let mut stack = vec![self.tree.root()];
        while let Some(id) = stack.pop() {
            let node = self.tree.node(id);
            if node.kind() == kind && (name.is_none() || node.name() == name) {
                return id;
            }
            stack.extend(self.tree.children(id).map(|c| c.id));
        }
        panic!("no {kind:?} {name:?}");
    }

    fn statements(&self, block: NodeId) -> Vec<NodeId> {
        self.tree.children(block).map(|c| c.id).collect()
    }
}

// Offsets:                0         1         2         3         4
//                         01234567890123456789012345678901234567890123456789
const THREE: &str = "class A { void f() { a(); b(); c(); } void g() {} }";

#[test]
fn inserted_statement_splices_the_rest_back() {
    let mut doc = Doc::new(THREE);
    let block = doc.tree.innermost_at(20);
    let old = doc.statements(block);
    let g = doc.find(NodeKind::MethodDef, Some("g"));
    let created = doc.tree.stats().created_nodes;

    doc.edit(26, 0, "x(); ");
    assert_eq!(
        doc.step(usize::MAX),
        ReparseStep::Finished {
            node: block,
            change: NodeChange::Ok
        }
    );

    let now = doc.statements(block);
    assert_eq!(now.len(), 4);
    assert_eq!(now[0], old[0]);
    assert_eq!(&now[2..], &old[1..]);
    assert_eq!(doc.tree.span(old[1]), Span { start: 31, end: 35 });
    assert!(doc.tree.is_live(g));
    assert_eq!(doc.tree.stats().splices, 1);
    // The new statement and its expression.
    assert_eq!(doc.tree.stats().created_nodes - created, 2);
    doc.assert_fresh();
}

#[test]
fn deleted_statement_rejoins_without_parsing() {
    let mut doc = Doc::new(THREE);
    let block = doc.tree.innermost_at(20);
    let old = doc.statements(block);
    let pieces = doc.tree.stats().pieces;

    doc.edit(26, 5, "");
    doc.flush();

    assert_eq!(doc.statements(block), vec![old[0], old[2]]);
    assert_eq!(doc.tree.stats().pieces, pieces);
    doc.assert_fresh();
}

#[test]
fn renamed_field_updates_declarations() {
    let mut doc = Doc::new("class A { int count; }");
    doc.edit(19, 0, "er");
    doc.flush();

    let body = doc.find(NodeKind::TypeBody, None);
    assert!(doc.tree.node(body).decls_named("count").is_empty());
    assert_eq!(doc.tree.node(body).decls_named("counter").len(), 1);
    doc.assert_fresh();
}

#[test]
fn inserted_brace_shrinks_the_body() {
    // Offsets:  0         1         2         3
    //           0123456789012345678901234567890123
    let mut doc = Doc::new("class A { void f() { a(); b(); } }");
    let block = doc.tree.innermost_at(20);

    doc.edit(25, 0, "}");
    assert_eq!(
        doc.step(usize::MAX),
        ReparseStep::Finished {
            node: block,
            change: NodeChange::Shrunk {
                old_end: 32,
                new_end: 25
            }
        }
    );
    assert_eq!(doc.tree.end(doc.find(NodeKind::MethodDef, Some("f"))), 26);
    doc.flush();
    doc.assert_fresh();
}

#[test]
fn shrunk_body_lets_the_owner_parse_the_gap() {
    let mut doc = Doc::new("class A { void f() { a(); b(); } }");
    let members = doc.find(NodeKind::TypeBody, None);
    let f = doc.find(NodeKind::MethodDef, Some("f"));

    doc.edit(25, 0, "}");
    assert!(matches!(
        doc.step(usize::MAX),
        ReparseStep::Finished {
            change: NodeChange::Shrunk { .. },
            ..
        }
    ));
    // `b();` now sits in the type body, right after the method.
    let starts: Vec<_> = doc.tree.children(members).map(|c| (c.id, c.start)).collect();
    assert_eq!(starts[0], (f, 10));
    assert_eq!(starts[1].1, 27);
    assert_eq!(doc.tree.end(f), 26);
    assert!(doc.tree.node(f).is_complete());
    doc.flush();
    doc.assert_fresh();
}

#[test]
fn opened_block_swallows_following_members() {
    // Offsets:  0         1         2         3         4
    //           01234567890123456789012345678901234567890
    let mut doc = Doc::new("class A { void f() { a(); } void g() {} }");
    let block = doc.tree.innermost_at(20);
    let g = doc.find(NodeKind::MethodDef, Some("g"));

    doc.edit(21, 0, "{ ");
    let step = doc.step(usize::MAX);
    assert!(matches!(
        step,
        ReparseStep::Finished {
            change: NodeChange::Grew { old_end: 28, new_end: 42 },
            ..
        }
    ));
    assert!(!doc.tree.is_live(g));
    assert!(doc.tree.is_live(block));
    let class = doc.find(NodeKind::TypeDef, Some("A"));
    assert!(!doc.tree.node(class).is_complete());
    assert!(doc.tree.stats().grown >= 2);
    doc.assert_fresh();
}

#[test]
fn removing_a_method_brace_reparses_the_type_body() {
    let mut doc = Doc::new("class A { void f() { a(); } void g() { b(); } }");
    doc.edit(26, 1, "");
    doc.flush();
    doc.assert_fresh();
}

#[test]
fn brace_inside_a_statement_rebuilds_it() {
    // Offsets:  0         1         2         3
    //           0123456789012345678901234567890123456
    let src = "class A { void f() { if (x) { a(); } b(); } int y; }";
    let mut doc = Doc::new(src);

    doc.edit(34, 0, "}");
    doc.flush();
    doc.assert_fresh();
}

#[test]
fn doc_comment_flag_follows_edits() {
    let mut doc = Doc::new("class A { int x; }");
    let field = doc.find(NodeKind::Field, None);

    doc.edit(10, 0, "/** d */ ");
    doc.flush();
    assert!(doc.tree.is_live(field));
    assert!(doc.tree.node(field).has_doc_comment());
    doc.assert_fresh();

    doc.edit(10, 9, "");
    doc.flush();
    assert!(doc.tree.is_live(field));
    assert!(!doc.tree.node(field).has_doc_comment());
    doc.assert_fresh();
}

#[test]
fn enum_constants_are_not_reused_out_of_place() {
    let mut doc = Doc::new("enum E { A, B; int v; }");
    doc.edit(9, 6, "");
    doc.flush();
    doc.assert_fresh();

    doc.edit(9, 0, "C; ");
    doc.flush();
    doc.assert_fresh();
}

#[test]
fn unterminated_comment_runs_to_the_end() {
    let mut doc = Doc::new("class A { void f() { a(); } int y; }");
    doc.edit(21, 0, "/* ");
    doc.flush();
    doc.assert_fresh();

    doc.edit(21, 3, "");
    doc.flush();
    doc.assert_fresh();
}

#[test]
fn small_budget_suspends_and_resumes() {
    let mut doc = Doc::new("class A { void f() { } }");
    let block = doc.tree.innermost_at(20);
    doc.edit(21, 0, &"a(); ".repeat(50));

    let first = doc.step(20);
    assert!(matches!(first, ReparseStep::Suspended(r) if r.node == block));
    doc.tree.check_invariants().unwrap();

    let mut steps = 1;
    while !matches!(doc.step(20), ReparseStep::Idle) {
        steps += 1;
        assert!(steps < 100, "reparse does not converge");
    }
    assert!(doc.tree.stats().suspensions > 1);
    assert_eq!(doc.statements(block).len(), 50);
    doc.assert_fresh();
}

#[test]
fn edits_while_suspended_are_merged() {
    let mut doc = Doc::new("class A { void f() { } int z; }");
    doc.edit(21, 0, &"a(); ".repeat(20));
    assert!(matches!(doc.step(10), ReparseStep::Suspended(_)));

    doc.edit(22, 0, "b");
    let tail = doc.text.len() - 2;
    doc.edit(tail, 0, " int w;");
    doc.flush();
    doc.assert_fresh();
}

#[test]
fn edit_before_the_suspension_point_still_parses_the_tail() {
    let mut doc = Doc::new("class A { void f() { } }");
    let block = doc.tree.innermost_at(20);
    doc.edit(21, 0, &"a(); ".repeat(20));
    let ReparseStep::Suspended(continuation) = doc.step(10) else {
        panic!("expected a suspension");
    };
    assert!(continuation.reuse_after >= continuation.resume_at);

    // Lands inside a statement the suspended pass already built.
    doc.edit(22, 0, "b");
    doc.flush();
    assert_eq!(doc.statements(block).len(), 20);
    doc.assert_fresh();
}

#[test]
fn no_suspension_while_children_overrun_the_body() {
    let mut doc = Doc::new("class A { void f() { a(); } void g() { b(); } }");
    doc.edit(21, 0, "while (x) { ");
    let mut steps = 0;
    loop {
        let step = doc.step(1);
        doc.tree.check_invariants().unwrap();
        if matches!(step, ReparseStep::Idle) {
            break;
        }
        steps += 1;
        assert!(steps < 100, "reparse does not converge");
    }
    doc.assert_fresh();

    let pos = doc.text.find("b();").unwrap();
    doc.edit(pos, 0, ";");
    while !matches!(doc.step(1), ReparseStep::Idle) {
        doc.tree.check_invariants().unwrap();
    }
    doc.assert_fresh();
}

#[test]
fn requests_for_destroyed_nodes_are_dropped() {
    let mut doc = Doc::new("class A { void f() { a(); } }");
    doc.edit(22, 0, "b");
    assert!(doc.tree.has_pending());
    // Removing the whole class destroys the scheduled body.
    let len = doc.text.len();
    doc.edit(0, len, "");
    assert_eq!(doc.tree.pending_requests().count(), 1);
    doc.flush();
    assert!(doc.tree.dump().is_empty());
    doc.assert_fresh();
}

#[test]
fn many_edits_then_one_flush() {
    let mut doc = Doc::new(THREE);
    doc.edit(48, 0, " q();");
    doc.edit(31, 4, "int k = 2;");
    doc.edit(0, 0, "import a.b;\n");
    doc.edit(10, 0, "// x\n");
    doc.flush();
    doc.assert_fresh();
}
