use pretty_assertions::assert_eq;
use weft_parse::SyntaxTree;

use super::*;
use crate::cache::ResolveCache;
use crate::external::{ClassTable, NoExternal};

fn suggest_with<E: ExternalScope>(src: &str, pos: usize, external: &E) -> Option<CodeSuggestions> {
    let tree = SyntaxTree::parse(src);
    Resolver::new(&tree, src, external, ResolveCache::new()).expression_type(pos)
}

fn suggest(src: &str, pos: usize) -> Option<CodeSuggestions> {
    suggest_with(src, pos, &NoExternal)
}

/// Names offered right after `needle`.
fn names_after<E: ExternalScope>(src: &str, needle: &str, external: &E) -> Vec<String> {
    let pos = src.find(needle).unwrap() + needle.len();
    suggest_with(src, pos, external).unwrap().names
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|&n| n.to_owned()).collect()
}

#[test]
fn nothing_inside_comments_or_literals() {
    let src = "class A { void f() { /* note */ g(\"text\"); // end\n } }";
    assert_eq!(suggest(src, src.find("note").unwrap()), None);
    assert_eq!(suggest(src, src.find("text").unwrap() + 1), None);
    assert_eq!(suggest(src, src.find("// end").unwrap() + 6), None);
    assert!(suggest(src, src.find("\"text\"").unwrap() + 6).is_some());
}

#[test]
fn nothing_outside_a_type_body() {
    let src = "import java.util.List;\nclass A { }";
    assert_eq!(suggest(src, 3), None);
    assert_eq!(suggest(src, src.find("A {").unwrap() + 1), None);
}

#[test]
fn bare_names_visible_in_a_method() {
    let src = "class A { int field; void run(int param) { int early = 1; e; int late = 2; } \
               int other() { return 0; } }";
    let pos = src.find(" e;").unwrap() + 1;
    let found = suggest(src, pos).unwrap();
    assert_eq!(found.names, strings(&["A", "early", "field", "other", "param", "run"]));
    assert_eq!(found.prefix, "");
    assert!(!found.static_only);

    let tree = SyntaxTree::parse(src);
    let owner = Resolver::new(&tree, src, &NoExternal, ResolveCache::new()).resolve_type("A", 0);
    assert_eq!(found.type_context, owner.found());

    let typed = suggest(src, pos + 1).unwrap();
    assert_eq!(typed.prefix, "e");
    assert_eq!(typed.names, strings(&["early"]));
}

#[test]
fn static_methods_only_see_static_members() {
    let src = "class A { int inst; static int shared; void m() { } static void s() { z; } }";
    let found = suggest(src, src.find("z;").unwrap()).unwrap();
    assert!(found.static_only);
    assert_eq!(found.names, strings(&["A", "s", "shared"]));
}

const POINTS: &str = "class P { int x; static int count; void move() { } \
                      static P origin() { return null; } P() { } }\n\
                      class Q { P[] all; void f(P p) { p.; P.; p.mo; all.; } }";

#[test]
fn members_of_a_declared_variable() {
    assert_eq!(
        names_after(POINTS, "p.", &NoExternal),
        strings(&["count", "move", "origin", "x"])
    );
    assert_eq!(names_after(POINTS, "all.", &NoExternal), strings(&["length"]));
}

#[test]
fn type_receivers_offer_static_members() {
    let pos = POINTS.find("P.;").unwrap() + 2;
    let found = suggest(POINTS, pos).unwrap();
    assert!(found.static_only);
    assert_eq!(found.names, strings(&["count", "origin"]));
    assert!(matches!(found.type_context, Some(TypeRef::Declared(_))));
}

#[test]
fn prefix_narrows_members() {
    let pos = POINTS.find("p.mo").unwrap() + 4;
    let found = suggest(POINTS, pos).unwrap();
    assert_eq!(found.prefix, "mo");
    assert_eq!(found.names, strings(&["move"]));
}

#[test]
fn external_members_and_chains() {
    let src = "class A { String s; void f() { s.; System.out.; Math.; java.lang.Math.; } }";
    let classes = ClassTable::java_lang();
    assert_eq!(
        names_after(src, "s.", &classes),
        strings(&["charAt", "format", "indexOf", "isEmpty", "length", "substring", "valueOf"])
    );
    assert_eq!(
        names_after(src, "System.out.", &classes),
        strings(&["flush", "print", "println"])
    );
    assert_eq!(
        names_after(src, " Math.", &classes),
        strings(&["E", "PI", "abs", "max", "min"])
    );
    assert_eq!(
        names_after(src, "java.lang.Math.", &classes),
        strings(&["E", "PI", "abs", "max", "min"])
    );
}

#[test]
fn this_and_super_receivers() {
    let src = "class B { int inherited; } class C extends B { int own; void f() { this.; super.; } }";
    assert_eq!(
        names_after(src, "this.", &NoExternal),
        strings(&["f", "inherited", "own"])
    );
    assert_eq!(names_after(src, "super.", &NoExternal), strings(&["inherited"]));
}

#[test]
fn object_members_are_inherited_when_known() {
    let src = "class A { int n; void f() { this.; } }";
    assert_eq!(
        names_after(src, "this.", &ClassTable::java_lang()),
        strings(&["equals", "f", "getClass", "hashCode", "n", "toString"])
    );
}

#[test]
fn unresolvable_receivers_offer_nothing() {
    let src = "class A { void f() { nope.; g().; } }";
    assert_eq!(suggest(src, src.find("nope.").unwrap() + 5), None);
    assert_eq!(suggest(src, src.find("g().").unwrap() + 4), None);
}
