//! Plain-text reports printed by the `weft` command.

use std::fmt::Write;

use weft_parse::SyntaxTree;
use weft_resolve::TypeRef;

use crate::document::Document;
use crate::edit::{Edit, EditError};

/// One line per highlight run: `start..end Tag`.
pub fn tokens(doc: &mut Document, pos: usize, len: usize) -> String {
    let mut at = pos.min(doc.text().len());
    let mut out = String::new();
    for run in doc.tokens_for(pos, len) {
        let _ = writeln!(out, "{at:>6}..{:<6} {:?}", at + run.len, run.tag);
        at += run.len;
    }
    out
}

/// The node outline, indented by depth.
pub fn tree(doc: &Document) -> String {
    let mut out = String::new();
    for node in doc.tree().dump() {
        let _ = write!(
            out,
            "{:indent$}{:?} {}..{}",
            "",
            node.kind,
            node.start,
            node.end,
            indent = node.depth * 2
        );
        if let Some(name) = &node.name {
            let _ = write!(out, " {name}");
        }
        if !node.complete {
            out.push_str(" (incomplete)");
        }
        if node.doc_comment {
            out.push_str(" (documented)");
        }
        out.push('\n');
    }
    out
}

/// Completion candidates at `pos`.
pub fn complete(doc: &mut Document, pos: usize) -> String {
    let Some(found) = doc.expression_type(pos) else {
        return format!("no suggestions at {pos}\n");
    };
    let mut out = String::new();
    if let Some(ty) = &found.type_context {
        let _ = writeln!(out, "context: {}", describe_type(doc.tree(), ty));
    }
    if found.static_only {
        out.push_str("static only\n");
    }
    if !found.prefix.is_empty() {
        let _ = writeln!(out, "prefix: {}", found.prefix);
    }
    for name in &found.names {
        let _ = writeln!(out, "  {name}");
    }
    out
}

/// Apply `edits` one by one, then report what the reparses did and
/// whether the result agrees with parsing the final text from scratch.
pub fn replay(doc: &mut Document, edits: &[Edit]) -> Result<String, EditError> {
    for edit in edits {
        doc.apply(edit)?;
        if !doc.config().eager_reparse {
            doc.step();
        }
    }
    doc.flush();
    let stats = doc.stats();
    let consistent = doc.tree().dump() == SyntaxTree::parse(doc.text()).dump();
    let mut out = String::new();
    let _ = writeln!(out, "edits:        {}", edits.len());
    let _ = writeln!(out, "pieces:       {}", stats.pieces);
    let _ = writeln!(out, "created:      {}", stats.created_nodes);
    let _ = writeln!(out, "destroyed:    {}", stats.destroyed_nodes);
    let _ = writeln!(out, "splices:      {} ({} children)", stats.splices, stats.reused_children);
    let _ = writeln!(out, "suspensions:  {}", stats.suspensions);
    let _ = writeln!(out, "grown/shrunk: {}/{}", stats.grown, stats.shrunk);
    let _ = writeln!(out, "reuse rate:   {:.1}%", stats.reuse_rate());
    let _ = writeln!(out, "consistent:   {}", if consistent { "yes" } else { "no" });
    Ok(out)
}

fn describe_type(tree: &SyntaxTree, ty: &TypeRef) -> String {
    match ty {
        TypeRef::Declared(id) => tree
            .get(*id)
            .and_then(|node| node.name())
            .unwrap_or("<anonymous>")
            .to_owned(),
        TypeRef::External(qualified) => qualified.clone(),
        TypeRef::Parameter { name, .. } => name.clone(),
        TypeRef::Primitive(name) => (*name).to_owned(),
        TypeRef::Array(inner) => format!("{}[]", describe_type(tree, inner)),
    }
}
