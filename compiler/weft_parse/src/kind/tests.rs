use super::*;

#[test]
fn sequences_are_the_three_bodies() {
    let sequences: Vec<NodeKind> = ALL.into_iter().filter(|k| k.is_sequence()).collect();
    assert_eq!(
        sequences,
        vec![
            NodeKind::CompilationUnit,
            NodeKind::TypeBody,
            NodeKind::BlockBody
        ]
    );
}

#[test]
fn inner_kinds_grow_forward() {
    for kind in ALL {
        assert_eq!(kind.is_inner(), kind.grows_forward(), "{kind:?}");
    }
}

#[test]
fn comments_are_never_resume_points() {
    assert!(!NodeKind::Comment.is_delimiting());
    assert!(!NodeKind::Comment.marks_own_end());
    assert!(!NodeKind::Selection.is_delimiting());
    assert!(NodeKind::Statement.is_delimiting());
}

#[test]
fn member_scopes_allow_forward_references() {
    assert!(NodeKind::TypeBody.is_forward_visible());
    assert!(!NodeKind::BlockBody.is_forward_visible());
    assert!(!NodeKind::MethodDef.is_forward_visible());
}

#[test]
fn detail_accessors() {
    let detail = NodeDetail::Variable {
        type_name: "int".into(),
        declarators: smallvec::smallvec!["a".into(), "b".into()],
        is_static: true,
        enum_constants: false,
    };
    assert_eq!(detail.declarators(), ["a".to_string(), "b".to_string()]);
    assert!(detail.is_static());
    assert!(NodeDetail::None.type_params().is_empty());
}

const ALL: [NodeKind; 15] = [
    NodeKind::CompilationUnit,
    NodeKind::TypeDef,
    NodeKind::TypeBody,
    NodeKind::MethodDef,
    NodeKind::Param,
    NodeKind::Field,
    NodeKind::Variable,
    NodeKind::BlockBody,
    NodeKind::Block,
    NodeKind::Iteration,
    NodeKind::Selection,
    NodeKind::Statement,
    NodeKind::Expression,
    NodeKind::Comment,
    NodeKind::Import,
];
