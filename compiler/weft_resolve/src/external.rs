//! Types that live outside the document.

use rustc_hash::FxHashMap;

/// What a member of an external type is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
    Type,
}

/// A member of an external type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalMember {
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
    /// Declared type of a field, qualified unless primitive.
    pub type_name: Option<String>,
}

impl ExternalMember {
    pub fn field(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        ExternalMember {
            name: name.into(),
            kind: MemberKind::Field,
            is_static: false,
            type_name: Some(type_name.into()),
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        ExternalMember {
            name: name.into(),
            kind: MemberKind::Method,
            is_static: false,
            type_name: None,
        }
    }

    /// A nested type; always reachable statically.
    pub fn nested_type(name: impl Into<String>) -> Self {
        ExternalMember {
            name: name.into(),
            kind: MemberKind::Type,
            is_static: true,
            type_name: None,
        }
    }

    #[must_use]
    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Everything the resolver knows beyond the document: libraries, other
/// files of the project.
pub trait ExternalScope {
    /// Whether a fully qualified type name exists.
    fn has_type(&self, qualified: &str) -> bool;

    /// Members of a fully qualified type, in no particular order.
    fn members(&self, qualified: &str) -> Vec<ExternalMember> {
        let _ = qualified;
        Vec::new()
    }
}

/// Knows nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoExternal;

impl ExternalScope for NoExternal {
    fn has_type(&self, _qualified: &str) -> bool {
        false
    }
}

/// An in-memory table of external types.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: FxHashMap<String, Vec<ExternalMember>>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(
        &mut self,
        qualified: impl Into<String>,
        members: impl IntoIterator<Item = ExternalMember>,
    ) {
        self.classes
            .entry(qualified.into())
            .or_default()
            .extend(members);
    }

    #[must_use]
    pub fn with_class(
        mut self,
        qualified: impl Into<String>,
        members: impl IntoIterator<Item = ExternalMember>,
    ) -> Self {
        self.add_class(qualified, members);
        self
    }

    /// A handful of `java.lang` classes, enough for the command line tool
    /// and examples.
    pub fn java_lang() -> Self {
        ClassTable::new()
            .with_class(
                "java.lang.Object",
                [
                    ExternalMember::method("equals"),
                    ExternalMember::method("hashCode"),
                    ExternalMember::method("toString"),
                    ExternalMember::method("getClass"),
                ],
            )
            .with_class(
                "java.lang.String",
                [
                    ExternalMember::method("length"),
                    ExternalMember::method("charAt"),
                    ExternalMember::method("isEmpty"),
                    ExternalMember::method("substring"),
                    ExternalMember::method("indexOf"),
                    ExternalMember::method("valueOf").into_static(),
                    ExternalMember::method("format").into_static(),
                ],
            )
            .with_class(
                "java.lang.Math",
                [
                    ExternalMember::field("PI", "double").into_static(),
                    ExternalMember::field("E", "double").into_static(),
                    ExternalMember::method("abs").into_static(),
                    ExternalMember::method("max").into_static(),
                    ExternalMember::method("min").into_static(),
                ],
            )
            .with_class(
                "java.lang.Integer",
                [
                    ExternalMember::field("MAX_VALUE", "int").into_static(),
                    ExternalMember::field("MIN_VALUE", "int").into_static(),
                    ExternalMember::method("parseInt").into_static(),
                    ExternalMember::method("intValue"),
                ],
            )
            .with_class(
                "java.lang.System",
                [
                    ExternalMember::field("out", "java.io.PrintStream").into_static(),
                    ExternalMember::field("err", "java.io.PrintStream").into_static(),
                    ExternalMember::method("currentTimeMillis").into_static(),
                ],
            )
            .with_class(
                "java.io.PrintStream",
                [
                    ExternalMember::method("print"),
                    ExternalMember::method("println"),
                    ExternalMember::method("flush"),
                ],
            )
    }
}

impl ExternalScope for ClassTable {
    fn has_type(&self, qualified: &str) -> bool {
        self.classes.contains_key(qualified)
    }

    fn members(&self, qualified: &str) -> Vec<ExternalMember> {
        self.classes.get(qualified).cloned().unwrap_or_default()
    }
}
