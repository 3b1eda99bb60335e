//! Dual index-or-name references.
//!
//! A `Var` is how one IR node points at another before resolution has run:
//! the producer writes down either the dense index it already knows, or the
//! symbolic name it saw in the source. Exactly one of the two is live at any
//! time; a resolver may rewrite a name into an index in place.

use std::fmt;

use crate::{Span, Spanned};

/// The live payload of a [`Var`].
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum VarKind {
    /// A resolved dense index into some namespace.
    Index(u32),
    /// An unresolved symbolic name. Non-empty by construction convention;
    /// this layer does not reject empty names (validator concern).
    Name(String),
}

/// A reference to an entity in some namespace, by index or by name.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Var {
    pub span: Span,
    kind: VarKind,
}

impl Var {
    /// Create an index-form reference.
    pub const fn index(index: u32, span: Span) -> Self {
        Var {
            span,
            kind: VarKind::Index(index),
        }
    }

    /// Create a name-form reference.
    pub fn name(name: impl Into<String>, span: Span) -> Self {
        Var {
            span,
            kind: VarKind::Name(name.into()),
        }
    }

    /// The current discriminant and payload.
    pub const fn kind(&self) -> &VarKind {
        &self.kind
    }

    /// True if this reference currently holds an index.
    pub const fn is_index(&self) -> bool {
        matches!(self.kind, VarKind::Index(_))
    }

    /// True if this reference currently holds a name.
    pub const fn is_name(&self) -> bool {
        matches!(self.kind, VarKind::Name(_))
    }

    /// The index payload, or `None` if this is a name-form reference.
    pub const fn as_index(&self) -> Option<u32> {
        match self.kind {
            VarKind::Index(index) => Some(index),
            VarKind::Name(_) => None,
        }
    }

    /// The name payload, or `None` if this is an index-form reference.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            VarKind::Index(_) => None,
            VarKind::Name(name) => Some(name),
        }
    }

    /// Rewrite in place to index form, discarding any name payload.
    pub fn set_index(&mut self, index: u32) {
        self.kind = VarKind::Index(index);
    }

    /// Rewrite in place to name form, discarding any index payload.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.kind = VarKind::Name(name.into());
    }
}

impl Spanned for Var {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            VarKind::Index(index) => write!(f, "Var({index})"),
            VarKind::Name(name) => write!(f, "Var({name:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let var = Var::index(5, Span::DUMMY);
        assert!(var.is_index());
        assert_eq!(var.as_index(), Some(5));
        assert_eq!(var.as_name(), None);
    }

    #[test]
    fn name_round_trip() {
        let var = Var::name("$main", Span::new(3, 8));
        assert!(var.is_name());
        assert_eq!(var.as_name(), Some("$main"));
        assert_eq!(var.as_index(), None);
        assert_eq!(var.span, Span::new(3, 8));
    }

    #[test]
    fn rewrite_discards_old_payload() {
        let mut var = Var::name("f", Span::DUMMY);
        var.set_index(2);
        assert!(var.is_index());
        assert_eq!(var.as_index(), Some(2));
        // The prior form's accessor fails its kind check.
        assert_eq!(var.as_name(), None);

        var.set_name("g");
        assert_eq!(var.as_index(), None);
        assert_eq!(var.as_name(), Some("g"));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Var::index(1, Span::DUMMY), Var::index(1, Span::DUMMY));
        assert_ne!(Var::index(1, Span::DUMMY), Var::index(2, Span::DUMMY));
        assert_ne!(
            Var::index(1, Span::DUMMY),
            Var::name("1", Span::DUMMY)
        );
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Var::index(7, Span::DUMMY)), "Var(7)");
        assert_eq!(
            format!("{:?}", Var::name("tbl", Span::DUMMY)),
            "Var(\"tbl\")"
        );
    }
}
