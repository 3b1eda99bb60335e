//! Focused seam traits.
//!
//! Each trait provides one capability, so consumers depend only on what
//! they use.

use crate::Span;

/// Trait for types that have a source location span.
pub trait Spanned {
    /// Get the source location span.
    fn span(&self) -> Span;
}

/// Trait for entities addressable by name in some namespace.
///
/// The empty string means "unnamed"; unnamed entities are reachable only
/// by index.
pub trait Named {
    /// Get the name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Func, Span, Var};

    #[test]
    fn spanned_via_dyn() {
        let var = Var::index(0, Span::new(4, 9));
        let spanned: &dyn Spanned = &var;
        assert_eq!(spanned.span(), Span::new(4, 9));
    }

    #[test]
    fn named_entities() {
        let func = Func::new("$f");
        assert_eq!(func.name(), "$f");

        let anon = Func::new("");
        assert_eq!(anon.name(), "");
    }
}
