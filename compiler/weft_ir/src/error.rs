//! Lookup failure types.
//!
//! All core operations are synchronous and report failure through these
//! values. Variant-kind misuse (reading the wrong payload out of a closed
//! enum) is a precondition violation, not an error here; exhaustive `match`
//! makes it unrepresentable.

use thiserror::Error;

/// Failure of a reference lookup against a namespace.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LookupError {
    /// A name-form reference has no entry in the namespace's binding map.
    /// Never silently mapped to index 0.
    #[error("undefined {space} {name:?}")]
    NotFound { space: &'static str, name: String },

    /// A resolved index exceeds the namespace's current size. Only
    /// detectable at lookup time; index-form references are not validated
    /// at construction.
    #[error("{space} index {index} out of range (have {len})")]
    OutOfRange {
        space: &'static str,
        index: u32,
        len: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = LookupError::NotFound {
            space: "func",
            name: "$main".to_string(),
        };
        assert_eq!(format!("{err}"), "undefined func \"$main\"");

        let err = LookupError::OutOfRange {
            space: "table",
            index: 9,
            len: 2,
        };
        assert_eq!(format!("{err}"), "table index 9 out of range (have 2)");
    }
}
