//! Value types and limits.
//!
//! `ValueType` is the closed set of types a value can have at this layer.
//! `TypeVector` is the inline-friendly list used for parameter and result
//! lists; most signatures have four or fewer entries.

use std::fmt;

use smallvec::SmallVec;

/// Ordered list of value types (parameters, results, locals).
pub type TypeVector = SmallVec<[ValueType; 4]>;

/// The closed set of value types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// 32-bit integer.
    I32,
    /// 64-bit integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// 128-bit vector.
    V128,
    /// Reference to a function.
    Funcref,
    /// Opaque external reference.
    Externref,
    /// Exception reference.
    Exnref,
}

impl ValueType {
    /// Text name, as written in the surface syntax.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::V128 => "v128",
            ValueType::Funcref => "funcref",
            ValueType::Externref => "externref",
            ValueType::Exnref => "exnref",
        }
    }

    /// True for the reference types.
    pub const fn is_ref(self) -> bool {
        matches!(
            self,
            ValueType::Funcref | ValueType::Externref | ValueType::Exnref
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Size limits for tables and memories.
///
/// `max` is `None` when the entry is unbounded. `shared` marks a memory
/// shared between threads (always carries a `max` in well-formed input,
/// which the validator enforces, not this layer).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Limits {
    pub initial: u64,
    pub max: Option<u64>,
    pub shared: bool,
}

impl Limits {
    /// Limits with an initial size and no maximum.
    pub const fn at_least(initial: u64) -> Self {
        Limits {
            initial,
            max: None,
            shared: false,
        }
    }

    /// Limits with both bounds.
    pub const fn bounded(initial: u64, max: u64) -> Self {
        Limits {
            initial,
            max: Some(max),
            shared: false,
        }
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.initial, max),
            None => write!(f, "{}..", self.initial),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_names() {
        assert_eq!(ValueType::I32.name(), "i32");
        assert_eq!(ValueType::V128.name(), "v128");
        assert_eq!(format!("{}", ValueType::Funcref), "funcref");
    }

    #[test]
    fn value_type_refs() {
        assert!(ValueType::Funcref.is_ref());
        assert!(ValueType::Externref.is_ref());
        assert!(!ValueType::I64.is_ref());
        assert!(!ValueType::V128.is_ref());
    }

    #[test]
    fn type_vector_inline() {
        let v: TypeVector = TypeVector::from_slice(&[ValueType::I32, ValueType::I64]);
        assert_eq!(v.len(), 2);
        assert!(!v.spilled());
    }

    #[test]
    fn limits_display() {
        assert_eq!(format!("{}", Limits::at_least(1)), "1..");
        assert_eq!(format!("{}", Limits::bounded(1, 16)), "1..16");
    }

    #[test]
    fn limits_defaults() {
        let limits = Limits::default();
        assert_eq!(limits.initial, 0);
        assert_eq!(limits.max, None);
        assert!(!limits.shared);
    }
}
