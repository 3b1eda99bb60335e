//! Bit-exact typed literal values.
//!
//! Floats are stored as raw bit patterns, never as `f32`/`f64`, so that NaN
//! payloads and signed zero survive a round trip through the IR unchanged
//! (and so `Const` can implement `Eq` and `Hash`).

use std::fmt;

use crate::{Span, Spanned, ValueType};

/// The payload of a [`Const`], tagged by value type.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum ConstKind {
    /// 32-bit integer.
    I32(u32),
    /// 64-bit integer.
    I64(u64),
    /// 32-bit float, as raw bits.
    F32(u32),
    /// 64-bit float, as raw bits.
    F64(u64),
    /// 128-bit vector, as 16 little-endian bytes.
    V128([u8; 16]),
    /// Reference value, as opaque bits. Interpretation belongs to the
    /// consumer (interpreter); this layer only carries it.
    Ref(u64),
}

/// A typed literal constant.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Const {
    pub span: Span,
    pub kind: ConstKind,
}

impl Const {
    /// 32-bit integer constant.
    pub const fn i32(value: u32, span: Span) -> Self {
        Const {
            span,
            kind: ConstKind::I32(value),
        }
    }

    /// 64-bit integer constant.
    pub const fn i64(value: u64, span: Span) -> Self {
        Const {
            span,
            kind: ConstKind::I64(value),
        }
    }

    /// 32-bit float constant from raw bits.
    pub const fn f32_bits(bits: u32, span: Span) -> Self {
        Const {
            span,
            kind: ConstKind::F32(bits),
        }
    }

    /// 64-bit float constant from raw bits.
    pub const fn f64_bits(bits: u64, span: Span) -> Self {
        Const {
            span,
            kind: ConstKind::F64(bits),
        }
    }

    /// 128-bit vector constant.
    pub const fn v128(bytes: [u8; 16], span: Span) -> Self {
        Const {
            span,
            kind: ConstKind::V128(bytes),
        }
    }

    /// Reference constant from opaque bits.
    pub const fn ref_bits(bits: u64, span: Span) -> Self {
        Const {
            span,
            kind: ConstKind::Ref(bits),
        }
    }

    /// The value type matching this constant's tag.
    ///
    /// `Ref` payloads report `Funcref`; the precise reference type is a
    /// validator refinement.
    pub const fn ty(&self) -> ValueType {
        match self.kind {
            ConstKind::I32(_) => ValueType::I32,
            ConstKind::I64(_) => ValueType::I64,
            ConstKind::F32(_) => ValueType::F32,
            ConstKind::F64(_) => ValueType::F64,
            ConstKind::V128(_) => ValueType::V128,
            ConstKind::Ref(_) => ValueType::Funcref,
        }
    }
}

impl Spanned for Const {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Debug for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConstKind::I32(v) => write!(f, "i32:{v}"),
            ConstKind::I64(v) => write!(f, "i64:{v}"),
            ConstKind::F32(bits) => write!(f, "f32:0x{bits:08x}"),
            ConstKind::F64(bits) => write!(f, "f64:0x{bits:016x}"),
            ConstKind::V128(bytes) => {
                write!(f, "v128:0x")?;
                for byte in bytes.iter().rev() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            ConstKind::Ref(bits) => write!(f, "ref:0x{bits:x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_types() {
        assert_eq!(Const::i32(0, Span::DUMMY).ty(), ValueType::I32);
        assert_eq!(Const::i64(0, Span::DUMMY).ty(), ValueType::I64);
        assert_eq!(Const::f32_bits(0, Span::DUMMY).ty(), ValueType::F32);
        assert_eq!(Const::f64_bits(0, Span::DUMMY).ty(), ValueType::F64);
        assert_eq!(Const::v128([0; 16], Span::DUMMY).ty(), ValueType::V128);
    }

    #[test]
    fn nan_payload_preserved() {
        // A NaN with a nonstandard payload; storing through f32 would be
        // allowed to quiet it, storing bits is exact.
        let bits = 0x7fc0_1234;
        let c = Const::f32_bits(bits, Span::DUMMY);
        let ConstKind::F32(stored) = c.kind else {
            panic!("expected F32 payload");
        };
        assert_eq!(stored, bits);
        assert!(f32::from_bits(stored).is_nan());
    }

    #[test]
    fn negative_zero_distinct_from_zero() {
        let pos = Const::f64_bits(0f64.to_bits(), Span::DUMMY);
        let neg = Const::f64_bits((-0f64).to_bits(), Span::DUMMY);
        assert_ne!(pos, neg);
    }

    #[test]
    fn no_cross_tag_equality() {
        // Same bits, different tag: never equal.
        assert_ne!(
            Const::i32(1, Span::DUMMY),
            Const::f32_bits(1, Span::DUMMY)
        );
    }

    #[test]
    fn v128_debug_is_big_endian_hex() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0xff;
        let c = Const::v128(bytes, Span::DUMMY);
        assert_eq!(format!("{c:?}"), "v128:0x000000000000000000000000000000ff");
    }
}
