//! The closed opcode set.
//!
//! Opcode-only instructions (unary, binary, compare, convert, ternary) and
//! the memory-access and SIMD instruction families select their exact
//! operation through an `Opcode`. The IR does not interpret opcodes; it only
//! carries them and can print their mnemonic.

/// Defines `Opcode` and its mnemonic table in one place so the two cannot
/// drift apart.
macro_rules! opcodes {
    ($($variant:ident => $mnemonic:literal,)+) => {
        /// An exact operation, named by its surface mnemonic.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        pub enum Opcode {
            $($variant,)+
        }

        impl Opcode {
            /// Text mnemonic, as written in the surface syntax.
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $mnemonic,)+
                }
            }
        }
    };
}

opcodes! {
    // i32 unary / test
    I32Clz => "i32.clz",
    I32Ctz => "i32.ctz",
    I32Popcnt => "i32.popcnt",
    I32Eqz => "i32.eqz",
    // i32 binary
    I32Add => "i32.add",
    I32Sub => "i32.sub",
    I32Mul => "i32.mul",
    I32DivS => "i32.div_s",
    I32DivU => "i32.div_u",
    I32RemS => "i32.rem_s",
    I32RemU => "i32.rem_u",
    I32And => "i32.and",
    I32Or => "i32.or",
    I32Xor => "i32.xor",
    I32Shl => "i32.shl",
    I32ShrS => "i32.shr_s",
    I32ShrU => "i32.shr_u",
    I32Rotl => "i32.rotl",
    I32Rotr => "i32.rotr",
    // i32 compare
    I32Eq => "i32.eq",
    I32Ne => "i32.ne",
    I32LtS => "i32.lt_s",
    I32LtU => "i32.lt_u",
    I32GtS => "i32.gt_s",
    I32GtU => "i32.gt_u",
    I32LeS => "i32.le_s",
    I32LeU => "i32.le_u",
    I32GeS => "i32.ge_s",
    I32GeU => "i32.ge_u",
    // i64 unary / test
    I64Clz => "i64.clz",
    I64Ctz => "i64.ctz",
    I64Popcnt => "i64.popcnt",
    I64Eqz => "i64.eqz",
    // i64 binary
    I64Add => "i64.add",
    I64Sub => "i64.sub",
    I64Mul => "i64.mul",
    I64DivS => "i64.div_s",
    I64DivU => "i64.div_u",
    I64RemS => "i64.rem_s",
    I64RemU => "i64.rem_u",
    I64And => "i64.and",
    I64Or => "i64.or",
    I64Xor => "i64.xor",
    I64Shl => "i64.shl",
    I64ShrS => "i64.shr_s",
    I64ShrU => "i64.shr_u",
    I64Rotl => "i64.rotl",
    I64Rotr => "i64.rotr",
    // i64 compare
    I64Eq => "i64.eq",
    I64Ne => "i64.ne",
    I64LtS => "i64.lt_s",
    I64LtU => "i64.lt_u",
    I64GtS => "i64.gt_s",
    I64GtU => "i64.gt_u",
    I64LeS => "i64.le_s",
    I64LeU => "i64.le_u",
    I64GeS => "i64.ge_s",
    I64GeU => "i64.ge_u",
    // f32 unary
    F32Abs => "f32.abs",
    F32Neg => "f32.neg",
    F32Ceil => "f32.ceil",
    F32Floor => "f32.floor",
    F32Trunc => "f32.trunc",
    F32Nearest => "f32.nearest",
    F32Sqrt => "f32.sqrt",
    // f32 binary
    F32Add => "f32.add",
    F32Sub => "f32.sub",
    F32Mul => "f32.mul",
    F32Div => "f32.div",
    F32Min => "f32.min",
    F32Max => "f32.max",
    F32Copysign => "f32.copysign",
    // f32 compare
    F32Eq => "f32.eq",
    F32Ne => "f32.ne",
    F32Lt => "f32.lt",
    F32Gt => "f32.gt",
    F32Le => "f32.le",
    F32Ge => "f32.ge",
    // f64 unary
    F64Abs => "f64.abs",
    F64Neg => "f64.neg",
    F64Ceil => "f64.ceil",
    F64Floor => "f64.floor",
    F64Trunc => "f64.trunc",
    F64Nearest => "f64.nearest",
    F64Sqrt => "f64.sqrt",
    // f64 binary
    F64Add => "f64.add",
    F64Sub => "f64.sub",
    F64Mul => "f64.mul",
    F64Div => "f64.div",
    F64Min => "f64.min",
    F64Max => "f64.max",
    F64Copysign => "f64.copysign",
    // f64 compare
    F64Eq => "f64.eq",
    F64Ne => "f64.ne",
    F64Lt => "f64.lt",
    F64Gt => "f64.gt",
    F64Le => "f64.le",
    F64Ge => "f64.ge",
    // conversions
    I32WrapI64 => "i32.wrap_i64",
    I32TruncF32S => "i32.trunc_f32_s",
    I32TruncF32U => "i32.trunc_f32_u",
    I32TruncF64S => "i32.trunc_f64_s",
    I32TruncF64U => "i32.trunc_f64_u",
    I64ExtendI32S => "i64.extend_i32_s",
    I64ExtendI32U => "i64.extend_i32_u",
    I64TruncF32S => "i64.trunc_f32_s",
    I64TruncF32U => "i64.trunc_f32_u",
    I64TruncF64S => "i64.trunc_f64_s",
    I64TruncF64U => "i64.trunc_f64_u",
    F32ConvertI32S => "f32.convert_i32_s",
    F32ConvertI32U => "f32.convert_i32_u",
    F32ConvertI64S => "f32.convert_i64_s",
    F32ConvertI64U => "f32.convert_i64_u",
    F32DemoteF64 => "f32.demote_f64",
    F64ConvertI32S => "f64.convert_i32_s",
    F64ConvertI32U => "f64.convert_i32_u",
    F64ConvertI64S => "f64.convert_i64_s",
    F64ConvertI64U => "f64.convert_i64_u",
    F64PromoteF32 => "f64.promote_f32",
    I32ReinterpretF32 => "i32.reinterpret_f32",
    I64ReinterpretF64 => "i64.reinterpret_f64",
    F32ReinterpretI32 => "f32.reinterpret_i32",
    F64ReinterpretI64 => "f64.reinterpret_i64",
    I32Extend8S => "i32.extend8_s",
    I32Extend16S => "i32.extend16_s",
    I64Extend8S => "i64.extend8_s",
    I64Extend16S => "i64.extend16_s",
    I64Extend32S => "i64.extend32_s",
    I32TruncSatF32S => "i32.trunc_sat_f32_s",
    I32TruncSatF32U => "i32.trunc_sat_f32_u",
    I32TruncSatF64S => "i32.trunc_sat_f64_s",
    I32TruncSatF64U => "i32.trunc_sat_f64_u",
    I64TruncSatF32S => "i64.trunc_sat_f32_s",
    I64TruncSatF32U => "i64.trunc_sat_f32_u",
    I64TruncSatF64S => "i64.trunc_sat_f64_s",
    I64TruncSatF64U => "i64.trunc_sat_f64_u",
    // plain loads/stores
    I32Load => "i32.load",
    I64Load => "i64.load",
    F32Load => "f32.load",
    F64Load => "f64.load",
    I32Load8S => "i32.load8_s",
    I32Load8U => "i32.load8_u",
    I32Load16S => "i32.load16_s",
    I32Load16U => "i32.load16_u",
    I64Load8S => "i64.load8_s",
    I64Load8U => "i64.load8_u",
    I64Load16S => "i64.load16_s",
    I64Load16U => "i64.load16_u",
    I64Load32S => "i64.load32_s",
    I64Load32U => "i64.load32_u",
    I32Store => "i32.store",
    I64Store => "i64.store",
    F32Store => "f32.store",
    F64Store => "f64.store",
    I32Store8 => "i32.store8",
    I32Store16 => "i32.store16",
    I64Store8 => "i64.store8",
    I64Store16 => "i64.store16",
    I64Store32 => "i64.store32",
    // atomics
    MemoryAtomicNotify => "memory.atomic.notify",
    MemoryAtomicWait32 => "memory.atomic.wait32",
    MemoryAtomicWait64 => "memory.atomic.wait64",
    I32AtomicLoad => "i32.atomic.load",
    I64AtomicLoad => "i64.atomic.load",
    I32AtomicStore => "i32.atomic.store",
    I64AtomicStore => "i64.atomic.store",
    I32AtomicRmwAdd => "i32.atomic.rmw.add",
    I64AtomicRmwAdd => "i64.atomic.rmw.add",
    I32AtomicRmwSub => "i32.atomic.rmw.sub",
    I64AtomicRmwSub => "i64.atomic.rmw.sub",
    I32AtomicRmwAnd => "i32.atomic.rmw.and",
    I64AtomicRmwAnd => "i64.atomic.rmw.and",
    I32AtomicRmwOr => "i32.atomic.rmw.or",
    I64AtomicRmwOr => "i64.atomic.rmw.or",
    I32AtomicRmwXor => "i32.atomic.rmw.xor",
    I64AtomicRmwXor => "i64.atomic.rmw.xor",
    I32AtomicRmwXchg => "i32.atomic.rmw.xchg",
    I64AtomicRmwXchg => "i64.atomic.rmw.xchg",
    I32AtomicRmwCmpxchg => "i32.atomic.rmw.cmpxchg",
    I64AtomicRmwCmpxchg => "i64.atomic.rmw.cmpxchg",
    // simd
    V128Load => "v128.load",
    V128Store => "v128.store",
    V8X16LoadSplat => "v8x16.load_splat",
    V16X8LoadSplat => "v16x8.load_splat",
    V32X4LoadSplat => "v32x4.load_splat",
    V64X2LoadSplat => "v64x2.load_splat",
    I8X16Splat => "i8x16.splat",
    I16X8Splat => "i16x8.splat",
    I32X4Splat => "i32x4.splat",
    I64X2Splat => "i64x2.splat",
    F32X4Splat => "f32x4.splat",
    F64X2Splat => "f64x2.splat",
    I8X16ExtractLaneS => "i8x16.extract_lane_s",
    I8X16ExtractLaneU => "i8x16.extract_lane_u",
    I16X8ExtractLaneS => "i16x8.extract_lane_s",
    I16X8ExtractLaneU => "i16x8.extract_lane_u",
    I32X4ExtractLane => "i32x4.extract_lane",
    I64X2ExtractLane => "i64x2.extract_lane",
    F32X4ExtractLane => "f32x4.extract_lane",
    F64X2ExtractLane => "f64x2.extract_lane",
    I8X16ReplaceLane => "i8x16.replace_lane",
    I16X8ReplaceLane => "i16x8.replace_lane",
    I32X4ReplaceLane => "i32x4.replace_lane",
    I64X2ReplaceLane => "i64x2.replace_lane",
    F32X4ReplaceLane => "f32x4.replace_lane",
    F64X2ReplaceLane => "f64x2.replace_lane",
    V8X16Shuffle => "v8x16.shuffle",
    V128BitSelect => "v128.bitselect",
    I32X4Add => "i32x4.add",
    I32X4Sub => "i32x4.sub",
    I32X4Mul => "i32x4.mul",
    F32X4Add => "f32x4.add",
    F32X4Sub => "f32x4.sub",
    F32X4Mul => "f32x4.mul",
    F32X4Div => "f32x4.div",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics() {
        assert_eq!(Opcode::I32Add.mnemonic(), "i32.add");
        assert_eq!(Opcode::F64Copysign.mnemonic(), "f64.copysign");
        assert_eq!(Opcode::I32TruncSatF64U.mnemonic(), "i32.trunc_sat_f64_u");
        assert_eq!(Opcode::V8X16Shuffle.mnemonic(), "v8x16.shuffle");
        assert_eq!(
            Opcode::I64AtomicRmwCmpxchg.mnemonic(),
            "i64.atomic.rmw.cmpxchg"
        );
    }

    #[test]
    fn opcode_is_compact() {
        assert_eq!(std::mem::size_of::<Opcode>(), 1);
    }
}
