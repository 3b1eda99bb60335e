//! Weft IR - Intermediate Representation Types
//!
//! This crate contains the in-memory program representation for the Weft
//! compiler:
//! - Spans for source locations
//! - Dual references (`Var`): by numeric index or by symbolic name
//! - Bit-exact constants for every value type
//! - Instruction trees (`Expr`) with owned nested sequences
//! - Top-level declarations and the `Module` aggregate
//!
//! # Design Philosophy
//!
//! - **Closed sums**: instruction and declaration kinds are enums, so a
//!   consumer's `match` is checked exhaustively and a kind can never be
//!   paired with the wrong payload.
//! - **One owner**: the declaration sequence owns every entity; the flat
//!   per-namespace tables hold `NodeId` handles into it, never second
//!   copies.
//! - **Derived state stays private**: the tables, binding maps, and import
//!   counters are maintained only by `Module::append_field`, so they cannot
//!   drift from the sequence.
//!
//! Floats are stored as raw bit patterns (`u32`/`u64`) so NaN payloads and
//! signed zeros survive untouched and equality is bit equality.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod binding;
mod constant;
mod error;
mod expr;
mod func;
mod module;
mod node_list;
mod opcode;
mod span;
mod traits;
mod types;
mod var;

pub use binding::{Binding, BindingMap};
pub use constant::{Const, ConstKind};
pub use error::LookupError;
pub use expr::{Block, Expr, ExprKind, ExprList, MemAccess};
pub use func::{BlockDeclaration, Func, FuncDeclaration, FuncSignature, FuncType, LocalTypes};
pub use module::{
    DataSegment, ElemExpr, ElemSegment, Event, Export, ExternalKind, Global, Import, ImportKind,
    Memory, Module, ModuleField, ModuleFieldKind, ModuleFieldList, SegmentFlags, Table,
};
pub use node_list::{Iter, NodeId, NodeList};
pub use opcode::Opcode;
pub use span::Span;
pub use traits::{Named, Spanned};
pub use types::{Limits, TypeVector, ValueType};
pub use var::{Var, VarKind};
