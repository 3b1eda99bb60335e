//! Instruction trees.
//!
//! `ExprKind` is the closed instruction variant set. Structured control
//! variants own their nested sequences outright; everything a consumer needs
//! is reachable by exhaustive `match`, so there is no kind tag to check
//! separately and no way to pair a kind with the wrong payload.
//!
//! Large payloads (`Block`, `FuncDeclaration`) are boxed to keep the common
//! variants small.

use std::fmt;

use crate::{BlockDeclaration, Const, FuncDeclaration, NodeList, Opcode, Span, Spanned, Var};

/// A labelled nested instruction sequence with a block type.
///
/// Owned by `block`, `loop`, `if` (true branch), and `try` instructions.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Block {
    /// Label names the block for branch targets; empty means unlabelled.
    pub label: String,
    pub decl: BlockDeclaration,
    pub exprs: ExprList,
    /// Location of the closing delimiter.
    pub end_span: Span,
}

impl Block {
    /// Create an unlabelled block around a sequence.
    pub fn new(exprs: ExprList) -> Self {
        Block {
            label: String::new(),
            decl: BlockDeclaration::default(),
            exprs,
            end_span: Span::DUMMY,
        }
    }
}

/// Memory-access immediates shared by the load/store family.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MemAccess {
    pub opcode: Opcode,
    /// Alignment hint in bytes (a power of two).
    pub align: u32,
    /// Static byte offset added to the dynamic address.
    pub offset: u32,
}

/// The closed instruction variant set.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ExprKind {
    // Nullary.
    Drop,
    MemoryCopy,
    MemoryFill,
    MemoryGrow,
    MemorySize,
    Nop,
    RefIsNull,
    RefNull,
    Rethrow,
    Return,
    Select,
    Unreachable,

    // Opcode-only numeric families.
    Unary(Opcode),
    Binary(Opcode),
    Compare(Opcode),
    Convert(Opcode),
    Ternary(Opcode),

    // Single reference.
    Br(Var),
    BrIf(Var),
    Call(Var),
    ReturnCall(Var),
    RefFunc(Var),
    GlobalGet(Var),
    GlobalSet(Var),
    LocalGet(Var),
    LocalSet(Var),
    LocalTee(Var),
    Throw(Var),
    MemoryInit(Var),
    DataDrop(Var),
    ElemDrop(Var),
    TableGet(Var),
    TableSet(Var),
    TableGrow(Var),
    TableSize(Var),

    // Two references.
    TableInit { segment: Var, table: Var },
    TableCopy { dst: Var, src: Var },
    BrOnExn { label: Var, event: Var },

    // Memory access.
    Load(MemAccess),
    Store(MemAccess),
    AtomicLoad(MemAccess),
    AtomicStore(MemAccess),
    AtomicRmw(MemAccess),
    AtomicRmwCmpxchg(MemAccess),
    AtomicWait(MemAccess),
    AtomicNotify(MemAccess),
    LoadSplat(MemAccess),

    // Structured control.
    Block(Box<Block>),
    Loop(Box<Block>),
    If {
        true_branch: Box<Block>,
        false_branch: ExprList,
        false_end_span: Span,
    },
    Try {
        block: Box<Block>,
        catch: ExprList,
    },
    BrTable {
        targets: Vec<Var>,
        default: Var,
    },
    CallIndirect {
        decl: Box<FuncDeclaration>,
        table: Var,
    },
    ReturnCallIndirect {
        decl: Box<FuncDeclaration>,
        table: Var,
    },

    // Literal-carrying.
    Const(Const),
    SimdLane {
        opcode: Opcode,
        lane: u64,
    },
    SimdShuffle {
        opcode: Opcode,
        lanes: [u8; 16],
    },
}

impl ExprKind {
    /// Stable kind name, for diagnostics by external layers.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Drop => "drop",
            ExprKind::MemoryCopy => "memory.copy",
            ExprKind::MemoryFill => "memory.fill",
            ExprKind::MemoryGrow => "memory.grow",
            ExprKind::MemorySize => "memory.size",
            ExprKind::Nop => "nop",
            ExprKind::RefIsNull => "ref.is_null",
            ExprKind::RefNull => "ref.null",
            ExprKind::Rethrow => "rethrow",
            ExprKind::Return => "return",
            ExprKind::Select => "select",
            ExprKind::Unreachable => "unreachable",
            ExprKind::Unary(_) => "unary",
            ExprKind::Binary(_) => "binary",
            ExprKind::Compare(_) => "compare",
            ExprKind::Convert(_) => "convert",
            ExprKind::Ternary(_) => "ternary",
            ExprKind::Br(_) => "br",
            ExprKind::BrIf(_) => "br_if",
            ExprKind::Call(_) => "call",
            ExprKind::ReturnCall(_) => "return_call",
            ExprKind::RefFunc(_) => "ref.func",
            ExprKind::GlobalGet(_) => "global.get",
            ExprKind::GlobalSet(_) => "global.set",
            ExprKind::LocalGet(_) => "local.get",
            ExprKind::LocalSet(_) => "local.set",
            ExprKind::LocalTee(_) => "local.tee",
            ExprKind::Throw(_) => "throw",
            ExprKind::MemoryInit(_) => "memory.init",
            ExprKind::DataDrop(_) => "data.drop",
            ExprKind::ElemDrop(_) => "elem.drop",
            ExprKind::TableGet(_) => "table.get",
            ExprKind::TableSet(_) => "table.set",
            ExprKind::TableGrow(_) => "table.grow",
            ExprKind::TableSize(_) => "table.size",
            ExprKind::TableInit { .. } => "table.init",
            ExprKind::TableCopy { .. } => "table.copy",
            ExprKind::BrOnExn { .. } => "br_on_exn",
            ExprKind::Load(_) => "load",
            ExprKind::Store(_) => "store",
            ExprKind::AtomicLoad(_) => "atomic.load",
            ExprKind::AtomicStore(_) => "atomic.store",
            ExprKind::AtomicRmw(_) => "atomic.rmw",
            ExprKind::AtomicRmwCmpxchg(_) => "atomic.rmw.cmpxchg",
            ExprKind::AtomicWait(_) => "atomic.wait",
            ExprKind::AtomicNotify(_) => "atomic.notify",
            ExprKind::LoadSplat(_) => "load_splat",
            ExprKind::Block(_) => "block",
            ExprKind::Loop(_) => "loop",
            ExprKind::If { .. } => "if",
            ExprKind::Try { .. } => "try",
            ExprKind::BrTable { .. } => "br_table",
            ExprKind::CallIndirect { .. } => "call_indirect",
            ExprKind::ReturnCallIndirect { .. } => "return_call_indirect",
            ExprKind::Const(_) => "const",
            ExprKind::SimdLane { .. } => "simd_lane_op",
            ExprKind::SimdShuffle { .. } => "simd_shuffle_op",
        }
    }
}

/// One instruction: a kind plus where it came from.
#[derive(Clone, Eq, PartialEq)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

impl Expr {
    /// Create a new instruction.
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { span, kind }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// An owned instruction sequence.
pub type ExprList = NodeList<Expr>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Opcode;
    use pretty_assertions::assert_eq;

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::DUMMY)
    }

    #[test]
    fn kind_names() {
        assert_eq!(ExprKind::Nop.name(), "nop");
        assert_eq!(ExprKind::Binary(Opcode::I32Add).name(), "binary");
        assert_eq!(
            ExprKind::BrTable {
                targets: vec![],
                default: Var::index(0, Span::DUMMY),
            }
            .name(),
            "br_table"
        );
    }

    #[test]
    fn sequence_construction() {
        let mut list = ExprList::new();
        list.push_back(expr(ExprKind::LocalGet(Var::index(0, Span::DUMMY))));
        list.push_back(expr(ExprKind::LocalGet(Var::index(1, Span::DUMMY))));
        let add = list.push_back(expr(ExprKind::Binary(Opcode::I32Add)));
        list.insert_before(add, expr(ExprKind::Nop));

        let kinds: Vec<_> = list.iter().map(|e| e.kind.name()).collect();
        assert_eq!(kinds, vec!["local.get", "local.get", "nop", "binary"]);
    }

    #[test]
    fn structured_control_owns_children() {
        let mut body = ExprList::new();
        body.push_back(expr(ExprKind::Br(Var::name("$exit", Span::DUMMY))));

        let mut block = Block::new(body);
        block.label = "$exit".to_string();

        let mut outer = ExprList::new();
        outer.push_back(expr(ExprKind::Block(Box::new(block))));

        let Some(first) = outer.front() else {
            panic!("outer list is non-empty");
        };
        let ExprKind::Block(inner) = &first.kind else {
            panic!("expected a block");
        };
        assert_eq!(inner.label, "$exit");
        assert_eq!(inner.exprs.len(), 1);
    }

    #[test]
    fn if_owns_both_branches() {
        let mut then_body = ExprList::new();
        then_body.push_back(expr(ExprKind::Const(Const::i32(1, Span::DUMMY))));
        let mut else_body = ExprList::new();
        else_body.push_back(expr(ExprKind::Const(Const::i32(0, Span::DUMMY))));

        let kind = ExprKind::If {
            true_branch: Box::new(Block::new(then_body)),
            false_branch: else_body,
            false_end_span: Span::DUMMY,
        };
        let ExprKind::If {
            true_branch,
            false_branch,
            ..
        } = &kind
        else {
            panic!("expected if");
        };
        assert_eq!(true_branch.exprs.len(), 1);
        assert_eq!(false_branch.len(), 1);
    }

    #[test]
    fn moving_between_sequences_detaches() {
        let mut a = ExprList::new();
        let id = a.push_back(expr(ExprKind::Nop));
        a.push_back(expr(ExprKind::Return));

        let mut b = ExprList::new();
        let moved = a.remove(id);
        b.push_back(moved);

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a.front().map(|e| e.kind.name()), Some("return"));
        assert_eq!(b.front().map(|e| e.kind.name()), Some("nop"));
    }

    #[test]
    fn mem_access_immediates() {
        let load = ExprKind::Load(MemAccess {
            opcode: Opcode::I32Load8U,
            align: 1,
            offset: 16,
        });
        let ExprKind::Load(access) = &load else {
            panic!("expected load");
        };
        assert_eq!(access.opcode.mnemonic(), "i32.load8_u");
        assert_eq!(access.offset, 16);
    }

    #[test]
    fn debug_includes_span() {
        let e = Expr::new(ExprKind::Nop, Span::new(5, 8));
        assert_eq!(format!("{e:?}"), "Nop @ 5..8");
    }

    #[test]
    fn unbound_branch_target_fails_resolution() {
        use crate::{Binding, BindingMap, LookupError};

        let mut labels = BindingMap::new("label");
        labels.insert("$loop", Binding::new(0, Span::DUMMY));

        let br = expr(ExprKind::Br(Var::name("$done", Span::DUMMY)));
        let ExprKind::Br(target) = &br.kind else {
            panic!("expected a branch");
        };
        // An unknown label surfaces as an error, never index 0.
        assert_eq!(
            labels.resolve(target),
            Err(LookupError::NotFound {
                space: "label",
                name: "$done".to_string(),
            })
        );
        assert_eq!(labels.resolve(&Var::name("$loop", Span::DUMMY)), Ok(0));
    }
}
