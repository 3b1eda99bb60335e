//! Function signatures, declarations, and bodies.

use crate::{
    Binding, BindingMap, ExprList, LookupError, Named, Span, TypeVector, ValueType, Var,
};

/// A function signature: ordered parameter and result type lists.
///
/// Equality is structural: two signatures are equal iff both lists match
/// element-wise, independent of where they were declared. Type deduplication
/// relies on this.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct FuncSignature {
    pub params: TypeVector,
    pub results: TypeVector,
}

impl FuncSignature {
    /// Create a signature from parameter and result lists.
    pub fn new(
        params: impl IntoIterator<Item = ValueType>,
        results: impl IntoIterator<Item = ValueType>,
    ) -> Self {
        FuncSignature {
            params: params.into_iter().collect(),
            results: results.into_iter().collect(),
        }
    }

    /// Number of parameters.
    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    /// Number of results.
    pub fn num_results(&self) -> usize {
        self.results.len()
    }

    /// Parameter type at `index`.
    pub fn param(&self, index: usize) -> Option<ValueType> {
        self.params.get(index).copied()
    }

    /// Result type at `index`.
    pub fn result(&self, index: usize) -> Option<ValueType> {
        self.results.get(index).copied()
    }
}

/// A named signature declaration in the type namespace.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FuncType {
    pub name: String,
    pub sig: FuncSignature,
}

impl FuncType {
    /// Create a named (possibly empty-named) type with an empty signature.
    pub fn new(name: impl Into<String>) -> Self {
        FuncType {
            name: name.into(),
            sig: FuncSignature::default(),
        }
    }
}

impl Named for FuncType {
    fn name(&self) -> &str {
        &self.name
    }
}

/// How a function (or block) states its signature: an inline signature, a
/// reference to a declared type, or both. When a type reference is present
/// it is authoritative for parameter/result counts.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct FuncDeclaration {
    /// Reference into the type namespace; `None` means the inline
    /// signature stands alone.
    pub type_var: Option<Var>,
    pub sig: FuncSignature,
}

impl FuncDeclaration {
    /// True if the named-type form was used.
    pub const fn has_type_ref(&self) -> bool {
        self.type_var.is_some()
    }

    /// Number of parameters in the inline signature.
    pub fn num_params(&self) -> usize {
        self.sig.num_params()
    }

    /// Number of results in the inline signature.
    pub fn num_results(&self) -> usize {
        self.sig.num_results()
    }
}

/// Blocks reuse the function declaration shape for their block types.
pub type BlockDeclaration = FuncDeclaration;

/// Local variable declarations, run-length encoded as `(type, count)` runs.
///
/// Adjacent locals of the same type compress to one run; lookups and
/// iteration expand them on the fly.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct LocalTypes {
    decls: Vec<(ValueType, u32)>,
}

impl LocalTypes {
    /// Replace the declarations with runs built from a flat type list.
    pub fn set(&mut self, types: &[ValueType]) {
        self.decls.clear();
        for &ty in types {
            match self.decls.last_mut() {
                Some((last, count)) if *last == ty => *count += 1,
                _ => self.decls.push((ty, 1)),
            }
        }
    }

    /// Append one run. Runs with `count == 0` are dropped.
    pub fn append_decl(&mut self, ty: ValueType, count: u32) {
        if count != 0 {
            self.decls.push((ty, count));
        }
    }

    /// The raw runs.
    pub fn decls(&self) -> &[(ValueType, u32)] {
        &self.decls
    }

    /// Total number of locals across all runs.
    pub fn size(&self) -> u32 {
        self.decls.iter().map(|&(_, count)| count).sum()
    }

    /// Type of the local at `index`, expanding runs.
    pub fn get(&self, index: u32) -> Option<ValueType> {
        let mut remaining = index;
        for &(ty, count) in &self.decls {
            if remaining < count {
                return Some(ty);
            }
            remaining -= count;
        }
        None
    }

    /// Iterate the expanded type list.
    pub fn iter(&self) -> impl Iterator<Item = ValueType> + '_ {
        self.decls
            .iter()
            .flat_map(|&(ty, count)| std::iter::repeat(ty).take(count as usize))
    }
}

/// A function: declaration, locals, local name bindings, and a body.
///
/// `bindings` maps parameter and local names to their combined index space
/// (parameters first, then locals), mirroring how consumers address them.
#[derive(Clone, Debug)]
pub struct Func {
    pub name: String,
    pub decl: FuncDeclaration,
    pub local_types: LocalTypes,
    pub bindings: BindingMap,
    pub exprs: ExprList,
}

impl Func {
    /// Create an empty function.
    pub fn new(name: impl Into<String>) -> Self {
        Func {
            name: name.into(),
            decl: FuncDeclaration::default(),
            local_types: LocalTypes::default(),
            bindings: BindingMap::new("local"),
            exprs: ExprList::new(),
        }
    }

    /// Number of parameters.
    pub fn num_params(&self) -> usize {
        self.decl.num_params()
    }

    /// Number of results.
    pub fn num_results(&self) -> usize {
        self.decl.num_results()
    }

    /// Number of declared locals (parameters excluded).
    pub fn num_locals(&self) -> u32 {
        self.local_types.size()
    }

    /// Size of the combined parameter-plus-local index space.
    #[expect(clippy::cast_possible_truncation)]
    pub fn num_params_and_locals(&self) -> u32 {
        self.num_params() as u32 + self.num_locals()
    }

    /// Type of the parameter or local at a combined-space index.
    pub fn local_type(&self, index: u32) -> Option<ValueType> {
        let num_params = self.decl.sig.num_params();
        match self.decl.sig.param(index as usize) {
            Some(ty) => Some(ty),
            #[expect(clippy::cast_possible_truncation)]
            None => self.local_types.get(index - num_params as u32),
        }
    }

    /// Resolve a parameter/local reference to its combined-space index.
    pub fn local_index(&self, var: &Var) -> Result<u32, LookupError> {
        self.bindings.resolve(var)
    }

    /// Type of the parameter or local a reference denotes.
    pub fn local_type_of(&self, var: &Var) -> Result<ValueType, LookupError> {
        let index = self.local_index(var)?;
        self.local_type(index).ok_or(LookupError::OutOfRange {
            space: "local",
            index,
            len: self.num_params_and_locals(),
        })
    }

    /// Bind a parameter/local name to a combined-space index.
    pub fn bind_local(&mut self, name: impl Into<String>, index: u32, span: Span) {
        self.bindings.insert(name, Binding::new(index, span));
    }
}

impl Named for Func {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn signature_structural_equality() {
        let a = FuncSignature::new([ValueType::I32, ValueType::I64], [ValueType::F32]);
        let b = FuncSignature::new([ValueType::I32, ValueType::I64], [ValueType::F32]);
        assert_eq!(a, b);

        let different_params = FuncSignature::new([ValueType::I32], [ValueType::F32]);
        assert_ne!(a, different_params);

        let different_results = FuncSignature::new([ValueType::I32, ValueType::I64], []);
        assert_ne!(a, different_results);

        // Order matters.
        let swapped = FuncSignature::new([ValueType::I64, ValueType::I32], [ValueType::F32]);
        assert_ne!(a, swapped);
    }

    #[test]
    fn signature_accessors() {
        let sig = FuncSignature::new([ValueType::I32], [ValueType::F64]);
        assert_eq!(sig.num_params(), 1);
        assert_eq!(sig.num_results(), 1);
        assert_eq!(sig.param(0), Some(ValueType::I32));
        assert_eq!(sig.param(1), None);
        assert_eq!(sig.result(0), Some(ValueType::F64));
    }

    #[test]
    fn declaration_type_ref_flag() {
        let inline = FuncDeclaration::default();
        assert!(!inline.has_type_ref());

        let by_ref = FuncDeclaration {
            type_var: Some(Var::name("$t", Span::DUMMY)),
            sig: FuncSignature::default(),
        };
        assert!(by_ref.has_type_ref());
    }

    #[test]
    fn local_types_run_length() {
        let mut locals = LocalTypes::default();
        locals.set(&[
            ValueType::I32,
            ValueType::I32,
            ValueType::F64,
            ValueType::I32,
        ]);
        assert_eq!(
            locals.decls(),
            &[(ValueType::I32, 2), (ValueType::F64, 1), (ValueType::I32, 1)]
        );
        assert_eq!(locals.size(), 4);
        assert_eq!(locals.get(1), Some(ValueType::I32));
        assert_eq!(locals.get(2), Some(ValueType::F64));
        assert_eq!(locals.get(4), None);
        assert_eq!(
            locals.iter().collect::<Vec<_>>(),
            vec![
                ValueType::I32,
                ValueType::I32,
                ValueType::F64,
                ValueType::I32
            ]
        );
    }

    #[test]
    fn local_types_zero_count_dropped() {
        let mut locals = LocalTypes::default();
        locals.append_decl(ValueType::I64, 0);
        locals.append_decl(ValueType::I64, 3);
        assert_eq!(locals.decls().len(), 1);
        assert_eq!(locals.size(), 3);
    }

    #[test]
    fn func_combined_index_space() {
        let mut func = Func::new("$f");
        func.decl.sig = FuncSignature::new([ValueType::I32, ValueType::F32], []);
        func.local_types.append_decl(ValueType::I64, 2);

        assert_eq!(func.num_params(), 2);
        assert_eq!(func.num_locals(), 2);
        assert_eq!(func.num_params_and_locals(), 4);

        // Params first, then locals.
        assert_eq!(func.local_type(0), Some(ValueType::I32));
        assert_eq!(func.local_type(1), Some(ValueType::F32));
        assert_eq!(func.local_type(2), Some(ValueType::I64));
        assert_eq!(func.local_type(3), Some(ValueType::I64));
        assert_eq!(func.local_type(4), None);
    }

    #[test]
    fn func_local_lookup_by_name() {
        let mut func = Func::new("$f");
        func.decl.sig = FuncSignature::new([ValueType::I32], []);
        func.local_types.append_decl(ValueType::F64, 1);
        func.bind_local("$p", 0, Span::DUMMY);
        func.bind_local("$x", 1, Span::DUMMY);

        assert_eq!(func.local_index(&Var::name("$x", Span::DUMMY)), Ok(1));
        assert_eq!(
            func.local_type_of(&Var::name("$p", Span::DUMMY)),
            Ok(ValueType::I32)
        );
        assert_eq!(
            func.local_type_of(&Var::name("$x", Span::DUMMY)),
            Ok(ValueType::F64)
        );
        assert!(matches!(
            func.local_index(&Var::name("$missing", Span::DUMMY)),
            Err(LookupError::NotFound { space: "local", .. })
        ));
    }
}
