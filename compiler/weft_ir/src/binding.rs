//! Name-to-index binding maps.
//!
//! A `BindingMap` is the per-namespace map from symbolic names to dense
//! indices. Insertion overwrites (last wins); earlier indices remain
//! reachable by index, and duplicate-name detection belongs to a validator,
//! not this layer.

use rustc_hash::FxHashMap;

use crate::{LookupError, Span, Var};

/// A single name binding: where the name was declared and which index it
/// denotes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Binding {
    pub span: Span,
    pub index: u32,
}

impl Binding {
    /// Create a new binding.
    pub const fn new(index: u32, span: Span) -> Self {
        Binding { span, index }
    }
}

/// Name-to-index map for one namespace.
#[derive(Clone, Debug)]
pub struct BindingMap {
    /// Namespace name, used in lookup failure messages ("func", "table", ...).
    space: &'static str,
    bindings: FxHashMap<String, Binding>,
}

impl BindingMap {
    /// Create an empty map for the given namespace.
    pub fn new(space: &'static str) -> Self {
        BindingMap {
            space,
            bindings: FxHashMap::default(),
        }
    }

    /// The namespace this map serves.
    pub const fn space(&self) -> &'static str {
        self.space
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind `name` to `binding`, overwriting any previous binding for the
    /// same name (last wins).
    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) {
        self.bindings.insert(name.into(), binding);
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Iterate over all `(name, binding)` pairs. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, b)| (name.as_str(), b))
    }

    /// Resolve a reference against this namespace.
    ///
    /// Index-form references are returned unchanged with no bounds check
    /// (bounds are a caller/validator responsibility). Name-form references
    /// are looked up; an absent name is `NotFound`. Never mutates the map.
    pub fn resolve(&self, var: &Var) -> Result<u32, LookupError> {
        if let Some(index) = var.as_index() {
            return Ok(index);
        }
        match var.as_name() {
            Some(name) => match self.bindings.get(name) {
                Some(binding) => Ok(binding.index),
                None => Err(LookupError::NotFound {
                    space: self.space,
                    name: name.to_string(),
                }),
            },
            None => unreachable!("Var is either index-form or name-form"),
        }
    }

    /// Build the reverse index-to-name table for diagnostics: one slot per
    /// index in `[0, count)`, empty string where no name is bound.
    ///
    /// When several names map to one index, the surviving entry is
    /// unspecified among them (the map itself keeps only the last binding
    /// per *name*; per *index*, an arbitrary one of the remaining names
    /// wins).
    pub fn reverse_mapping(&self, count: usize) -> Vec<String> {
        let mut names = vec![String::new(); count];
        for (name, binding) in &self.bindings {
            if let Some(slot) = names.get_mut(binding.index as usize) {
                slot.clone_from(name);
            }
        }
        names
    }
}
