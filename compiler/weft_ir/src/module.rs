//! Top-level declarations and the module aggregate.
//!
//! A `Module` owns an ordered, append-only declaration sequence. As each
//! declaration is appended it also maintains, per namespace, a flat index
//! table (handles into the sequence, in order of first appearance) and a
//! name-to-index binding map. The derived structures are private and are
//! mutated only by [`Module::append_field`], so they cannot drift from the
//! sequence.
//!
//! Within each namespace, imported entries occupy the low contiguous index
//! range. That convention holds because the source format declares imports
//! of a kind before definitions of that kind; this layer just counts.

use std::fmt;

use bitflags::bitflags;

use crate::{
    Binding, BindingMap, ExprList, Func, FuncDeclaration, FuncSignature, FuncType, Limits,
    LookupError, Named, NodeId, NodeList, Span, Spanned, ValueType, Var,
};

/// A mutable or immutable global with an initializer sequence.
#[derive(Clone, Debug)]
pub struct Global {
    pub name: String,
    pub ty: ValueType,
    pub mutable: bool,
    pub init: ExprList,
}

impl Global {
    /// Create an immutable i32 global with an empty initializer.
    pub fn new(name: impl Into<String>) -> Self {
        Global {
            name: name.into(),
            ty: ValueType::I32,
            mutable: false,
            init: ExprList::new(),
        }
    }
}

impl Named for Global {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A table of reference-typed elements.
#[derive(Clone, Debug)]
pub struct Table {
    pub name: String,
    pub elem_limits: Limits,
    pub elem_type: ValueType,
}

impl Table {
    /// Create an empty funcref table.
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            elem_limits: Limits::default(),
            elem_type: ValueType::Funcref,
        }
    }
}

impl Named for Table {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A linear memory.
#[derive(Clone, Debug)]
pub struct Memory {
    pub name: String,
    pub page_limits: Limits,
}

impl Memory {
    /// Create a memory with zero-page limits.
    pub fn new(name: impl Into<String>) -> Self {
        Memory {
            name: name.into(),
            page_limits: Limits::default(),
        }
    }
}

impl Named for Memory {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An exception event with a function-shaped declaration.
#[derive(Clone, Debug)]
pub struct Event {
    pub name: String,
    pub decl: FuncDeclaration,
}

impl Event {
    /// Create an event with an empty declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Event {
            name: name.into(),
            decl: FuncDeclaration::default(),
        }
    }
}

impl Named for Event {
    fn name(&self) -> &str {
        &self.name
    }
}

bitflags! {
    /// Segment behavior flags.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
    pub struct SegmentFlags: u8 {
        /// Passive: no implicit instantiation-time copy; only reachable
        /// through explicit runtime operations.
        const PASSIVE = 0x1;
        /// The target table/memory index was written explicitly in the
        /// source rather than defaulted to zero.
        const EXPLICIT_INDEX = 0x2;
    }
}

/// One element-initializer entry in an element segment.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ElemExpr {
    /// A null reference.
    RefNull,
    /// A reference to a function.
    RefFunc(Var),
}

/// An element segment: initializer entries for a table.
///
/// Active segments carry a target table reference and an offset sequence;
/// passive segments carry neither (the fields are present but unused, and
/// `flags` decides which reading is live).
#[derive(Clone, Debug)]
pub struct ElemSegment {
    pub name: String,
    pub table_var: Var,
    pub flags: SegmentFlags,
    pub elem_type: ValueType,
    pub offset: ExprList,
    pub elem_exprs: Vec<ElemExpr>,
}

impl ElemSegment {
    /// Create an active funcref segment targeting table 0.
    pub fn new(name: impl Into<String>) -> Self {
        ElemSegment {
            name: name.into(),
            table_var: Var::index(0, Span::DUMMY),
            flags: SegmentFlags::empty(),
            elem_type: ValueType::Funcref,
            offset: ExprList::new(),
            elem_exprs: Vec::new(),
        }
    }

    /// True if this segment is passive.
    pub const fn is_passive(&self) -> bool {
        self.flags.contains(SegmentFlags::PASSIVE)
    }
}

impl Named for ElemSegment {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A data segment: raw bytes for a memory.
#[derive(Clone, Debug)]
pub struct DataSegment {
    pub name: String,
    pub memory_var: Var,
    pub flags: SegmentFlags,
    pub offset: ExprList,
    pub data: Vec<u8>,
}

impl DataSegment {
    /// Create an active segment targeting memory 0 with no bytes.
    pub fn new(name: impl Into<String>) -> Self {
        DataSegment {
            name: name.into(),
            memory_var: Var::index(0, Span::DUMMY),
            flags: SegmentFlags::empty(),
            offset: ExprList::new(),
            data: Vec::new(),
        }
    }

    /// True if this segment is passive.
    pub const fn is_passive(&self) -> bool {
        self.flags.contains(SegmentFlags::PASSIVE)
    }
}

impl Named for DataSegment {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The closed set of external entity kinds (importable/exportable).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExternalKind {
    Func,
    Table,
    Memory,
    Global,
    Event,
}

impl ExternalKind {
    /// Text name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            ExternalKind::Func => "func",
            ExternalKind::Table => "table",
            ExternalKind::Memory => "memory",
            ExternalKind::Global => "global",
            ExternalKind::Event => "event",
        }
    }
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An export: an external name bound to one entity reference.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Export {
    pub name: String,
    pub kind: ExternalKind,
    pub var: Var,
}

/// The namespace-specific payload of an import.
#[derive(Clone, Debug)]
pub enum ImportKind {
    Func(Func),
    Table(Table),
    Memory(Memory),
    Global(Global),
    Event(Event),
}

impl ImportKind {
    /// The external kind this payload belongs to.
    pub const fn external_kind(&self) -> ExternalKind {
        match self {
            ImportKind::Func(_) => ExternalKind::Func,
            ImportKind::Table(_) => ExternalKind::Table,
            ImportKind::Memory(_) => ExternalKind::Memory,
            ImportKind::Global(_) => ExternalKind::Global,
            ImportKind::Event(_) => ExternalKind::Event,
        }
    }

    /// The local name of the wrapped entity.
    pub fn entity_name(&self) -> &str {
        match self {
            ImportKind::Func(f) => &f.name,
            ImportKind::Table(t) => &t.name,
            ImportKind::Memory(m) => &m.name,
            ImportKind::Global(g) => &g.name,
            ImportKind::Event(e) => &e.name,
        }
    }
}

/// An import: external module/field names wrapping one payload.
#[derive(Clone, Debug)]
pub struct Import {
    /// Name of the providing module.
    pub module: String,
    /// Name of the field within that module.
    pub field: String,
    pub kind: ImportKind,
}

impl Import {
    /// Create an import around a payload.
    pub fn new(module: impl Into<String>, field: impl Into<String>, kind: ImportKind) -> Self {
        Import {
            module: module.into(),
            field: field.into(),
            kind,
        }
    }
}

/// The closed set of top-level declaration kinds.
#[derive(Clone, Debug)]
pub enum ModuleFieldKind {
    Func(Func),
    Global(Global),
    Import(Import),
    Export(Export),
    Type(FuncType),
    Table(Table),
    ElemSegment(ElemSegment),
    Memory(Memory),
    DataSegment(DataSegment),
    Start(Var),
    Event(Event),
}

impl ModuleFieldKind {
    /// Stable kind name, for diagnostics by external layers.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleFieldKind::Func(_) => "func",
            ModuleFieldKind::Global(_) => "global",
            ModuleFieldKind::Import(_) => "import",
            ModuleFieldKind::Export(_) => "export",
            ModuleFieldKind::Type(_) => "type",
            ModuleFieldKind::Table(_) => "table",
            ModuleFieldKind::ElemSegment(_) => "elem",
            ModuleFieldKind::Memory(_) => "memory",
            ModuleFieldKind::DataSegment(_) => "data",
            ModuleFieldKind::Start(_) => "start",
            ModuleFieldKind::Event(_) => "event",
        }
    }
}

/// One top-level declaration.
#[derive(Clone, Debug)]
pub struct ModuleField {
    pub span: Span,
    pub kind: ModuleFieldKind,
}

impl ModuleField {
    /// Create a new declaration.
    pub const fn new(kind: ModuleFieldKind, span: Span) -> Self {
        ModuleField { span, kind }
    }
}

impl Spanned for ModuleField {
    fn span(&self) -> Span {
        self.span
    }
}

/// An owned declaration sequence.
pub type ModuleFieldList = NodeList<ModuleField>;

/// Binds a name at its new index; unnamed entities stay index-only.
#[expect(clippy::cast_possible_truncation)]
fn bind(map: &mut BindingMap, name: &str, index: usize, span: Span) {
    if !name.is_empty() {
        map.insert(name, Binding::new(index as u32, span));
    }
}

/// Generates the per-namespace lookup accessor trio. Namespaces whose
/// entities can also arrive through imports pass the matching `ImportKind`
/// variant.
macro_rules! namespace_accessors {
    ($get:ident, $get_mut:ident, $get_index:ident, $table:ident, $bindings:ident,
     $entity:ty, $kind:ident $(, import: $ikind:ident)?) => {
        /// Resolve a reference to a dense index in this namespace.
        /// Index-form references pass through without a bounds check.
        pub fn $get_index(&self, var: &Var) -> Result<u32, LookupError> {
            self.$bindings.resolve(var)
        }

        /// Resolve a reference and borrow the entity it denotes.
        pub fn $get(&self, var: &Var) -> Result<&$entity, LookupError> {
            let id = self.field_id(&self.$table, &self.$bindings, var)?;
            match self.fields.get(id).map(|field| &field.kind) {
                Some(ModuleFieldKind::$kind(entity)) => Ok(entity),
                $(
                    Some(ModuleFieldKind::Import(import)) => match &import.kind {
                        ImportKind::$ikind(entity) => Ok(entity),
                        _ => unreachable!(concat!(
                            stringify!($table),
                            " table entry points at a mismatched import"
                        )),
                    },
                )?
                _ => unreachable!(concat!(
                    stringify!($table),
                    " table entry points at a mismatched field"
                )),
            }
        }

        /// Resolve a reference and mutably borrow the entity it denotes.
        pub fn $get_mut(&mut self, var: &Var) -> Result<&mut $entity, LookupError> {
            let id = self.field_id(&self.$table, &self.$bindings, var)?;
            match self.fields.get_mut(id).map(|field| &mut field.kind) {
                Some(ModuleFieldKind::$kind(entity)) => Ok(entity),
                $(
                    Some(ModuleFieldKind::Import(import)) => match &mut import.kind {
                        ImportKind::$ikind(entity) => Ok(entity),
                        _ => unreachable!(concat!(
                            stringify!($table),
                            " table entry points at a mismatched import"
                        )),
                    },
                )?
                _ => unreachable!(concat!(
                    stringify!($table),
                    " table entry points at a mismatched field"
                )),
            }
        }
    };
}

/// The aggregate root: the declaration sequence plus derived lookup state.
#[derive(Clone, Debug)]
pub struct Module {
    pub span: Span,
    pub name: String,

    fields: ModuleFieldList,

    num_func_imports: u32,
    num_table_imports: u32,
    num_memory_imports: u32,
    num_global_imports: u32,
    num_event_imports: u32,

    // Flat per-namespace tables: handles into `fields`, in order of first
    // appearance. The sequence stays the sole owner of every entity.
    funcs: Vec<NodeId>,
    tables: Vec<NodeId>,
    memories: Vec<NodeId>,
    globals: Vec<NodeId>,
    events: Vec<NodeId>,
    types: Vec<NodeId>,
    exports: Vec<NodeId>,
    elem_segments: Vec<NodeId>,
    data_segments: Vec<NodeId>,
    imports: Vec<NodeId>,
    starts: Vec<NodeId>,

    func_bindings: BindingMap,
    table_bindings: BindingMap,
    memory_bindings: BindingMap,
    global_bindings: BindingMap,
    event_bindings: BindingMap,
    type_bindings: BindingMap,
    export_bindings: BindingMap,
    elem_segment_bindings: BindingMap,
    data_segment_bindings: BindingMap,
}

impl Module {
    /// Create an empty module.
    pub fn new() -> Self {
        Module {
            span: Span::DUMMY,
            name: String::new(),
            fields: ModuleFieldList::new(),
            num_func_imports: 0,
            num_table_imports: 0,
            num_memory_imports: 0,
            num_global_imports: 0,
            num_event_imports: 0,
            funcs: Vec::new(),
            tables: Vec::new(),
            memories: Vec::new(),
            globals: Vec::new(),
            events: Vec::new(),
            types: Vec::new(),
            exports: Vec::new(),
            elem_segments: Vec::new(),
            data_segments: Vec::new(),
            imports: Vec::new(),
            starts: Vec::new(),
            func_bindings: BindingMap::new("func"),
            table_bindings: BindingMap::new("table"),
            memory_bindings: BindingMap::new("memory"),
            global_bindings: BindingMap::new("global"),
            event_bindings: BindingMap::new("event"),
            type_bindings: BindingMap::new("type"),
            export_bindings: BindingMap::new("export"),
            elem_segment_bindings: BindingMap::new("elem"),
            data_segment_bindings: BindingMap::new("data"),
        }
    }

    /// The declaration sequence, in append order. Read-only; growth goes
    /// through [`Module::append_field`].
    pub const fn fields(&self) -> &ModuleFieldList {
        &self.fields
    }

    /// Mutably borrow one declaration for in-place payload rewriting (e.g.
    /// a resolver caching indices into `Var`s). The sequence itself cannot
    /// be spliced through this, and entity names must not be changed after
    /// append (the binding maps are built at append time).
    pub fn field_mut(&mut self, id: NodeId) -> Option<&mut ModuleField> {
        self.fields.get_mut(id)
    }

    /// Append one declaration, maintaining the flat tables, binding maps,
    /// and import counters. Declaration order is preserved and meaningful
    /// (relative instantiation order of active segments, start eligibility).
    ///
    /// Re-binding an existing name shadows the earlier entry in the map;
    /// both stay reachable by index. Duplicate detection is a validator
    /// concern.
    pub fn append_field(&mut self, field: ModuleField) -> NodeId {
        let id = self.fields.push_back(field);
        self.index_field(id);
        id
    }

    /// Move every declaration out of `fields`, appending each in order.
    pub fn append_fields(&mut self, fields: &mut ModuleFieldList) {
        while let Some(field) = fields.pop_front() {
            self.append_field(field);
        }
    }

    fn index_field(&mut self, id: NodeId) {
        let Some(field) = self.fields.get(id) else {
            unreachable!("freshly appended declaration is live");
        };
        let span = field.span;
        match &field.kind {
            ModuleFieldKind::Func(func) => {
                bind(&mut self.func_bindings, &func.name, self.funcs.len(), span);
                self.funcs.push(id);
            }
            ModuleFieldKind::Global(global) => {
                bind(
                    &mut self.global_bindings,
                    &global.name,
                    self.globals.len(),
                    span,
                );
                self.globals.push(id);
            }
            ModuleFieldKind::Table(table) => {
                bind(
                    &mut self.table_bindings,
                    &table.name,
                    self.tables.len(),
                    span,
                );
                self.tables.push(id);
            }
            ModuleFieldKind::Memory(memory) => {
                bind(
                    &mut self.memory_bindings,
                    &memory.name,
                    self.memories.len(),
                    span,
                );
                self.memories.push(id);
            }
            ModuleFieldKind::Event(event) => {
                bind(
                    &mut self.event_bindings,
                    &event.name,
                    self.events.len(),
                    span,
                );
                self.events.push(id);
            }
            ModuleFieldKind::Type(func_type) => {
                bind(
                    &mut self.type_bindings,
                    &func_type.name,
                    self.types.len(),
                    span,
                );
                self.types.push(id);
            }
            ModuleFieldKind::Export(export) => {
                bind(
                    &mut self.export_bindings,
                    &export.name,
                    self.exports.len(),
                    span,
                );
                self.exports.push(id);
            }
            ModuleFieldKind::ElemSegment(segment) => {
                bind(
                    &mut self.elem_segment_bindings,
                    &segment.name,
                    self.elem_segments.len(),
                    span,
                );
                self.elem_segments.push(id);
            }
            ModuleFieldKind::DataSegment(segment) => {
                bind(
                    &mut self.data_segment_bindings,
                    &segment.name,
                    self.data_segments.len(),
                    span,
                );
                self.data_segments.push(id);
            }
            ModuleFieldKind::Start(_) => {
                self.starts.push(id);
            }
            ModuleFieldKind::Import(import) => {
                match &import.kind {
                    ImportKind::Func(func) => {
                        bind(&mut self.func_bindings, &func.name, self.funcs.len(), span);
                        self.funcs.push(id);
                        self.num_func_imports += 1;
                    }
                    ImportKind::Table(table) => {
                        bind(
                            &mut self.table_bindings,
                            &table.name,
                            self.tables.len(),
                            span,
                        );
                        self.tables.push(id);
                        self.num_table_imports += 1;
                    }
                    ImportKind::Memory(memory) => {
                        bind(
                            &mut self.memory_bindings,
                            &memory.name,
                            self.memories.len(),
                            span,
                        );
                        self.memories.push(id);
                        self.num_memory_imports += 1;
                    }
                    ImportKind::Global(global) => {
                        bind(
                            &mut self.global_bindings,
                            &global.name,
                            self.globals.len(),
                            span,
                        );
                        self.globals.push(id);
                        self.num_global_imports += 1;
                    }
                    ImportKind::Event(event) => {
                        bind(
                            &mut self.event_bindings,
                            &event.name,
                            self.events.len(),
                            span,
                        );
                        self.events.push(id);
                        self.num_event_imports += 1;
                    }
                }
                self.imports.push(id);
            }
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn field_id(
        &self,
        table: &[NodeId],
        bindings: &BindingMap,
        var: &Var,
    ) -> Result<NodeId, LookupError> {
        let index = bindings.resolve(var)?;
        table
            .get(index as usize)
            .copied()
            .ok_or(LookupError::OutOfRange {
                space: bindings.space(),
                index,
                len: table.len() as u32,
            })
    }

    namespace_accessors!(get_func, get_func_mut, get_func_index, funcs, func_bindings,
        Func, Func, import: Func);
    namespace_accessors!(get_table, get_table_mut, get_table_index, tables, table_bindings,
        Table, Table, import: Table);
    namespace_accessors!(get_memory, get_memory_mut, get_memory_index, memories, memory_bindings,
        Memory, Memory, import: Memory);
    namespace_accessors!(get_global, get_global_mut, get_global_index, globals, global_bindings,
        Global, Global, import: Global);
    namespace_accessors!(get_event, get_event_mut, get_event_index, events, event_bindings,
        Event, Event, import: Event);
    namespace_accessors!(get_type, get_type_mut, get_type_index, types, type_bindings,
        FuncType, Type);
    namespace_accessors!(
        get_elem_segment,
        get_elem_segment_mut,
        get_elem_segment_index,
        elem_segments,
        elem_segment_bindings,
        ElemSegment,
        ElemSegment
    );
    namespace_accessors!(
        get_data_segment,
        get_data_segment_mut,
        get_data_segment_index,
        data_segments,
        data_segment_bindings,
        DataSegment,
        DataSegment
    );

    /// Look up an export by its external name.
    pub fn get_export(&self, name: &str) -> Option<&Export> {
        let binding = self.export_bindings.get(name)?;
        let id = self.exports.get(binding.index as usize)?;
        match self.fields.get(*id).map(|field| &field.kind) {
            Some(ModuleFieldKind::Export(export)) => Some(export),
            _ => unreachable!("export table entry points at a mismatched field"),
        }
    }

    /// Find the index of a declared type with this exact signature
    /// (structural search, first match wins). Absence is informational,
    /// not an error; callers deduplicate or append as they see fit.
    #[expect(clippy::cast_possible_truncation)]
    pub fn find_func_type(&self, sig: &FuncSignature) -> Option<u32> {
        self.types
            .iter()
            .position(|id| match self.fields.get(*id).map(|f| &f.kind) {
                Some(ModuleFieldKind::Type(ty)) => &ty.sig == sig,
                _ => unreachable!("type table entry points at a mismatched field"),
            })
            .map(|index| index as u32)
    }

    /// Index of the type a declaration uses: its type reference when
    /// present, otherwise a structural search for its inline signature.
    pub fn get_func_type_index(&self, decl: &FuncDeclaration) -> Option<u32> {
        match &decl.type_var {
            Some(var) => self.get_type_index(var).ok(),
            None => self.find_func_type(&decl.sig),
        }
    }

    /// True if the reference denotes an imported entry of the given kind
    /// (i.e. falls in the namespace's low import index range).
    pub fn is_import(&self, kind: ExternalKind, var: &Var) -> bool {
        let (bindings, num_imports) = match kind {
            ExternalKind::Func => (&self.func_bindings, self.num_func_imports),
            ExternalKind::Table => (&self.table_bindings, self.num_table_imports),
            ExternalKind::Memory => (&self.memory_bindings, self.num_memory_imports),
            ExternalKind::Global => (&self.global_bindings, self.num_global_imports),
            ExternalKind::Event => (&self.event_bindings, self.num_event_imports),
        };
        bindings.resolve(var).is_ok_and(|index| index < num_imports)
    }

    /// Iterate the start-function references, in declaration order.
    pub fn starts(&self) -> impl Iterator<Item = &Var> {
        self.starts
            .iter()
            .map(|id| match self.fields.get(*id).map(|f| &f.kind) {
                Some(ModuleFieldKind::Start(var)) => var,
                _ => unreachable!("start table entry points at a mismatched field"),
            })
    }

    /// Number of functions (imported and defined).
    pub fn num_funcs(&self) -> usize {
        self.funcs.len()
    }

    /// Number of tables (imported and defined).
    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// Number of memories (imported and defined).
    pub fn num_memories(&self) -> usize {
        self.memories.len()
    }

    /// Number of globals (imported and defined).
    pub fn num_globals(&self) -> usize {
        self.globals.len()
    }

    /// Number of events (imported and defined).
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    /// Number of declared types.
    pub fn num_types(&self) -> usize {
        self.types.len()
    }

    /// Number of exports.
    pub fn num_exports(&self) -> usize {
        self.exports.len()
    }

    /// Number of element segments.
    pub fn num_elem_segments(&self) -> usize {
        self.elem_segments.len()
    }

    /// Number of data segments.
    pub fn num_data_segments(&self) -> usize {
        self.data_segments.len()
    }

    /// Number of imports of any kind.
    pub fn num_imports(&self) -> usize {
        self.imports.len()
    }

    /// Number of imported functions.
    pub const fn num_func_imports(&self) -> u32 {
        self.num_func_imports
    }

    /// Number of imported tables.
    pub const fn num_table_imports(&self) -> u32 {
        self.num_table_imports
    }

    /// Number of imported memories.
    pub const fn num_memory_imports(&self) -> u32 {
        self.num_memory_imports
    }

    /// Number of imported globals.
    pub const fn num_global_imports(&self) -> u32 {
        self.num_global_imports
    }

    /// Number of imported events.
    pub const fn num_event_imports(&self) -> u32 {
        self.num_event_imports
    }

    /// The type namespace's binding map, for reverse name mappings by
    /// diagnostic layers.
    pub const fn type_bindings(&self) -> &BindingMap {
        &self.type_bindings
    }
}

impl Default for Module {
    fn default() -> Self {
        Module::new()
    }
}
