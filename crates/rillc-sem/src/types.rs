//! Semantic types and the type store.
//!
//! Types are interned: structural equality implies handle equality, and
//! every child of a stored type is itself already canonical. That second
//! property is what keeps comparison cheap - child comparison is `TypeId`
//! comparison, never a recursive walk.
//!
//! Each stored type carries a cached structural hash, computed from its
//! kind and its children's cached hashes (FNV-1a mixing). The hash of a
//! prototype equals the hash of the stored type, so hashing is stable
//! across interning.

use std::fmt;

use rustc_hash::FxHashMap;

use rillc_util::{DenseInterner, NameId, StrInterner, TypeId};

/// FNV-1a offset basis (64-bit).
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a prime (64-bit).
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[inline]
fn hash_combine(seed: u64, value: u64) -> u64 {
    (seed ^ value).wrapping_mul(FNV_PRIME)
}

/// The primitive scalar types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimKind {
    I32,
    I64,
    F32,
    F64,
    Bool,
    Char,
    Str,
    Void,
}

impl PrimKind {
    /// All primitives, in registration order.
    pub const ALL: [PrimKind; 8] = [
        PrimKind::I32,
        PrimKind::I64,
        PrimKind::F32,
        PrimKind::F64,
        PrimKind::Bool,
        PrimKind::Char,
        PrimKind::Str,
        PrimKind::Void,
    ];

    /// The source-level name of the primitive.
    pub fn name(self) -> &'static str {
        match self {
            PrimKind::I32 => "i32",
            PrimKind::I64 => "i64",
            PrimKind::F32 => "f32",
            PrimKind::F64 => "f64",
            PrimKind::Bool => "bool",
            PrimKind::Char => "char",
            PrimKind::Str => "str",
            PrimKind::Void => "void",
        }
    }
}

/// Structural description of a semantic type.
///
/// Children are `TypeId`s into the same store, so derived equality and
/// hashing are structural by construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// One of the eight primitives
    Prim(PrimKind),
    /// Pointer to a pointee
    Ptr(TypeId),
    /// Array; `size` is `None` for the unsized form `T[]`
    Array { elem: TypeId, size: Option<i64> },
    /// Function type
    Fn { params: Box<[TypeId]>, ret: TypeId },
    /// User-defined struct. Reserved: the front-end does not yet produce it.
    Struct { name: NameId },
    /// User-defined enum. Reserved: the front-end does not yet produce it.
    Enum { name: NameId },
}

/// Interning store for semantic types.
///
/// Created once per compilation; eagerly interns the primitive singletons
/// and registers the keyword-record -> primitive mapping so that named type
/// expressions resolve without string comparison.
pub struct TypeStore {
    /// Canonical types; the meta slot holds the cached structural hash
    types: DenseInterner<TypeId, TypeData, u64>,
    /// Keyword interner record -> primitive type
    registry: FxHashMap<NameId, TypeId>,
    /// Primitive singletons indexed by `PrimKind as usize`
    prims: [TypeId; 8],
}

impl TypeStore {
    /// Create the store, interning the primitives and registering their
    /// names against the given keyword table.
    pub fn new<M>(keywords: &StrInterner<'_, M>) -> Self {
        let mut store = TypeStore {
            types: DenseInterner::with_capacity(64),
            registry: FxHashMap::default(),
            prims: [TypeId::new(0); 8],
        };

        for kind in PrimKind::ALL {
            let hash = store.structural_hash(&TypeData::Prim(kind));
            let (id, _) = store.types.intern(TypeData::Prim(kind), hash);
            store.prims[kind as usize] = id;
        }

        // `void` is spellable only through an omitted return type, so it
        // has no keyword to register.
        for kind in PrimKind::ALL {
            if kind == PrimKind::Void {
                continue;
            }
            if let Some(record) = keywords.peek(kind.name()) {
                store.registry.insert(record, store.prims[kind as usize]);
            }
        }

        store
    }

    /// Intern a type, returning its canonical handle.
    ///
    /// The prototype's children must already be canonical handles from this
    /// store.
    pub fn intern(&mut self, data: TypeData) -> TypeId {
        let hash = self.structural_hash(&data);
        self.types.intern(data, hash).0
    }

    /// Compute the structural hash of a prototype: kind tag mixed with the
    /// children's cached hashes (and the array size / parameter count).
    pub fn structural_hash(&self, data: &TypeData) -> u64 {
        let mut h = FNV_OFFSET;
        match data {
            TypeData::Prim(kind) => {
                h = hash_combine(h, 0);
                h = hash_combine(h, *kind as u64);
            }
            TypeData::Ptr(pointee) => {
                h = hash_combine(h, 1);
                h = hash_combine(h, self.cached_hash(*pointee));
            }
            TypeData::Array { elem, size } => {
                h = hash_combine(h, 2);
                h = hash_combine(h, self.cached_hash(*elem));
                match size {
                    Some(n) => {
                        h = hash_combine(h, 1);
                        h = hash_combine(h, *n as u64);
                    }
                    None => h = hash_combine(h, 0),
                }
            }
            TypeData::Fn { params, ret } => {
                h = hash_combine(h, 3);
                h = hash_combine(h, self.cached_hash(*ret));
                h = hash_combine(h, params.len() as u64);
                for param in params.iter() {
                    h = hash_combine(h, self.cached_hash(*param));
                }
            }
            TypeData::Struct { name } => {
                h = hash_combine(h, 4);
                h = hash_combine(h, name.index() as u64);
            }
            TypeData::Enum { name } => {
                h = hash_combine(h, 5);
                h = hash_combine(h, name.index() as u64);
            }
        }
        h
    }

    /// The cached structural hash of an interned type.
    pub fn cached_hash(&self, id: TypeId) -> u64 {
        self.types.meta(id).copied().unwrap_or(0)
    }

    /// Number of distinct types interned so far.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: the primitives are interned at construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The primitive singleton for `kind`.
    #[inline]
    pub fn prim(&self, kind: PrimKind) -> TypeId {
        self.prims[kind as usize]
    }

    #[inline]
    pub fn t_i32(&self) -> TypeId {
        self.prim(PrimKind::I32)
    }

    #[inline]
    pub fn t_i64(&self) -> TypeId {
        self.prim(PrimKind::I64)
    }

    #[inline]
    pub fn t_f32(&self) -> TypeId {
        self.prim(PrimKind::F32)
    }

    #[inline]
    pub fn t_f64(&self) -> TypeId {
        self.prim(PrimKind::F64)
    }

    #[inline]
    pub fn t_bool(&self) -> TypeId {
        self.prim(PrimKind::Bool)
    }

    #[inline]
    pub fn t_char(&self) -> TypeId {
        self.prim(PrimKind::Char)
    }

    #[inline]
    pub fn t_str(&self) -> TypeId {
        self.prim(PrimKind::Str)
    }

    #[inline]
    pub fn t_void(&self) -> TypeId {
        self.prim(PrimKind::Void)
    }

    /// Resolve a primitive type name by its keyword-table record.
    pub fn resolve_named(&self, record: NameId) -> Option<TypeId> {
        self.registry.get(&record).copied()
    }

    /// True for `i32` and `i64`.
    pub fn is_integer(&self, id: TypeId) -> bool {
        matches!(self[id], TypeData::Prim(PrimKind::I32 | PrimKind::I64))
    }

    /// True for `f32` and `f64`.
    pub fn is_float(&self, id: TypeId) -> bool {
        matches!(self[id], TypeData::Prim(PrimKind::F32 | PrimKind::F64))
    }

    /// True for integers and floats.
    pub fn is_numeric(&self, id: TypeId) -> bool {
        self.is_integer(id) || self.is_float(id)
    }

    /// True for `bool`.
    pub fn is_bool(&self, id: TypeId) -> bool {
        matches!(self[id], TypeData::Prim(PrimKind::Bool))
    }

    /// Array nesting depth: the number of array levels before the element
    /// type stops being an array.
    pub fn rank(&self, id: TypeId) -> usize {
        let mut rank = 0;
        let mut current = id;
        while let TypeData::Array { elem, .. } = self[current] {
            rank += 1;
            current = elem;
        }
        rank
    }

    /// True if any array level of `id` is unsized.
    pub fn has_unsized_dim(&self, id: TypeId) -> bool {
        let mut current = id;
        while let TypeData::Array { elem, size } = self[current] {
            if size.is_none() {
                return true;
            }
            current = elem;
        }
        false
    }

    /// The wider of two numeric types: `f64 > f32 > i64 > i32`.
    pub fn unify_numeric(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if a == b && self.is_numeric(a) {
            return Some(a);
        }
        if !self.is_numeric(a) || !self.is_numeric(b) {
            return None;
        }
        for wider in [self.t_f64(), self.t_f32(), self.t_i64(), self.t_i32()] {
            if a == wider || b == wider {
                return Some(wider);
            }
        }
        None
    }

    /// Implicit conversion policy.
    ///
    /// Permitted: identity, integer widening (`i32 -> i64`), float widening
    /// (`f32 -> f64`), any integer to any float, and size-forgetting array
    /// conversion (`T[N] -> T[]`, recursively, provided the element types
    /// are themselves implicitly convertible).
    pub fn can_implicit_cast(&self, target: TypeId, source: TypeId) -> bool {
        if target == source {
            return true;
        }

        if self.is_integer(source) && self.is_integer(target) {
            return source == self.t_i32() && target == self.t_i64();
        }
        if self.is_float(source) && self.is_float(target) {
            return source == self.t_f32() && target == self.t_f64();
        }
        if self.is_integer(source) && self.is_float(target) {
            return true;
        }

        if let (
            TypeData::Array {
                elem: target_elem,
                size: target_size,
            },
            TypeData::Array {
                elem: source_elem,
                size: source_size,
            },
        ) = (&self[target], &self[source])
        {
            let sizes_agree = match (target_size, source_size) {
                (None, _) => true,
                (Some(t), Some(s)) => t == s,
                (Some(_), None) => false,
            };
            if sizes_agree {
                return self.can_implicit_cast(*target_elem, *source_elem);
            }
        }

        false
    }

    /// Human-readable rendering of a type, e.g. `i32[2][2]` or
    /// `fn(i32) -> i32`.
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { store: self, id }
    }
}

impl std::ops::Index<TypeId> for TypeStore {
    type Output = TypeData;

    fn index(&self, id: TypeId) -> &TypeData {
        match self.types.get_by_index(id) {
            Some((data, _)) => data,
            None => panic!("TypeId {:?} does not belong to this store", id),
        }
    }
}

/// Display adapter returned by [`TypeStore::display`].
pub struct TypeDisplay<'a> {
    store: &'a TypeStore,
    id: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.store[self.id] {
            TypeData::Prim(kind) => write!(f, "{}", kind.name()),
            TypeData::Ptr(pointee) => write!(f, "{}*", self.store.display(*pointee)),
            TypeData::Array { elem, size } => {
                write!(f, "{}", self.store.display(*elem))?;
                match size {
                    Some(n) => write!(f, "[{n}]"),
                    None => write!(f, "[]"),
                }
            }
            TypeData::Fn { params, ret } => {
                write!(f, "fn(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.store.display(*param))?;
                }
                write!(f, ")")?;
                if *ret != self.store.t_void() {
                    write!(f, " -> {}", self.store.display(*ret))?;
                }
                Ok(())
            }
            TypeData::Struct { .. } => write!(f, "struct"),
            TypeData::Enum { .. } => write!(f, "enum"),
        }
    }
}
