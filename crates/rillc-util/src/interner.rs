//! Dense interning - canonical records with stable dense indices.
//!
//! An interner maps equal keys to a single canonical record. Each record is
//! identified by a dense 0-based index assigned at first insertion, and
//! carries an opaque `meta` payload set at first-insertion time. Iteration
//! yields records in insertion order, which by construction is dense-index
//! order.
//!
//! Two layers are provided:
//!
//! - [`DenseInterner`] - generic over the handle type, the key type and the
//!   meta payload. The key is interned by value; this is the layer the type
//!   store builds on.
//! - [`StrInterner`] - byte-string keys canonicalized into an [`Arena`]. The
//!   canonical `&str` is arena-owned and pointer-stable for the lifetime of
//!   the interner. Used for keywords, identifiers and string literals.
//!
//! # Guarantees
//!
//! - Equal keys produce identical handles (and identical canonical keys).
//! - After N distinct keys, the dense indices are exactly `{0, .., N-1}`.
//! - `peek(k)` is `None` exactly when `intern(k)` would be a first insertion.
//!
//! # Examples
//!
//! ```
//! use rillc_util::arena::Arena;
//! use rillc_util::interner::StrInterner;
//!
//! let arena = Arena::new();
//! let mut idents: StrInterner<'_, ()> = StrInterner::new(&arena);
//! let a = idents.intern("x", ());
//! let b = idents.intern("y", ());
//! let a2 = idents.intern("x", ());
//! assert_eq!(a, a2);
//! assert_ne!(a, b);
//! assert_eq!(idents.get(a), Some("x"));
//! ```

use std::borrow::Borrow;
use std::hash::Hash;
use std::marker::PhantomData;

use ahash::RandomState;
use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::arena::Arena;
use crate::ids::NameId;
use crate::index_vec::Idx;

/// Generic dense interner.
///
/// Keys are stored by value in insertion order; the handle type `I` is the
/// dense index. The meta payload `M` is attached when a key is first
/// interned and never replaced.
pub struct DenseInterner<I, K, M> {
    map: IndexMap<K, M, RandomState>,
    _marker: PhantomData<fn(&I)>,
}

impl<I: Idx, K: Hash + Eq, M> DenseInterner<I, K, M> {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self {
            map: IndexMap::with_hasher(RandomState::new()),
            _marker: PhantomData,
        }
    }

    /// Create an empty interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: IndexMap::with_capacity_and_hasher(capacity, RandomState::new()),
            _marker: PhantomData,
        }
    }

    /// Insert `key` if absent, assigning the next dense index and storing
    /// `meta`; otherwise return the existing record's handle.
    ///
    /// The boolean is `true` when this call was the first insertion.
    pub fn intern(&mut self, key: K, meta: M) -> (I, bool) {
        match self.map.entry(key) {
            Entry::Occupied(entry) => (I::from_usize(entry.index()), false),
            Entry::Vacant(entry) => {
                let index = entry.index();
                entry.insert(meta);
                (I::from_usize(index), true)
            }
        }
    }

    /// Lookup without insertion.
    pub fn peek<Q>(&self, key: &Q) -> Option<I>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get_index_of(key).map(I::from_usize)
    }

    /// Dense-index access: the canonical key and meta for `id`, or `None`
    /// if the index is out of range.
    pub fn get_by_index(&self, id: I) -> Option<(&K, &M)> {
        self.map.get_index(id.index())
    }

    /// The meta payload stored at first insertion of `id`'s key.
    pub fn meta(&self, id: I) -> Option<&M> {
        self.map.get_index(id.index()).map(|(_, m)| m)
    }

    /// Number of distinct keys interned so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all records in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &K, &M)> {
        self.map
            .iter()
            .enumerate()
            .map(|(i, (k, m))| (I::from_usize(i), k, m))
    }
}

impl<I: Idx, K: Hash + Eq, M> Default for DenseInterner<I, K, M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte-string interner with arena-canonicalized keys.
///
/// On first insertion the key is copied into the arena; the canonical
/// `&'a str` is stable for the arena's lifetime and shared by every
/// subsequent intern of an equal string. Handles are [`NameId`] dense
/// indices.
pub struct StrInterner<'a, M = ()> {
    arena: &'a Arena,
    inner: DenseInterner<NameId, &'a str, M>,
}

impl<'a, M> StrInterner<'a, M> {
    /// Create an empty interner backed by `arena`.
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            arena,
            inner: DenseInterner::new(),
        }
    }

    /// Create an empty interner with pre-allocated table capacity.
    pub fn with_capacity(arena: &'a Arena, capacity: usize) -> Self {
        Self {
            arena,
            inner: DenseInterner::with_capacity(capacity),
        }
    }

    /// Intern `key`, copying it into the arena only on first insertion.
    pub fn intern(&mut self, key: &str, meta: M) -> NameId {
        if let Some(id) = self.inner.peek(key) {
            return id;
        }
        let canonical = self.arena.alloc_str(key);
        self.inner.intern(canonical, meta).0
    }

    /// Lookup without insertion.
    pub fn peek(&self, key: &str) -> Option<NameId> {
        self.inner.peek(key)
    }

    /// The canonical arena-owned string for `id`.
    pub fn get(&self, id: NameId) -> Option<&'a str> {
        self.inner.get_by_index(id).map(|(k, _)| *k)
    }

    /// The meta payload for `id`.
    pub fn meta(&self, id: NameId) -> Option<&M> {
        self.inner.meta(id)
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over all records in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (NameId, &'a str, &M)> + '_ {
        self.inner.iter().map(|(i, k, m)| (i, *k, m))
    }
}
