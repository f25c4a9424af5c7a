//! Lexically nested symbol tables.
//!
//! A scope is a flat slot array indexed by the *dense index* of the
//! symbol's interned name: defining or finding a symbol is a single array
//! access, no hashing. Scopes form a tree through parent links; lookup
//! walks toward the root.
//!
//! Scopes carry a namespace kind so that identifier lookups and
//! keyword/primitive lookups can never observe each other's entries, even
//! though dense indices from the two interners overlap numerically.

use rillc_par::ast::ConstValue;
use rillc_util::{IndexVec, NameId, ScopeId, Span, TypeId};

/// Which interner a scope's slot indices come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    /// User identifiers
    Identifiers,
    /// Keywords and primitive type names
    Keywords,
}

/// Symbol flag bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolFlags(u8);

impl SymbolFlags {
    pub const NONE: SymbolFlags = SymbolFlags(0);
    /// Declared with `const`
    pub const CONST: SymbolFlags = SymbolFlags(1 << 0);
    /// A compile-time value has been computed and stored
    pub const COMPUTED_VALUE: SymbolFlags = SymbolFlags(1 << 1);
    /// Referenced at least once
    pub const USED: SymbolFlags = SymbolFlags(1 << 2);
    /// Has an initializer
    pub const INITIALIZED: SymbolFlags = SymbolFlags(1 << 3);

    /// True if every bit of `other` is set in `self`.
    #[inline]
    pub fn contains(self, other: SymbolFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: SymbolFlags) {
        self.0 |= other.0;
    }
}

/// Symbol value category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Int,
    Float,
    Bool,
    Function,
    /// A type name (reserved for user-defined types)
    Type,
    /// Any other variable
    Var,
}

/// A named entity visible in some scope.
#[derive(Clone, Debug)]
pub struct Symbol {
    /// Interned name record
    pub name: NameId,
    /// Canonical semantic type
    pub ty: TypeId,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
    /// Span of the declaration
    pub span: Span,
    /// Compile-time value, present when `COMPUTED_VALUE` is set
    pub value: Option<ConstValue>,
}

/// Redeclaration signal from [`ScopeTree::define`].
#[derive(Debug, PartialEq, Eq)]
pub struct Redeclared;

/// One scope: a slot array plus tree metadata.
#[derive(Debug)]
pub struct Scope {
    /// Slot per dense name index; `None` until defined
    slots: Vec<Option<Symbol>>,
    parent: Option<ScopeId>,
    kind: Namespace,
    depth: u32,
    live: usize,
}

/// All scopes of one compilation, addressed by [`ScopeId`].
pub struct ScopeTree {
    scopes: IndexVec<ScopeId, Scope>,
}

impl ScopeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            scopes: IndexVec::new(),
        }
    }

    /// Create a scope. `capacity` is a slot-count hint, normally the size
    /// of the identifier table; the slot array grows if a larger dense
    /// index is defined later.
    pub fn create(
        &mut self,
        parent: Option<ScopeId>,
        capacity: usize,
        kind: Namespace,
    ) -> ScopeId {
        let depth = match parent {
            Some(p) => self.scopes[p].depth + 1,
            None => 0,
        };
        self.scopes.push(Scope {
            slots: (0..capacity).map(|_| None).collect(),
            parent,
            kind,
            depth,
            live: 0,
        })
    }

    /// Nesting depth of a scope (0 = root).
    pub fn depth(&self, scope: ScopeId) -> u32 {
        self.scopes[scope].depth
    }

    /// Number of symbols defined in a scope.
    pub fn symbol_count(&self, scope: ScopeId) -> usize {
        self.scopes[scope].live
    }

    /// Define a symbol in `scope` at the slot of its name's dense index.
    /// Fails if the slot is already occupied.
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol) -> Result<(), Redeclared> {
        let slot = symbol.name.index();
        let scope = &mut self.scopes[scope];
        if slot >= scope.slots.len() {
            scope.slots.resize_with(slot + 1, || None);
        }
        if scope.slots[slot].is_some() {
            return Err(Redeclared);
        }
        scope.slots[slot] = Some(symbol);
        scope.live += 1;
        Ok(())
    }

    /// The symbol for `name` in exactly this scope, ignoring parents.
    pub fn lookup_local(&self, scope: ScopeId, name: NameId) -> Option<&Symbol> {
        self.scopes[scope].slots.get(name.index())?.as_ref()
    }

    /// Mutable variant of [`ScopeTree::lookup_local`].
    pub fn lookup_local_mut(&mut self, scope: ScopeId, name: NameId) -> Option<&mut Symbol> {
        self.scopes[scope].slots.get_mut(name.index())?.as_mut()
    }

    /// Walk the parent chain until a symbol is found in a scope whose
    /// namespace matches `ns`, or the root is exhausted.
    pub fn lookup(&self, scope: ScopeId, name: NameId, ns: Namespace) -> Option<&Symbol> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.scopes[id].kind == ns {
                if let Some(symbol) = self.lookup_local(id, name) {
                    return Some(symbol);
                }
            }
            current = self.scopes[id].parent;
        }
        None
    }

    /// Mutable variant of [`ScopeTree::lookup`].
    pub fn lookup_mut(
        &mut self,
        scope: ScopeId,
        name: NameId,
        ns: Namespace,
    ) -> Option<&mut Symbol> {
        let mut current = Some(scope);
        let mut found = None;
        while let Some(id) = current {
            if self.scopes[id].kind == ns
                && self.scopes[id]
                    .slots
                    .get(name.index())
                    .is_some_and(|s| s.is_some())
            {
                found = Some(id);
                break;
            }
            current = self.scopes[id].parent;
        }
        let id = found?;
        self.scopes[id].slots[name.index()].as_mut()
    }

    /// Set the USED flag on the nearest visible symbol of `name`.
    pub fn mark_used(&mut self, scope: ScopeId, name: NameId, ns: Namespace) {
        if let Some(symbol) = self.lookup_mut(scope, name, ns) {
            symbol.flags.insert(SymbolFlags::USED);
        }
    }

    /// Set the INITIALIZED flag on the nearest visible symbol of `name`.
    pub fn mark_initialized(&mut self, scope: ScopeId, name: NameId, ns: Namespace) {
        if let Some(symbol) = self.lookup_mut(scope, name, ns) {
            symbol.flags.insert(SymbolFlags::INITIALIZED);
        }
    }

    /// Visit every symbol defined in `scope`, in dense-index order.
    /// Debugging and introspection hook.
    pub fn for_each_symbol(&self, scope: ScopeId, mut f: impl FnMut(&Symbol)) {
        for slot in &self.scopes[scope].slots {
            if let Some(symbol) = slot {
                f(symbol);
            }
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(name: u32) -> Symbol {
        Symbol {
            name: NameId::new(name),
            ty: TypeId::new(0),
            kind: SymbolKind::Var,
            flags: SymbolFlags::NONE,
            span: Span::DUMMY,
            value: None,
        }
    }

    #[test]
    fn test_define_and_lookup_local() {
        let mut tree = ScopeTree::new();
        let scope = tree.create(None, 8, Namespace::Identifiers);
        tree.define(scope, symbol(3)).unwrap();
        assert!(tree.lookup_local(scope, NameId::new(3)).is_some());
        assert!(tree.lookup_local(scope, NameId::new(4)).is_none());
        assert_eq!(tree.symbol_count(scope), 1);
    }

    #[test]
    fn test_redeclaration_signal() {
        let mut tree = ScopeTree::new();
        let scope = tree.create(None, 8, Namespace::Identifiers);
        tree.define(scope, symbol(1)).unwrap();
        assert_eq!(tree.define(scope, symbol(1)), Err(Redeclared));
    }

    #[test]
    fn test_slot_array_grows_past_capacity_hint() {
        let mut tree = ScopeTree::new();
        let scope = tree.create(None, 2, Namespace::Identifiers);
        tree.define(scope, symbol(100)).unwrap();
        assert!(tree.lookup_local(scope, NameId::new(100)).is_some());
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, 8, Namespace::Identifiers);
        let child = tree.create(Some(root), 8, Namespace::Identifiers);
        tree.define(root, symbol(0)).unwrap();
        assert!(tree
            .lookup(child, NameId::new(0), Namespace::Identifiers)
            .is_some());
        assert!(tree.lookup_local(child, NameId::new(0)).is_none());
    }

    #[test]
    fn test_shadowing_finds_nearest() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, 8, Namespace::Identifiers);
        let child = tree.create(Some(root), 8, Namespace::Identifiers);

        let mut outer = symbol(0);
        outer.kind = SymbolKind::Int;
        tree.define(root, outer).unwrap();

        let mut inner = symbol(0);
        inner.kind = SymbolKind::Float;
        tree.define(child, inner).unwrap();

        let found = tree
            .lookup(child, NameId::new(0), Namespace::Identifiers)
            .unwrap();
        assert_eq!(found.kind, SymbolKind::Float);
    }

    #[test]
    fn test_namespace_kinds_are_disjoint() {
        let mut tree = ScopeTree::new();
        // A keyword scope above an identifier scope: the same dense index
        // exists in both, and each lookup sees only its own namespace.
        let keyword_root = tree.create(None, 8, Namespace::Keywords);
        let ident_scope = tree.create(Some(keyword_root), 8, Namespace::Identifiers);

        let mut keyword_sym = symbol(2);
        keyword_sym.kind = SymbolKind::Type;
        tree.define(keyword_root, keyword_sym).unwrap();

        tree.define(ident_scope, symbol(2)).unwrap();

        let as_ident = tree
            .lookup(ident_scope, NameId::new(2), Namespace::Identifiers)
            .unwrap();
        assert_eq!(as_ident.kind, SymbolKind::Var);

        let as_keyword = tree
            .lookup(ident_scope, NameId::new(2), Namespace::Keywords)
            .unwrap();
        assert_eq!(as_keyword.kind, SymbolKind::Type);
    }

    #[test]
    fn test_depth_tracking() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, 1, Namespace::Identifiers);
        let mid = tree.create(Some(root), 1, Namespace::Identifiers);
        let leaf = tree.create(Some(mid), 1, Namespace::Identifiers);
        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(mid), 1);
        assert_eq!(tree.depth(leaf), 2);
    }

    #[test]
    fn test_mark_used_and_initialized() {
        let mut tree = ScopeTree::new();
        let root = tree.create(None, 4, Namespace::Identifiers);
        let child = tree.create(Some(root), 4, Namespace::Identifiers);
        tree.define(root, symbol(1)).unwrap();

        tree.mark_used(child, NameId::new(1), Namespace::Identifiers);
        tree.mark_initialized(child, NameId::new(1), Namespace::Identifiers);

        let found = tree
            .lookup(root, NameId::new(1), Namespace::Identifiers)
            .unwrap();
        assert!(found.flags.contains(SymbolFlags::USED));
        assert!(found.flags.contains(SymbolFlags::INITIALIZED));
        assert!(!found.flags.contains(SymbolFlags::CONST));
    }

    #[test]
    fn test_for_each_symbol_dense_order() {
        let mut tree = ScopeTree::new();
        let scope = tree.create(None, 8, Namespace::Identifiers);
        tree.define(scope, symbol(5)).unwrap();
        tree.define(scope, symbol(2)).unwrap();
        let mut seen = Vec::new();
        tree.for_each_symbol(scope, |s| seen.push(s.name.index()));
        assert_eq!(seen, vec![2, 5]);
    }

    #[test]
    fn test_flags_bit_ops() {
        let mut flags = SymbolFlags::NONE;
        assert!(!flags.contains(SymbolFlags::CONST));
        flags.insert(SymbolFlags::CONST);
        flags.insert(SymbolFlags::COMPUTED_VALUE);
        assert!(flags.contains(SymbolFlags::CONST));
        assert!(flags.contains(SymbolFlags::COMPUTED_VALUE));
        assert!(!flags.contains(SymbolFlags::USED));
    }
}
