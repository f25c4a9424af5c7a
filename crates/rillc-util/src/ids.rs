//! Shared typed identifiers.
//!
//! Handles into the compilation's dense tables. Each is a `u32` newtype with
//! an [`Idx`](crate::index_vec::Idx) implementation, so the tables can be
//! plain vectors while the type system keeps the ID spaces apart.
//!
//! Dense indices are assigned at first insertion and are stable for the
//! lifetime of their table; `NameId` doubles as the "dense index" of an
//! interned record.

use crate::index_vec::Idx;

/// Handle for an interned byte string (identifier, keyword, or string
/// literal). The numeric value is the record's dense index: the 0-based
/// ordinal at which the key was first interned.
///
/// # Examples
///
/// ```
/// use rillc_util::ids::NameId;
///
/// let id = NameId::new(3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameId(pub u32);

/// Handle for a canonical semantic type in the type store.
///
/// Two structurally equal types always receive the same `TypeId`, so type
/// equality is handle equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Handle for a scope in the scope tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Create from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw index value.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Idx for $name {
            #[inline]
            fn from_usize(idx: usize) -> Self {
                debug_assert!(idx <= u32::MAX as usize);
                Self(idx as u32)
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

impl_id!(NameId);
impl_id!(TypeId);
impl_id!(ScopeId);

static_assertions::assert_eq_size!(NameId, u32);
static_assertions::assert_eq_size!(TypeId, u32);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_vec::Idx as _;

    #[test]
    fn test_name_id_roundtrip() {
        let id = NameId::from_usize(7);
        assert_eq!(id, NameId::new(7));
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Compile-time property; just exercise the constructors.
        let n = NameId::new(0);
        let t = TypeId::new(0);
        let s = ScopeId::new(0);
        assert_eq!(n.index(), t.index());
        assert_eq!(t.index(), s.index());
    }

    #[test]
    fn test_ordering_follows_index() {
        assert!(TypeId::new(1) < TypeId::new(2));
    }
}
