//! Property tests for the dense interner invariants.

use quickcheck_macros::quickcheck;
use rillc_util::{Arena, StrInterner};

#[quickcheck]
fn equal_keys_get_equal_indices(keys: Vec<String>) -> bool {
    let arena = Arena::new();
    let mut interner: StrInterner<'_, ()> = StrInterner::new(&arena);
    let first_pass: Vec<_> = keys.iter().map(|k| interner.intern(k, ())).collect();
    let second_pass: Vec<_> = keys.iter().map(|k| interner.intern(k, ())).collect();
    first_pass == second_pass
}

#[quickcheck]
fn dense_indices_are_contiguous(keys: Vec<String>) -> bool {
    let arena = Arena::new();
    let mut interner: StrInterner<'_, ()> = StrInterner::new(&arena);
    for k in &keys {
        interner.intern(k, ());
    }
    let result = interner
        .iter()
        .enumerate()
        .all(|(expected, (id, _, _))| id.index() == expected);
    result
}

#[quickcheck]
fn get_inverts_intern(keys: Vec<String>) -> bool {
    let arena = Arena::new();
    let mut interner: StrInterner<'_, ()> = StrInterner::new(&arena);
    keys.iter().all(|k| {
        let id = interner.intern(k, ());
        interner.get(id) == Some(k.as_str())
    })
}

#[quickcheck]
fn peek_none_iff_first_insertion(keys: Vec<String>) -> bool {
    let arena = Arena::new();
    let mut interner: StrInterner<'_, ()> = StrInterner::new(&arena);
    keys.iter().all(|k| {
        let peeked = interner.peek(k);
        let id = interner.intern(k, ());
        match peeked {
            Some(existing) => existing == id,
            None => interner.peek(k) == Some(id),
        }
    })
}
