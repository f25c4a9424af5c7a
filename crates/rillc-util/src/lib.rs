//! rillc-util - Core Utilities and Foundation Types
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! This crate provides the foundation every other rillc crate builds on:
//! source spans, typed indices, the compilation arena, dense interning, and
//! the diagnostic model. All of it is designed around one memory discipline:
//!
//!   - a single [`Arena`] is created per compilation unit;
//!   - canonical interned bytes live in the arena and are pointer-stable;
//!   - everything else is addressed through dense `u32` handles
//!     ([`NameId`], [`TypeId`], [`ScopeId`]) into insertion-ordered tables.
//!
//! DESIGN PRINCIPLES:
//! ------------------
//! 1. HANDLES OVER POINTERS
//!    The tables own their entries; consumers hold `Copy` indices. A handle
//!    is meaningful only together with the table that issued it, and the
//!    type system keeps the ID spaces apart.
//!
//! 2. DENSE, STABLE, ORDERED
//!    Interned records receive contiguous 0-based indices at first
//!    insertion, and iteration order is insertion order. Later phases rely
//!    on both properties (scopes are slot arrays indexed by dense name
//!    index; diagnostics preserve source order).
//!
//! 3. PHASES FILL IN, NEVER REWIRE
//!    The lexer creates interner records; the parser builds the tree; the
//!    analyzer fills in types, constness and synthesized casts. No phase
//!    invalidates what an earlier phase produced.
//!
//! ============================================================================

pub mod arena;
pub mod diagnostic;
pub mod error;
pub mod ids;
pub mod index_vec;
pub mod interner;
pub mod span;

pub use arena::Arena;
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticKind, Diagnostics, Level};
pub use error::{LiteralError, LiteralResult};
pub use ids::{NameId, ScopeId, TypeId};
pub use index_vec::{Idx, IndexVec};
pub use interner::{DenseInterner, StrInterner};
pub use span::Span;
