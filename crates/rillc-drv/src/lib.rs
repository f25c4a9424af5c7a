//! rillc-drv - Compilation driver.
//!
//! The driver wires the three phases together behind one entry point:
//!
//! ```text
//! source -> lex -> tokens + interners -> parse -> AST -> sema -> annotated AST
//! ```
//!
//! [`compile`] runs all of it and returns a [`Compilation`]: the token
//! sequence, the AST root (absent when parsing failed), the three interning
//! tables, the type store, the ordered diagnostic list, and phase timings.
//! The core never formats or prints; everything human-readable lives in
//! [`report`] and the `rillc` binary.
//!
//! Lifetimes: the compilation borrows both the source buffer (token
//! lexemes) and the arena (canonical interned strings), so both must
//! outlive it.

pub mod report;

use std::time::Instant;

use rillc_lex::{Lexed, Token, TokenKind};
use rillc_par::ast::Program;
use rillc_sem::TypeStore;
use rillc_util::{Arena, Diagnostics, StrInterner};

/// Everything one compilation produces.
pub struct Compilation<'a> {
    /// Tokens in source order, ending with `Eof`
    pub tokens: Vec<Token<'a>>,
    /// Annotated AST; `None` when parsing failed
    pub program: Option<Program>,
    /// Keyword records (meta: the keyword's token kind)
    pub keywords: StrInterner<'a, TokenKind>,
    /// Identifier records
    pub identifiers: StrInterner<'a, ()>,
    /// String literal contents
    pub strings: StrInterner<'a, ()>,
    /// Canonical semantic types
    pub types: TypeStore,
    /// Ordered diagnostic list
    pub diagnostics: Diagnostics,
    /// Phase timings and sizes
    pub stats: CompileStats,
}

impl Compilation<'_> {
    /// True when the program parsed and no semantic errors were found.
    pub fn succeeded(&self) -> bool {
        self.program.is_some() && !self.diagnostics.has_errors()
    }
}

/// Timings and sizes gathered while compiling.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompileStats {
    pub lex_seconds: f64,
    pub parse_seconds: f64,
    pub sema_seconds: f64,
    pub source_bytes: usize,
    pub token_count: usize,
    pub arena_bytes: usize,
}

/// Compile a source buffer.
///
/// `arena` backs all canonical interned strings and must outlive the
/// returned [`Compilation`]; so must `source`, into which the tokens hold
/// lexeme slices.
pub fn compile<'a>(arena: &'a Arena, source: &'a str, filename: &str) -> Compilation<'a> {
    let mut diagnostics = Diagnostics::new(filename);

    let lex_start = Instant::now();
    let Lexed {
        tokens,
        keywords,
        identifiers,
        strings,
    } = rillc_lex::lex(arena, source, &mut diagnostics);
    let lex_seconds = lex_start.elapsed().as_secs_f64();

    let parse_start = Instant::now();
    let mut program = rillc_par::parse(&tokens, &mut diagnostics);
    let parse_seconds = parse_start.elapsed().as_secs_f64();

    let sema_start = Instant::now();
    let types = match &mut program {
        Some(program) => rillc_sem::analyze(program, &identifiers, &keywords, &mut diagnostics),
        // No AST to analyze; still hand out a store with the primitives so
        // consumers can resolve diagnostics that reference types.
        None => TypeStore::new(&keywords),
    };
    let sema_seconds = sema_start.elapsed().as_secs_f64();

    let stats = CompileStats {
        lex_seconds,
        parse_seconds,
        sema_seconds,
        source_bytes: source.len(),
        token_count: tokens.len(),
        arena_bytes: arena.allocated_bytes(),
    };

    Compilation {
        tokens,
        program,
        keywords,
        identifiers,
        strings,
        types,
        diagnostics,
        stats,
    }
}
