//! Diagnostic model - tagged error records with spans and payloads.
//!
//! Every user-visible failure is a [`Diagnostic`]: a closed [`DiagnosticKind`]
//! carrying a kind-specific payload, plus the source [`Span`] it points at.
//! Diagnostics accumulate in a [`Diagnostics`] list that owns the filename
//! for the compilation and preserves emission order (lex/parse errors first
//! when present, then semantic errors in source order).
//!
//! The core never formats diagnostics; rendering is the embedding host's
//! job. Payloads therefore carry structured data - handles for canonical
//! types, copied names, counts - not prebuilt strings.
//!
//! # Examples
//!
//! ```
//! use rillc_util::diagnostic::{DiagnosticKind, Diagnostics};
//! use rillc_util::span::Span;
//!
//! let mut diags = Diagnostics::new("demo.rl");
//! diags.emit(
//!     DiagnosticKind::Undeclared { name: "y".into() },
//!     Span::new(1, 10, 1, 11),
//! );
//! assert!(diags.has_errors());
//! assert_eq!(diags.len(), 1);
//! ```

use std::fmt;

use crate::ids::TypeId;
use crate::span::Span;

/// Diagnostic severity level.
///
/// # Examples
///
/// ```
/// use rillc_util::diagnostic::Level;
///
/// assert_eq!(format!("{}", Level::Error), "error");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents compilation
    Error,
    /// A warning that doesn't prevent compilation
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// Stable identifier for a diagnostic kind.
///
/// Numbering convention: `E1xxx` lexical, `E2xxx` syntactic, `E3xxx`
/// semantic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticCode {
    /// Numeric code
    pub code: u16,
    /// Short snake_case name
    pub name: &'static str,
}

impl DiagnosticCode {
    /// Create a new diagnostic code.
    pub const fn new(code: u16, name: &'static str) -> Self {
        Self { code, name }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code)
    }
}

/// The closed set of diagnostics the front-end can produce.
///
/// Parse-error kinds appear at most once per compilation (first error wins);
/// semantic kinds accumulate.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticKind {
    // -- lexical --
    /// A `/* ... */` comment was still open at end of input.
    UnterminatedComment,

    // -- syntactic --
    /// The parser found a token other than the one a production required.
    UnexpectedToken {
        /// Human description of what was required, e.g. "';'"
        expected: Box<str>,
        /// The lexeme actually found
        found: Box<str>,
    },
    /// Input ended inside a production.
    UnexpectedEof {
        /// Human description of what was required
        expected: Box<str>,
    },
    /// Tokens remained after the last top-level declaration.
    TrailingTokens,

    // -- semantic: names --
    /// A type expression named something that is not a type.
    UnknownType { name: Box<str> },
    /// A symbol was defined twice in the same scope.
    Redeclaration { name: Box<str> },
    /// Use of a name with no visible definition.
    Undeclared { name: Box<str> },

    // -- semantic: arity --
    /// Call argument count differs from the callee's parameter count.
    ArgCountMismatch { expected: usize, actual: usize },

    // -- semantic: types --
    /// An expression's type does not match (and cannot be implicitly cast
    /// to) the required type.
    TypeMismatch { expected: TypeId, actual: TypeId },
    /// A `return` does not match the function's declared return type
    /// (value returned from a void function, or nothing from a non-void one).
    ReturnMismatch {
        expected: TypeId,
        /// `None` for a bare `return;`
        actual: Option<TypeId>,
    },
    /// A variable's declared type failed to resolve.
    VariableTypeResolutionFailed { name: Box<str> },

    // -- semantic: structure --
    /// Initializer-list nesting depth differs from the array type's rank.
    DimensionMismatch { expected: usize, actual: usize },
    /// Initializer element count differs from the declared array size.
    ArraySizeMismatch { expected: i64, actual: usize },
    /// An initializer element was a scalar where a nested array was needed.
    ExpectedArray { expected: TypeId, actual: TypeId },
    /// An initializer list appeared where no array type was expected.
    UnexpectedList {
        /// The non-array expected type, if there was one
        expected: Option<TypeId>,
    },

    // -- semantic: operators --
    /// Invalid operand types for a binary operator.
    BinopMismatch {
        op: &'static str,
        lhs: TypeId,
        rhs: TypeId,
    },
    /// Invalid operand type for a unary operator.
    UnopMismatch { op: &'static str, operand: TypeId },

    // -- semantic: usage --
    /// Call target is not a function.
    NotCallable { actual: TypeId },
    /// Subscript target is neither an array nor a pointer.
    NotIndexable { actual: TypeId },
    /// Field access on a type with no such field.
    FieldAccess { name: Box<str> },
    /// Assignment to a `const` symbol.
    ConstAssign { name: Box<str> },

    // -- semantic: constness / lvalues --
    /// An array size expression did not fold to a constant integer.
    NotConst,
    /// An operation required an lvalue and did not get one.
    NotLvalue,
    /// `break` or `continue` outside of any loop.
    OutsideLoop { keyword: &'static str },
}

impl DiagnosticKind {
    /// The severity of this kind. Every kind the front-end currently
    /// produces is an error.
    pub fn level(&self) -> Level {
        Level::Error
    }

    /// The stable code for this kind.
    pub fn code(&self) -> DiagnosticCode {
        use DiagnosticKind::*;
        match self {
            UnterminatedComment => DiagnosticCode::new(1001, "unterminated_comment"),
            UnexpectedToken { .. } => DiagnosticCode::new(2001, "unexpected_token"),
            UnexpectedEof { .. } => DiagnosticCode::new(2002, "unexpected_eof"),
            TrailingTokens => DiagnosticCode::new(2003, "trailing_tokens"),
            UnknownType { .. } => DiagnosticCode::new(3001, "unknown_type"),
            Redeclaration { .. } => DiagnosticCode::new(3002, "redeclaration"),
            Undeclared { .. } => DiagnosticCode::new(3003, "undeclared"),
            ArgCountMismatch { .. } => DiagnosticCode::new(3004, "arg_count_mismatch"),
            TypeMismatch { .. } => DiagnosticCode::new(3005, "type_mismatch"),
            ReturnMismatch { .. } => DiagnosticCode::new(3006, "return_mismatch"),
            VariableTypeResolutionFailed { .. } => {
                DiagnosticCode::new(3007, "variable_type_resolution_failed")
            }
            DimensionMismatch { .. } => DiagnosticCode::new(3008, "dimension_mismatch"),
            ArraySizeMismatch { .. } => DiagnosticCode::new(3009, "array_size_mismatch"),
            ExpectedArray { .. } => DiagnosticCode::new(3010, "expected_array"),
            UnexpectedList { .. } => DiagnosticCode::new(3011, "unexpected_list"),
            BinopMismatch { .. } => DiagnosticCode::new(3012, "binop_mismatch"),
            UnopMismatch { .. } => DiagnosticCode::new(3013, "unop_mismatch"),
            NotCallable { .. } => DiagnosticCode::new(3014, "not_callable"),
            NotIndexable { .. } => DiagnosticCode::new(3015, "not_indexable"),
            FieldAccess { .. } => DiagnosticCode::new(3016, "field_access"),
            ConstAssign { .. } => DiagnosticCode::new(3017, "const_assign"),
            NotConst => DiagnosticCode::new(3018, "not_const"),
            NotLvalue => DiagnosticCode::new(3019, "not_lvalue"),
            OutsideLoop { .. } => DiagnosticCode::new(3020, "outside_loop"),
        }
    }

    /// True for the parse-error kinds, of which at most one may appear per
    /// compilation.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::UnexpectedToken { .. }
                | DiagnosticKind::UnexpectedEof { .. }
                | DiagnosticKind::TrailingTokens
        )
    }
}

/// A single diagnostic record.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// What went wrong, with its payload
    pub kind: DiagnosticKind,
    /// Where in the source
    pub span: Span,
}

impl Diagnostic {
    /// The severity of this diagnostic.
    pub fn level(&self) -> Level {
        self.kind.level()
    }

    /// The stable code of this diagnostic.
    pub fn code(&self) -> DiagnosticCode {
        self.kind.code()
    }
}

/// Ordered diagnostic list for one compilation.
///
/// Owns the filename so individual records stay small. Emission order is
/// preserved; the analyzer never stops early, so a single run surfaces
/// every semantic error.
pub struct Diagnostics {
    filename: Box<str>,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty list for the given file.
    pub fn new(filename: impl Into<Box<str>>) -> Self {
        Self {
            filename: filename.into(),
            entries: Vec::new(),
        }
    }

    /// The filename all records in this list refer to.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Append a diagnostic.
    pub fn emit(&mut self, kind: DiagnosticKind, span: Span) {
        self.entries.push(Diagnostic { kind, span });
    }

    /// True if any error-level diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.level() == Level::Error)
    }

    /// Number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.level() == Level::Error)
            .count()
    }

    /// Number of diagnostics of any level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no diagnostics have been emitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first diagnostic, if any.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.entries.first()
    }

    /// Iterate over all diagnostics in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}
