//! rillc-lex - Lexical Analyzer
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! The lexer transforms source text into a token sequence. Each token carries
//! its kind, a lexeme slice borrowed from the source buffer, a line/column
//! span, and - for identifiers, keywords and string literals - a handle into
//! one of the lexer's three interning tables:
//!
//!   - KEYWORDS: pre-populated before scanning begins, with each keyword's
//!     token kind stored as the record's meta. Identifier-shaped lexemes are
//!     looked up here with `peek` (no insertion on miss), so the keyword
//!     table never grows.
//!   - IDENTIFIERS: every non-keyword identifier, interned on first sight.
//!     The dense index of an identifier record is what scopes are indexed by
//!     later, which makes these records the identity foundation of the whole
//!     front-end.
//!   - STRINGS: string literal *contents*, after escape processing. Equal
//!     strings share a record no matter how they were escaped in source.
//!
//! Numeric literals are tagged (`IntLit`/`FloatLit`) but not decoded; the
//! parser converts digits to values. Char literals are decoded here and the
//! codepoint travels on the token.
//!
//! Comments and whitespace are skipped. An unterminated block comment emits
//! a diagnostic and lexing resumes (and immediately ends) at end of input.
//! Bytes the scanner does not recognize become `Unknown` tokens; the parser
//! reports them if it ever looks at them.
//!
//! ============================================================================

pub mod cursor;
mod scan;

pub use scan::Lexer;

use rillc_util::{Arena, Diagnostics, NameId, Span, StrInterner};

/// The kind of a lexical token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // -- keywords --
    /// "fn" - function declaration / function type
    Fn,
    /// "if"
    If,
    /// "else"
    Else,
    /// "while"
    While,
    /// "for"
    For,
    /// "return"
    Return,
    /// "break"
    Break,
    /// "continue"
    Continue,
    /// "const" - constant variable modifier
    Const,

    // -- primitive type keywords --
    /// "i32"
    I32,
    /// "i64"
    I64,
    /// "bool"
    Bool,
    /// "f32"
    F32,
    /// "f64"
    F64,
    /// "str"
    Str,
    /// "char"
    Char,

    // -- literal keywords --
    /// "true"
    True,
    /// "false"
    False,

    // -- operators --
    /// "++"
    PlusPlus,
    /// "--"
    MinusMinus,
    /// "+="
    PlusEq,
    /// "-="
    MinusEq,
    /// "*="
    StarEq,
    /// "/="
    SlashEq,
    /// "%="
    PercentEq,
    /// "=="
    EqEq,
    /// "!="
    BangEq,
    /// "<="
    LtEq,
    /// ">="
    GtEq,
    /// "&&"
    AndAnd,
    /// "||"
    OrOr,
    /// "->"
    Arrow,
    /// "="
    Assign,
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "/"
    Slash,
    /// "%"
    Percent,
    /// "!"
    Bang,
    /// "&"
    Amp,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "."
    Dot,

    // -- punctuation --
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "{"
    LBrace,
    /// "}"
    RBrace,
    /// "["
    LBracket,
    /// "]"
    RBracket,
    /// ","
    Comma,
    /// ";"
    Semicolon,
    /// ":"
    Colon,
    /// "|"
    Pipe,

    // -- literals --
    /// Integer literal digits; decoded by the parser
    IntLit,
    /// Float literal digits; decoded by the parser
    FloatLit,
    /// String literal; contents interned in the strings table
    StringLit,
    /// Char literal; decoded codepoint on the token
    CharLit,

    // -- misc --
    /// Identifier; record interned in the identifiers table
    Identifier,
    /// Comment token kind. Reserved: comments are currently skipped and
    /// never reach the token stream.
    Comment,
    /// End of input
    Eof,
    /// A byte the scanner does not recognize
    Unknown,
}

impl TokenKind {
    /// True for the primitive type keywords (`i32` .. `char`).
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::I32
                | TokenKind::I64
                | TokenKind::Bool
                | TokenKind::F32
                | TokenKind::F64
                | TokenKind::Str
                | TokenKind::Char
        )
    }

    /// True for the literal-producing kinds.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::StringLit
                | TokenKind::CharLit
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Short human-readable name used in diagnostics and token dumps.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Fn => "fn",
            If => "if",
            Else => "else",
            While => "while",
            For => "for",
            Return => "return",
            Break => "break",
            Continue => "continue",
            Const => "const",
            I32 => "i32",
            I64 => "i64",
            Bool => "bool",
            F32 => "f32",
            F64 => "f64",
            Str => "str",
            Char => "char",
            True => "true",
            False => "false",
            PlusPlus => "++",
            MinusMinus => "--",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            EqEq => "==",
            BangEq => "!=",
            LtEq => "<=",
            GtEq => ">=",
            AndAnd => "&&",
            OrOr => "||",
            Arrow => "->",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Bang => "!",
            Amp => "&",
            Lt => "<",
            Gt => ">",
            Dot => ".",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Comma => ",",
            Semicolon => ";",
            Colon => ":",
            Pipe => "|",
            IntLit => "integer literal",
            FloatLit => "float literal",
            StringLit => "string literal",
            CharLit => "char literal",
            Identifier => "identifier",
            Comment => "comment",
            Eof => "end of input",
            Unknown => "unknown token",
        }
    }
}

/// Extra data attached to a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenPayload {
    /// No payload
    None,
    /// Interned record of an identifier or keyword
    Name(NameId),
    /// Interned record in the strings table (escape-processed contents)
    Str(NameId),
    /// Decoded char literal codepoint
    Char(char),
}

/// A lexical token.
///
/// The lexeme borrows from the source buffer, so the source must outlive
/// every consumer of the token sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'src> {
    /// Token kind
    pub kind: TokenKind,
    /// The exact source text of the token
    pub lexeme: &'src str,
    /// Source range
    pub span: Span,
    /// Interned record or decoded codepoint, when applicable
    pub payload: TokenPayload,
}

impl<'src> Token<'src> {
    /// The identifier/keyword record, if this token carries one.
    pub fn name(&self) -> Option<NameId> {
        match self.payload {
            TokenPayload::Name(id) => Some(id),
            _ => None,
        }
    }

    /// The strings-table record for a string literal.
    pub fn string_record(&self) -> Option<NameId> {
        match self.payload {
            TokenPayload::Str(id) => Some(id),
            _ => None,
        }
    }

    /// The decoded codepoint for a char literal.
    pub fn char_value(&self) -> Option<char> {
        match self.payload {
            TokenPayload::Char(c) => Some(c),
            _ => None,
        }
    }
}

/// Keyword table used to pre-populate the keyword interner, each entry
/// carrying the keyword's token kind as interner meta.
pub(crate) const KEYWORDS: &[(&str, TokenKind)] = &[
    ("fn", TokenKind::Fn),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("for", TokenKind::For),
    ("return", TokenKind::Return),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("const", TokenKind::Const),
    ("i32", TokenKind::I32),
    ("i64", TokenKind::I64),
    ("bool", TokenKind::Bool),
    ("f32", TokenKind::F32),
    ("f64", TokenKind::F64),
    ("str", TokenKind::Str),
    ("char", TokenKind::Char),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
];

/// Everything the lexer produces: the token sequence plus the three
/// interning tables, which later phases keep reading.
pub struct Lexed<'a> {
    /// Tokens in source order, ending with exactly one `Eof`
    pub tokens: Vec<Token<'a>>,
    /// Keyword records; meta is the keyword's token kind
    pub keywords: StrInterner<'a, TokenKind>,
    /// Identifier records; dense indices index scope slot arrays
    pub identifiers: StrInterner<'a, ()>,
    /// String literal contents
    pub strings: StrInterner<'a, ()>,
}

/// Lex `source` to completion.
///
/// The arena backs the canonical interned strings; it must outlive the
/// returned tables. Lexical diagnostics (currently only
/// `UnterminatedComment`) are appended to `diags`.
pub fn lex<'a>(arena: &'a Arena, source: &'a str, diags: &mut Diagnostics) -> Lexed<'a> {
    let mut lexer = Lexer::new(arena, source);
    let tokens = lexer.run(diags);
    let (keywords, identifiers, strings) = lexer.into_interners();
    Lexed {
        tokens,
        keywords,
        identifiers,
        strings,
    }
}

#[cfg(test)]
mod edge_cases;
