//! The scanner: source text in, tokens out.

use rillc_util::{Arena, DiagnosticKind, Diagnostics, Span, StrInterner};

use crate::cursor::Cursor;
use crate::{Token, TokenKind, TokenPayload, KEYWORDS};

/// Growth hint for the token vector.
const INITIAL_TOKEN_CAPACITY: usize = 256;

#[inline]
fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Map the character after a backslash to the character it denotes.
/// Unknown escapes fall through to the escaped character itself.
#[inline]
fn escape_char(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '\\' => '\\',
        '"' => '"',
        '\'' => '\'',
        '0' => '\0',
        other => other,
    }
}

/// Rebuild a string literal's contents with escapes processed.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escape_char(escaped)),
                None => break,
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// The lexer owns the cursor and the three interning tables.
///
/// Create one per compilation, call [`Lexer::run`] once, then recover the
/// tables with [`Lexer::into_interners`] - or use the [`crate::lex`]
/// convenience wrapper which does all three.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    keywords: StrInterner<'a, TokenKind>,
    identifiers: StrInterner<'a, ()>,
    strings: StrInterner<'a, ()>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `source`, pre-populating the keyword table.
    pub fn new(arena: &'a Arena, source: &'a str) -> Self {
        let mut keywords = StrInterner::with_capacity(arena, KEYWORDS.len());
        for (word, kind) in KEYWORDS {
            keywords.intern(word, *kind);
        }
        Self {
            cursor: Cursor::new(source),
            keywords,
            identifiers: StrInterner::with_capacity(arena, 128),
            strings: StrInterner::with_capacity(arena, 16),
        }
    }

    /// Lex everything, returning the token sequence terminated by `Eof`.
    pub fn run(&mut self, diags: &mut Diagnostics) -> Vec<Token<'a>> {
        let mut tokens = Vec::with_capacity(INITIAL_TOKEN_CAPACITY);
        loop {
            let token = self.next_token(diags);
            let at_end = token.kind == TokenKind::Eof;
            tokens.push(token);
            if at_end {
                break;
            }
        }
        tokens
    }

    /// Give up ownership of the interning tables.
    pub fn into_interners(
        self,
    ) -> (
        StrInterner<'a, TokenKind>,
        StrInterner<'a, ()>,
        StrInterner<'a, ()>,
    ) {
        (self.keywords, self.identifiers, self.strings)
    }

    /// Skip whitespace, line comments and block comments.
    fn skip_trivia(&mut self, diags: &mut Diagnostics) {
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_whitespace() => {
                    self.cursor.bump();
                }
                Some('/') if self.cursor.peek_second() == Some('/') => {
                    self.cursor.bump_while(|c| c != '\n');
                }
                Some('/') if self.cursor.peek_second() == Some('*') => {
                    let (start_line, start_col) = self.cursor.point();
                    self.cursor.bump(); // '/'
                    self.cursor.bump(); // '*'
                    let mut closed = false;
                    while let Some(c) = self.cursor.bump() {
                        if c == '*' && self.cursor.bump_if('/') {
                            closed = true;
                            break;
                        }
                    }
                    if !closed {
                        let (end_line, end_col) = self.cursor.point();
                        diags.emit(
                            DiagnosticKind::UnterminatedComment,
                            Span::new(start_line, start_col, end_line, end_col),
                        );
                    }
                }
                _ => break,
            }
        }
    }

    /// Produce the next token.
    pub fn next_token(&mut self, diags: &mut Diagnostics) -> Token<'a> {
        self.skip_trivia(diags);

        let start_pos = self.cursor.pos();
        let (start_line, start_col) = self.cursor.point();

        let Some(c) = self.cursor.bump() else {
            return Token {
                kind: TokenKind::Eof,
                lexeme: self.cursor.slice(start_pos, start_pos),
                span: Span::point(start_line, start_col),
                payload: TokenPayload::None,
            };
        };

        let (kind, payload) = if is_ident_start(c) {
            self.scan_ident(start_pos)
        } else if c.is_ascii_digit() {
            (self.scan_number(), TokenPayload::None)
        } else if c == '"' {
            self.scan_string(start_pos)
        } else if c == '\'' {
            self.scan_char()
        } else {
            (self.scan_operator(c), TokenPayload::None)
        };

        let (end_line, end_col) = self.cursor.point();
        Token {
            kind,
            lexeme: self.cursor.slice(start_pos, self.cursor.pos()),
            span: Span::new(start_line, start_col, end_line, end_col),
            payload,
        }
    }

    /// Identifier or keyword. The keyword table is consulted with `peek`,
    /// so a miss inserts nothing there.
    fn scan_ident(&mut self, start_pos: usize) -> (TokenKind, TokenPayload) {
        self.cursor.bump_while(is_ident_continue);
        let lexeme = self.cursor.slice(start_pos, self.cursor.pos());

        if let Some(record) = self.keywords.peek(lexeme) {
            let kind = self
                .keywords
                .meta(record)
                .copied()
                .unwrap_or(TokenKind::Identifier);
            return (kind, TokenPayload::Name(record));
        }

        let record = self.identifiers.intern(lexeme, ());
        (TokenKind::Identifier, TokenPayload::Name(record))
    }

    /// Decimal integer, or float when a '.' is followed by another digit.
    /// Digit-to-value conversion is left to the parser.
    fn scan_number(&mut self) -> TokenKind {
        self.cursor.bump_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self
                .cursor
                .peek_second()
                .is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.bump(); // '.'
            self.cursor.bump_while(|c| c.is_ascii_digit());
            return TokenKind::FloatLit;
        }
        TokenKind::IntLit
    }

    /// String literal. The unescaped contents are interned in the strings
    /// table; an unterminated literal becomes an `Unknown` token.
    fn scan_string(&mut self, start_pos: usize) -> (TokenKind, TokenPayload) {
        loop {
            match self.cursor.bump() {
                None => return (TokenKind::Unknown, TokenPayload::None),
                Some('"') => break,
                Some('\\') => {
                    self.cursor.bump();
                }
                Some(_) => {}
            }
        }
        // Strip the surrounding quotes, then process escapes.
        let raw = self.cursor.slice(start_pos + 1, self.cursor.pos() - 1);
        let contents = unescape(raw);
        let record = self.strings.intern(&contents, ());
        (TokenKind::StringLit, TokenPayload::Str(record))
    }

    /// Char literal, decoded to its codepoint here.
    fn scan_char(&mut self) -> (TokenKind, TokenPayload) {
        let decoded = match self.cursor.bump() {
            None => return (TokenKind::Unknown, TokenPayload::None),
            Some('\\') => match self.cursor.bump() {
                None => return (TokenKind::Unknown, TokenPayload::None),
                Some(escaped) => escape_char(escaped),
            },
            Some(c) => c,
        };
        if !self.cursor.bump_if('\'') {
            return (TokenKind::Unknown, TokenPayload::None);
        }
        (TokenKind::CharLit, TokenPayload::Char(decoded))
    }

    /// Operators and punctuation; longest match first.
    fn scan_operator(&mut self, first: char) -> TokenKind {
        match first {
            '+' => {
                if self.cursor.bump_if('+') {
                    TokenKind::PlusPlus
                } else if self.cursor.bump_if('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.cursor.bump_if('-') {
                    TokenKind::MinusMinus
                } else if self.cursor.bump_if('=') {
                    TokenKind::MinusEq
                } else if self.cursor.bump_if('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.cursor.bump_if('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.cursor.bump_if('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.cursor.bump_if('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            '=' => {
                if self.cursor.bump_if('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.cursor.bump_if('=') {
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.cursor.bump_if('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.cursor.bump_if('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.cursor.bump_if('&') {
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.cursor.bump_if('|') {
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            _ => TokenKind::Unknown,
        }
    }
}
