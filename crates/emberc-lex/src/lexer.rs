//! Main lexer implementation (spec §4.1).
//!
//! The lexer is direct-coded rather than table-driven: each punctuation
//! character that can start a multi-character operator gets its own small
//! `lex_*` method that does one character of lookahead. This is slower to
//! write than a transition table but far easier to read and to extend —
//! the tradeoff `faxc-lex` makes, and the right one for a hand-maintained
//! toolchain this size.

use emberc_util::{Diagnostic, Handler, Span};

use crate::cursor::Cursor;
use crate::token::Token;

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a mut Handler,
}

/// A token paired with the span it occupies in source.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenWithSpan {
    pub token: Token,
    pub span: Span,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
        }
    }

    /// Returns the next token, and `Token::Eof` forever once input is
    /// exhausted (spec §4.1: "terminates with EOF tokens thereafter").
    pub fn next_token(&mut self) -> Token {
        self.next_token_spanned().token
    }

    pub fn next_token_spanned(&mut self) -> TokenWithSpan {
        self.skip_whitespace();

        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.spanned(Token::Eof, start, start_line, start_column);
        }

        let token = match self.cursor.current() {
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            ':' => self.single(Token::Colon),
            '*' => self.single(Token::Asterisk),
            '/' => self.single(Token::Slash),
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_lt(),
            '>' => self.lex_gt(),
            '"' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => self.lex_identifier(),
            c => {
                self.cursor.advance();
                self.report_illegal(c, start, start_line, start_column);
                Token::Illegal(c.to_string())
            }
        };

        self.spanned(token, start, start_line, start_column)
    }

    fn spanned(&self, token: Token, start: usize, line: u32, column: u32) -> TokenWithSpan {
        TokenWithSpan {
            token,
            span: self.cursor.span_from(start, line, column),
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.cursor.advance();
        token
    }

    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == '+' {
            self.cursor.advance();
            Token::PlusPlus
        } else {
            Token::Plus
        }
    }

    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == '-' {
            self.cursor.advance();
            Token::MinusMinus
        } else {
            Token::Minus
        }
    }

    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == '=' {
            self.cursor.advance();
            Token::Eq
        } else {
            Token::Assign
        }
    }

    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == '=' {
            self.cursor.advance();
            Token::NotEq
        } else {
            Token::Bang
        }
    }

    fn lex_lt(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == '=' {
            self.cursor.advance();
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    fn lex_gt(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current() == '=' {
            self.cursor.advance();
            Token::GtEq
        } else {
            Token::Gt
        }
    }

    /// `"..."` — no escape processing; the body is whatever lies between
    /// the opening quote and the next unescaped `"` (spec §4.1).
    fn lex_string(&mut self) -> Token {
        self.cursor.advance(); // opening quote
        let start = self.cursor.position();
        while self.cursor.current() != '"' && !self.cursor.is_at_end() {
            self.cursor.advance();
        }
        let end = self.cursor.position();
        let text = self.cursor.slice(start, end);
        if self.cursor.is_at_end() {
            self.handler.report(Diagnostic::error(
                "unterminated string literal",
                self.cursor.span_from(start, self.cursor.line(), self.cursor.column()),
            ));
        } else {
            self.cursor.advance(); // closing quote
        }
        Token::Str(emberc_util::Symbol::intern(text))
    }

    /// An all-digit run classifies as `Int`; spec doesn't require floats,
    /// overflow/underflow, or alternate bases.
    fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }
        let text = self.cursor.slice(start, self.cursor.position());
        match text.parse::<i64>() {
            Ok(n) => Token::Int(n),
            Err(_) => {
                self.handler.report(Diagnostic::error(
                    format!("integer literal out of range: {text}"),
                    self.cursor.span_from(start, self.cursor.line(), self.cursor.column()),
                ));
                Token::Illegal(text.to_string())
            }
        }
    }

    /// An identifier/keyword run: letters, digits and `_`, not starting
    /// with a digit (enforced by the dispatch in `next_token_spanned`).
    fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice(start, self.cursor.position());
        Token::keyword_or_ident(text)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.current(), ' ' | '\t' | '\n' | '\r') {
            self.cursor.advance();
        }
    }

    fn report_illegal(&mut self, c: char, start: usize, line: u32, column: u32) {
        self.handler.report(Diagnostic::error(
            format!("unexpected character '{c}'"),
            self.cursor.span_from(start, line, column),
        ));
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Adapts a [`Lexer`] to a token iterator, stopping at `Eof` (used by the
/// parser to materialize the whole stream up front).
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token == Token::Eof {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberc_util::Handler;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok == Token::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn next_token_basic_operators() {
        let tokens = lex_all("=+(){},;");
        assert_eq!(
            tokens,
            vec![
                Token::Assign,
                Token::Plus,
                Token::LParen,
                Token::RParen,
                Token::LBrace,
                Token::RBrace,
                Token::Comma,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn next_token_let_statement() {
        let tokens = lex_all("let five = 5;");
        assert_eq!(
            tokens,
            vec![
                Token::Let,
                Token::Ident(emberc_util::Symbol::intern("five")),
                Token::Assign,
                Token::Int(5),
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn next_token_function_literal() {
        let tokens = lex_all("let add = fn(x, y) { x + y; };");
        assert!(tokens.contains(&Token::Function));
        assert!(tokens.contains(&Token::Ident(emberc_util::Symbol::intern("x"))));
    }

    #[test]
    fn next_token_multi_char_operators() {
        let tokens = lex_all("10 == 10; 10 != 9; a <= b; a >= b; a++; a--;");
        assert!(tokens.contains(&Token::Eq));
        assert!(tokens.contains(&Token::NotEq));
        assert!(tokens.contains(&Token::LtEq));
        assert!(tokens.contains(&Token::GtEq));
        assert!(tokens.contains(&Token::PlusPlus));
        assert!(tokens.contains(&Token::MinusMinus));
    }

    #[test]
    fn next_token_keywords() {
        let tokens = lex_all("if else return true false");
        assert_eq!(
            tokens,
            vec![
                Token::If,
                Token::Else,
                Token::Return,
                Token::True,
                Token::False,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn next_token_string_literal() {
        let tokens = lex_all("\"foobar\" \"foo bar\"");
        assert_eq!(
            tokens,
            vec![
                Token::Str(emberc_util::Symbol::intern("foobar")),
                Token::Str(emberc_util::Symbol::intern("foo bar")),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn next_token_array_and_hash_delimiters() {
        let tokens = lex_all("[1, 2]; {\"a\": 1}");
        assert!(tokens.contains(&Token::LBracket));
        assert!(tokens.contains(&Token::RBracket));
        assert!(tokens.contains(&Token::Colon));
    }

    #[test]
    fn next_token_unknown_character_is_illegal() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("@", &mut handler);
        assert_eq!(lexer.next_token(), Token::Illegal("@".to_string()));
        assert!(handler.has_errors());
    }

    #[test]
    fn next_token_after_eof_keeps_returning_eof() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("", &mut handler);
        assert_eq!(lexer.next_token(), Token::Eof);
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn unterminated_string_reports_error_but_still_yields_a_token() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("\"unterminated", &mut handler);
        assert_eq!(
            lexer.next_token(),
            Token::Str(emberc_util::Symbol::intern("unterminated"))
        );
        assert!(handler.has_errors());
    }
}
