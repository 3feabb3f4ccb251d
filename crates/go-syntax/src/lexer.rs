// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis of Go source text
//!
//! Produces the token stream (with automatically inserted semicolons) and the
//! list of comments, which are kept apart from the tokens for doc attachment.

use crate::error::{ParseError, ParseResult};
use crate::token::{Comment, Span, Token, TokenKind};
use std::path::Path;

/// Output of the lexer
#[derive(Debug, Clone)]
pub struct Tokens {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

pub fn tokenize(path: &Path, text: &str) -> ParseResult<Tokens> {
    Lexer::new(path, text).run()
}

struct Lexer<'a> {
    path: &'a Path,
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    insert_semi: bool,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
}

impl<'a> Lexer<'a> {
    fn new(path: &'a Path, text: &'a str) -> Self {
        Self {
            path,
            text,
            bytes: text.as_bytes(),
            pos: 0,
            insert_semi: false,
            tokens: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn run(mut self) -> ParseResult<Tokens> {
        if self.text.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
        loop {
            self.skip_trivia()?;
            if self.pos >= self.bytes.len() {
                if self.insert_semi {
                    self.push_implicit_semi(self.pos);
                }
                let eof = Span::new(self.pos, self.pos);
                self.tokens.push(Token { kind: TokenKind::Eof, span: eof, implicit: false });
                break;
            }
            let token = self.next_token()?;
            self.insert_semi = token.kind.ends_statement();
            self.tokens.push(token);
        }

        Ok(Tokens {
            tokens: self.tokens,
            comments: self.comments,
        })
    }

    fn error(&self, start: usize, message: impl Into<String>) -> ParseError {
        let end = (start + 1).min(self.bytes.len()).max(start);
        ParseError::new(self.path, Span::new(start, end), message)
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn push_implicit_semi(&mut self, at: usize) {
        self.tokens.push(Token {
            kind: TokenKind::Semicolon,
            span: Span::new(at, at),
            implicit: true,
        });
        self.insert_semi = false;
    }

    /// Skip whitespace and comments, inserting semicolons at line ends
    fn skip_trivia(&mut self) -> ParseResult<()> {
        while let Some(b) = self.peek_byte(0) {
            match b {
                b'\n' => {
                    if self.insert_semi {
                        self.push_implicit_semi(self.pos);
                    }
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    let start = self.pos;
                    while self.peek_byte(0).is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                    self.comments.push(Comment { span: Span::new(start, self.pos) });
                }
                b'/' if self.peek_byte(1) == Some(b'*') => {
                    let start = self.pos;
                    let Some(close) = self.text[start + 2..].find("*/") else {
                        return Err(self.error(start, "comment not terminated"));
                    };
                    self.pos = start + 2 + close + 2;
                    self.comments.push(Comment { span: Span::new(start, self.pos) });
                    if self.insert_semi && self.text[start..self.pos].contains('\n') {
                        self.push_implicit_semi(start);
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        let start = self.pos;
        let Some(c) = self.text[start..].chars().next() else {
            return Err(self.error(start, "unexpected end of input"));
        };

        let kind = if is_letter(c) {
            self.scan_identifier()
        } else if c.is_ascii_digit()
            || (c == '.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()))
        {
            self.scan_number()
        } else {
            match c {
                '"' => self.scan_string()?,
                '`' => self.scan_raw_string()?,
                '\'' => self.scan_rune()?,
                _ => self.scan_operator()?,
            }
        };

        Ok(Token {
            kind,
            span: Span::new(start, self.pos),
            implicit: false,
        })
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        for c in self.text[start..].chars() {
            if is_letter(c) || c.is_numeric() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        TokenKind::keyword(&self.text[start..self.pos]).unwrap_or(TokenKind::Ident)
    }

    fn eat_digits(&mut self, hex: bool) {
        while let Some(b) = self.peek_byte(0) {
            let digit = if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() };
            if digit || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn eat_exponent(&mut self) {
        self.pos += 1;
        if matches!(self.peek_byte(0), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        self.eat_digits(false);
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;

        let prefix = (self.peek_byte(0), self.peek_byte(1));
        match prefix {
            (Some(b'0'), Some(b'x' | b'X')) => {
                self.pos += 2;
                self.eat_digits(true);
                if self.peek_byte(0) == Some(b'.') {
                    kind = TokenKind::Float;
                    self.pos += 1;
                    self.eat_digits(true);
                }
                if matches!(self.peek_byte(0), Some(b'p' | b'P')) {
                    kind = TokenKind::Float;
                    self.eat_exponent();
                }
            }
            (Some(b'0'), Some(b'o' | b'O' | b'b' | b'B')) => {
                self.pos += 2;
                self.eat_digits(false);
            }
            _ => {
                self.eat_digits(false);
                if self.peek_byte(0) == Some(b'.') {
                    kind = TokenKind::Float;
                    self.pos += 1;
                    self.eat_digits(false);
                }
                if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
                    kind = TokenKind::Float;
                    self.eat_exponent();
                }
            }
        }

        if self.peek_byte(0) == Some(b'i') {
            self.pos += 1;
            kind = TokenKind::Imag;
        }
        kind
    }

    fn scan_quoted(&mut self, quote: u8, what: &str) -> ParseResult<()> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek_byte(0) {
                None | Some(b'\n') => {
                    return Err(self.error(start, format!("{what} literal not terminated")))
                }
                Some(b'\\') => self.pos += 2,
                Some(b) if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn scan_string(&mut self) -> ParseResult<TokenKind> {
        self.scan_quoted(b'"', "string")?;
        Ok(TokenKind::String)
    }

    fn scan_rune(&mut self) -> ParseResult<TokenKind> {
        self.scan_quoted(b'\'', "rune")?;
        Ok(TokenKind::Char)
    }

    fn scan_raw_string(&mut self) -> ParseResult<TokenKind> {
        let start = self.pos;
        let Some(close) = self.text[start + 1..].find('`') else {
            return Err(self.error(start, "raw string literal not terminated"));
        };
        self.pos = start + 1 + close + 1;
        Ok(TokenKind::String)
    }

    fn scan_operator(&mut self) -> ParseResult<TokenKind> {
        use TokenKind::*;

        let rest = &self.bytes[self.pos..];
        let (kind, len) = match rest {
            [b'.', b'.', b'.', ..] => (Ellipsis, 3),
            [b'.', ..] => (Period, 1),
            [b',', ..] => (Comma, 1),
            [b';', ..] => (Semicolon, 1),
            [b':', b'=', ..] => (Define, 2),
            [b':', ..] => (Colon, 1),
            [b'(', ..] => (LParen, 1),
            [b')', ..] => (RParen, 1),
            [b'[', ..] => (LBrack, 1),
            [b']', ..] => (RBrack, 1),
            [b'{', ..] => (LBrace, 1),
            [b'}', ..] => (RBrace, 1),
            [b'~', ..] => (Tilde, 1),
            [b'+', b'+', ..] => (Inc, 2),
            [b'+', b'=', ..] => (AddAssign, 2),
            [b'+', ..] => (Add, 1),
            [b'-', b'-', ..] => (Dec, 2),
            [b'-', b'=', ..] => (SubAssign, 2),
            [b'-', ..] => (Sub, 1),
            [b'*', b'=', ..] => (MulAssign, 2),
            [b'*', ..] => (Mul, 1),
            [b'/', b'=', ..] => (QuoAssign, 2),
            [b'/', ..] => (Quo, 1),
            [b'%', b'=', ..] => (RemAssign, 2),
            [b'%', ..] => (Rem, 1),
            [b'^', b'=', ..] => (XorAssign, 2),
            [b'^', ..] => (Xor, 1),
            [b'<', b'<', b'=', ..] => (ShlAssign, 3),
            [b'<', b'<', ..] => (Shl, 2),
            [b'<', b'=', ..] => (Leq, 2),
            [b'<', b'-', ..] => (Arrow, 2),
            [b'<', ..] => (Lss, 1),
            [b'>', b'>', b'=', ..] => (ShrAssign, 3),
            [b'>', b'>', ..] => (Shr, 2),
            [b'>', b'=', ..] => (Geq, 2),
            [b'>', ..] => (Gtr, 1),
            [b'=', b'=', ..] => (Eql, 2),
            [b'=', ..] => (Assign, 1),
            [b'!', b'=', ..] => (Neq, 2),
            [b'!', ..] => (Not, 1),
            [b'&', b'^', b'=', ..] => (AndNotAssign, 3),
            [b'&', b'^', ..] => (AndNot, 2),
            [b'&', b'&', ..] => (LAnd, 2),
            [b'&', b'=', ..] => (AndAssign, 2),
            [b'&', ..] => (And, 1),
            [b'|', b'|', ..] => (LOr, 2),
            [b'|', b'=', ..] => (OrAssign, 2),
            [b'|', ..] => (Or, 1),
            _ => {
                let c = self.text[self.pos..].chars().next().unwrap_or('?');
                return Err(self.error(self.pos, format!("invalid character {c:?}")));
            }
        };
        self.pos += len;
        Ok(kind)
    }
}

fn is_letter(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(Path::new("test.go"), src)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_semicolon_insertion() {
        use TokenKind::*;
        assert_eq!(
            kinds("x := f()\nreturn\n"),
            vec![Ident, Define, Ident, LParen, RParen, Semicolon, Return, Semicolon, Eof]
        );
        // no semicolon after an operator at line end
        assert_eq!(kinds("a +\nb"), vec![Ident, Add, Ident, Semicolon, Eof]);
    }

    #[test]
    fn test_line_comment_terminates_statement() {
        use TokenKind::*;
        let tokens = tokenize(Path::new("test.go"), "x++ // bump\ny--").unwrap();
        let kinds: Vec<_> = tokens.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Ident, Inc, Semicolon, Ident, Dec, Semicolon, Eof]);
        assert_eq!(tokens.comments.len(), 1);
    }

    #[test]
    fn test_leading_byte_order_mark() {
        use TokenKind::*;
        let tokens = tokenize(Path::new("test.go"), "\u{feff}package p\nfunc F() {}\n").unwrap();
        let kinds: Vec<_> = tokens.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds[..2], [Package, Ident]);
        assert_eq!(tokens.tokens[0].span, Span::new(3, 10));
        // only a leading mark is skipped
        assert!(tokenize(Path::new("test.go"), "package p\n\u{feff}").is_err());
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(kinds("0x1F 1_000 3.14 .5 1e9 2i 0b101"), vec![
            Int, Int, Float, Float, Float, Imag, Int, Semicolon, Eof
        ]);
    }

    #[test]
    fn test_strings_and_runes() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#""a\"b" `raw
line` '\n'"#),
            vec![String, String, Char, Semicolon, Eof]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        use TokenKind::*;
        assert_eq!(
            kinds("a &^= b <- c ... d"),
            vec![Ident, AndNotAssign, Ident, Arrow, Ident, Ellipsis, Ident, Semicolon, Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(Path::new("bad.go"), "x := \"oops\n").unwrap_err();
        assert!(err.message.contains("not terminated"));
        assert_eq!(err.span.start, 5);
    }
}
