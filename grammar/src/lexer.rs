//! A Python-style tokenizer.
//!
//! Produces NEWLINE/INDENT/DEDENT layout tokens the way Python's tokenizer
//! does: newlines inside brackets and blank or comment-only lines are
//! ignored, and a change of indentation at the start of a logical line emits
//! INDENT or DEDENT tokens. The same tokenizer is used for grammar files and
//! for sample inputs.

use log::debug;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while_m_n},
    character::complete::{alpha1, alphanumeric1, char, digit1, one_of, satisfy},
    combinator::recognize,
    error::ErrorKind,
    multi::many0,
    sequence::pair,
    IResult,
};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::tokens::{Token, TokenKind, MAX_OPERATOR_LEN};

/// Tokenize the contents of a file.
pub fn tokenize_file<P: AsRef<Path>>(path: P, suppress_errors: bool) -> Result<Vec<Token>> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    tokenize(&input, suppress_errors)
}

/// Tokenize a string. With `suppress_errors`, unrecognized characters,
/// unterminated strings and inconsistent dedents are skipped instead of
/// failing.
pub fn tokenize(input: &str, suppress_errors: bool) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(input, suppress_errors);
    lexer.run()?;
    debug!("tokenized input into {} tokens", lexer.tokens.len());
    Ok(lexer.tokens)
}

/// Keep track of a position within a str, along with its line and column.
#[derive(Debug, Clone)]
struct Position<'a> {
    input: &'a str,
    idx: usize,
    line: usize,
    column: usize,
}

impl<'a> Position<'a> {
    fn new(input: &'a str) -> Self {
        Position {
            input,
            idx: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.idx..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Move forward `n` bytes, updating line and column.
    fn advance(&mut self, n: usize) {
        let end = self.idx + n;
        for ch in self.input[self.idx..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.idx = end;
    }

    /// Move forward to the start of `rest`, which must be a suffix of the
    /// remaining input.
    fn advance_to(&mut self, rest: &'a str) {
        self.advance(self.rest().len() - rest.len());
    }
}

struct Lexer<'a> {
    pos: Position<'a>,
    suppress_errors: bool,
    tokens: Vec<Token>,
    indents: Vec<usize>,
    /// Bracket nesting depth.
    depth: usize,
    /// Whether the current logical line has produced a token.
    line_open: bool,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, suppress_errors: bool) -> Self {
        Lexer {
            pos: Position::new(input),
            suppress_errors,
            tokens: Vec::new(),
            indents: vec![0],
            depth: 0,
            line_open: false,
        }
    }

    fn run(&mut self) -> Result<()> {
        let mut at_line_start = true;
        loop {
            if at_line_start && self.depth == 0 {
                let width = self.skip_indentation();
                match self.pos.peek() {
                    None => break,
                    Some('#') => {
                        self.skip(comment);
                        continue;
                    }
                    Some('\n') | Some('\r') => {
                        self.skip(newline);
                        continue;
                    }
                    Some(_) => {
                        self.indent_to(width)?;
                        at_line_start = false;
                    }
                }
            }

            self.skip(whitespace);
            let ch = match self.pos.peek() {
                Some(ch) => ch,
                None => break,
            };
            match ch {
                '#' => self.skip(comment),
                '\n' | '\r' => {
                    let (line, column) = (self.pos.line, self.pos.column);
                    self.skip(newline);
                    if self.depth == 0 {
                        self.end_line(line, column);
                        at_line_start = true;
                    }
                }
                '\\' if line_continuation(self.pos.rest()).is_ok() => self.skip(line_continuation),
                _ => self.lex_token()?,
            }
        }

        let (line, column) = (self.pos.line, self.pos.column);
        self.end_line(line, column);
        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, line, column));
        }
        self.tokens.push(Token::new(TokenKind::EndMarker, line, column));
        Ok(())
    }

    fn skip<F>(&mut self, parser: F)
    where
        F: Fn(&'a str) -> IResult<&'a str, &'a str>,
    {
        if let Ok((rest, _)) = parser(self.pos.rest()) {
            self.pos.advance_to(rest);
        }
    }

    /// Consume leading whitespace, returning its width. Tabs advance to the
    /// next multiple of 8.
    fn skip_indentation(&mut self) -> usize {
        let mut width = 0;
        let mut consumed = 0;
        for ch in self.pos.rest().chars() {
            match ch {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0c' => width = 0,
                _ => break,
            }
            consumed += 1;
        }
        self.pos.advance(consumed);
        width
    }

    fn current_indent(&self) -> usize {
        self.indents.last().copied().unwrap_or(0)
    }

    fn indent_to(&mut self, width: usize) -> Result<()> {
        let (line, column) = (self.pos.line, self.pos.column);
        if width > self.current_indent() {
            self.indents.push(width);
            self.tokens.push(Token::new(TokenKind::Indent, line, column));
            return Ok(());
        }
        while width < self.current_indent() {
            self.indents.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, line, column));
        }
        if width != self.current_indent() {
            if !self.suppress_errors {
                return Err(Error::Lex {
                    line,
                    column,
                    message: "unindent does not match any outer indentation level".to_owned(),
                });
            }
            self.indents.push(width);
        }
        Ok(())
    }

    fn end_line(&mut self, line: usize, column: usize) {
        if self.line_open {
            self.tokens.push(Token::new(TokenKind::Newline, line, column));
            self.line_open = false;
        }
    }

    fn push(&mut self, token: Token) {
        match token.kind {
            TokenKind::LPar | TokenKind::LSqr | TokenKind::LBrc => self.depth += 1,
            TokenKind::RPar | TokenKind::RSqr | TokenKind::RBrc => {
                self.depth = self.depth.saturating_sub(1)
            }
            _ => (),
        }
        self.line_open = true;
        self.tokens.push(token);
    }

    fn lex_token(&mut self) -> Result<()> {
        let rest = self.pos.rest();
        let (line, column) = (self.pos.line, self.pos.column);

        match string_literal(rest) {
            Ok((remaining, body)) => {
                self.pos.advance_to(remaining);
                self.push(Token::with_param(TokenKind::String, body, line, column));
                return Ok(());
            }
            Err(nom::Err::Failure(e)) => {
                self.pos.advance_to(e.input);
                return self.reject(Error::from(nom::Err::Failure(e)).at(line, column));
            }
            Err(_) => (),
        }

        if let Ok((remaining, text)) = number(rest) {
            self.pos.advance_to(remaining);
            self.push(Token::with_param(TokenKind::Number, text, line, column));
            return Ok(());
        }

        if let Ok((remaining, text)) = identifier(rest) {
            self.pos.advance_to(remaining);
            let token = match TokenKind::keyword(text) {
                Some(kind) => Token::new(kind, line, column),
                None => Token::with_param(TokenKind::Name, text, line, column),
            };
            self.push(token);
            return Ok(());
        }

        if let Some((kind, len)) = operator(rest) {
            self.pos.advance(len);
            self.push(Token::new(kind, line, column));
            return Ok(());
        }

        let ch = rest.chars().next().unwrap_or_default();
        self.pos.advance(ch.len_utf8());
        self.reject(Error::Lex {
            line,
            column,
            message: format!("unrecognized character {:?}", ch),
        })
    }

    fn reject(&mut self, err: Error) -> Result<()> {
        if self.suppress_errors {
            debug!("dropping error token: {}", err);
            Ok(())
        } else {
            Err(err)
        }
    }
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c == ' ' || c == '\t' || c == '\x0c')(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('#'), take_while(|c: char| c != '\n' && c != '\r')))(input)
}

fn newline(input: &str) -> IResult<&str, &str> {
    alt((tag("\r\n"), tag("\n"), tag("\r")))(input)
}

fn line_continuation(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('\\'), newline))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((digit1, recognize(pair(char('.'), digit1)))),
        many0(alt((
            exponent,
            recognize(satisfy(|c: char| c.is_alphanumeric() || c == '_' || c == '.')),
        ))),
    ))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(pair(one_of("eE"), one_of("+-")))(input)
}

/// Matches an optional string prefix followed by an opening quote.
fn string_start(input: &str) -> IResult<&str, (&str, &str)> {
    pair(
        take_while_m_n(0, 2, |c: char| "rRbBuUfF".contains(c)),
        alt((tag("'''"), tag("\"\"\""), tag("'"), tag("\""))),
    )(input)
}

/// A complete string literal, yielding the text between the quotes. A
/// literal that is never closed is a failure positioned after the opening
/// quote.
fn string_literal(input: &str) -> IResult<&str, &str> {
    let (body_start, (_, quote)) = string_start(input)?;
    match string_body(body_start, quote) {
        Some(literal) => Ok(literal),
        None => Err(nom::Err::Failure(nom::error::Error::new(
            body_start,
            ErrorKind::TakeUntil,
        ))),
    }
}

/// Find the closing `quote`, returning the remaining input and the text
/// between the quotes. Escapes are skipped but not interpreted.
fn string_body<'a>(input: &'a str, quote: &str) -> Option<(&'a str, &'a str)> {
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if input[i..].starts_with(quote) {
            return Some((&input[i + quote.len()..], &input[..i]));
        } else if c == '\n' && quote.len() == 1 {
            return None;
        }
    }
    None
}

/// Longest operator at the start of `input`.
fn operator(input: &str) -> Option<(TokenKind, usize)> {
    (1..=MAX_OPERATOR_LEN)
        .rev()
        .find_map(|len| input.get(..len).and_then(TokenKind::operator).map(|kind| (kind, len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::{
        Colon, Dedent, Ellipsis, EndMarker, If, Indent, LPar, LSqr, Lt, LtLtEq, Name, Newline, Not,
        Number, Pass, Pipe, Plus, RPar, RSqr, Star, StarStarEq,
    };

    struct TestCase {
        input: &'static str,
        // None indicates an error is expected.
        out: Option<Vec<TokenKind>>,
    }

    fn assert_test_cases(suppress_errors: bool, tests: Vec<TestCase>) {
        for t in tests {
            let input = t.input;
            let res = tokenize(input, suppress_errors);
            match t.out {
                Some(out) => {
                    let kinds: Vec<TokenKind> = res
                        .unwrap_or_else(|e| panic!("input {:?}: {}", input, e))
                        .into_iter()
                        .map(|tok| tok.kind)
                        .collect();
                    assert_eq!(kinds, out, "input: {:?}", input);
                }
                None => assert!(res.is_err(), "expected error for {:?}: {:?}", input, res),
            }
        }
    }

    #[test]
    fn tokenize_strict() {
        let tests = vec![
            TestCase {
                input: "",
                out: Some(vec![EndMarker]),
            },
            TestCase {
                input: "a: b | 'c'\n",
                out: Some(vec![
                    Name, Colon, Name, Pipe, TokenKind::String, Newline, EndMarker,
                ]),
            },
            TestCase {
                input: "a: (b\n  c)*\n",
                out: Some(vec![
                    Name, Colon, LPar, Name, Name, RPar, Star, Newline, EndMarker,
                ]),
            },
            TestCase {
                input: "a:\n    b\nc: d",
                out: Some(vec![
                    Name, Colon, Newline, Indent, Name, Newline, Dedent, Name, Colon, Name,
                    Newline, EndMarker,
                ]),
            },
            TestCase {
                input: "# comment\n\n   \na: [b] # trailing\n",
                out: Some(vec![
                    Name, Colon, LSqr, Name, RSqr, Newline, EndMarker,
                ]),
            },
            TestCase {
                input: "if x: pass",
                out: Some(vec![If, Name, Colon, Pass, Newline, EndMarker]),
            },
            TestCase {
                input: "x **= 1.5e-3 + .5",
                out: Some(vec![
                    Name, StarStarEq, Number, Plus, Number, Newline, EndMarker,
                ]),
            },
            TestCase {
                input: "a = b \\\n  + c",
                out: Some(vec![
                    Name, TokenKind::Eq, Name, Plus, Name, Newline, EndMarker,
                ]),
            },
            TestCase {
                input: "a $ b",
                out: None,
            },
            TestCase {
                input: "'abc\n",
                out: None,
            },
            TestCase {
                input: "  a\n b\n",
                out: None,
            },
        ];

        assert_test_cases(false, tests);
    }

    #[test]
    fn tokenize_suppressed() {
        let tests = vec![
            TestCase {
                input: "a $ b",
                out: Some(vec![Name, Name, Newline, EndMarker]),
            },
            TestCase {
                input: "a: b ? c\n",
                out: Some(vec![Name, Colon, Name, Name, Newline, EndMarker]),
            },
            TestCase {
                input: "  a\n b\n",
                out: Some(vec![Indent, Name, Newline, Dedent, Name, Newline, Dedent, EndMarker]),
            },
        ];

        assert_test_cases(true, tests);
    }

    #[test]
    fn string_payloads() {
        let toks = tokenize("'**=' \"x\" '''multi\nline''' r'\\d' 'it\\'s'", false).unwrap();
        let params: Vec<&str> = toks
            .iter()
            .filter(|tok| tok.kind == TokenKind::String)
            .map(|tok| tok.param())
            .collect();
        assert_eq!(params, vec!["**=", "x", "multi\nline", "\\d", "it\\'s"]);
    }

    #[test]
    fn names_and_keywords() {
        let toks = tokenize("not_test not None rb", false).unwrap();
        assert_eq!(toks[0].kind, Name);
        assert_eq!(toks[0].param(), "not_test");
        assert_eq!(toks[1].kind, Not);
        assert_eq!(toks[2].kind, TokenKind::None);
        assert_eq!(toks[3].kind, Name);
        assert_eq!(toks[3].param(), "rb");
    }

    #[test]
    fn positions() {
        let toks = tokenize("a: b\n  | c", false).unwrap();
        assert_eq!((toks[2].line, toks[2].column), (1, 4));
        // NEWLINE, INDENT, PIPE
        assert_eq!(toks[4].kind, Indent);
        assert_eq!((toks[5].line, toks[5].column), (2, 3));
    }

    #[test]
    fn error_position() {
        let err = tokenize("a:\n  b ` c", false).unwrap_err();
        assert_eq!(
            err,
            Error::Lex {
                line: 2,
                column: 5,
                message: "unrecognized character '`'".to_owned(),
            }
        );
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("a: b\n  'abc\n", false).unwrap_err();
        match err {
            Error::Lex { line, column, .. } => assert_eq!((line, column), (2, 3)),
            other => panic!("expected a lex error, got {:?}", other),
        }

        let toks = tokenize("a: 'abc\nb", true).unwrap();
        let kinds: Vec<TokenKind> = toks.iter().map(|tok| tok.kind).collect();
        assert_eq!(kinds, vec![Name, Colon, Name, Newline, Name, Newline, EndMarker]);
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(operator("<<=x"), Some((LtLtEq, 3)));
        assert_eq!(operator("<x"), Some((Lt, 1)));
        assert_eq!(operator("...."), Some((Ellipsis, 3)));
        assert_eq!(operator("?"), None);
    }
}
