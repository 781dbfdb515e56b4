//! The wire form of a cell: `%` + decimal value + `$s`, the shape of a
//! printf-style positional placeholder. Tokens concatenate with nothing
//! between them, and anything that survives a templating pass looks exactly
//! like the templating system's own placeholders.
//!
//! The grammar is regular, so the whole thing is one logos lexer. Strict and
//! lossy parsing are the same loop; lossy just doesn't mind `Filler` and
//! `Stray` lexemes. `Stray` is a `%` that didn't open a token, which is what
//! makes lossy scanning restart at every character: in `%12%34$s` the failed
//! `%12` falls out as `Stray` + `Filler` and the real token still gets found.

use std::fmt;

use logos::Logos;

use crate::cell::Cell;

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "%{}$s", self.value())
    }
}

#[derive(Logos, Debug, PartialEq)]
enum Wire {
    #[regex(r"%[1-9][0-9]*\$s")] Placeholder,
    #[regex(r"[^%]+")] Filler,
    #[token("%")] Stray,
    #[error] Error,
}

/// A malformed or unusable placeholder token. Positions are byte offsets
/// into the scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEncoding {
    /// The input here is not a well-formed token.
    NotAToken { at: usize },
    /// A well-formed token whose value does not fit a cell. Hard failure in
    /// every mode: the intent to encode a unit is unambiguous even though
    /// the value is unusable.
    Overflow { at: usize },
    /// Input left over after the single token `parse_one` allows.
    Trailing { at: usize },
}

impl fmt::Display for InvalidEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidEncoding::NotAToken { at } =>
                write!(f, "expected a %n$s placeholder at byte {}", at),
            InvalidEncoding::Overflow { at } =>
                write!(f, "placeholder at byte {} overflows the 31-bit cell width", at),
            InvalidEncoding::Trailing { at } =>
                write!(f, "unexpected trailing input at byte {}", at),
        }
    }
}

impl std::error::Error for InvalidEncoding {}

/// Forward cursor pulling cells off the front of a placeholder string.
pub struct TokenScanner<'src> {
    lexer: logos::Lexer<'src, Wire>,
}

impl<'src> TokenScanner<'src> {
    pub fn new(input: &'src str) -> TokenScanner<'src> {
        TokenScanner { lexer: Wire::lexer(input) }
    }

    /// Consumes the token at the cursor. `Ok(None)` once input is exhausted;
    /// anything other than a token at the cursor is an error.
    pub fn parse_next(&mut self) -> Result<Option<Cell>, InvalidEncoding> {
        self.scan(false)
    }

    /// Skips ahead to the next token, swallowing whatever junk sits in
    /// between. `Ok(None)` once input is exhausted. Overflowing tokens still
    /// fail.
    pub fn parse_lossy(&mut self) -> Result<Option<Cell>, InvalidEncoding> {
        self.scan(true)
    }

    fn scan(&mut self, lossy: bool) -> Result<Option<Cell>, InvalidEncoding> {
        while let Some(lexeme) = self.lexer.next() {
            let at = self.lexer.span().start;
            match lexeme {
                Wire::Placeholder => {
                    let slice = self.lexer.slice();
                    let digits = &slice[1..slice.len() - 2];
                    let cell = digits.parse::<u64>().ok()
                        .filter(|&v| v <= Cell::MAX_VALUE as u64)
                        .and_then(|v| Cell::from_value(v as u32))
                        .ok_or(InvalidEncoding::Overflow { at })?;
                    return Ok(Some(cell));
                }
                _ if lossy => continue,
                _ => return Err(InvalidEncoding::NotAToken { at }),
            }
        }
        Ok(None)
    }
}

/// Parses input that must be exactly one token, nothing else.
pub fn parse_one(input: &str) -> Result<Cell, InvalidEncoding> {
    let mut scanner = TokenScanner::new(input);
    let cell = match scanner.parse_next()? {
        Some(cell) => cell,
        None => return Err(InvalidEncoding::NotAToken { at: 0 }),
    };
    match scanner.lexer.next() {
        None => Ok(cell),
        Some(_) => Err(InvalidEncoding::Trailing { at: scanner.lexer.span().start }),
    }
}
