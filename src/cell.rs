//! Packing and unpacking of one cell.
//!
//! A cell is a 31-bit integer holding up to six characters from a 40-entry
//! alphabet. Bit 30 picks the layout:
//!
//! * clear: *alphabetic*. Exactly six characters, five bits each, codes 1-30
//!   (letters, space, `_`, `-`, `.`). First character in the topmost group.
//! * set: *alphanumeric*. One to five characters, six bits each, codes 1-40
//!   (the above plus digits). Shorter fragments are padded with zero groups
//!   on the most significant end, so code 0 always means "no character here"
//!   and never a character.
//!
//! Which layout a fragment gets is decided by its content: anything shorter
//! than six characters, or containing a digit, has to be alphanumeric. The
//! chunker in [`crate::sequence`] sizes fragments so that an alphanumeric
//! fragment never exceeds five characters.

use std::fmt;

use lazy_static::lazy_static;
use num_enum::TryFromPrimitive;

/// Code -> character. Index 0 is deliberately unmapped.
const DECODE_TABLE: [char; 41] = [
    '\0',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ' ', '_', '-', '.',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Highest code an alphabetic (five-bit) group may hold. Codes 31-40 need
/// the six-bit layout.
const MAX_ALPHABETIC_CODE: u32 = 30;

lazy_static! {
    // Character -> code, built from DECODE_TABLE so the two can't disagree.
    // Uppercase letters fold onto the lowercase codes.
    static ref ENCODE_TABLE: [u8; 128] = {
        let mut table = [0u8; 128];
        for (code, &c) in DECODE_TABLE.iter().enumerate().skip(1) {
            table[c as usize] = code as u8;
        }
        for upper in b'A'..=b'Z' {
            table[upper as usize] = table[(upper + 32) as usize];
        }
        table
    };
}

fn char_code(c: char) -> Option<u32> {
    if !c.is_ascii() { return None }
    match ENCODE_TABLE[c as usize] {
        0 => None,
        code => Some(code as u32),
    }
}

fn code_char(code: u32) -> Result<char, InvalidCharacter> {
    match DECODE_TABLE.get(code as usize) {
        Some(&c) if c != '\0' => Ok(c),
        _ => Err(InvalidCharacter::Code(code)),
    }
}

/// A character or code value outside the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidCharacter {
    /// An input character with no code assigned.
    Source(char),
    /// A decoded group holding a value with no character assigned.
    Code(u32),
}

impl fmt::Display for InvalidCharacter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidCharacter::Source(c) => write!(f, "character {:?} is outside the alphabet", c),
            InvalidCharacter::Code(code) => write!(f, "code {} does not decode to a character", code),
        }
    }
}

impl std::error::Error for InvalidCharacter {}

/// The two cell layouts, as selected by bit 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum Mode {
    Alphabetic = 0,
    Alphanumeric = 1,
}

const MODE_SHIFT: u32 = 30;
const MODE_BIT: u32 = 1 << MODE_SHIFT;

/// One packed unit. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(u32);

/// The fixed unit printed ahead of encoded output. Its value renders as
/// `%1$s`, which the target templating system treats as its own first
/// placeholder; as a cell it has no decodable content, so lossy rendering
/// drops it again.
pub const SENTINEL: Cell = Cell(1);

impl Cell {
    /// Largest representable value: 31 bits.
    pub const MAX_VALUE: u32 = (1 << 31) - 1;

    pub fn from_value(value: u32) -> Option<Cell> {
        if value <= Cell::MAX_VALUE { Some(Cell(value)) } else { None }
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn mode(self) -> Mode {
        // The bit is one wide, so this can't miss.
        Mode::try_from_primitive((self.0 >> MODE_SHIFT) & 1).unwrap()
    }
}

/// Packs a fragment of one to six characters into a cell. Uppercase input
/// folds to lowercase. Six-character fragments must be digit-free; the
/// chunker in [`crate::sequence`] guarantees that.
pub fn encode_unit(fragment: &str) -> Result<Cell, InvalidCharacter> {
    let length = fragment.chars().count();
    assert!(length >= 1 && length <= 6, "fragment must be 1-6 characters");

    let alphanumeric = length < 6 || fragment.chars().any(|c| c.is_ascii_digit());
    if alphanumeric {
        assert!(length <= 5, "six-character alphanumeric fragments don't fit a cell");
        let mut packed = 0u32;
        for c in fragment.chars() {
            let code = char_code(c).ok_or(InvalidCharacter::Source(c))?;
            packed = (packed << 6) | code;
        }
        Ok(Cell(MODE_BIT | packed))
    } else {
        let mut packed = 0u32;
        for c in fragment.chars() {
            let code = char_code(c).ok_or(InvalidCharacter::Source(c))?;
            if code > MAX_ALPHABETIC_CODE {
                return Err(InvalidCharacter::Source(c));
            }
            packed = (packed << 5) | code;
        }
        Ok(Cell(packed))
    }
}

/// Unpacks a cell into `out` (cleared first), lowercase.
///
/// Fails on any group outside the layout's code range. An alphanumeric cell
/// with nothing but zero groups fails too: zero is padding, not content.
pub fn decode_unit(cell: Cell, out: &mut String) -> Result<(), InvalidCharacter> {
    out.clear();
    match cell.mode() {
        Mode::Alphanumeric => {
            let mut content_seen = false;
            for group in (0..5).rev() {
                let code = (cell.value() >> (6 * group)) & 0x3f;
                if code == 0 && !content_seen {
                    continue;
                }
                content_seen = true;
                out.push(code_char(code)?);
            }
            if !content_seen {
                return Err(InvalidCharacter::Code(0));
            }
        }
        Mode::Alphabetic => {
            for group in (0..6).rev() {
                let code = (cell.value() >> (5 * group)) & 0x1f;
                if code == 0 || code > MAX_ALPHABETIC_CODE {
                    return Err(InvalidCharacter::Code(code));
                }
                out.push(code_char(code)?);
            }
        }
    }
    Ok(())
}
