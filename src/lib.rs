//! Smuggles short strings through templating systems as printf-style
//! positional placeholders.
//!
//! Text drawn from a small alphabet (ASCII letters, digits, space, `_`, `-`,
//! `.`) is packed six-or-fewer characters at a time into 31-bit cells, and
//! each cell is written out as `%<value>$s`. A templating system that
//! substitutes `%1$s`, `%2$s` and so on will pass the whole run through
//! untouched, because every cell looks like just another positional
//! placeholder it has no argument for.
//!
//! ```
//! let cells = pica::encode_all("ael-in-image").unwrap();
//! assert_eq!(pica::render_tokens(&cells), "%39220526$s%982942949$s");
//!
//! let back = pica::decode_all_lossy("%1$s%39220526$s%982942949$s").unwrap();
//! assert_eq!(pica::render_text(&back, false).unwrap(), "ael-in-image");
//! ```
//!
//! Parsing and rendering both come in strict and lossy flavours. Lossy
//! parsing fishes tokens out of arbitrary surrounding text; lossy rendering
//! drops cells that don't decode, which is how the templating system's own
//! placeholders disappear from reconstructed text. Overflowing tokens fail
//! in every flavour.

pub mod cell;
pub mod sequence;
pub mod token;

pub use cell::{decode_unit, encode_unit, Cell, InvalidCharacter, Mode, SENTINEL};
pub use sequence::{
    decode_all_lossy, decode_all_strict, encode_all, render_text, render_tokens, TextFragments,
};
pub use token::{parse_one, InvalidEncoding, TokenScanner};
