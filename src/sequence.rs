//! Whole-string transcoding: chunk text into fragments and pack each one,
//! or drain a placeholder string back into cells and text.
//!
//! Chunking is greedy and not uniform. Whenever six characters remain they
//! are tried as one alphabetic fragment, but a digit anywhere in that window
//! forces the alphanumeric layout, which only holds five characters, so the
//! sixth slides into the next window. Boundaries therefore shift after every
//! digit-carrying window and decoding does not need to know where they were.

use std::fmt::Write;

use crate::cell::{decode_unit, encode_unit, Cell, InvalidCharacter};
use crate::token::{InvalidEncoding, TokenScanner};

/// Splits the next fragment off `rest`. Six digit-free characters make an
/// alphabetic fragment; anything else takes up to five characters as an
/// alphanumeric one. `rest` must not be empty.
fn next_fragment(rest: &str) -> (&str, &str) {
    let mut ends = [0usize; 6];
    let mut digit_in_window = false;
    let mut window = 0;
    for (start, c) in rest.char_indices().take(6) {
        ends[window] = start + c.len_utf8();
        digit_in_window |= c.is_ascii_digit();
        window += 1;
    }
    let cut = if window == 6 && !digit_in_window {
        ends[5]
    } else {
        ends[window.min(5) - 1]
    };
    rest.split_at(cut)
}

/// Encodes a whole string into cells, in fragment order.
pub fn encode_all(text: &str) -> Result<Vec<Cell>, InvalidCharacter> {
    // Worst case every fragment is alphanumeric and five characters.
    let mut cells = Vec::with_capacity((text.len() + 4) / 5);
    let mut rest = text;
    while !rest.is_empty() {
        let (fragment, tail) = next_fragment(rest);
        cells.push(encode_unit(fragment)?);
        rest = tail;
    }
    Ok(cells)
}

/// Parses a placeholder string that must consist of tokens and nothing else.
pub fn decode_all_strict(input: &str) -> Result<Vec<Cell>, InvalidEncoding> {
    let mut scanner = TokenScanner::new(input);
    let mut cells = Vec::new();
    while let Some(cell) = scanner.parse_next()? {
        cells.push(cell);
    }
    Ok(cells)
}

/// Fishes tokens out of arbitrary surrounding text, e.g. a whole template.
/// Only an overflowing token still fails.
pub fn decode_all_lossy(input: &str) -> Result<Vec<Cell>, InvalidEncoding> {
    let mut scanner = TokenScanner::new(input);
    let mut cells = Vec::new();
    while let Some(cell) = scanner.parse_lossy()? {
        cells.push(cell);
    }
    Ok(cells)
}

/// The wire form: every cell's token, nothing between them.
pub fn render_tokens(cells: &[Cell]) -> String {
    let mut out = String::with_capacity(cells.len() * 8);
    for cell in cells {
        // Writing to a String can't fail.
        write!(out, "{}", cell).unwrap();
    }
    out
}

/// Restartable cursor yielding each cell's text fragment in order.
///
/// This is deliberately not an `Iterator`: fragments are decoded into one
/// scratch buffer, so a yielded `&str` is only good until the next advance.
/// Copy it out if it has to outlive that.
pub struct TextFragments<'a> {
    cells: &'a [Cell],
    pos: usize,
    strict: bool,
    scratch: String,
}

impl<'a> TextFragments<'a> {
    /// A strict view reports the first cell that doesn't decode and halts.
    /// A non-strict view skips such cells, which is how "real" template
    /// placeholders (the sentinel included) vanish from reconstructed text.
    /// Same polarity as [`render_text`].
    pub fn new(cells: &'a [Cell], strict: bool) -> TextFragments<'a> {
        TextFragments {
            cells,
            pos: 0,
            strict,
            scratch: String::with_capacity(6),
        }
    }

    /// Rewinds the view to the first cell.
    pub fn restart(&mut self) {
        self.pos = 0;
    }

    /// Advances to the next fragment. `None` once the cells are exhausted,
    /// or after a strict view has reported a failure.
    pub fn next(&mut self) -> Option<Result<&str, InvalidCharacter>> {
        while self.pos < self.cells.len() {
            let cell = self.cells[self.pos];
            self.pos += 1;
            match decode_unit(cell, &mut self.scratch) {
                Ok(()) => return Some(Ok(&self.scratch)),
                Err(_) if !self.strict => continue,
                Err(e) => {
                    self.pos = self.cells.len();
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Decodes a whole sequence back into owned text.
pub fn render_text(cells: &[Cell], strict: bool) -> Result<String, InvalidCharacter> {
    let mut out = String::with_capacity(cells.len() * 6);
    let mut fragments = TextFragments::new(cells, strict);
    while let Some(fragment) = fragments.next() {
        out.push_str(fragment?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::SENTINEL;

    macro_rules! fragments {
        ($name:ident : $input:literal => [$($fragment:literal),*]) => {
            #[test]
            fn $name() {
                let mut pieces = Vec::new();
                let mut rest = $input;
                while !rest.is_empty() {
                    let (fragment, tail) = next_fragment(rest);
                    pieces.push(fragment);
                    rest = tail;
                }
                let expected: Vec<&str> = vec![$($fragment),*];
                assert_eq!(pieces, expected);
            }
        };
    }

    fragments!(splits_every_six: "abcdefghijkl" => ["abcdef", "ghijkl"]);
    fragments!(short_tail: "abcdefg" => ["abcdef", "g"]);
    fragments!(short_only: "abc" => ["abc"]);
    fragments!(splits_around_digits: "abcde1xxxxxx" => ["abcde", "1xxxx", "xx"]);
    fragments!(digit_up_front: "1abcdefgh" => ["1abcd", "efgh"]);

    #[test]
    fn reference_vector() {
        let cells = encode_all("ael-in-image").unwrap();
        assert_eq!(render_tokens(&cells), "%39220526$s%982942949$s");
        assert_eq!(render_text(&cells, true).unwrap(), "ael-in-image");

        // The full wire string carries the sentinel the CLI prepends.
        let parsed = decode_all_strict("%1$s%39220526$s%982942949$s").unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(render_text(&parsed, false).unwrap(), "ael-in-image");
        // Strict rendering trips over the sentinel instead of dropping it.
        assert!(render_text(&parsed, true).is_err());
    }

    #[test]
    fn round_trips_and_folds_case() {
        for input in &["hello world", "under_score-dash.dot", "Mixed Case 42", "a"] {
            let cells = encode_all(input).unwrap();
            assert_eq!(render_text(&cells, true).unwrap(), input.to_lowercase());
            assert_eq!(decode_all_strict(&render_tokens(&cells)).unwrap(), cells);
        }
    }

    #[test]
    fn cell_counts_follow_the_chunker() {
        assert_eq!(encode_all("abcdefabcdef").unwrap().len(), 2);
        assert_eq!(encode_all("abcdefg").unwrap().len(), 2);
        assert_eq!(encode_all("abc1efg").unwrap().len(), 2);
        assert_eq!(encode_all("abcde1xxxxxx").unwrap().len(), 3);
    }

    #[test]
    fn empty_input_is_an_empty_sequence() {
        assert_eq!(encode_all("").unwrap(), Vec::new());
        assert_eq!(render_tokens(&[]), "");
        assert_eq!(render_text(&[], true).unwrap(), "");
        assert_eq!(decode_all_strict("").unwrap(), Vec::new());
        assert_eq!(decode_all_lossy("").unwrap(), Vec::new());
    }

    #[test]
    fn encode_all_reports_the_bad_character() {
        assert_eq!(encode_all("abc!"), Err(InvalidCharacter::Source('!')));
    }

    #[test]
    fn lossy_decode_ignores_template_text() {
        let cells = decode_all_lossy("<string>%1$s %39220526$s%982942949$s</string>").unwrap();
        assert_eq!(render_text(&cells, false).unwrap(), "ael-in-image");
    }

    #[test]
    fn strict_decode_rejects_template_text() {
        assert!(decode_all_strict("<string>%1$s</string>").is_err());
    }

    #[test]
    fn lossy_view_skips_undecodable_cells_mid_sequence() {
        let mut cells = encode_all("ael-in-image").unwrap();
        cells.insert(1, SENTINEL);
        assert_eq!(render_text(&cells, false).unwrap(), "ael-in-image");

        let mut view = TextFragments::new(&cells, false);
        assert_eq!(view.next().unwrap().unwrap(), "ael-in");
        assert_eq!(view.next().unwrap().unwrap(), "-image");
        assert!(view.next().is_none());
    }

    #[test]
    fn strict_view_halts_on_the_failing_cell() {
        let cells = vec![encode_all("abcdef").unwrap()[0], SENTINEL, SENTINEL];
        // Non-strict view over the same cells skips the sentinels instead.
        let mut view = TextFragments::new(&cells, false);
        assert_eq!(view.next().unwrap().unwrap(), "abcdef");
        assert!(view.next().is_none());
        let mut strict = TextFragments::new(&cells, true);
        assert_eq!(strict.next().unwrap().unwrap(), "abcdef");
        assert!(strict.next().unwrap().is_err());
        assert!(strict.next().is_none());
    }

    #[test]
    fn view_restarts_from_the_top() {
        let cells = encode_all("magpie nest").unwrap();
        let mut view = TextFragments::new(&cells, false);
        let mut first_pass = String::new();
        while let Some(fragment) = view.next() {
            first_pass.push_str(fragment.unwrap());
        }
        view.restart();
        let mut second_pass = String::new();
        while let Some(fragment) = view.next() {
            second_pass.push_str(fragment.unwrap());
        }
        assert_eq!(first_pass, "magpie nest");
        assert_eq!(first_pass, second_pass);
    }
}
