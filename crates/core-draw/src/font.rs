//! Font capability.
//!
//! The frame only measures text; glyph rasterization stays inside the
//! `Display` implementation. A font must give stable answers for as long as
//! a frame holds it: cached box widths are never re-measured on their own.

use unicode_width::UnicodeWidthChar;

pub trait Font {
    /// Line height in pixels.
    fn height(&self) -> i32;

    /// Advance width of a single rune.
    fn rune_width(&self, c: char) -> i32;

    /// Total advance width of `s`.
    fn string_width(&self, s: &str) -> i32 {
        s.chars().map(|c| self.rune_width(c)).sum()
    }

    /// Advance width of the first `nrunes` runes of `s` (all of `s` if shorter).
    fn string_n_width(&self, s: &str, nrunes: usize) -> i32 {
        s.chars().take(nrunes).map(|c| self.rune_width(c)).sum()
    }
}

/// Fixed-cell font: every rune is a whole number of cells wide.
///
/// Cell counts come from East Asian width (`unicode-width`); zero-width and
/// control runes still occupy one cell so every rune is visible and
/// clickable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellFont {
    cell_width: i32,
    height: i32,
}

impl CellFont {
    pub fn new(cell_width: i32, height: i32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            height: height.max(1),
        }
    }

    pub fn cell_width(&self) -> i32 {
        self.cell_width
    }

    /// Number of cells `c` occupies.
    pub fn cells(c: char) -> i32 {
        UnicodeWidthChar::width(c).unwrap_or(1).max(1) as i32
    }
}

impl Default for CellFont {
    fn default() -> Self {
        Self::new(7, 13)
    }
}

impl Font for CellFont {
    fn height(&self) -> i32 {
        self.height
    }

    fn rune_width(&self, c: char) -> i32 {
        Self::cells(c) * self.cell_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one_cell() {
        let f = CellFont::new(8, 16);
        assert_eq!(f.rune_width('a'), 8);
        assert_eq!(f.string_width("hello"), 40);
    }

    #[test]
    fn wide_cjk_is_two_cells() {
        let f = CellFont::new(8, 16);
        assert_eq!(f.rune_width('界'), 16);
        assert_eq!(f.string_width("a界"), 24);
    }

    #[test]
    fn combining_mark_still_takes_a_cell() {
        let f = CellFont::new(8, 16);
        assert_eq!(f.rune_width('\u{0301}'), 8);
    }

    #[test]
    fn n_width_stops_at_rune_count() {
        let f = CellFont::new(5, 10);
        assert_eq!(f.string_n_width("abcdef", 3), 15);
        assert_eq!(f.string_n_width("ab", 10), 10);
        assert_eq!(f.string_n_width("界x", 1), 10);
    }
}
