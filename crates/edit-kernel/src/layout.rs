//! Cell-width measurement for geometric columns.
//!
//! Widths follow UAX #11 through `unicode-width`; tabs advance to the next tab stop.

use unicode_width::UnicodeWidthChar;

/// Visual width of a character in cells (control characters count as one cell).
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Visual width of `ch` when it starts at `cell_offset_in_line`.
///
/// For `'\t'` the width depends on the position: it reaches the next multiple of `tab_width`.
pub fn cell_width_at(ch: char, cell_offset_in_line: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - cell_offset_in_line % tab_width
    } else {
        char_width(ch)
    }
}

/// Visual column reached after laying out `chars` from the start of a line.
pub fn geom_col<I>(chars: I, tab_width: usize) -> usize
where
    I: IntoIterator<Item = char>,
{
    chars.into_iter().fold(0usize, |x, ch| {
        x.saturating_add(cell_width_at(ch, x, tab_width))
    })
}
