//! Per-cell matching between grid constraints and candidate words.

use crate::grid::{Grid, Orientation};

/// How a character matched a cell constraint.
///
/// An exact match means the grid already pins the character down; a loose
/// match fits but still leaves (or resolves) a choice. The encoder uses the
/// distinction to tell pre-placed entries from genuine placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    Exact,
    Loose,
}

/// The vowels, with `y` deliberately included.
pub const VOWELS: &[u8] = b"aeiouy";

pub fn is_vowel(letter: u8) -> bool {
    VOWELS.contains(&letter.to_ascii_lowercase())
}

pub fn is_consonant(letter: u8) -> bool {
    letter.to_ascii_lowercase().is_ascii_lowercase() && !is_vowel(letter)
}

/// Matches two characters of the cell alphabet `{a-z, #, ., 0, 1}`
/// against each other, case-insensitively.
///
/// `#` never matches; `.` matches anything else loosely; `0` and `1` match
/// vowels and consonants loosely; equal letters match exactly.
pub fn matches(a: u8, b: u8) -> Option<Match> {
    let a = a.to_ascii_lowercase();
    let b = b.to_ascii_lowercase();

    if a == b'#' || b == b'#' {
        return None;
    }
    if a == b'.' || b == b'.' {
        return Some(Match::Loose);
    }

    match (a, b) {
        (b'0', l) | (l, b'0') if is_vowel(l) => Some(Match::Loose),
        (b'1', l) | (l, b'1') if is_consonant(l) => Some(Match::Loose),
        (x, y) if x.is_ascii_lowercase() && x == y => Some(Match::Exact),
        _ => None,
    }
}

/// Checks whether `word` fits the grid as a maximal entry starting at the
/// given cell: the cells just before and after it must be off-grid or
/// black, and every cell must match the corresponding character.
///
/// The result is [`Match::Exact`] iff every cell matched exactly, i.e. the
/// grid already spells the word verbatim.
pub fn entry_fits(
    grid: &Grid,
    row: usize,
    col: usize,
    dir: Orientation,
    word: &[u8],
) -> Option<Match> {
    if word.is_empty() || row >= grid.height() || col >= grid.width() {
        return None;
    }

    let (dr, dc) = dir.step();
    let end_r = row + dr * (word.len() - 1);
    let end_c = col + dc * (word.len() - 1);
    if end_r >= grid.height() || end_c >= grid.width() {
        return None;
    }

    let before_open = row >= dr && col >= dc && !grid.cell(row - dr, col - dc).is_black();
    let after_open = end_r + dr < grid.height()
        && end_c + dc < grid.width()
        && !grid.cell(end_r + dr, end_c + dc).is_black();
    if before_open || after_open {
        return None;
    }

    let mut kind = Match::Exact;
    for (k, &ch) in word.iter().enumerate() {
        match matches(grid.cell(row + dr * k, col + dc * k).as_byte(), ch)? {
            Match::Exact => {}
            Match::Loose => kind = Match::Loose,
        }
    }
    Some(kind)
}
