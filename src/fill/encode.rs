//! Builds the exact cover matrix whose covers are exactly the valid
//! fillings of a grid.
//!
//! # The slice encoding
//!
//! Every open cell (every cell at all in naive mode) owns a *slice* of 54
//! consecutive matrix columns: 26 *letter pairs* (columns `2m` and `2m+1`
//! for letter `m`) followed by one *orientation pair* (columns 52 and 53).
//!
//! A row for an across entry that spells letter `i` in the cell covers the
//! left half of pair `i`, the right half of every other pair, and the left
//! orientation column. A down row mirrors this: right half of its own
//! letter's pair, left half of the rest, right orientation column. Summed,
//! an across row for `i` and a down row for `j` cover each column of the
//! slice exactly once iff `i == j`; otherwise pair `i`'s left half is
//! covered twice and pair `j`'s right half twice. Crossing entries are
//! therefore forced to agree on their shared letter, and the orientation
//! pair forces exactly one across and one down row through every slice.
//!
//! Rows come in four kinds: dictionary word placements over runs of word
//! length, short-fill rows assigning letters to white sequences too short
//! to hold a word, and (naive mode only) forced rows replaying fully
//! pre-placed sequences plus one all-column row per black cell.

use indexmap::IndexSet;
use log::debug;

use crate::dlx::matrix::{Matrix, MatrixError};
use crate::grid::{Cell, Grid, Orientation, Run};
use crate::lexicon::Lexicon;
use crate::matcher;

use super::FillOptions;

/// Number of exact cover columns per slice: 26 letter pairs plus the
/// orientation pair.
pub const SLICE_COLS: usize = 54;

/// Index of the orientation pair within a slice.
const ORIENT_PAIR: usize = 26;

/// Maps grid cells to dense slice indices and back.
///
/// In compressed mode only open cells are slices; in naive mode every cell
/// of the grid is one.
#[derive(Debug)]
pub struct SliceTable {
    index: Vec<Option<usize>>,
    cells: Vec<(usize, usize)>,
    width: usize,
}

impl SliceTable {
    /// Builds the table over the open cells only.
    pub fn compressed(grid: &Grid) -> SliceTable {
        SliceTable::with_filter(grid, |cell| cell.is_open())
    }

    /// Builds the table over every cell of the grid.
    pub fn naive(grid: &Grid) -> SliceTable {
        SliceTable::with_filter(grid, |_| true)
    }

    fn with_filter(grid: &Grid, keep: impl Fn(Cell) -> bool) -> SliceTable {
        let mut index = Vec::with_capacity(grid.width() * grid.height());
        let mut cells = Vec::new();

        for row in 0..grid.height() {
            for col in 0..grid.width() {
                if keep(grid.cell(row, col)) {
                    index.push(Some(cells.len()));
                    cells.push((row, col));
                } else {
                    index.push(None);
                }
            }
        }

        SliceTable { index, cells, width: grid.width() }
    }

    /// The slice owned by the given cell, if it has one.
    pub fn slice_of(&self, row: usize, col: usize) -> Option<usize> {
        self.index[row * self.width + col]
    }

    /// The cell owning the given slice.
    pub fn cell_of(&self, slice: usize) -> (usize, usize) {
        self.cells[slice]
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// What a matrix row stands for. Recorded while the matrix is built and
/// used by the decoder to turn covers back into filled grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMeta {
    /// A dictionary word placed over a run.
    Word { run: Run, word: String },
    /// One letter assignment of a white sequence too short to hold a word.
    ShortFill { run: Run, letters: Vec<u8> },
    /// A fully pre-placed sequence replayed as-is (naive mode).
    Forced { run: Run },
    /// A black cell filler (naive mode).
    Black { row: usize, col: usize },
}

/// The built matrix together with the row metadata needed for decoding.
pub struct Encoding {
    pub matrix: Matrix,
    pub rows: Vec<RowMeta>,
}

/// Builds the exact cover instance for a grid.
///
/// Rows are emitted in a fixed order: across runs in row-major order, then
/// down runs column by column; within a run, dictionary stream order for
/// placements and ascending letter assignments for short fills; black cell
/// rows last. Together with the matrix's own determinism this fixes the
/// order in which solutions are found.
pub fn build(
    grid: &Grid,
    lexicon: &dyn Lexicon,
    options: &FillOptions,
) -> Result<Encoding, MatrixError> {
    let slices = if options.naive_matrix {
        SliceTable::naive(grid)
    } else {
        SliceTable::compressed(grid)
    };
    let runs = grid.runs();

    // Words that already sit complete in the grid must not be placed a
    // second time anywhere.
    let mut purged: IndexSet<String> = IndexSet::new();
    if !options.allow_duplicate_words {
        for &run in &runs {
            if run.is_word() {
                if let Some(text) = grid.run_text(run) {
                    purged.insert(text);
                }
            }
        }
    }

    let mut enc = Encoder {
        grid,
        slices: &slices,
        purged,
        matrix: Matrix::new(slices.len() * SLICE_COLS),
        rows: Vec::new(),
    };

    for &run in &runs {
        let open = run.cells().any(|(r, c)| grid.cell(r, c).is_open());
        if open && run.is_word() {
            enc.emit_words(run, lexicon)?;
        } else if open {
            enc.emit_short_fills(run)?;
        } else if options.naive_matrix {
            enc.emit_forced(run)?;
        }
    }

    if options.naive_matrix {
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                if grid.cell(row, col).is_black() {
                    enc.emit_black(row, col)?;
                }
            }
        }
    }

    debug!(
        "encoded {} slices into {} columns and {} rows ({} pre-placed words purged)",
        slices.len(),
        enc.matrix.col_count(),
        enc.matrix.row_count(),
        enc.purged.len(),
    );

    Ok(Encoding { matrix: enc.matrix, rows: enc.rows })
}

struct Encoder<'a> {
    grid: &'a Grid,
    slices: &'a SliceTable,
    purged: IndexSet<String>,
    matrix: Matrix,
    rows: Vec<RowMeta>,
}

impl Encoder<'_> {
    /// One row per admissible dictionary word over a word-length run.
    fn emit_words(&mut self, run: Run, lexicon: &dyn Lexicon) -> Result<(), MatrixError> {
        let grid = self.grid;
        let purged = &self.purged;
        let mut fitting: IndexSet<String> = IndexSet::new();

        lexicon.for_each_word(run.len, &mut |word| {
            let word = word.to_ascii_lowercase();
            if purged.contains(&word) || fitting.contains(&word) {
                return;
            }
            if matcher::entry_fits(grid, run.row, run.col, run.dir, word.as_bytes()).is_some() {
                fitting.insert(word);
            }
        });

        for word in fitting {
            let cols = self.pattern_columns(run, word.as_bytes());
            self.push_row(cols, RowMeta::Word { run, word })?;
        }
        Ok(())
    }

    /// One row per letter assignment of a short white sequence.
    ///
    /// Letters are never invented by two crossing fillers: every open cell
    /// of the sequence must be pinned by a crossing run of word length, or
    /// the sequence gets no rows at all and the grid is unfillable.
    fn emit_short_fills(&mut self, run: Run) -> Result<(), MatrixError> {
        for (r, c) in run.cells() {
            if self.grid.cell(r, c).is_open() {
                let crossing = self.grid.run_at(r, c, run.dir.cross());
                if !crossing.map_or(false, |x| x.is_word()) {
                    return Ok(());
                }
            }
        }

        let choices: Vec<Vec<u8>> = run
            .cells()
            .map(|(r, c)| admissible_letters(self.grid.cell(r, c)))
            .collect();
        if choices.iter().any(|letters| letters.is_empty()) {
            return Ok(());
        }

        // Walk the cartesian product: earlier cells most significant,
        // letters ascending.
        let mut idx = vec![0usize; choices.len()];
        'assignments: loop {
            let letters: Vec<u8> = idx.iter().zip(&choices).map(|(&i, ch)| ch[i]).collect();
            let cols = self.pattern_columns(run, &letters);
            self.push_row(cols, RowMeta::ShortFill { run, letters })?;

            let mut k = choices.len();
            loop {
                if k == 0 {
                    break 'assignments;
                }
                k -= 1;
                idx[k] += 1;
                if idx[k] < choices[k].len() {
                    break;
                }
                idx[k] = 0;
            }
        }
        Ok(())
    }

    /// Replays a fully pre-placed sequence (naive mode).
    fn emit_forced(&mut self, run: Run) -> Result<(), MatrixError> {
        let letters: Option<Vec<u8>> = run
            .cells()
            .map(|(r, c)| self.grid.cell(r, c).letter())
            .collect();
        let Some(letters) = letters else { return Ok(()) };

        let cols = self.pattern_columns(run, &letters);
        self.push_row(cols, RowMeta::Forced { run })
    }

    /// Covers the whole slice of a black cell (naive mode).
    fn emit_black(&mut self, row: usize, col: usize) -> Result<(), MatrixError> {
        let Some(slice) = self.slices.slice_of(row, col) else { return Ok(()) };
        let base = slice * SLICE_COLS;
        let cols: Vec<usize> = (base..base + SLICE_COLS).collect();
        self.push_row(cols, RowMeta::Black { row, col })
    }

    /// The columns a row covers when it spells `letters` over `run`.
    /// Cells without a slice contribute nothing.
    fn pattern_columns(&self, run: Run, letters: &[u8]) -> Vec<usize> {
        let mut cols = Vec::new();

        for (k, (r, c)) in run.cells().enumerate() {
            let Some(slice) = self.slices.slice_of(r, c) else { continue };
            let base = slice * SLICE_COLS;
            let letter = (letters[k] - b'a') as usize;

            for pair in 0..ORIENT_PAIR {
                // The half asserting the spelled letter swaps between the
                // orientations, so crossing rows cover the pair exactly once
                // iff they agree on the letter.
                let half = match run.dir {
                    Orientation::Across => usize::from(pair != letter),
                    Orientation::Down => usize::from(pair == letter),
                };
                cols.push(base + 2 * pair + half);
            }

            let orient = match run.dir {
                Orientation::Across => 0,
                Orientation::Down => 1,
            };
            cols.push(base + 2 * ORIENT_PAIR + orient);
        }
        cols
    }

    fn push_row(&mut self, cols: Vec<usize>, meta: RowMeta) -> Result<(), MatrixError> {
        let id = self.matrix.add_row(&cols)?;
        debug_assert_eq!(id, self.rows.len());
        self.rows.push(meta);
        Ok(())
    }
}

fn admissible_letters(cell: Cell) -> Vec<u8> {
    (b'a'..=b'z')
        .filter(|&letter| matcher::matches(cell.as_byte(), letter).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::WordList;

    fn encode(rows: &[&str], words: &[&str], options: &FillOptions) -> Encoding {
        let grid = Grid::parse(rows).unwrap();
        let lexicon = WordList::from_words(words).unwrap();
        build(&grid, &lexicon, options).unwrap()
    }

    #[test]
    fn slice_table_compresses_fixed_cells_away() {
        let grid = Grid::parse(&["b0g", "#.a"]).unwrap();
        let table = SliceTable::compressed(&grid);

        assert_eq!(table.len(), 2);
        assert_eq!(table.slice_of(0, 1), Some(0));
        assert_eq!(table.slice_of(1, 1), Some(1));
        assert_eq!(table.slice_of(0, 0), None);
        assert_eq!(table.slice_of(1, 0), None);
        assert_eq!(table.cell_of(1), (1, 1));

        let naive = SliceTable::naive(&grid);
        assert_eq!(naive.len(), 6);
        assert_eq!(naive.slice_of(1, 0), Some(3));
    }

    #[test]
    fn crossing_patterns_cover_a_slice_iff_letters_agree() {
        let grid = Grid::parse(&["..."; 3]).unwrap();
        let table = SliceTable::compressed(&grid);
        let enc = Encoder {
            grid: &grid,
            slices: &table,
            purged: IndexSet::new(),
            matrix: Matrix::new(table.len() * SLICE_COLS),
            rows: Vec::new(),
        };

        let cell = Run { row: 1, col: 1, dir: Orientation::Across, len: 1 };
        let cross = Run { row: 1, col: 1, dir: Orientation::Down, len: 1 };
        let slice = table.slice_of(1, 1).unwrap();

        let across = enc.pattern_columns(cell, b"k");
        let down_same = enc.pattern_columns(cross, b"k");
        let down_other = enc.pattern_columns(cross, b"q");

        assert_eq!(across.len(), 27);
        assert_eq!(down_same.len(), 27);

        let mut union: Vec<usize> = across.iter().chain(&down_same).copied().collect();
        union.sort();
        let expected: Vec<usize> =
            (slice * SLICE_COLS..(slice + 1) * SLICE_COLS).collect();
        assert_eq!(union, expected);

        // Disagreeing letters collide on pair halves instead.
        let mut clash: Vec<usize> = across.iter().chain(&down_other).copied().collect();
        clash.sort();
        clash.dedup();
        assert_ne!(clash.len(), SLICE_COLS);
    }

    #[test]
    fn word_rows_skip_fixed_cells_in_compressed_mode() {
        let enc = encode(&["b0g"], &["bag", "beg", "big", "bog", "bug", "byg", "bfg"], &FillOptions::default());

        let words: Vec<&str> = enc
            .rows
            .iter()
            .filter_map(|meta| match meta {
                RowMeta::Word { word, .. } => Some(word.as_str()),
                _ => None,
            })
            .collect();
        // bfg does not fit the vowel cell and is never emitted.
        assert_eq!(words, ["bag", "beg", "big", "bog", "bug", "byg"]);

        // One open cell: 27 columns per word row.
        assert_eq!(enc.matrix.col_count(), SLICE_COLS);
    }

    #[test]
    fn short_sequences_get_fill_rows_when_crossed_by_words() {
        let enc = encode(&["b0g"], &["bag"], &FillOptions::default());

        let fills: Vec<&[u8]> = enc
            .rows
            .iter()
            .filter_map(|meta| match meta {
                RowMeta::ShortFill { letters, .. } => Some(letters.as_slice()),
                _ => None,
            })
            .collect();
        // The vowel cell's down sequence, one row per admissible letter.
        assert_eq!(fills, [b"a", b"e", b"i", b"o", b"u", b"y"]);
    }

    #[test]
    fn uncrossed_short_sequences_get_no_rows() {
        let enc = encode(&[".#."], &["cat"], &FillOptions::default());

        assert_eq!(enc.matrix.row_count(), 0);
        assert_eq!(enc.matrix.col_count(), 2 * SLICE_COLS);
    }

    #[test]
    fn pre_placed_words_are_purged() {
        let enc = encode(
            &["eta", "..."],
            &["eta", "ace"],
            &FillOptions::default(),
        );

        // "eta" exactly matches the completed top run: it may not be placed
        // again, so only "ace" rows remain for the open run.
        let words: Vec<&str> = enc
            .rows
            .iter()
            .filter_map(|meta| match meta {
                RowMeta::Word { word, .. } => Some(word.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(words, ["ace"]);
    }

    #[test]
    fn purge_is_disabled_with_duplicates_allowed() {
        let mut options = FillOptions::default();
        options.allow_duplicate_words = true;
        let enc = encode(&["eta", "..."], &["eta", "ace"], &options);

        let words: Vec<&str> = enc
            .rows
            .iter()
            .filter_map(|meta| match meta {
                RowMeta::Word { word, .. } => Some(word.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(words, ["eta", "ace"]);
    }

    #[test]
    fn naive_mode_adds_forced_and_black_rows() {
        let mut options = FillOptions::default();
        options.naive_matrix = true;
        let enc = encode(&["eta", "#.."], &["eta", "tin", "ant"], &options);

        let forced: Vec<Run> = enc
            .rows
            .iter()
            .filter_map(|meta| match meta {
                RowMeta::Forced { run } => Some(*run),
                _ => None,
            })
            .collect();
        // The completed top run and the length-1 down sequence under 'e'.
        assert_eq!(
            forced,
            [
                Run { row: 0, col: 0, dir: Orientation::Across, len: 3 },
                Run { row: 0, col: 0, dir: Orientation::Down, len: 1 },
            ]
        );

        let blacks: Vec<(usize, usize)> = enc
            .rows
            .iter()
            .filter_map(|meta| match meta {
                RowMeta::Black { row, col } => Some((*row, *col)),
                _ => None,
            })
            .collect();
        assert_eq!(blacks, [(1, 0)]);

        // Every cell is a slice in naive mode.
        assert_eq!(enc.matrix.col_count(), 6 * SLICE_COLS);
    }
}
