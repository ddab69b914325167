//! The crossword filler: reduction to exact cover, search and decoding.

pub mod decode;
pub mod encode;

use log::debug;

use crate::dlx::matrix::MatrixError;
use crate::grid::{Grid, GridError};
use crate::lexicon::{Lexicon, WordError};

use self::decode::{Decoder, FillSink};

/// Behavioural flags accepted by the filler.
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// Allow the same word to appear in two entries, and skip the
    /// pre-placed duplicate checks.
    pub allow_duplicate_words: bool,
    /// Stop after this many emitted fillings.
    pub max_solutions: Option<u64>,
    /// Emit only every n-th acceptable filling (0 behaves like 1).
    pub every_nth: u64,
    /// Give every grid cell a slice and simulate fixed cells with filler
    /// rows, instead of compressing them away. Slower, but the resulting
    /// matrix is easier to inspect; the solution sequence is the same.
    pub naive_matrix: bool,
}

impl Default for FillOptions {
    fn default() -> FillOptions {
        FillOptions {
            allow_duplicate_words: false,
            max_solutions: None,
            every_nth: 1,
            naive_matrix: false,
        }
    }
}

/// An error produced while preparing a fill.
///
/// The filler has a single error channel: everything the grid parser, the
/// word list or the matrix can report converts into this type.
#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Word(#[from] WordError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// A grid filling problem: a grid, a dictionary and the behavioural flags.
///
/// See the [crate-level documentation](crate) for an example.
pub struct GridFill<'a, L: Lexicon> {
    grid: &'a Grid,
    lexicon: &'a L,
    options: FillOptions,
}

impl<'a, L: Lexicon> GridFill<'a, L> {
    /// Creates a filler with default options.
    pub fn new(grid: &'a Grid, lexicon: &'a L) -> GridFill<'a, L> {
        GridFill { grid, lexicon, options: FillOptions::default() }
    }

    /// Returns a reference to the flags.
    pub fn options(&self) -> &FillOptions {
        &self.options
    }

    /// Returns a mutable reference to the flags.
    pub fn options_mut(&mut self) -> &mut FillOptions {
        &mut self.options
    }

    /// Enumerates complete fillings of the grid, passing each one to `sink`
    /// in a deterministic order.
    ///
    /// Returns the number of fillings emitted; zero fillings is a normal
    /// outcome, not an error.
    pub fn solve<F: FnMut(&Grid)>(&self, mut sink: F) -> Result<u64, FillError> {
        if self.options.max_solutions == Some(0) {
            return Ok(0);
        }

        // A grid that already spells the same word twice has no acceptable
        // fillings at all.
        if !self.options.allow_duplicate_words {
            if let Some(word) = self.grid.duplicate_run() {
                debug!("input grid already contains {:?} twice", word);
                return Ok(0);
            }
        }

        let mut encoding = encode::build(self.grid, self.lexicon, &self.options)?;

        let mut cb = FillSink::new(
            Decoder::new(self.grid, &encoding.rows),
            &self.options,
            &mut sink,
        );
        let outcome = encoding.matrix.solve(&mut cb);
        let emitted = cb.emitted();
        debug!("search finished (outcome {}), {} fillings emitted", outcome, emitted);

        Ok(emitted)
    }

    /// Counts fillings without keeping them.
    pub fn count(&self) -> Result<u64, FillError> {
        self.solve(|_| {})
    }
}
