//! Turns covers back into filled grids and applies the emission policy.

use log::debug;

use crate::dlx::callback::{Callback, BAIL};
use crate::dlx::matrix::Matrix;
use crate::grid::{Cell, Grid, Run};

use super::encode::RowMeta;
use super::FillOptions;

/// Reconstructs a filled grid from the rows of a cover.
pub struct Decoder<'a> {
    grid: &'a Grid,
    rows: &'a [RowMeta],
}

impl<'a> Decoder<'a> {
    pub fn new(grid: &'a Grid, rows: &'a [RowMeta]) -> Decoder<'a> {
        Decoder { grid, rows }
    }

    /// Writes the letters of every chosen placement and short fill over a
    /// copy of the input grid.
    ///
    /// Forced and black rows only reassert what the grid already contains
    /// and are skipped; letters written over fixed cells agree with them by
    /// construction of the matrix.
    pub fn decode(&self, sol: &[usize]) -> Grid {
        let mut filled = self.grid.clone();
        for &id in sol {
            match &self.rows[id] {
                RowMeta::Word { run, word } => write_letters(&mut filled, *run, word.as_bytes()),
                RowMeta::ShortFill { run, letters } => write_letters(&mut filled, *run, letters),
                RowMeta::Forced { .. } | RowMeta::Black { .. } => {}
            }
        }
        filled
    }
}

fn write_letters(grid: &mut Grid, run: Run, letters: &[u8]) {
    for (k, (row, col)) in run.cells().enumerate() {
        grid.set_cell(row, col, Cell::Letter(letters[k]));
    }
}

/// The solution sink: decodes covers, filters duplicates and enforces the
/// emission policy.
///
/// All counters live here, threaded through the search as callback state,
/// never in process-wide variables.
pub struct FillSink<'a> {
    decoder: Decoder<'a>,
    options: &'a FillOptions,
    sink: &'a mut dyn FnMut(&Grid),
    accepted: u64,
    emitted: u64,
}

impl<'a> FillSink<'a> {
    pub fn new(
        decoder: Decoder<'a>,
        options: &'a FillOptions,
        sink: &'a mut dyn FnMut(&Grid),
    ) -> FillSink<'a> {
        FillSink { decoder, options, sink, accepted: 0, emitted: 0 }
    }

    /// Number of grids handed to the sink so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Callback<Matrix> for FillSink<'_> {
    fn on_solution(&mut self, sol: &[usize], _mat: &Matrix) -> i64 {
        let filled = self.decoder.decode(sol);

        if !self.options.allow_duplicate_words {
            if let Some(word) = filled.duplicate_run() {
                // Dropped silently; counts toward no quota.
                debug!("dropping a filling that uses {:?} twice", word);
                return 0;
            }
        }

        self.accepted += 1;
        let stride = self.options.every_nth.max(1);
        if self.accepted % stride != 0 {
            return 0;
        }

        (self.sink)(&filled);
        self.emitted += 1;

        match self.options.max_solutions {
            Some(max) if self.emitted >= max => BAIL,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Orientation;

    fn meta_rows() -> (Grid, Vec<RowMeta>) {
        let grid = Grid::parse(&["b0g"]).unwrap();
        let across = Run { row: 0, col: 0, dir: Orientation::Across, len: 3 };
        let down = Run { row: 0, col: 1, dir: Orientation::Down, len: 1 };
        let rows = vec![
            RowMeta::Word { run: across, word: "bag".to_string() },
            RowMeta::ShortFill { run: down, letters: vec![b'a'] },
        ];
        (grid, rows)
    }

    #[test]
    fn decode_writes_chosen_letters() {
        let (grid, rows) = meta_rows();
        let decoder = Decoder::new(&grid, &rows);

        assert_eq!(decoder.decode(&[0, 1]).to_string(), "bag");
        // Selection order does not matter: crossing rows agree.
        assert_eq!(decoder.decode(&[1, 0]).to_string(), "bag");
    }

    #[test]
    fn sink_applies_quota_and_stride() {
        let (grid, rows) = meta_rows();
        let mut options = FillOptions::default();
        options.every_nth = 2;

        let mut seen = vec![];
        {
            let mut sink = |g: &Grid| seen.push(g.to_string());
            let mut cb = FillSink::new(Decoder::new(&grid, &rows), &options, &mut sink);

            let mat = Matrix::new(0);
            assert_eq!(cb.on_solution(&[0, 1], &mat), 0); // 1st acceptable, skipped
            assert_eq!(cb.on_solution(&[0, 1], &mat), 1); // 2nd, emitted
            assert_eq!(cb.emitted(), 1);
        }
        assert_eq!(seen, ["bag"]);

        let mut options = FillOptions::default();
        options.max_solutions = Some(1);
        let mut sink = |_: &Grid| {};
        let mut cb = FillSink::new(Decoder::new(&grid, &rows), &options, &mut sink);
        let mat = Matrix::new(0);
        assert_eq!(cb.on_solution(&[0, 1], &mat), BAIL);
    }
}
