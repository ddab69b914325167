//! The sparse toroidal matrix and the exact cover search itself.

use crate::dlx::callback::Callback;

/// An error returned when a row cannot be added to a [`Matrix`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    #[error("column {column} is out of range for a matrix with {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("a row must contain at least one column")]
    EmptyRow,
}

/// A single node of [`Matrix`].
#[derive(Default)]
#[cfg_attr(test, derive(Debug))]
struct Node {
    // row, col: 1-based b/c of the head node (only internally)
    row: usize,
    col: usize,
    left: usize,
    right: usize,
    up: usize,
    down: usize,
}

/// A sparse matrix representation of an exact cover problem used for the
/// DLX algorithm.
///
/// Every node lives in a single `Vec` arena and every link is an index into
/// it, so the whole cyclic structure is owned by one allocation and freed by
/// `Drop`. Rows and columns are 0-based in the public API; internally they
/// are shifted by one to make room for the head node.
#[cfg_attr(test, derive(Debug))]
pub struct Matrix {
    row_cnt: usize,
    col_cnt: usize,
    pool: Vec<Node>, // head: 0, columns: 1..=col_cnt
    col_size: Vec<usize>,

    partial_sol: Vec<usize>,
    bail: Option<i64>,
}

impl Default for Matrix {
    fn default() -> Matrix {
        Matrix {
            row_cnt: 0,
            col_cnt: 0,
            pool: vec![Node::default()],
            col_size: vec![0],

            partial_sol: vec![],
            bail: None,
        }
    }
}

// Methods for initializing Matrix
impl Matrix {
    const HEAD: usize = 0;

    /// Creates a matrix with `col_cnt` empty columns on a circular header
    /// chain.
    pub fn new(col_cnt: usize) -> Matrix {
        let mut mat = Matrix {
            col_cnt,
            col_size: vec![0; col_cnt + 1],
            ..Matrix::default()
        };
        for col_num in 1..=col_cnt {
            let col = mat.create_node(0, col_num);
            mat.insert_right(col - 1, col);
        }
        mat
    }

    /// Creates a matrix and adds all the given rows.
    pub fn with_rows(col_cnt: usize, rows: &[&[usize]]) -> Result<Matrix, MatrixError> {
        let mut mat = Matrix::new(col_cnt);
        for row in rows {
            mat.add_row(row)?;
        }
        Ok(mat)
    }

    /// Appends a row with 1s in the given (0-based) columns and returns the
    /// new row's id.
    ///
    /// The input is validated before any node is linked, so a failed call
    /// leaves the matrix unchanged.
    pub fn add_row(&mut self, row: &[usize]) -> Result<usize, MatrixError> {
        if row.is_empty() {
            return Err(MatrixError::EmptyRow);
        }
        for &col in row {
            if col >= self.col_cnt {
                return Err(MatrixError::ColumnOutOfRange {
                    column: col,
                    columns: self.col_cnt,
                });
            }
        }

        self.row_cnt += 1;
        let row_num = self.row_cnt;
        let mut left_node = 0;

        for &col in row {
            let col_num = col + 1;
            let node = self.create_node(row_num, col_num);

            self.insert_down(self.pool[col_num].up, node);
            if left_node != 0 {
                self.insert_right(left_node, node);
            }

            self.col_size[col_num] += 1;
            left_node = node;
        }

        Ok(row_num - 1)
    }

    /// Returns the number of columns.
    pub fn col_count(&self) -> usize {
        self.col_cnt
    }

    /// Returns the number of rows added so far.
    pub fn row_count(&self) -> usize {
        self.row_cnt
    }
}

// Main algorithm (dancing links)
impl Matrix {
    /// Runs the exact cover search, invoking `callback` once per cover.
    ///
    /// Returns the accumulated total of the callback's return values, or the
    /// callback's negative bail-out value if it aborted the search. Either
    /// way the matrix is restored to its pre-call state: every cover is
    /// undone by the matching uncover on the way out.
    pub fn solve(&mut self, callback: &mut impl Callback<Matrix>) -> i64 {
        self.bail = None;
        self.partial_sol.clear();
        let total = self.search(callback);
        callback.on_finish();
        self.bail.unwrap_or(total)
    }

    fn search(&mut self, callback: &mut impl Callback<Matrix>) -> i64 {
        if self.pool[Matrix::HEAD].right == Matrix::HEAD {
            let verdict = callback.on_solution(&self.partial_sol, self);
            if verdict < 0 {
                self.bail = Some(verdict);
                return 0;
            }
            return verdict;
        }

        // MRV (minimum remaining values) heuristic:
        // branch on the column with the fewest live rows.
        let (col, size) = self.choose_best_col();
        if size == 0 {
            return 0; // Dead end
        }

        let mut total = 0;
        self.cover_col(col);

        let mut r = self.pool[col].down;
        while r != col {
            let row = self.select_row(r);
            self.partial_sol.push(row - 1);

            total += self.search(callback);

            self.unselect_row(r);
            self.partial_sol.pop();

            if self.bail.is_some() {
                break;
            }
            r = self.pool[r].down;
        }

        self.uncover_col(col);
        total
    }
}

// Helper methods
impl Matrix {
    fn create_node(&mut self, row: usize, col: usize) -> usize {
        let idx = self.pool.len();
        self.pool.push(Node {
            row,
            col,
            left: idx,
            right: idx,
            up: idx,
            down: idx,
        });
        idx
    }

    fn insert_right(&mut self, at: usize, node: usize) {
        let right = self.pool[at].right;
        self.pool[node].right = right;
        self.pool[right].left = node;
        self.pool[node].left = at;
        self.pool[at].right = node;
    }

    fn insert_down(&mut self, at: usize, node: usize) {
        let down = self.pool[at].down;
        self.pool[node].down = down;
        self.pool[down].up = node;
        self.pool[node].up = at;
        self.pool[at].down = node;
    }

    #[inline]
    fn cover_col(&mut self, col: usize) {
        let Node { left, right, .. } = self.pool[col];
        self.pool[left].right = right;
        self.pool[right].left = left;

        let mut i = self.pool[col].down;
        while i != col {
            let mut j = self.pool[i].right;
            while j != i {
                let Node { col: c, up, down, .. } = self.pool[j];
                self.pool[up].down = down;
                self.pool[down].up = up;

                self.col_size[c] -= 1;
                j = self.pool[j].right;
            }

            i = self.pool[i].down;
        }
    }

    #[inline]
    fn uncover_col(&mut self, col: usize) {
        let mut i = self.pool[col].up;
        while i != col {
            let mut j = self.pool[i].left;
            while j != i {
                let Node { col: c, up, down, .. } = self.pool[j];
                self.pool[up].down = j;
                self.pool[down].up = j;

                self.col_size[c] += 1;
                j = self.pool[j].left;
            }

            i = self.pool[i].up;
        }

        let Node { left, right, .. } = self.pool[col];
        self.pool[left].right = col;
        self.pool[right].left = col;
    }

    /// Covers every other column of row `r` and returns the row's internal
    /// (1-based) id.
    #[inline]
    fn select_row(&mut self, r: usize) -> usize {
        let mut j = self.pool[r].right;
        while j != r {
            self.cover_col(self.pool[j].col);
            j = self.pool[j].right;
        }
        self.pool[r].row
    }

    /// Uncovers the columns covered by [`select_row`](Matrix::select_row),
    /// in reverse order.
    #[inline]
    fn unselect_row(&mut self, r: usize) {
        let mut j = self.pool[r].left;
        while j != r {
            self.uncover_col(self.pool[j].col);
            j = self.pool[j].left;
        }
    }

    /// Chooses the uncovered column with the lowest live count. Ties keep
    /// the first occurrence along the header chain, which makes the search
    /// order fully deterministic.
    #[inline]
    fn choose_best_col(&self) -> (usize, usize) {
        let mut col = self.pool[Matrix::HEAD].right;
        let mut size = self.col_size[col];

        let mut j = col;
        while j != Matrix::HEAD {
            if self.col_size[j] < size {
                col = j;
                size = self.col_size[j];
            }
            j = self.pool[j].right;
        }
        (col, size)
    }
}

#[cfg(test)]
impl Matrix {
    /// Snapshot of every link and count, for restore-invariance checks.
    fn link_state(&self) -> (Vec<[usize; 6]>, Vec<usize>) {
        let links = self
            .pool
            .iter()
            .map(|n| [n.row, n.col, n.left, n.right, n.up, n.down])
            .collect();
        (links, self.col_size.clone())
    }
}
