//! Callback objects to pass to the DLX search.

/// The conventional bail-out value returned by callbacks that want to stop
/// the search. Any negative value works; this one is for callers that do not
/// need to distinguish several abort reasons.
pub const BAIL: i64 = -1;

/// An interface of callback objects to pass to the DLX search.
///
/// [`on_solution`](Callback::on_solution) is invoked once per exact cover,
/// with the chosen rows as 0-based ids in selection order. Its return value
/// steers the search: a negative value aborts the whole search and is
/// surfaced to the caller of `solve`, zero is accumulated as zero, and any
/// positive value is added to the running total that `solve` returns.
pub trait Callback<M> {
    fn on_solution(&mut self, sol: &[usize], mat: &M) -> i64;
    fn on_finish(&mut self) {}
}

/// A simple callback that collects every solution into a vector.
pub struct SolutionCallback {
    pub solutions: Vec<Vec<usize>>,
}

impl Default for SolutionCallback {
    fn default() -> SolutionCallback {
        SolutionCallback { solutions: vec![] }
    }
}

impl<M> Callback<M> for SolutionCallback {
    fn on_solution(&mut self, sol: &[usize], _mat: &M) -> i64 {
        self.solutions.push(sol.to_vec());
        1
    }
}

/// A callback that counts covers without keeping them.
#[derive(Default)]
pub struct CountingCallback;

impl<M> Callback<M> for CountingCallback {
    fn on_solution(&mut self, _sol: &[usize], _mat: &M) -> i64 {
        1
    }
}
