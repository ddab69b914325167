//! Crossword grid filler built on Knuth's [dancing links (DLX)] algorithm.
//!
//! [exact cover]: https://en.wikipedia.org/wiki/Exact_cover
//! [dancing links (DLX)]: https://en.wikipedia.org/wiki/Dancing_Links
//!
//! # Concept
//!
//! Filling a crossword grid is an [exact cover] problem: every open cell
//! must be crossed by exactly one across and one down entry, the two must
//! agree on the letter they spell there, and every entry must be a
//! dictionary word. This crate reduces a partially constrained grid (black
//! squares, pre-placed letters, vowel/consonant wildcards) plus a
//! dictionary to such an instance, enumerates its covers with a dancing
//! links search, and streams the completed grids back in a deterministic
//! order.
//!
//! # Basic example
//!
//! ```
//! use crossfill::{Grid, GridFill, WordList};
//!
//! let grid = Grid::parse(&[
//!     ".AS",
//!     ".R.",
//!     "ETA",
//! ]).unwrap();
//! let words =
//!     WordList::from_words(["art", "eta", "has", "hie", "hit", "ire", "sea"]).unwrap();
//!
//! let mut fillings = vec![];
//! let filler = GridFill::new(&grid, &words);
//! filler.solve(|g| fillings.push(g.to_string())).unwrap();
//!
//! assert_eq!(fillings, ["has\nire\neta"]);
//! ```
//!
//! The low-level [`dlx`] module is usable on its own for other exact cover
//! problems.

pub mod dlx;
pub mod fill;
pub mod grid;
pub mod lexicon;
pub mod matcher;

pub use fill::{FillError, FillOptions, GridFill};
pub use grid::{Cell, Grid, Orientation, Run};
pub use lexicon::{Lexicon, WordList};
