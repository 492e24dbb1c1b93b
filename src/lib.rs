//! # maze_search
//!
//! Maze solving on a uniform 2-D grid with
//! [depth-first](https://en.wikipedia.org/wiki/Depth-first_search) and
//! [breadth-first](https://en.wikipedia.org/wiki/Breadth-first_search)
//! search. Both algorithms run either to completion in one call or one
//! expansion step at a time, so an external driver (a UI timer, typically)
//! can animate the evolving frontier and closed set and redraw between
//! steps. A third, backtracking DFS variant marks the route during the
//! traversal itself.
//!
//! The crate is the search core only: rendering, windowing and timers are
//! collaborators that read per-cell state through [MazeGrid::state] (or the
//! [Display](core::fmt::Display) impl) and drive the engine through
//! [Searcher]. Everything is single-threaded and driver-paced; cancelling an
//! animated run simply means not calling [Searcher::step] again.
//!
//! ```
//! use maze_search::{Algorithm, MazeGrid, Searcher, Status};
//!
//! let mut grid = MazeGrid::from_ascii(
//!     "S..#.\n\
//!      .#.#.\n\
//!      .#...\n\
//!      .##..\n\
//!      ...#T",
//! )
//! .unwrap();
//! let mut searcher = Searcher::new(Algorithm::Bfs);
//! assert_eq!(searcher.solve(&mut grid).unwrap(), Status::Found);
//! println!("{grid}");
//! ```

pub mod cell_tree;
pub mod error;
pub mod maze_grid;
pub mod search;

pub use error::{MazeError, Result};
pub use maze_grid::{CellState, MazeGrid};
pub use search::{Algorithm, Searcher, Status};
