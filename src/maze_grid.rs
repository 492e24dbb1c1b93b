use core::fmt;
use std::path::Path;

use grid_util::grid::{BoolGrid, Grid, SimpleGrid};
use grid_util::point::Point;
use log::info;

use crate::error::{MazeError, Result};

// Raw cell tags stored in the backing grid. Values of CLOSED_BASE and above
// encode a closed cell together with the generation of the run that closed it.
const EMPTY: u32 = 0;
const OBSTACLE: u32 = 1;
const START: u32 = 2;
const TARGET: u32 = 3;
const FRONTIER: u32 = 4;
const ROUTE: u32 = 5;
const CLOSED_BASE: u32 = 6;

/// Offsets to the four orthogonal neighbours in the fixed expansion order:
/// up, down, left, right. This order is the tie-break between equal-length
/// paths and must be identical for DFS and BFS.
const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// The state of a single grid cell.
///
/// `Closed` carries the generation of the search run that closed the cell, so
/// a later run on the same grid can tell its own closed set apart from stale
/// markings left by an earlier, possibly interrupted run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Obstacle,
    Start,
    Target,
    Frontier,
    Route,
    Closed(u32),
}

impl CellState {
    pub(crate) fn raw(self) -> u32 {
        match self {
            CellState::Empty => EMPTY,
            CellState::Obstacle => OBSTACLE,
            CellState::Start => START,
            CellState::Target => TARGET,
            CellState::Frontier => FRONTIER,
            CellState::Route => ROUTE,
            CellState::Closed(generation) => CLOSED_BASE + generation,
        }
    }

    pub(crate) fn from_raw(value: u32) -> CellState {
        match value {
            EMPTY => CellState::Empty,
            OBSTACLE => CellState::Obstacle,
            START => CellState::Start,
            TARGET => CellState::Target,
            FRONTIER => CellState::Frontier,
            ROUTE => CellState::Route,
            closed => CellState::Closed(closed - CLOSED_BASE),
        }
    }

    fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Obstacle => '#',
            CellState::Start => 'S',
            CellState::Target => 'T',
            CellState::Frontier => 'o',
            CellState::Route => '*',
            CellState::Closed(_) => 'x',
        }
    }
}

/// A rectangular maze: per-cell states in a [SimpleGrid] plus the cached
/// start and target positions. `x` is the column and `y` the row, with row 0
/// at the top.
///
/// Obstacles are placed while building the grid and never change during
/// search. [reset](Self::reset) clears the transient search markings
/// (frontier, route, closed) and re-derives the start/target cache, which
/// makes runs repeatable on the same grid without reloading obstacles.
#[derive(Clone, Debug)]
pub struct MazeGrid {
    cells: SimpleGrid<u32>,
    start: Option<Point>,
    target: Option<Point>,
}

impl MazeGrid {
    /// Creates a grid of the given dimensions with every cell empty.
    pub fn new(width: usize, height: usize) -> MazeGrid {
        MazeGrid {
            cells: SimpleGrid::new(width, height, EMPTY),
            start: None,
            target: None,
        }
    }

    /// Builds a maze from a boolean obstacle map where [true] marks a wall.
    pub fn from_obstacles(obstacles: &BoolGrid) -> MazeGrid {
        let mut maze = MazeGrid::new(obstacles.width, obstacles.height);
        for y in 0..obstacles.height {
            for x in 0..obstacles.width {
                if obstacles.get(x, y) {
                    maze.cells.set(x, y, OBSTACLE);
                }
            }
        }
        maze
    }

    /// Loads an obstacle layout from an image file: black pixels become
    /// obstacles, everything else is empty. Start and target are placed
    /// afterwards with [set_start](Self::set_start) and
    /// [set_target](Self::set_target).
    pub fn from_image<P: AsRef<Path>>(path: P) -> Result<MazeGrid> {
        let image = image::open(path)?.to_rgb8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(MazeError::Malformed("obstacle image has zero size"));
        }
        let mut maze = MazeGrid::new(width as usize, height as usize);
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0 == [0, 0, 0] {
                maze.cells.set(x as usize, y as usize, OBSTACLE);
            }
        }
        info!("loaded {}x{} obstacle image", width, height);
        Ok(maze)
    }

    /// Parses a textual layout: `#` is an obstacle, `.` or a space is empty,
    /// `S` and `T` are the start and target. Every row must have the same
    /// width and `S` and `T` may appear at most once.
    pub fn from_ascii(text: &str) -> Result<MazeGrid> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(MazeError::Malformed("obstacle text is empty"));
        }
        let mut maze = MazeGrid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(MazeError::Malformed("rows differ in width"));
            }
            for (x, c) in row.chars().enumerate() {
                let position = Point::new(x as i32, y as i32);
                match c {
                    '.' | ' ' => {}
                    '#' => maze.cells.set(x, y, OBSTACLE),
                    'S' => {
                        if maze.start.is_some() {
                            return Err(MazeError::Malformed("more than one start cell"));
                        }
                        maze.cells.set(x, y, START);
                        maze.start = Some(position);
                    }
                    'T' => {
                        if maze.target.is_some() {
                            return Err(MazeError::Malformed("more than one target cell"));
                        }
                        maze.cells.set(x, y, TARGET);
                        maze.target = Some(position);
                    }
                    _ => return Err(MazeError::Malformed("unrecognized cell character")),
                }
            }
        }
        Ok(maze)
    }

    pub fn width(&self) -> usize {
        self.cells.width
    }

    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn in_bounds(&self, position: Point) -> bool {
        position.x >= 0
            && position.y >= 0
            && self
                .cells
                .index_in_bounds(position.x as usize, position.y as usize)
    }

    /// The cached start position, if the grid has a start cell.
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// The cached target position, if the grid has a target cell.
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// The state of a cell.
    ///
    /// Panics if `position` lies outside the grid; an unchecked read could
    /// silently land on a cell of a different row.
    pub fn state(&self, position: Point) -> CellState {
        assert!(
            self.in_bounds(position),
            "position {position} is outside the grid"
        );
        CellState::from_raw(self.cells.get_point(position))
    }

    pub(crate) fn mark(&mut self, position: Point, state: CellState) {
        self.cells.set_point(position, state.raw());
    }

    /// Moves the start cell, clearing the previous one.
    pub fn set_start(&mut self, position: Point) -> Result<()> {
        self.ensure_in_bounds(position)?;
        if let Some(old) = self.start {
            self.cells.set_point(old, EMPTY);
        }
        if self.target == Some(position) {
            self.target = None;
        }
        self.cells.set_point(position, START);
        self.start = Some(position);
        Ok(())
    }

    /// Moves the target cell, clearing the previous one.
    pub fn set_target(&mut self, position: Point) -> Result<()> {
        self.ensure_in_bounds(position)?;
        if let Some(old) = self.target {
            self.cells.set_point(old, EMPTY);
        }
        if self.start == Some(position) {
            self.start = None;
        }
        self.cells.set_point(position, TARGET);
        self.target = Some(position);
        Ok(())
    }

    /// Places an obstacle while building the grid.
    pub fn set_obstacle(&mut self, position: Point) -> Result<()> {
        self.ensure_in_bounds(position)?;
        if self.start == Some(position) {
            self.start = None;
        }
        if self.target == Some(position) {
            self.target = None;
        }
        self.cells.set_point(position, OBSTACLE);
        Ok(())
    }

    /// Clears all transient search markings (frontier, route and closed cells
    /// of any generation) and re-derives the cached start and target
    /// positions. Obstacles, start and target cells are left intact so
    /// another algorithm can run on the same data.
    pub fn reset(&mut self) {
        self.start = None;
        self.target = None;
        for y in 0..self.cells.height {
            for x in 0..self.cells.width {
                match CellState::from_raw(self.cells.get(x, y)) {
                    CellState::Frontier | CellState::Route | CellState::Closed(_) => {
                        self.cells.set(x, y, EMPTY);
                    }
                    CellState::Start => self.start = Some(Point::new(x as i32, y as i32)),
                    CellState::Target => self.target = Some(Point::new(x as i32, y as i32)),
                    _ => {}
                }
            }
        }
    }

    /// The in-bounds orthogonal neighbours of a position, always in the order
    /// up, down, left, right. Bounds are checked before any state is read.
    pub fn neighbours(&self, position: Point) -> Vec<Point> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|&(dx, dy)| Point::new(position.x + dx, position.y + dy))
            .filter(|p| self.in_bounds(*p))
            .collect()
    }

    fn ensure_in_bounds(&self, position: Point) -> Result<()> {
        if self.in_bounds(position) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                position,
                width: self.cells.width,
                height: self.cells.height,
            })
        }
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.cells.height {
            for x in 0..self.cells.width {
                write!(f, "{}", CellState::from_raw(self.cells.get(x, y)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_layout_round_trips_through_display() {
        let text = "S..\n\
                    .#.\n\
                    ..T";
        let maze = MazeGrid::from_ascii(text).unwrap();
        assert_eq!(maze.width(), 3);
        assert_eq!(maze.height(), 3);
        assert_eq!(maze.start(), Some(Point::new(0, 0)));
        assert_eq!(maze.target(), Some(Point::new(2, 2)));
        assert_eq!(maze.to_string(), "S..\n.#.\n..T\n");
    }

    #[test]
    fn interior_spaces_parse_as_empty() {
        let maze = MazeGrid::from_ascii("S .\n..T").unwrap();
        assert_eq!(maze.state(Point::new(1, 0)), CellState::Empty);
        assert_eq!(maze.start(), Some(Point::new(0, 0)));
        assert_eq!(maze.target(), Some(Point::new(2, 1)));
    }

    #[test]
    #[should_panic(expected = "outside the grid")]
    fn state_rejects_negative_coordinates() {
        let maze = MazeGrid::new(3, 3);
        maze.state(Point::new(-1, 0));
    }

    #[test]
    #[should_panic(expected = "outside the grid")]
    fn state_rejects_coordinates_past_the_row_end() {
        // Without the bounds check (3, 0) would alias a cell of row 1.
        let maze = MazeGrid::new(3, 3);
        maze.state(Point::new(3, 0));
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        assert!(matches!(
            MazeGrid::from_ascii(""),
            Err(MazeError::Malformed(_))
        ));
        assert!(matches!(
            MazeGrid::from_ascii("S..\n.."),
            Err(MazeError::Malformed(_))
        ));
        assert!(matches!(
            MazeGrid::from_ascii("S.q\n..T"),
            Err(MazeError::Malformed(_))
        ));
        assert!(matches!(
            MazeGrid::from_ascii("SS\n.T"),
            Err(MazeError::Malformed(_))
        ));
    }

    #[test]
    fn set_target_moves_the_target() {
        let mut maze = MazeGrid::from_ascii("S..\n..T").unwrap();
        maze.set_target(Point::new(1, 0)).unwrap();
        assert_eq!(maze.state(Point::new(2, 1)), CellState::Empty);
        assert_eq!(maze.state(Point::new(1, 0)), CellState::Target);
        assert_eq!(maze.target(), Some(Point::new(1, 0)));
    }

    #[test]
    fn out_of_bounds_target_is_rejected_without_mutation() {
        let mut maze = MazeGrid::from_ascii("S..\n..T").unwrap();
        let before = maze.to_string();
        assert!(matches!(
            maze.set_target(Point::new(3, 0)),
            Err(MazeError::OutOfBounds { .. })
        ));
        assert!(matches!(
            maze.set_target(Point::new(0, -1)),
            Err(MazeError::OutOfBounds { .. })
        ));
        assert_eq!(maze.to_string(), before);
        assert_eq!(maze.target(), Some(Point::new(2, 1)));
    }

    #[test]
    fn reset_clears_search_markings_and_is_idempotent() {
        let mut maze = MazeGrid::from_ascii("S..\n#.T").unwrap();
        maze.mark(Point::new(1, 0), CellState::Frontier);
        maze.mark(Point::new(2, 0), CellState::Closed(3));
        maze.mark(Point::new(1, 1), CellState::Route);
        maze.reset();
        let after_first = maze.to_string();
        assert_eq!(after_first, "S..\n#.T\n");
        assert_eq!(maze.start(), Some(Point::new(0, 0)));
        assert_eq!(maze.target(), Some(Point::new(2, 1)));
        maze.reset();
        assert_eq!(maze.to_string(), after_first);
    }

    #[test]
    fn neighbours_follow_the_fixed_order_and_stay_in_bounds() {
        let maze = MazeGrid::new(3, 3);
        assert_eq!(
            maze.neighbours(Point::new(1, 1)),
            vec![
                Point::new(1, 0),
                Point::new(1, 2),
                Point::new(0, 1),
                Point::new(2, 1),
            ]
        );
        // Corner cells only yield the two in-bounds neighbours.
        assert_eq!(
            maze.neighbours(Point::new(0, 0)),
            vec![Point::new(0, 1), Point::new(1, 0)]
        );
    }

    #[test]
    fn closed_generations_stay_distinguishable() {
        let mut maze = MazeGrid::new(2, 1);
        maze.mark(Point::new(0, 0), CellState::Closed(1));
        maze.mark(Point::new(1, 0), CellState::Closed(2));
        assert_eq!(maze.state(Point::new(0, 0)), CellState::Closed(1));
        assert_eq!(maze.state(Point::new(1, 0)), CellState::Closed(2));
    }

    #[test]
    fn obstacles_come_from_a_bool_grid() {
        let mut obstacles = BoolGrid::new(2, 2, false);
        obstacles.set(1, 0, true);
        let maze = MazeGrid::from_obstacles(&obstacles);
        assert_eq!(maze.state(Point::new(1, 0)), CellState::Obstacle);
        assert_eq!(maze.state(Point::new(0, 1)), CellState::Empty);
    }
}
