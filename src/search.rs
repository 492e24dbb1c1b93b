use std::collections::VecDeque;

use grid_util::point::Point;
use log::{info, warn};

use crate::cell_tree::{CellTree, NO_PARENT};
use crate::error::{MazeError, Result};
use crate::maze_grid::{CellState, MazeGrid};

/// Which traversal order the open deque uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Last-in-first-out expansion.
    Dfs,
    /// First-in-first-out expansion; finds a minimum-step route.
    Bfs,
}

/// Outcome of one expansion step, polled by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The open deque is non-empty and the target has not been reached.
    Continuing,
    /// A cell adjacent to the target was expanded; the route can be marked.
    Found,
    /// The open deque emptied without reaching the target: no route exists.
    Exhausted,
}

struct Frame {
    point: Point,
    neighbours: Vec<Point>,
    next: usize,
}

/// DFS/BFS engine over a [MazeGrid].
///
/// One instance drives one run at a time but can be reused: every
/// [start_run](Self::start_run) bumps the generation counter, so closed cells
/// left on the grid by an earlier, possibly interrupted run do not block the
/// new one even without a full [MazeGrid::reset] in between.
///
/// Batch mode ([solve](Self::solve)) and animated mode
/// ([start_run](Self::start_run) plus repeated [step](Self::step)) share the
/// same expansion code, so stepping a run to completion yields the same
/// outcome and the same route as the batch call.
#[derive(Clone, Debug)]
pub struct Searcher {
    algorithm: Algorithm,
    tree: CellTree,
    open: VecDeque<usize>,
    generation: u32,
    terminal: Option<usize>,
    goal: Option<Point>,
    status: Status,
}

impl Searcher {
    pub fn new(algorithm: Algorithm) -> Searcher {
        Searcher {
            algorithm,
            tree: CellTree::new(),
            open: VecDeque::new(),
            generation: 0,
            terminal: None,
            goal: None,
            status: Status::Exhausted,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the current run has reached the target.
    pub fn found(&self) -> bool {
        self.status == Status::Found
    }

    /// The generation of the current (or last) run.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Begins a fresh run: bumps the generation, drops the previous search
    /// tree and seeds the open deque with the start cell.
    ///
    /// Fails with [MazeError::InvalidConfiguration] if the grid has no start
    /// or no target cell, leaving engine and grid untouched.
    pub fn start_run(&mut self, grid: &MazeGrid) -> Result<()> {
        let start = grid
            .start()
            .ok_or(MazeError::InvalidConfiguration("start"))?;
        if grid.target().is_none() {
            return Err(MazeError::InvalidConfiguration("target"));
        }
        self.generation += 1;
        self.tree.clear();
        self.open.clear();
        self.terminal = None;
        self.goal = None;
        self.status = Status::Continuing;
        let root = self.tree.insert(start, NO_PARENT);
        self.open.push_back(root);
        info!(
            "starting {:?} run {} from {}",
            self.algorithm, self.generation, start
        );
        Ok(())
    }

    /// Performs exactly one remove-and-expand cycle and returns the run
    /// status. Once the run is [Found](Status::Found) or
    /// [Exhausted](Status::Exhausted) further calls return that status
    /// without touching the grid.
    pub fn step(&mut self, grid: &mut MazeGrid) -> Status {
        if self.status != Status::Continuing {
            return self.status;
        }
        let Some(current) = self.open.pop_front() else {
            warn!("open deque exhausted before the target was reached");
            self.status = Status::Exhausted;
            return self.status;
        };
        let current_point = self.tree.point(current).unwrap();
        if grid.state(current_point) != CellState::Start {
            grid.mark(current_point, CellState::Closed(self.generation));
        }
        for neighbour in grid.neighbours(current_point) {
            match grid.state(neighbour) {
                // First target hit in the fixed neighbour order wins; the
                // remaining neighbours of this cell are not scanned.
                CellState::Target => {
                    self.terminal = Some(current);
                    self.goal = Some(neighbour);
                    self.status = Status::Found;
                    return self.status;
                }
                CellState::Obstacle | CellState::Start => {}
                CellState::Closed(generation) if generation == self.generation => {}
                // Anything else (empty cells, but also route, frontier or
                // closed cells left over from an earlier run) is discoverable
                // unless this run already queued it.
                _ => {
                    if self.tree.contains(neighbour) {
                        continue;
                    }
                    let slot = self.tree.insert(neighbour, current);
                    grid.mark(neighbour, CellState::Frontier);
                    match self.algorithm {
                        Algorithm::Dfs => self.open.push_front(slot),
                        Algorithm::Bfs => self.open.push_back(slot),
                    }
                }
            }
        }
        self.status
    }

    /// Batch mode: runs the traversal to completion and marks the route if
    /// the target was reached.
    ///
    /// The grid afterwards is the snapshot of the moment the run ended:
    /// cells that were discovered but never expanded keep their
    /// [CellState::Frontier] marking, exactly as after an animated run
    /// driven to completion.
    pub fn solve(&mut self, grid: &mut MazeGrid) -> Result<Status> {
        self.start_run(grid)?;
        while self.step(grid) == Status::Continuing {}
        self.mark_route(grid);
        Ok(self.status)
    }

    /// Walks the predecessor chain back from the cell that discovered the
    /// target and marks every cell on it [CellState::Route], leaving the
    /// start cell untouched. No-op if the run has not found the target.
    pub fn mark_route(&self, grid: &mut MazeGrid) {
        let Some(terminal) = self.terminal else {
            return;
        };
        for point in self.tree.backtrace(terminal).into_iter().skip(1) {
            grid.mark(point, CellState::Route);
        }
    }

    /// The discovered start-to-target path, or [None] while no run has found
    /// the target.
    pub fn path(&self) -> Option<Vec<Point>> {
        let terminal = self.terminal?;
        let goal = self.goal?;
        let mut path = self.tree.backtrace(terminal);
        path.push(goal);
        Some(path)
    }

    /// Depth-first traversal that marks the route while backtracking instead
    /// of reconstructing it afterwards: a cell is closed when first entered
    /// and promoted to [CellState::Route] on the way back only if its branch
    /// reached the target, so dead ends stay closed. Returns whether the
    /// target was reached.
    ///
    /// This is the recursive formulation of DFS restated with an explicit
    /// frame stack, so the supported maze size does not depend on the call
    /// stack.
    pub fn dfs_backtracking(&mut self, grid: &mut MazeGrid) -> Result<bool> {
        let start = grid
            .start()
            .ok_or(MazeError::InvalidConfiguration("start"))?;
        if grid.target().is_none() {
            return Err(MazeError::InvalidConfiguration("target"));
        }
        self.generation += 1;
        let generation = self.generation;
        info!(
            "starting backtracking DFS run {} from {}",
            generation, start
        );
        let mut frames = vec![Frame {
            point: start,
            neighbours: grid.neighbours(start),
            next: 0,
        }];
        while let Some(frame) = frames.last_mut() {
            if frame.next >= frame.neighbours.len() {
                // Dead end: the cell stays closed.
                frames.pop();
                continue;
            }
            let neighbour = frame.neighbours[frame.next];
            frame.next += 1;
            match grid.state(neighbour) {
                CellState::Target => {
                    for frame in frames.iter().skip(1) {
                        grid.mark(frame.point, CellState::Route);
                    }
                    return Ok(true);
                }
                CellState::Empty => {
                    grid.mark(neighbour, CellState::Closed(generation));
                    frames.push(Frame {
                        point: neighbour,
                        neighbours: grid.neighbours(neighbour),
                        next: 0,
                    });
                }
                _ => {}
            }
        }
        warn!("backtracking DFS explored every branch without reaching the target");
        Ok(false)
    }
}
