use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent slot of the root cell.
pub const NO_PARENT: usize = usize::MAX;

/// Arena holding the search tree of one run.
///
/// Each discovered cell occupies one slot of an [IndexMap]; its value is the
/// slot of the cell that discovered it ([NO_PARENT] for the seeded start
/// cell). Slots are stable handles: a parent stays addressable after it has
/// been removed from the open deque, which keeps the predecessor chain valid
/// until the route has been reconstructed. The tree is cleared and reused
/// between runs.
#[derive(Clone, Debug, Default)]
pub struct CellTree {
    cells: FxIndexMap<Point, usize>,
}

impl CellTree {
    pub fn new() -> CellTree {
        CellTree::default()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Inserts a newly discovered cell and returns its handle. A cell is
    /// discovered at most once per run, so the coordinate must not be present
    /// yet.
    pub fn insert(&mut self, position: Point, parent: usize) -> usize {
        let (slot, previous) = self.cells.insert_full(position, parent);
        debug_assert!(previous.is_none());
        slot
    }

    /// Whether the coordinate was already discovered in the current run.
    pub fn contains(&self, position: Point) -> bool {
        self.cells.contains_key(&position)
    }

    pub fn point(&self, slot: usize) -> Option<Point> {
        self.cells.get_index(slot).map(|(point, _)| *point)
    }

    /// Walks the parent chain from `slot` and returns the visited points in
    /// root-first order.
    pub fn backtrace(&self, slot: usize) -> Vec<Point> {
        let mut chain: Vec<Point> = itertools::unfold(slot, |i| {
            self.cells.get_index(*i).map(|(point, &parent)| {
                *i = parent;
                *point
            })
        })
        .collect();
        chain.reverse();
        chain
    }
}
