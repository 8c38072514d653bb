//! Grid-based pathfinding using A* algorithm.
//!
//! Cells are 8-connected. Axis-aligned steps cost [`STRAIGHT_COST`] and
//! diagonal steps [`DIAGONAL_COST`], a fixed-point stand-in for the 1 : √2
//! ratio. The heuristic is Chebyshev distance scaled by the straight cost,
//! which is admissible and consistent for this weighting.
//!
//! # Search rules
//!
//! - Among open cells with equal f-score, the one pushed to the open set
//!   earliest is expanded first. Ties are deterministic but callers should
//!   not rely on which of several equal-cost paths comes back.
//! - An open cell is re-parented when a new route reaches it with a g-score
//!   less than or equal to its recorded one.
//! - A closed cell is never reopened, even if a cheaper route to it turns up
//!   later. With a consistent heuristic this cannot happen, so results stay
//!   optimal, but the rule is kept explicit rather than relying on it.
//! - Out-of-bounds cells and obstacles are never neighbours. The goal is
//!   reached when it is popped, not when it is first discovered.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::{AgentError, Result};
use crate::world::{GridExtent, GridPos};

/// Cost of a horizontal or vertical step.
pub const STRAIGHT_COST: u64 = 10;

/// Cost of a diagonal step.
pub const DIAGONAL_COST: u64 = 14;

/// Static set of blocked cells, fixed when the planner runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObstacleSet {
    cells: HashSet<GridPos>,
}

impl ObstacleSet {
    /// Create an empty obstacle set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a cell as blocked.
    pub fn insert(&mut self, pos: GridPos) {
        self.cells.insert(pos);
    }

    /// Check if a cell is blocked.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }

    /// Number of blocked cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if nothing is blocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<GridPos> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = GridPos>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// A node in the A* open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct AStarNode {
    pos: GridPos,
    /// f_score = g_score + heuristic
    f_score: u64,
    /// Push order. Lower wins among equal f-scores.
    tie_breaker: u64,
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so we reverse the comparison for min-heap behavior.
        match other.f_score.cmp(&self.f_score) {
            Ordering::Equal => other.tie_breaker.cmp(&self.tie_breaker),
            ord => ord,
        }
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Neighbour offsets, in enumeration order.
const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Cost of one step by the given offset.
#[inline]
const fn step_cost(dx: i32, dy: i32) -> u64 {
    if dx != 0 && dy != 0 {
        DIAGONAL_COST
    } else {
        STRAIGHT_COST
    }
}

/// Chebyshev distance in step-cost units.
///
/// Costs are `u64` so that a distance of `i32::MAX` cells times the
/// straight cost still fits.
#[inline]
fn heuristic(from: GridPos, goal: GridPos) -> u64 {
    u64::from(from.chebyshev(goal)) * STRAIGHT_COST
}

/// Find a path from `start` to `goal` around `obstacles`.
///
/// The returned cells exclude `start` and include `goal`, so a unit standing
/// on `start` can walk it one element per step. `start == goal` yields an
/// empty path.
///
/// # Errors
///
/// - [`AgentError::OutOfBounds`] if `start` or `goal` lies outside `bounds`.
/// - [`AgentError::NoPath`] if the goal cannot be reached.
pub fn plan(
    start: GridPos,
    goal: GridPos,
    obstacles: &ObstacleSet,
    bounds: GridExtent,
) -> Result<Vec<GridPos>> {
    if !bounds.contains(start) {
        return Err(AgentError::OutOfBounds(start));
    }
    if !bounds.contains(goal) {
        return Err(AgentError::OutOfBounds(goal));
    }

    let mut open_set: BinaryHeap<AStarNode> = BinaryHeap::new();
    let mut closed: HashSet<GridPos> = HashSet::new();
    let mut came_from: HashMap<GridPos, GridPos> = HashMap::new();
    let mut g_score: HashMap<GridPos, u64> = HashMap::new();
    let mut pushes: u64 = 0;

    g_score.insert(start, 0);
    open_set.push(AStarNode {
        pos: start,
        f_score: heuristic(start, goal),
        tie_breaker: pushes,
    });

    while let Some(current) = open_set.pop() {
        // Stale duplicate of an already expanded cell.
        if closed.contains(&current.pos) {
            continue;
        }

        if current.pos == goal {
            return Ok(reconstruct_path(&came_from, start, goal));
        }

        closed.insert(current.pos);
        let current_g = g_score.get(&current.pos).copied().unwrap_or(u64::MAX);

        for &(dx, dy) in &NEIGHBOURS {
            let neighbour = current.pos.offset(dx, dy);
            if !bounds.contains(neighbour) || obstacles.contains(neighbour) {
                continue;
            }
            if closed.contains(&neighbour) {
                continue;
            }

            let tentative_g = current_g.saturating_add(step_cost(dx, dy));
            let improves = g_score
                .get(&neighbour)
                .map_or(true, |&known| tentative_g <= known);

            if improves {
                came_from.insert(neighbour, current.pos);
                g_score.insert(neighbour, tentative_g);
                pushes += 1;
                open_set.push(AStarNode {
                    pos: neighbour,
                    f_score: tentative_g.saturating_add(heuristic(neighbour, goal)),
                    tie_breaker: pushes,
                });
            }
        }
    }

    Err(AgentError::NoPath { start, goal })
}

/// Walk parent links back from the goal, dropping the start cell.
fn reconstruct_path(
    came_from: &HashMap<GridPos, GridPos>,
    start: GridPos,
    goal: GridPos,
) -> Vec<GridPos> {
    let mut path = Vec::new();
    let mut current = goal;

    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(&prev) => current = prev,
            None => break,
        }
    }

    path.reverse();
    path
}

/// Total weighted cost of walking `path` from `start`.
///
/// Steps that are not single moves are charged as straight steps per cell of
/// Chebyshev distance; planner output never contains them.
#[must_use]
pub fn path_cost(start: GridPos, path: &[GridPos]) -> u64 {
    let mut cost: u64 = 0;
    let mut from = start;
    for &to in path {
        let step = if from.chebyshev(to) <= 1 {
            step_cost(to.x - from.x, to.y - from.y)
        } else {
            heuristic(from, to)
        };
        cost = cost.saturating_add(step);
        from = to;
    }
    cost
}

/// Draw the grid as text.
///
/// `#` obstacle, `S` start, `G` goal, `*` path, `.` free.
#[must_use]
pub fn render_ascii(
    bounds: GridExtent,
    obstacles: &ObstacleSet,
    start: GridPos,
    goal: GridPos,
    path: &[GridPos],
) -> String {
    let on_path: HashSet<GridPos> = path.iter().copied().collect();
    let mut out = String::new();
    for y in 0..bounds.height {
        for x in 0..bounds.width {
            let pos = GridPos::new(x, y);
            let c = if pos == start {
                'S'
            } else if pos == goal {
                'G'
            } else if obstacles.contains(pos) {
                '#'
            } else if on_path.contains(&pos) {
                '*'
            } else {
                '.'
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
