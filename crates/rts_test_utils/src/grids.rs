//! Grid fixtures for planner tests.
//!
//! Random grid strategies and a plain Dijkstra solver used as the ground
//! truth for A* optimality checks.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use proptest::prelude::*;
use rts_ai::pathfinding::{ObstacleSet, DIAGONAL_COST, STRAIGHT_COST};
use rts_ai::world::{GridExtent, GridPos};

/// A planner problem: map size, blocked cells, endpoints.
#[derive(Debug, Clone)]
pub struct GridCase {
    /// Map size.
    pub extent: GridExtent,
    /// Blocked cells.
    pub obstacles: ObstacleSet,
    /// Start cell.
    pub start: GridPos,
    /// Goal cell.
    pub goal: GridPos,
}

/// Parse an ASCII map.
///
/// `#` is an obstacle, `S` the start, `G` the goal, anything else free.
/// Rows may have different lengths; the extent uses the longest.
///
/// # Panics
///
/// Panics if the map has no `S` or no `G`.
#[must_use]
pub fn parse_ascii(map: &str) -> GridCase {
    let mut obstacles = ObstacleSet::new();
    let mut start = None;
    let mut goal = None;
    let mut width = 0;
    let mut height = 0;

    for (y, line) in map.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
        let y = y as i32;
        height = y + 1;
        for (x, c) in line.chars().enumerate() {
            let pos = GridPos::new(x as i32, y);
            width = width.max(x as i32 + 1);
            match c {
                '#' => obstacles.insert(pos),
                'S' => start = Some(pos),
                'G' => goal = Some(pos),
                _ => {}
            }
        }
    }

    GridCase {
        extent: GridExtent::new(width, height),
        obstacles,
        start: start.expect("map has no S"),
        goal: goal.expect("map has no G"),
    }
}

/// Cheapest path cost from `start` to `goal` by uniform-cost search.
///
/// Uses the same 8-connected moves and step costs as the planner. The start
/// cell is never treated as blocked; the goal is unreachable when blocked.
#[must_use]
pub fn reference_shortest_cost(
    start: GridPos,
    goal: GridPos,
    obstacles: &ObstacleSet,
    extent: GridExtent,
) -> Option<u64> {
    if !extent.contains(start) || !extent.contains(goal) {
        return None;
    }

    let mut dist: BTreeMap<(i32, i32), u64> = BTreeMap::new();
    let mut heap = BinaryHeap::new();
    dist.insert((start.x, start.y), 0);
    heap.push(Reverse((0u64, start.x, start.y)));

    while let Some(Reverse((cost, x, y))) = heap.pop() {
        let pos = GridPos::new(x, y);
        if pos == goal {
            return Some(cost);
        }
        if dist.get(&(x, y)).is_some_and(|&d| cost > d) {
            continue;
        }
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let next = pos.offset(dx, dy);
                if !extent.contains(next) || obstacles.contains(next) {
                    continue;
                }
                let step = if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    STRAIGHT_COST
                };
                let candidate = cost + step;
                let key = (next.x, next.y);
                if dist.get(&key).map_or(true, |&d| candidate < d) {
                    dist.insert(key, candidate);
                    heap.push(Reverse((candidate, next.x, next.y)));
                }
            }
        }
    }

    None
}

/// A cell inside `extent`.
pub fn arb_cell(extent: GridExtent) -> impl Strategy<Value = GridPos> {
    (0..extent.width, 0..extent.height).prop_map(|(x, y)| GridPos::new(x, y))
}

/// A random grid up to `max_side` cells square.
///
/// Roughly `density_pct` percent of cells are blocked. Start and goal are
/// never blocked, so both reachable and walled-off cases come up.
pub fn arb_grid_case(max_side: i32, density_pct: u32) -> impl Strategy<Value = GridCase> {
    (2..=max_side, 2..=max_side)
        .prop_flat_map(move |(width, height)| {
            let extent = GridExtent::new(width, height);
            let cells = (width * height) as usize;
            (
                Just(extent),
                proptest::collection::vec(0u32..100, cells),
                arb_cell(extent),
                arb_cell(extent),
            )
        })
        .prop_map(move |(extent, rolls, start, goal)| {
            let obstacles = rolls
                .iter()
                .enumerate()
                .filter(|(_, roll)| **roll < density_pct)
                .map(|(i, _)| {
                    let i = i as i32;
                    GridPos::new(i % extent.width, i / extent.width)
                })
                .filter(|&pos| pos != start && pos != goal)
                .collect();
            GridCase {
                extent,
                obstacles,
                start,
                goal,
            }
        })
}
