//! Read-only world snapshot handed to controllers each tick.
//!
//! The host owns the simulation; controllers only ever see an immutable
//! [`WorldState`] and answer with commands. The snapshot is passed into every
//! tick call explicitly so that decision code stays pure and testable.
//!
//! Unit and resource-node order is the host's order. Whenever a controller
//! picks "the first" unit or node of some kind, it means first in that order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for units. Stable for the unit's lifetime.
pub type UnitId = u32;

/// Unique identifier for resource nodes.
pub type NodeId = u32;

/// Identifier for a player (controller or opponent).
pub type PlayerId = u32;

/// Simulation tick number.
pub type Tick = u64;

/// Closed set of unit and structure types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Gathers resources and constructs structures.
    Worker,
    /// Primary base: produces workers and accepts deposits.
    TownHall,
    /// Supply structure.
    Farm,
    /// Produces footmen.
    Barracks,
    /// Basic melee combat unit.
    Footman,
}

impl UnitKind {
    /// Whether this kind is a structure placed by a worker.
    #[must_use]
    pub const fn is_structure(self) -> bool {
        matches!(self, Self::TownHall | Self::Farm | Self::Barracks)
    }

    /// Whether this kind is dispatched by the combat logic.
    #[must_use]
    pub const fn is_combat(self) -> bool {
        matches!(self, Self::Footman)
    }

    /// The kind of unit that creates this kind.
    ///
    /// Structures are built by workers; mobile units are trained at a
    /// structure.
    #[must_use]
    pub const fn producer(self) -> UnitKind {
        match self {
            Self::Worker => Self::TownHall,
            Self::Footman => Self::Barracks,
            Self::TownHall | Self::Farm | Self::Barracks => Self::Worker,
        }
    }
}

/// The two gatherable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Mined from gold mines.
    Gold,
    /// Chopped from trees.
    Wood,
}

/// Resources a worker is currently carrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
    /// What is being carried.
    pub kind: ResourceKind,
    /// How much is being carried.
    pub amount: u32,
}

/// A discrete grid cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridPos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridPos {
    /// Create a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by the given offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev (king-move) distance to another cell.
    #[must_use]
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of the map in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtent {
    /// Number of columns.
    pub width: i32,
    /// Number of rows.
    pub height: i32,
}

impl GridExtent {
    /// Create a new extent.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check if a cell lies inside the map.
    #[must_use]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }
}

/// A unit as seen in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    /// Unit identifier.
    pub id: UnitId,
    /// Owning player.
    pub owner: PlayerId,
    /// Unit or structure type.
    pub kind: UnitKind,
    /// Current cell.
    pub position: GridPos,
    /// Carried resources, if any.
    pub cargo: Option<Cargo>,
}

impl UnitView {
    /// Amount of cargo carried, zero when empty-handed.
    #[must_use]
    pub fn cargo_amount(&self) -> u32 {
        self.cargo.map_or(0, |c| c.amount)
    }
}

/// A resource node as seen in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNodeView {
    /// Node identifier.
    pub id: NodeId,
    /// Resource type yielded.
    pub kind: ResourceKind,
    /// Node cell.
    pub position: GridPos,
    /// Supply left in the node.
    pub remaining: u32,
}

/// Banked resources for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bank {
    /// Gold in the bank.
    pub gold: u32,
    /// Wood in the bank.
    pub wood: u32,
}

impl Bank {
    /// Create a new bank.
    #[must_use]
    pub const fn new(gold: u32, wood: u32) -> Self {
        Self { gold, wood }
    }

    /// Amount of the given resource.
    #[must_use]
    pub const fn amount(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Wood => self.wood,
        }
    }
}

/// Immutable snapshot of the world for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    /// Current tick.
    pub turn: Tick,
    /// All visible units, in host order.
    pub units: Vec<UnitView>,
    /// All remaining resource nodes, in host order.
    pub resource_nodes: Vec<ResourceNodeView>,
    /// Banked resources per player.
    pub banks: BTreeMap<PlayerId, Bank>,
    /// Map size.
    pub extent: GridExtent,
}

impl WorldState {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new(turn: Tick, extent: GridExtent) -> Self {
        Self {
            turn,
            units: Vec::new(),
            resource_nodes: Vec::new(),
            banks: BTreeMap::new(),
            extent,
        }
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Units owned by a player.
    pub fn units_of(&self, owner: PlayerId) -> impl Iterator<Item = &UnitView> {
        self.units.iter().filter(move |u| u.owner == owner)
    }

    /// Units owned by anyone other than `owner`.
    pub fn enemies_of(&self, owner: PlayerId) -> impl Iterator<Item = &UnitView> {
        self.units.iter().filter(move |u| u.owner != owner)
    }

    /// Own units of a given kind, in host order.
    pub fn own_of_kind(&self, owner: PlayerId, kind: UnitKind) -> impl Iterator<Item = &UnitView> {
        self.units_of(owner).filter(move |u| u.kind == kind)
    }

    /// First own unit of a given kind.
    #[must_use]
    pub fn first_of_kind(&self, owner: PlayerId, kind: UnitKind) -> Option<&UnitView> {
        self.own_of_kind(owner, kind).next()
    }

    /// Number of own units of a given kind.
    #[must_use]
    pub fn count_of_kind(&self, owner: PlayerId, kind: UnitKind) -> usize {
        self.own_of_kind(owner, kind).count()
    }

    /// Look up a resource node by id.
    #[must_use]
    pub fn resource_node(&self, id: NodeId) -> Option<&ResourceNodeView> {
        self.resource_nodes.iter().find(|n| n.id == id)
    }

    /// Resource nodes of a given kind, in host order.
    pub fn nodes_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceNodeView> {
        self.resource_nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Banked resources for a player. Unknown players have an empty bank.
    #[must_use]
    pub fn bank(&self, owner: PlayerId) -> Bank {
        self.banks.get(&owner).copied().unwrap_or_default()
    }
}
