//! Command vocabulary returned to the host.
//!
//! Every command a controller issues is stamped with a [`CommandSeq`]. The
//! host echoes that sequence id back in feedback events, which is how the
//! ledger decides whether feedback refers to the command it still believes
//! is in flight. Two structurally identical commands issued one after the
//! other therefore never get confused.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::world::{GridPos, NodeId, UnitId, UnitKind};

/// The eight single-step movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// -y
    North,
    /// +x -y
    NorthEast,
    /// +x
    East,
    /// +x +y
    SouthEast,
    /// +y
    South,
    /// -x +y
    SouthWest,
    /// -x
    West,
    /// -x -y
    NorthWest,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Cell offset for one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    /// Direction matching a one-cell delta, or `None` for any other delta.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, -1) => Some(Self::NorthEast),
            (1, 0) => Some(Self::East),
            (1, 1) => Some(Self::SouthEast),
            (0, 1) => Some(Self::South),
            (-1, 1) => Some(Self::SouthWest),
            (-1, 0) => Some(Self::West),
            (-1, -1) => Some(Self::NorthWest),
            _ => None,
        }
    }

    /// Direction of the step from `from` to `to`, if they are adjacent.
    #[must_use]
    pub const fn between(from: GridPos, to: GridPos) -> Option<Self> {
        Self::from_delta(to.x - from.x, to.y - from.y)
    }

    /// Whether this is a diagonal step.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }
}

/// What a unit is being told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Move exactly one cell.
    MoveStep(Direction),
    /// Attack a unit until it dies or the command fails.
    Attack(UnitId),
    /// Gather from a resource node.
    Gather(NodeId),
    /// Return carried cargo to a base.
    Deposit(UnitId),
    /// Train a unit at this structure.
    Produce(UnitKind),
    /// Construct a structure at a cell.
    Build {
        /// Structure to place.
        kind: UnitKind,
        /// Column of the placement cell.
        x: i32,
        /// Row of the placement cell.
        y: i32,
    },
}

impl CommandKind {
    /// Unit targeted by this command, if any.
    #[must_use]
    pub const fn target_unit(&self) -> Option<UnitId> {
        match *self {
            Self::Attack(id) | Self::Deposit(id) => Some(id),
            _ => None,
        }
    }

    /// Resource node targeted by this command, if any.
    #[must_use]
    pub const fn target_node(&self) -> Option<NodeId> {
        match *self {
            Self::Gather(id) => Some(id),
            _ => None,
        }
    }

    /// Unit kind this command creates, for production and construction.
    #[must_use]
    pub const fn produces(&self) -> Option<UnitKind> {
        match *self {
            Self::Produce(kind) | Self::Build { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Monotonically increasing id attached to a command when it is issued.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CommandSeq(pub u64);

/// A command together with the sequence id it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuedCommand {
    /// Issue-time sequence id.
    pub seq: CommandSeq,
    /// The command itself.
    pub kind: CommandKind,
}

/// Commands for one tick, at most one per unit.
///
/// Ordered by unit id so output is identical across runs.
pub type CommandMap = BTreeMap<UnitId, IssuedCommand>;

/// Hands out strictly increasing [`CommandSeq`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSequencer {
    next: u64,
}

impl CommandSequencer {
    /// Create a sequencer starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Stamp a command with the next sequence id.
    pub fn issue(&mut self, kind: CommandKind) -> IssuedCommand {
        let seq = CommandSeq(self.next);
        self.next += 1;
        IssuedCommand { seq, kind }
    }
}
