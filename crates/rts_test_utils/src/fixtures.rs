//! Test fixtures and helpers.
//!
//! Snapshot builders and a scripted host for driving controllers through a
//! fixed sequence of ticks.

use rts_ai::commands::CommandMap;
use rts_ai::controller::Controller;
use rts_ai::events::{Event, EventLog};
use rts_ai::world::{
    Bank, Cargo, GridExtent, GridPos, NodeId, PlayerId, ResourceKind, ResourceNodeView, Tick,
    UnitId, UnitKind, UnitView, WorldState,
};

/// Player id used by the standard fixtures for the controlled side.
pub const HOME: PlayerId = 1;

/// Player id used by the standard fixtures for the opponent.
pub const ENEMY: PlayerId = 2;

/// Fluent builder for [`WorldState`] snapshots.
///
/// # Example
///
/// ```
/// use rts_test_utils::fixtures::SnapshotBuilder;
/// use rts_ai::world::{ResourceKind, UnitKind};
///
/// let state = SnapshotBuilder::new(10, 10)
///     .turn(3)
///     .unit(1, 1, UnitKind::TownHall, 5, 5)
///     .unit(2, 1, UnitKind::Worker, 4, 5)
///     .carrying(2, ResourceKind::Gold, 100)
///     .node(10, ResourceKind::Wood, 0, 0, 1_000)
///     .bank(1, 400, 0)
///     .build();
///
/// assert_eq!(state.turn, 3);
/// assert_eq!(state.unit(2).unwrap().cargo_amount(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    state: WorldState,
}

impl SnapshotBuilder {
    /// Start an empty snapshot on a `width` x `height` map at tick 0.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            state: WorldState::new(0, GridExtent::new(width, height)),
        }
    }

    /// Start from an existing snapshot.
    #[must_use]
    pub fn from_state(state: WorldState) -> Self {
        Self { state }
    }

    /// Set the tick number.
    #[must_use]
    pub fn turn(mut self, turn: Tick) -> Self {
        self.state.turn = turn;
        self
    }

    /// Append a unit. Host order is insertion order.
    #[must_use]
    pub fn unit(mut self, id: UnitId, owner: PlayerId, kind: UnitKind, x: i32, y: i32) -> Self {
        self.state.units.push(UnitView {
            id,
            owner,
            kind,
            position: GridPos::new(x, y),
            cargo: None,
        });
        self
    }

    /// Give an already added unit some cargo.
    ///
    /// # Panics
    ///
    /// Panics if `id` has not been added.
    #[must_use]
    pub fn carrying(mut self, id: UnitId, kind: ResourceKind, amount: u32) -> Self {
        let unit = self
            .state
            .units
            .iter_mut()
            .find(|u| u.id == id)
            .unwrap_or_else(|| panic!("carrying: unit {id} not in snapshot"));
        unit.cargo = Some(Cargo { kind, amount });
        self
    }

    /// Move an already added unit.
    ///
    /// # Panics
    ///
    /// Panics if `id` has not been added.
    #[must_use]
    pub fn moved(mut self, id: UnitId, x: i32, y: i32) -> Self {
        let unit = self
            .state
            .units
            .iter_mut()
            .find(|u| u.id == id)
            .unwrap_or_else(|| panic!("moved: unit {id} not in snapshot"));
        unit.position = GridPos::new(x, y);
        self
    }

    /// Remove a unit, as if it died.
    #[must_use]
    pub fn without_unit(mut self, id: UnitId) -> Self {
        self.state.units.retain(|u| u.id != id);
        self
    }

    /// Append a resource node.
    #[must_use]
    pub fn node(mut self, id: NodeId, kind: ResourceKind, x: i32, y: i32, remaining: u32) -> Self {
        self.state.resource_nodes.push(ResourceNodeView {
            id,
            kind,
            position: GridPos::new(x, y),
            remaining,
        });
        self
    }

    /// Remove a resource node, as if it ran out.
    #[must_use]
    pub fn without_node(mut self, id: NodeId) -> Self {
        self.state.resource_nodes.retain(|n| n.id != id);
        self
    }

    /// Set a player's bank.
    #[must_use]
    pub fn bank(mut self, owner: PlayerId, gold: u32, wood: u32) -> Self {
        self.state.banks.insert(owner, Bank::new(gold, wood));
        self
    }

    /// Finish the snapshot.
    #[must_use]
    pub fn build(self) -> WorldState {
        self.state
    }
}

/// Standard opening: one town hall and one worker per side, a gold mine and
/// a forest.
///
/// | id  | owner   | kind     | cell     |
/// |-----|---------|----------|----------|
/// | 1   | `HOME`  | TownHall | (5, 5)   |
/// | 2   | `HOME`  | Worker   | (6, 5)   |
/// | 50  | `ENEMY` | TownHall | (18, 18) |
/// | 100 | -       | Gold     | (10, 5)  |
/// | 101 | -       | Wood     | (2, 2)   |
#[must_use]
pub fn economy_opening() -> SnapshotBuilder {
    SnapshotBuilder::new(20, 20)
        .unit(1, HOME, UnitKind::TownHall, 5, 5)
        .unit(2, HOME, UnitKind::Worker, 6, 5)
        .unit(50, ENEMY, UnitKind::TownHall, 18, 18)
        .node(100, ResourceKind::Gold, 10, 5, 10_000)
        .node(101, ResourceKind::Wood, 2, 2, 10_000)
        .bank(HOME, 0, 0)
}

/// Footman facing an enemy town hall across open ground.
///
/// | id | owner   | kind     | cell   |
/// |----|---------|----------|--------|
/// | 1  | `HOME`  | Footman  | (0, 0) |
/// | 50 | `ENEMY` | TownHall | (4, 4) |
#[must_use]
pub fn skirmish_opening() -> SnapshotBuilder {
    SnapshotBuilder::new(8, 8)
        .unit(1, HOME, UnitKind::Footman, 0, 0)
        .unit(50, ENEMY, UnitKind::TownHall, 4, 4)
}

/// One scripted tick: events that happened before it, then the snapshot.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Events to record before the controller sees `state`.
    pub events: Vec<(Tick, Event)>,
    /// Snapshot for this tick.
    pub state: WorldState,
}

impl Frame {
    /// A frame with no new events.
    #[must_use]
    pub fn quiet(state: WorldState) -> Self {
        Self {
            events: Vec::new(),
            state,
        }
    }

    /// A frame preceded by `events`.
    #[must_use]
    pub fn with_events(state: WorldState, events: Vec<(Tick, Event)>) -> Self {
        Self { events, state }
    }
}

/// Minimal stand-in for the host's tick loop.
///
/// Owns the event log, calls `on_start` on the first step and `on_tick`
/// afterwards, and keeps every returned command map.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    log: EventLog,
    outputs: Vec<CommandMap>,
}

impl ScriptedHost {
    /// Create a host with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event at `tick`.
    pub fn record(&mut self, tick: Tick, event: Event) {
        self.log.record(tick, event);
    }

    /// Run one tick of `controller` against `state`.
    pub fn step<C: Controller + ?Sized>(
        &mut self,
        controller: &mut C,
        state: &WorldState,
    ) -> CommandMap {
        let commands = if self.outputs.is_empty() {
            controller.on_start(state, &self.log)
        } else {
            controller.on_tick(state, &self.log)
        };
        self.outputs.push(commands.clone());
        commands
    }

    /// Event log so far.
    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Command maps returned so far, one per step.
    #[must_use]
    pub fn outputs(&self) -> &[CommandMap] {
        &self.outputs
    }
}

/// Drive `controller` through `frames` and collect its output per frame.
pub fn run_script<C: Controller + ?Sized>(controller: &mut C, frames: &[Frame]) -> Vec<CommandMap> {
    let mut host = ScriptedHost::new();
    for frame in frames {
        for &(tick, event) in &frame.events {
            host.record(tick, event);
        }
        host.step(controller, &frame.state);
    }
    host.outputs
}
