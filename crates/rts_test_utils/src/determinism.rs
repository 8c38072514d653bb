//! Determinism testing utilities.
//!
//! Provides a harness for verifying that controllers produce identical
//! commands given identical snapshots and event logs.
//!
//! # Testing Strategy
//!
//! Scripted controllers must be fully reproducible so that replays and
//! regression scripts stay meaningful. Sources of non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Anything that reaches the command output iterates a `BTreeMap` or the
//!   snapshot's own order.
//!
//! - **Planner tie-breaking**: equal-cost paths are resolved by push order,
//!   never by hash order.
//!
//! - **System randomness**: controllers never draw random numbers.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: single components (ledger, planner, build order)
//! 2. **Property tests**: random event streams and grids must still produce
//!    deterministic outputs
//! 3. **Integration tests**: full scripted games are reproducible

use rts_ai::commands::CommandMap;
use rts_ai::controller::Controller;
use rts_ai::world::Tick;

use crate::fixtures::{run_script, Frame};

/// The first frame at which a replay issued different commands than run 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// Index of the run that disagreed with run 0.
    pub run: usize,
    /// Index of the frame within the script.
    pub frame: usize,
    /// Snapshot turn of that frame.
    pub turn: Tick,
    /// What run 0 issued.
    pub expected: CommandMap,
    /// What the diverging run issued.
    pub actual: CommandMap,
}

/// Outcome of replaying one script against several fresh controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Number of controllers driven through the script.
    pub runs: usize,
    /// Frames in the script.
    pub frames: usize,
    /// Earliest disagreement with run 0, if any.
    pub divergence: Option<Divergence>,
}

impl ReplayReport {
    /// Whether every run issued the same commands on every frame.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.divergence.is_none()
    }

    /// Assert that every run matched, showing both command maps otherwise.
    ///
    /// # Panics
    ///
    /// Panics if any run diverged from run 0.
    pub fn assert_deterministic(&self) {
        if let Some(d) = &self.divergence {
            panic!(
                "Controller is non-deterministic!\n\
                 Run {} of {} diverged at frame {} of {} (turn {})\n\
                 Run 0 issued: {:?}\n\
                 Run {} issued: {:?}",
                d.run, self.runs, d.frame, self.frames, d.turn, d.expected, d.run, d.actual
            );
        }
    }
}

/// Replay `frames` against `runs` fresh controllers and compare every
/// command map with the first run's.
///
/// Each controller gets its own event log, filled from the frames in order,
/// so runs share nothing but the script.
///
/// # Example
///
/// ```
/// use rts_ai::config::EconomyConfig;
/// use rts_ai::controller::EconomyController;
/// use rts_test_utils::determinism::verify_determinism;
/// use rts_test_utils::fixtures::{economy_opening, Frame, HOME};
///
/// let frames = vec![Frame::quiet(economy_opening().build())];
/// verify_determinism(
///     3,
///     || EconomyController::new(HOME, EconomyConfig::default()),
///     &frames,
/// )
/// .assert_deterministic();
/// ```
pub fn verify_determinism<C, Make>(runs: usize, mut make: Make, frames: &[Frame]) -> ReplayReport
where
    C: Controller,
    Make: FnMut() -> C,
{
    let mut expected: Vec<CommandMap> = Vec::new();
    let mut divergence = None;

    for run in 0..runs {
        let outputs = run_script(&mut make(), frames);
        if run == 0 {
            expected = outputs;
            continue;
        }
        if divergence.is_some() {
            continue;
        }
        if let Some(frame) = expected.iter().zip(&outputs).position(|(a, b)| a != b) {
            divergence = Some(Divergence {
                run,
                frame,
                turn: frames[frame].state.turn,
                expected: expected[frame].clone(),
                actual: outputs[frame].clone(),
            });
        }
    }

    ReplayReport {
        runs,
        frames: frames.len(),
        divergence,
    }
}

/// Index of the first frame at which two fresh controllers disagree.
pub fn find_first_divergence<C, Make>(make: Make, frames: &[Frame]) -> Option<usize>
where
    C: Controller,
    Make: FnMut() -> C,
{
    verify_determinism(2, make, frames).divergence.map(|d| d.frame)
}

/// Proptest strategies for event streams and commands.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of the ledger and controllers.
pub mod strategies {
    use proptest::prelude::*;
    use rts_ai::commands::{CommandKind, CommandSeq, Direction};
    use rts_ai::events::{Event, FeedbackStatus};
    use rts_ai::world::{PlayerId, UnitId, UnitKind};

    /// Unit ids drawn from a small pool so events collide often.
    pub fn arb_unit_id() -> impl Strategy<Value = UnitId> {
        0u32..8
    }

    /// Either of the two fixture players.
    pub fn arb_player() -> impl Strategy<Value = PlayerId> {
        1u32..=2
    }

    /// Any movement direction.
    pub fn arb_direction() -> impl Strategy<Value = Direction> {
        proptest::sample::select(Direction::ALL.to_vec())
    }

    /// Any unit kind.
    pub fn arb_unit_kind() -> impl Strategy<Value = UnitKind> {
        prop_oneof![
            Just(UnitKind::Worker),
            Just(UnitKind::TownHall),
            Just(UnitKind::Farm),
            Just(UnitKind::Barracks),
            Just(UnitKind::Footman),
        ]
    }

    /// Any command kind with small ids.
    pub fn arb_command_kind() -> impl Strategy<Value = CommandKind> {
        prop_oneof![
            arb_direction().prop_map(CommandKind::MoveStep),
            arb_unit_id().prop_map(CommandKind::Attack),
            (0u32..4).prop_map(CommandKind::Gather),
            arb_unit_id().prop_map(CommandKind::Deposit),
            arb_unit_kind().prop_map(CommandKind::Produce),
            (arb_unit_kind(), 0i32..16, 0i32..16)
                .prop_map(|(kind, x, y)| CommandKind::Build { kind, x, y }),
        ]
    }

    /// Any feedback status.
    pub fn arb_status() -> impl Strategy<Value = FeedbackStatus> {
        prop_oneof![
            Just(FeedbackStatus::Succeeded),
            Just(FeedbackStatus::Failed),
            Just(FeedbackStatus::Incomplete),
        ]
    }

    /// Any event, with small ids and sequence numbers.
    pub fn arb_event() -> impl Strategy<Value = Event> {
        prop_oneof![
            (arb_unit_id(), arb_player()).prop_map(|(unit, owner)| Event::Birth { unit, owner }),
            (arb_unit_id(), arb_player()).prop_map(|(unit, owner)| Event::Death { unit, owner }),
            (0u32..4).prop_map(|node| Event::Exhausted { node }),
            (arb_unit_id(), arb_player(), 0u64..32, arb_status()).prop_map(
                |(unit, owner, seq, status)| Event::Feedback {
                    unit,
                    owner,
                    seq: CommandSeq(seq),
                    status,
                }
            ),
        ]
    }

    /// A batch of events for one tick.
    pub fn arb_tick_events(max_len: usize) -> impl Strategy<Value = Vec<Event>> {
        proptest::collection::vec(arb_event(), 0..max_len)
    }

    /// Several ticks' worth of event batches.
    pub fn arb_event_stream(
        max_ticks: usize,
        max_per_tick: usize,
    ) -> impl Strategy<Value = Vec<Vec<Event>>> {
        proptest::collection::vec(arb_tick_events(max_per_tick), 1..max_ticks)
    }
}
