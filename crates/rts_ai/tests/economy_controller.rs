//! Scripted games against the build-order controller.

use rts_ai::build_order::ProductionGoal;
use rts_ai::commands::{CommandKind, CommandSeq};
use rts_ai::config::EconomyConfig;
use rts_ai::controller::{Controller, EconomyController};
use rts_ai::events::{Event, FeedbackStatus};
use rts_ai::world::{ResourceKind, UnitKind};
use rts_test_utils::fixtures::{economy_opening, ScriptedHost, SnapshotBuilder, ENEMY, HOME};

fn controller() -> EconomyController {
    EconomyController::new(HOME, EconomyConfig::default())
}

fn succeeded(unit: u32, seq: u64) -> Event {
    Event::Feedback {
        unit,
        owner: HOME,
        seq: CommandSeq(seq),
        status: FeedbackStatus::Succeeded,
    }
}

#[test]
fn test_first_tick_gathers_gold_for_workers() {
    rts_test_utils::init_test_tracing();
    let mut ai = controller();
    let mut host = ScriptedHost::new();

    let out = host.step(&mut ai, &economy_opening().build());

    assert_eq!(out.len(), 1);
    assert_eq!(out[&2].kind, CommandKind::Gather(100));
    assert_eq!(out[&2].seq, CommandSeq(0));
    assert!(ai.ledger().is_tracked(1));
    assert!(!ai.ledger().is_idle(2));
}

#[test]
fn test_wood_is_gathered_when_goal_needs_it() {
    let config = EconomyConfig {
        build_order: vec![ProductionGoal::new(UnitKind::Farm, 500, 250, 1)],
        ..EconomyConfig::default()
    };
    let mut ai = EconomyController::new(HOME, config);
    let mut host = ScriptedHost::new();

    let out = host.step(&mut ai, &economy_opening().build());

    assert_eq!(out[&2].kind, CommandKind::Gather(101));
}

#[test]
fn test_feedback_frees_worker_for_deposit() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();
    host.step(&mut ai, &economy_opening().build());

    host.record(0, succeeded(2, 0));
    let state = economy_opening()
        .turn(1)
        .carrying(2, ResourceKind::Gold, 100)
        .build();
    let out = host.step(&mut ai, &state);

    assert_eq!(out[&2].kind, CommandKind::Deposit(1));
    assert_eq!(out[&2].seq, CommandSeq(1));
}

#[test]
fn test_stale_feedback_is_ignored() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();
    host.step(&mut ai, &economy_opening().build());

    host.record(0, succeeded(2, 41));
    let out = host.step(&mut ai, &economy_opening().turn(1).build());

    assert!(out.is_empty());
    assert_eq!(ai.ledger().in_flight(2).map(|c| c.seq), Some(CommandSeq(0)));
}

#[test]
fn test_incomplete_feedback_keeps_command() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();
    host.step(&mut ai, &economy_opening().build());

    host.record(
        0,
        Event::Feedback {
            unit: 2,
            owner: HOME,
            seq: CommandSeq(0),
            status: FeedbackStatus::Incomplete,
        },
    );
    let out = host.step(&mut ai, &economy_opening().turn(1).build());

    assert!(out.is_empty());
    assert!(!ai.ledger().is_idle(2));
}

#[test]
fn test_production_is_not_duplicated_while_in_flight() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();

    let first = host.step(&mut ai, &economy_opening().bank(HOME, 400, 0).build());
    assert_eq!(first[&1].kind, CommandKind::Produce(UnitKind::Worker));
    // Funds cover the goal, so the worker is left free.
    assert!(!first.contains_key(&2));

    let second = host.step(&mut ai, &economy_opening().turn(1).bank(HOME, 400, 0).build());
    assert!(!second.contains_key(&1));
}

#[test]
fn test_forecast_counts_toward_cost() {
    // 300 banked + 100 on the worker's back meets the 400 gold goal.
    let state = economy_opening()
        .bank(HOME, 300, 0)
        .carrying(2, ResourceKind::Gold, 100)
        .build();

    let mut ai = controller();
    let out = ScriptedHost::new().step(&mut ai, &state);
    assert_eq!(out[&2].kind, CommandKind::Deposit(1));
    assert_eq!(out[&1].kind, CommandKind::Produce(UnitKind::Worker));

    let config = EconomyConfig {
        forecast_covers_cost: false,
        ..EconomyConfig::default()
    };
    let mut strict = EconomyController::new(HOME, config);
    let out = ScriptedHost::new().step(&mut strict, &state);
    assert!(!out.contains_key(&1));
}

#[test]
fn test_birth_is_tracked_and_put_to_work() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();
    host.step(&mut ai, &economy_opening().build());

    host.record(0, Event::Birth { unit: 3, owner: HOME });
    let state = economy_opening()
        .turn(1)
        .unit(3, HOME, UnitKind::Worker, 5, 6)
        .build();
    let out = host.step(&mut ai, &state);

    assert_eq!(out[&3].kind, CommandKind::Gather(100));
    assert!(!out.contains_key(&2));
}

#[test]
fn test_exhausted_node_frees_gatherer() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();
    host.step(&mut ai, &economy_opening().build());

    host.record(0, Event::Exhausted { node: 100 });
    let state = economy_opening()
        .turn(1)
        .without_node(100)
        .node(102, ResourceKind::Gold, 12, 12, 5_000)
        .build();
    let out = host.step(&mut ai, &state);

    assert_eq!(out[&2].kind, CommandKind::Gather(102));
}

#[test]
fn test_target_death_retargets_attacker() {
    let opening = || {
        SnapshotBuilder::new(20, 20)
            .unit(1, HOME, UnitKind::TownHall, 5, 5)
            .unit(3, HOME, UnitKind::Footman, 6, 6)
            .unit(51, ENEMY, UnitKind::Footman, 10, 10)
            .unit(50, ENEMY, UnitKind::TownHall, 18, 18)
    };
    let mut ai = controller();
    let mut host = ScriptedHost::new();

    let out = host.step(&mut ai, &opening().build());
    assert_eq!(out[&3].kind, CommandKind::Attack(51));

    host.record(0, Event::Death { unit: 51, owner: ENEMY });
    let out = host.step(&mut ai, &opening().turn(1).without_unit(51).build());
    assert_eq!(out[&3].kind, CommandKind::Attack(50));
}

#[test]
fn test_own_death_drops_ledger_entry() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();
    host.step(&mut ai, &economy_opening().build());

    host.record(0, Event::Death { unit: 2, owner: HOME });
    let out = host.step(&mut ai, &economy_opening().turn(1).without_unit(2).build());

    assert!(out.is_empty());
    assert!(!ai.ledger().is_tracked(2));
}

#[test]
fn test_events_from_skipped_ticks_are_reconciled() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();
    host.step(&mut ai, &economy_opening().build());

    // The controller was not scheduled on ticks 1 through 3.
    host.record(2, succeeded(2, 0));
    let state = economy_opening()
        .turn(4)
        .carrying(2, ResourceKind::Gold, 100)
        .build();
    let out = host.step(&mut ai, &state);

    assert_eq!(out[&2].kind, CommandKind::Deposit(1));
}

#[test]
fn test_build_order_advances_one_goal_per_tick() {
    let mut ai = controller();
    let mut host = ScriptedHost::new();

    // Worker goal (3) and farm goal (1) both already satisfied.
    let state = economy_opening()
        .unit(3, HOME, UnitKind::Worker, 6, 6)
        .unit(4, HOME, UnitKind::Worker, 6, 7)
        .unit(5, HOME, UnitKind::Farm, 8, 5)
        .build();

    host.step(&mut ai, &state);
    assert_eq!(ai.build_order().index(), 1);

    let mut next = state.clone();
    next.turn = 1;
    host.step(&mut ai, &next);
    assert_eq!(ai.build_order().index(), 2);
}

#[test]
fn test_structure_is_placed_at_offset_from_base() {
    let config = EconomyConfig {
        build_order: vec![ProductionGoal::new(UnitKind::Barracks, 700, 400, 1)],
        ..EconomyConfig::default()
    };
    let mut ai = EconomyController::new(HOME, config);

    let out = ScriptedHost::new().step(&mut ai, &economy_opening().bank(HOME, 700, 400).build());

    assert_eq!(
        out[&2].kind,
        CommandKind::Build {
            kind: UnitKind::Barracks,
            x: 2,
            y: 5
        }
    );
}

#[test]
fn test_missing_base_skips_deposit() {
    let state = SnapshotBuilder::new(10, 10)
        .unit(2, HOME, UnitKind::Worker, 1, 1)
        .carrying(2, ResourceKind::Wood, 50)
        .build();
    let mut ai = controller();

    let out = ScriptedHost::new().step(&mut ai, &state);

    assert!(out.is_empty());
    assert!(ai.ledger().is_idle(2));
}

#[test]
fn test_resend_returns_every_in_flight_command() {
    let config = EconomyConfig {
        resend_in_flight: true,
        ..EconomyConfig::default()
    };
    let mut ai = EconomyController::new(HOME, config);
    let mut host = ScriptedHost::new();

    let first = host.step(&mut ai, &economy_opening().build());
    let second = host.step(&mut ai, &economy_opening().turn(1).build());

    assert_eq!(first, second);
    assert_eq!(second[&2].kind, CommandKind::Gather(100));
}

#[test]
fn test_lifecycle_hooks_are_noops() {
    let mut ai = controller();
    let log = rts_ai::events::EventLog::new();
    let out = ai.on_start(&economy_opening().build(), &log);
    assert_eq!(out.len(), 1);

    let mut saved = Vec::new();
    ai.save_state(&mut saved).unwrap();
    assert!(saved.is_empty());
    ai.load_state(&mut saved.as_slice()).unwrap();
    ai.on_terminal(&economy_opening().build(), &log);
    assert_eq!(ai.ledger().len(), 2);
}
