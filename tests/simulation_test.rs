//! End-to-end scenarios driving a full engine/controller pair through the
//! scenario surface, the way a headless run would.

use std::collections::HashMap;

use liftsim::modules::controller_functions::controller::{make_controller, ControllerStrategy};
use liftsim::modules::engine_functions::engine::{IdleParkingMode, LiftEngine};
use liftsim::modules::lift_object::lift_status::{Direction, LiftStatus};
use liftsim::modules::request_object::request_init::RequestId;
use liftsim::modules::scenario_functions::scenario::{
    Scenario, ScenarioCommand, ScenarioOp, ScenarioRunner,
};

/// Helper for the engine used across the scenarios: floors 0..10, one tick
/// per floor, two-tick doors, three-tick dwell.
fn standard_engine(strategy: ControllerStrategy) -> LiftEngine {
    LiftEngine::builder(0, 10)
        .controller(make_controller(strategy))
        .initial_floor(0)
        .travel_ticks_per_floor(1)
        .door_transition_ticks(2)
        .door_dwell_ticks(3)
        .build()
        .expect("valid engine")
}

/// Tick until the horizon, recording the tick at which each watched request
/// left the active set.
fn completion_ticks(
    runner: &mut ScenarioRunner,
    watched: &[(&str, RequestId)],
    horizon: u64,
) -> HashMap<String, u64> {
    let mut completions = HashMap::new();
    for _ in 0..horizon {
        runner.engine_mut().tick();
        let tick = runner.engine().current_tick();
        for (alias, id) in watched {
            let active = runner.engine().active_requests().iter().any(|r| r.id() == *id);
            if !active {
                completions.entry((*alias).to_string()).or_insert(tick);
            }
        }
    }
    completions
}

#[test]
fn test_scenario_nearest_single_car_call() {
    let mut runner = ScenarioRunner::init(standard_engine(
        ControllerStrategy::NearestRequestRouting,
    ));
    runner
        .apply(&ScenarioOp::CarCall {
            alias: "ride".into(),
            destination: 3,
        })
        .expect("car call applies");

    // Three travel ticks plus the door-opening time is the ceiling.
    for _ in 0..5 {
        runner.engine_mut().tick();
    }
    assert!(
        runner.engine().active_requests().is_empty(),
        "request must be completed with the active set emptied"
    );
    assert_eq!(runner.engine().current_floor(), 3);
}

#[test]
fn test_scenario_scan_defers_opposite_call() {
    let mut runner = ScenarioRunner::init(standard_engine(ControllerStrategy::DirectionalScan));
    for op in [
        ScenarioOp::HallCall {
            alias: "up2".into(),
            floor: 2,
            direction: Direction::Up,
        },
        ScenarioOp::CarCall {
            alias: "car5".into(),
            destination: 5,
        },
        ScenarioOp::HallCall {
            alias: "down8".into(),
            floor: 8,
            direction: Direction::Down,
        },
    ] {
        runner.apply(&op).expect("command applies");
    }
    let watched = [
        ("up2", runner.request_id("up2").unwrap()),
        ("car5", runner.request_id("car5").unwrap()),
        ("down8", runner.request_id("down8").unwrap()),
    ];
    let completions = completion_ticks(&mut runner, &watched, 60);

    // The scan sweeps upward: 2, then 5, then the deferred down call at 8.
    let up2 = completions["up2"];
    let car5 = completions["car5"];
    let down8 = completions["down8"];
    assert!(up2 < car5, "floor 2 before floor 5 ({} vs {})", up2, car5);
    assert!(car5 < down8, "floor 5 before floor 8 ({} vs {})", car5, down8);
    assert!(runner.engine().active_requests().is_empty());
}

#[test]
fn test_scenario_runner_applies_commands_at_their_tick() {
    let mut runner = ScenarioRunner::init(standard_engine(ControllerStrategy::DirectionalScan));
    let scenario = Scenario {
        name: "two calls".into(),
        ticks: 30,
        commands: vec![
            ScenarioCommand {
                tick: 0,
                op: ScenarioOp::CarCall {
                    alias: "first".into(),
                    destination: 2,
                },
            },
            ScenarioCommand {
                tick: 10,
                op: ScenarioOp::CarCall {
                    alias: "second".into(),
                    destination: 6,
                },
            },
        ],
    };
    runner.run(&scenario).expect("scenario runs");
    assert_eq!(runner.engine().current_tick(), 30);
    assert!(runner.engine().active_requests().is_empty());
    assert_eq!(runner.engine().current_floor(), 6);
}

#[test]
fn test_scenario_out_of_service_cycle() {
    let mut runner = ScenarioRunner::init(standard_engine(ControllerStrategy::DirectionalScan));
    let scenario = Scenario {
        name: "service break".into(),
        ticks: 40,
        commands: vec![
            ScenarioCommand {
                tick: 0,
                op: ScenarioOp::CarCall {
                    alias: "doomed".into(),
                    destination: 9,
                },
            },
            ScenarioCommand {
                tick: 2,
                op: ScenarioOp::OutOfService,
            },
            ScenarioCommand {
                tick: 6,
                op: ScenarioOp::ReturnToService,
            },
            ScenarioCommand {
                tick: 7,
                op: ScenarioOp::CarCall {
                    alias: "served".into(),
                    destination: 4,
                },
            },
        ],
    };
    runner.run(&scenario).expect("scenario runs");
    // The break cancelled the first call; the later one completed normally.
    assert!(runner.engine().active_requests().is_empty());
    assert_eq!(runner.engine().current_floor(), 4);
    assert_eq!(runner.engine().current_tick(), 40);
    assert_eq!(runner.engine().current_status(), LiftStatus::Idle);
}

#[test]
fn test_scenario_cancel_races_completion_softly() {
    let mut runner = ScenarioRunner::init(standard_engine(
        ControllerStrategy::NearestRequestRouting,
    ));
    let scenario = Scenario {
        name: "late cancel".into(),
        ticks: 20,
        commands: vec![
            ScenarioCommand {
                tick: 0,
                op: ScenarioOp::CarCall {
                    alias: "ride".into(),
                    destination: 1,
                },
            },
            // Long after the request completed on its own.
            ScenarioCommand {
                tick: 15,
                op: ScenarioOp::Cancel {
                    alias: "ride".into(),
                },
            },
        ],
    };
    // The late cancel is a soft miss, not an error.
    runner.run(&scenario).expect("scenario runs");
    assert_eq!(runner.engine().current_tick(), 20);
}

#[test]
fn test_scenario_cancel_removes_pending_request() {
    let mut runner = ScenarioRunner::init(standard_engine(ControllerStrategy::DirectionalScan));
    let scenario = Scenario {
        name: "cancelled ride".into(),
        ticks: 12,
        commands: vec![
            ScenarioCommand {
                tick: 0,
                op: ScenarioOp::CarCall {
                    alias: "near".into(),
                    destination: 2,
                },
            },
            ScenarioCommand {
                tick: 0,
                op: ScenarioOp::CarCall {
                    alias: "far".into(),
                    destination: 9,
                },
            },
            ScenarioCommand {
                tick: 1,
                op: ScenarioOp::Cancel {
                    alias: "far".into(),
                },
            },
        ],
    };
    runner.run(&scenario).expect("scenario runs");
    // Only the surviving request was served; the lift never went to 9.
    assert!(runner.engine().active_requests().is_empty());
    assert_eq!(runner.engine().current_floor(), 2);
}

#[test]
fn test_scenario_hall_call_requires_direction() {
    let mut runner = ScenarioRunner::init(standard_engine(ControllerStrategy::DirectionalScan));
    let result = runner.apply(&ScenarioOp::HallCall {
        alias: "nowhere".into(),
        floor: 3,
        direction: Direction::Idle,
    });
    assert!(result.is_err());
}

#[test]
fn test_idle_parking_through_scenario() {
    let engine = LiftEngine::builder(0, 10)
        .controller(make_controller(ControllerStrategy::DirectionalScan))
        .initial_floor(0)
        .travel_ticks_per_floor(1)
        .door_transition_ticks(1)
        .door_dwell_ticks(1)
        .home_floor(1)
        .idle_timeout_ticks(3)
        .idle_parking_mode(IdleParkingMode::ParkToHomeFloor)
        .build()
        .expect("valid engine");
    let mut runner = ScenarioRunner::init(engine);
    let scenario = Scenario {
        name: "park home".into(),
        ticks: 30,
        commands: vec![ScenarioCommand {
            tick: 0,
            op: ScenarioOp::CarCall {
                alias: "ride".into(),
                destination: 6,
            },
        }],
    };
    runner.run(&scenario).expect("scenario runs");
    // Served at 6, then parked back at the home floor.
    assert_eq!(runner.engine().current_floor(), 1);
    assert_eq!(runner.engine().current_status(), LiftStatus::Idle);
}

#[test]
fn test_tick_horizon_is_exact_across_breaks() {
    let mut runner = ScenarioRunner::init(standard_engine(ControllerStrategy::DirectionalScan));
    let scenario = Scenario {
        name: "counting".into(),
        ticks: 25,
        commands: vec![
            ScenarioCommand {
                tick: 3,
                op: ScenarioOp::OutOfService,
            },
            ScenarioCommand {
                tick: 20,
                op: ScenarioOp::ReturnToService,
            },
        ],
    };
    runner.run(&scenario).expect("scenario runs");
    // Out-of-service ticks count like any others.
    assert_eq!(runner.engine().current_tick(), 25);
}
