//! ## Engine Module
//! This module provides the tick-driven simulation engine
//!
//! ## The structs include:
//! - **LiftEngine**
//! - **LiftEngineBuilder**
//! - **LiftState**
//!
//! ## The enums include:
//! - **IdleParkingMode**
//! - **BuildError**
//!
//! Each call to `tick()` is one unit of logical time. The engine asks its
//! controller for an action, validates it against the transition table,
//! applies it, and advances the multi-tick counters for travel, door
//! transition and dwell. Time is purely logical; no wall clock participates.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::modules::controller_functions::controller::LiftController;
use crate::modules::lift_object::lift_status::{Action, Direction, DoorState, LiftStatus};
use crate::modules::lift_object::lift_transitions::{
    is_action_allowed, is_valid_transition, next_status,
};
use crate::modules::request_object::request_init::{LiftRequest, RequestId};

/// What to do after the lift has been idle with no pending requests for the
/// configured timeout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdleParkingMode {
    #[default]
    StayAtCurrentFloor,
    ParkToHomeFloor,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("a controller must be set before build")]
    MissingController,
    #[error("min floor {min} must be strictly below max floor {max}")]
    FloorRange { min: i32, max: i32 },
    #[error("initial floor {floor} is outside [{min}, {max}]")]
    InitialFloorOutOfRange { floor: i32, min: i32, max: i32 },
    #[error("home floor {floor} is outside [{min}, {max}]")]
    HomeFloorOutOfRange { floor: i32, min: i32, max: i32 },
    #[error("{name} must be at least 1")]
    ZeroTickParameter { name: &'static str },
    #[error("door reopen window {window} must not exceed door transition ticks {transition}")]
    ReopenWindowTooLarge { window: u64, transition: u64 },
}

/// Read-only snapshot of the lift, with direction and door state derived
/// from the status.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LiftState {
    pub tick: u64,
    pub floor: i32,
    pub status: LiftStatus,
    pub direction: Direction,
    pub door_state: DoorState,
}

/// Builder for [`LiftEngine`]. Construction fails fast on an internally
/// inconsistent combination; the richer cross-field rules of a full
/// configuration are validated upstream.
pub struct LiftEngineBuilder {
    controller: Option<Box<dyn LiftController>>,
    min_floor: i32,
    max_floor: i32,
    initial_floor: Option<i32>,
    travel_ticks_per_floor: u64,
    door_transition_ticks: u64,
    door_dwell_ticks: u64,
    door_reopen_window_ticks: u64,
    home_floor: Option<i32>,
    idle_timeout_ticks: u64,
    idle_parking_mode: IdleParkingMode,
}

impl LiftEngineBuilder {
    pub fn controller(mut self, controller: Box<dyn LiftController>) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn initial_floor(mut self, floor: i32) -> Self {
        self.initial_floor = Some(floor);
        self
    }

    pub fn travel_ticks_per_floor(mut self, ticks: u64) -> Self {
        self.travel_ticks_per_floor = ticks;
        self
    }

    pub fn door_transition_ticks(mut self, ticks: u64) -> Self {
        self.door_transition_ticks = ticks;
        self
    }

    pub fn door_dwell_ticks(mut self, ticks: u64) -> Self {
        self.door_dwell_ticks = ticks;
        self
    }

    pub fn door_reopen_window_ticks(mut self, ticks: u64) -> Self {
        self.door_reopen_window_ticks = ticks;
        self
    }

    pub fn home_floor(mut self, floor: i32) -> Self {
        self.home_floor = Some(floor);
        self
    }

    pub fn idle_timeout_ticks(mut self, ticks: u64) -> Self {
        self.idle_timeout_ticks = ticks;
        self
    }

    pub fn idle_parking_mode(mut self, mode: IdleParkingMode) -> Self {
        self.idle_parking_mode = mode;
        self
    }

    pub fn build(self) -> Result<LiftEngine, BuildError> {
        let controller = self.controller.ok_or(BuildError::MissingController)?;
        if self.min_floor >= self.max_floor {
            return Err(BuildError::FloorRange {
                min: self.min_floor,
                max: self.max_floor,
            });
        }
        if self.travel_ticks_per_floor == 0 {
            return Err(BuildError::ZeroTickParameter {
                name: "travel ticks per floor",
            });
        }
        if self.door_transition_ticks == 0 {
            return Err(BuildError::ZeroTickParameter {
                name: "door transition ticks",
            });
        }
        if self.door_dwell_ticks == 0 {
            return Err(BuildError::ZeroTickParameter {
                name: "door dwell ticks",
            });
        }
        if self.door_reopen_window_ticks > self.door_transition_ticks {
            return Err(BuildError::ReopenWindowTooLarge {
                window: self.door_reopen_window_ticks,
                transition: self.door_transition_ticks,
            });
        }
        let initial_floor = self.initial_floor.unwrap_or(self.min_floor);
        if initial_floor < self.min_floor || initial_floor > self.max_floor {
            return Err(BuildError::InitialFloorOutOfRange {
                floor: initial_floor,
                min: self.min_floor,
                max: self.max_floor,
            });
        }
        let home_floor = self.home_floor.unwrap_or(self.min_floor);
        if home_floor < self.min_floor || home_floor > self.max_floor {
            return Err(BuildError::HomeFloorOutOfRange {
                floor: home_floor,
                min: self.min_floor,
                max: self.max_floor,
            });
        }
        info!(
            min = self.min_floor,
            max = self.max_floor,
            initial = initial_floor,
            "lift engine built"
        );
        Ok(LiftEngine {
            controller,
            min_floor: self.min_floor,
            max_floor: self.max_floor,
            travel_ticks_per_floor: self.travel_ticks_per_floor,
            door_transition_ticks: self.door_transition_ticks,
            door_dwell_ticks: self.door_dwell_ticks,
            door_reopen_window_ticks: self.door_reopen_window_ticks,
            home_floor,
            idle_timeout_ticks: self.idle_timeout_ticks,
            idle_parking_mode: self.idle_parking_mode,
            current_floor: initial_floor,
            current_status: LiftStatus::Idle,
            current_tick: 0,
            travel_progress: 0,
            dwell_progress: 0,
            closing_progress: 0,
            closing_snapshot: Vec::new(),
            idle_streak: 0,
            parking: false,
        })
    }
}

/// The single-lift simulation engine. Owns one controller and all physical
/// state; `tick()` must be driven serially by one caller.
pub struct LiftEngine {
    controller: Box<dyn LiftController>,
    min_floor: i32,
    max_floor: i32,
    travel_ticks_per_floor: u64,
    door_transition_ticks: u64,
    door_dwell_ticks: u64,
    door_reopen_window_ticks: u64,
    home_floor: i32,
    idle_timeout_ticks: u64,
    idle_parking_mode: IdleParkingMode,

    current_floor: i32,
    current_status: LiftStatus,
    current_tick: u64,
    travel_progress: u64,
    dwell_progress: u64,
    closing_progress: u64,
    // Ids that were already pending for the current floor when the close
    // began; only a call outside this set can trigger the reopen window.
    closing_snapshot: Vec<RequestId>,
    idle_streak: u64,
    parking: bool,
}

impl LiftEngine {
    pub fn builder(min_floor: i32, max_floor: i32) -> LiftEngineBuilder {
        LiftEngineBuilder {
            controller: None,
            min_floor,
            max_floor,
            initial_floor: None,
            travel_ticks_per_floor: 1,
            door_transition_ticks: 1,
            door_dwell_ticks: 1,
            door_reopen_window_ticks: 0,
            home_floor: None,
            idle_timeout_ticks: 0,
            idle_parking_mode: IdleParkingMode::StayAtCurrentFloor,
        }
    }

    /// Advance the simulation by exactly one tick. Atomic and total: for any
    /// valid pre-state the engine is in a valid post-state when this
    /// returns, and the tick counter has grown by one.
    ///
    /// # Panics
    ///
    /// Panics if the controller answers with an action that is illegal for
    /// the current status, or drives the lift outside the shaft. Both are
    /// controller defects, not recoverable input.
    pub fn tick(&mut self) {
        if self.current_status == LiftStatus::OutOfService {
            self.current_tick += 1;
            return;
        }
        let decided = self
            .controller
            .decide_action(self.current_floor, self.current_status);
        let action = self.apply_idle_parking(decided);
        if !is_action_allowed(self.current_status, action) {
            panic!(
                "controller decided {} while {}, which the transition table forbids",
                action, self.current_status
            );
        }
        self.apply_action(action);
        self.current_tick += 1;
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    pub fn current_status(&self) -> LiftStatus {
        self.current_status
    }

    pub fn current_state(&self) -> LiftState {
        LiftState {
            tick: self.current_tick,
            floor: self.current_floor,
            status: self.current_status,
            direction: self.current_status.direction(),
            door_state: self.current_status.door_state(),
        }
    }

    /// Hand a freshly created request to the owning controller.
    pub fn add_request(&mut self, request: LiftRequest) {
        self.controller.add_request(request);
    }

    /// Forwarded to the controller; `false` for an unknown or already
    /// terminal id.
    pub fn cancel_request(&mut self, id: RequestId) -> bool {
        self.controller.cancel_request(id)
    }

    pub fn active_requests(&self) -> &[LiftRequest] {
        self.controller.active_requests()
    }

    /// Take the lift out of service immediately. Any in-progress travel or
    /// door operation is abandoned on the spot (a documented simplification)
    /// and every active request is cancelled.
    pub fn set_out_of_service(&mut self) {
        self.controller.take_out_of_service();
        self.set_status(LiftStatus::OutOfService);
        self.travel_progress = 0;
        self.dwell_progress = 0;
        self.closing_progress = 0;
        self.closing_snapshot.clear();
        self.idle_streak = 0;
        self.parking = false;
        warn!(floor = self.current_floor, "lift out of service");
    }

    /// Return to service as `Idle` at the unchanged floor. A no-op unless
    /// currently out of service.
    pub fn return_to_service(&mut self) {
        if self.current_status != LiftStatus::OutOfService {
            return;
        }
        self.controller.return_to_service();
        self.set_status(LiftStatus::Idle);
        info!(floor = self.current_floor, "lift returned to service");
    }

    /// Commit a status change, checked against the transition table.
    fn set_status(&mut self, next: LiftStatus) {
        assert!(
            is_valid_transition(self.current_status, next),
            "illegal status transition {} -> {}",
            self.current_status,
            next
        );
        if next != self.current_status {
            debug!(from = %self.current_status, to = %next, tick = self.current_tick, "status");
        }
        self.current_status = next;
    }

    /// Idle-parking bookkeeping. Substitutes a move toward the home floor
    /// for the controller's `Idle` once the lift has sat idle with no
    /// pending requests for the configured timeout; any real decision from
    /// the controller abandons parking.
    fn apply_idle_parking(&mut self, decided: Action) -> Action {
        if decided != Action::Idle {
            self.idle_streak = 0;
            self.parking = false;
            return decided;
        }
        if !self.controller.active_requests().is_empty() {
            self.idle_streak = 0;
            return decided;
        }
        if self.parking {
            return self.park_step();
        }
        if self.current_status == LiftStatus::Idle {
            if self.idle_streak >= self.idle_timeout_ticks
                && self.idle_parking_mode == IdleParkingMode::ParkToHomeFloor
                && self.current_floor != self.home_floor
            {
                self.parking = true;
                debug!(home = self.home_floor, "idle timeout reached, parking");
                return self.park_step();
            }
            self.idle_streak += 1;
        }
        decided
    }

    fn park_step(&mut self) -> Action {
        if self.current_floor < self.home_floor {
            Action::MoveUp
        } else if self.current_floor > self.home_floor {
            Action::MoveDown
        } else {
            self.parking = false;
            self.idle_streak = 0;
            Action::Idle
        }
    }

    fn apply_action(&mut self, action: Action) {
        match self.current_status {
            LiftStatus::Idle => match action {
                Action::MoveUp | Action::MoveDown => self.progress_travel(action),
                Action::OpenDoor => self.open_doors(),
                Action::Idle => {}
                Action::CloseDoor => unreachable!("filtered by is_action_allowed"),
            },
            LiftStatus::MovingUp | LiftStatus::MovingDown => match action {
                Action::MoveUp | Action::MoveDown => self.progress_travel(action),
                Action::OpenDoor => self.open_doors(),
                Action::Idle => {
                    // Arrived with nothing left to service.
                    self.set_status(next_status(self.current_status, Action::Idle));
                    self.travel_progress = 0;
                }
                Action::CloseDoor => unreachable!("filtered by is_action_allowed"),
            },
            LiftStatus::DoorsOpen => match action {
                Action::CloseDoor => self.progress_dwell(),
                // Renewed service at this floor restarts the dwell.
                Action::OpenDoor => self.dwell_progress = 0,
                Action::Idle => {}
                _ => unreachable!("filtered by is_action_allowed"),
            },
            LiftStatus::DoorsClosing => self.progress_closing(),
            LiftStatus::DoorsOpening => {}
            LiftStatus::OutOfService => unreachable!("tick() returns early while out of service"),
        }
    }

    /// One tick of travel. Starting to move and reversing both reset the
    /// per-floor counter; the floor itself changes only when a whole
    /// floor's worth of ticks has elapsed, so no fractional position is
    /// ever observable.
    fn progress_travel(&mut self, action: Action) {
        let next = next_status(self.current_status, action);
        if next != self.current_status {
            self.set_status(next);
            self.travel_progress = 0;
        }
        self.travel_progress += 1;
        if self.travel_progress >= self.travel_ticks_per_floor {
            self.travel_progress = 0;
            let delta = if next == LiftStatus::MovingUp { 1 } else { -1 };
            let landed = self.current_floor + delta;
            if landed < self.min_floor || landed > self.max_floor {
                panic!(
                    "controller drove the lift to floor {} outside [{}, {}]",
                    landed, self.min_floor, self.max_floor
                );
            }
            self.current_floor = landed;
            debug!(floor = landed, tick = self.current_tick, "floor reached");
        }
    }

    /// Door opening commits in a single tick, straight from `Idle` or a
    /// moving status.
    fn open_doors(&mut self) {
        self.set_status(next_status(self.current_status, Action::OpenDoor));
        self.travel_progress = 0;
        self.dwell_progress = 0;
    }

    /// One tick of dwell with the doors open; when the dwell has run its
    /// course the close begins and the reopen snapshot is taken.
    fn progress_dwell(&mut self) {
        self.dwell_progress += 1;
        if self.dwell_progress >= self.door_dwell_ticks {
            self.dwell_progress = 0;
            self.set_status(next_status(LiftStatus::DoorsOpen, Action::CloseDoor));
            self.closing_progress = 0;
            self.closing_snapshot = self
                .controller
                .active_requests()
                .iter()
                .filter(|r| r.target_floor() == self.current_floor)
                .map(|r| r.id())
                .collect();
        }
    }

    /// One tick of the door closing. A *new* call for the current floor
    /// arriving inside the reopen window reverts to `DoorsOpen` instead of
    /// completing the close.
    fn progress_closing(&mut self) {
        if self.closing_progress < self.door_reopen_window_ticks && self.has_new_call_here() {
            debug!(floor = self.current_floor, "reopening for a new call");
            self.set_status(LiftStatus::DoorsOpen);
            self.dwell_progress = 0;
            self.closing_progress = 0;
            return;
        }
        self.closing_progress += 1;
        if self.closing_progress >= self.door_transition_ticks {
            self.closing_progress = 0;
            self.closing_snapshot.clear();
            self.set_status(next_status(LiftStatus::DoorsClosing, Action::Idle));
        }
    }

    fn has_new_call_here(&self) -> bool {
        self.controller
            .active_requests()
            .iter()
            .any(|r| r.target_floor() == self.current_floor && !self.closing_snapshot.contains(&r.id()))
    }
}
