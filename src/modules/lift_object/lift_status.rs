//! ## Lift Status Module
//! This module holds the state vocabulary of the lift
//!
//! ## The enums include:
//! - **LiftStatus**
//! - **Direction**
//! - **DoorState**
//! - **Action**

use serde::{Deserialize, Serialize};

/// All possible statuses of the lift. This is the single source of truth for
/// the lift's state; [`Direction`] and [`DoorState`] are derived from it and
/// never stored on their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiftStatus {
    Idle,
    MovingUp,
    MovingDown,
    /// Reserved transitional status. No transition currently produces it and
    /// no action is accepted while in it; door opening commits in a single
    /// tick directly to `DoorsOpen`.
    DoorsOpening,
    DoorsOpen,
    DoorsClosing,
    OutOfService,
}

impl LiftStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LiftStatus::Idle => "Idle",
            LiftStatus::MovingUp => "MovingUp",
            LiftStatus::MovingDown => "MovingDown",
            LiftStatus::DoorsOpening => "DoorsOpening",
            LiftStatus::DoorsOpen => "DoorsOpen",
            LiftStatus::DoorsClosing => "DoorsClosing",
            LiftStatus::OutOfService => "OutOfService",
        }
    }

    /// Travel direction implied by the status.
    pub fn direction(&self) -> Direction {
        match self {
            LiftStatus::MovingUp => Direction::Up,
            LiftStatus::MovingDown => Direction::Down,
            _ => Direction::Idle,
        }
    }

    /// Door position implied by the status. The doors count as open until a
    /// close has fully completed, so `DoorsClosing` still reports `Open`.
    pub fn door_state(&self) -> DoorState {
        match self {
            LiftStatus::DoorsOpen | LiftStatus::DoorsOpening | LiftStatus::DoorsClosing => {
                DoorState::Open
            }
            _ => DoorState::Closed,
        }
    }

    pub fn iter() -> impl Iterator<Item = LiftStatus> {
        [
            LiftStatus::Idle,
            LiftStatus::MovingUp,
            LiftStatus::MovingDown,
            LiftStatus::DoorsOpening,
            LiftStatus::DoorsOpen,
            LiftStatus::DoorsClosing,
            LiftStatus::OutOfService,
        ]
        .iter()
        .copied()
    }
}

impl std::fmt::Display for LiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel direction, derived from [`LiftStatus`] for the lift itself and
/// carried as a desired direction on hall calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Idle => "IDLE",
        }
    }

    /// Direction of travel from one floor to another. Equal floors give
    /// `Idle`.
    pub fn of_travel(from: i32, to: i32) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Idle
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Door position, derived from [`LiftStatus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    Open,
    Closed,
}

/// The vocabulary a controller may answer with on each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    OpenDoor,
    CloseDoor,
    Idle,
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::MoveUp => "MoveUp",
            Action::MoveDown => "MoveDown",
            Action::OpenDoor => "OpenDoor",
            Action::CloseDoor => "CloseDoor",
            Action::Idle => "Idle",
        }
    }

    pub fn iter() -> impl Iterator<Item = Action> {
        [
            Action::MoveUp,
            Action::MoveDown,
            Action::OpenDoor,
            Action::CloseDoor,
            Action::Idle,
        ]
        .iter()
        .copied()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
