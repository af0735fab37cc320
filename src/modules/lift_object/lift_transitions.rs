//! ## Lift Transitions Module
//! Pure lookup tables over the status/action vocabulary. Nothing in here has
//! side effects; the engine owns all state and uses these functions to
//! validate and commit its transitions.

use super::lift_status::{Action, LiftStatus};

/// Next status for a status/action pair. Total and deterministic: pairs with
/// no edge in the table resolve to the current status, since every status
/// accepts itself as next status (a multi-tick operation continuing).
pub fn next_status(status: LiftStatus, action: Action) -> LiftStatus {
    match (status, action) {
        (LiftStatus::Idle, Action::MoveUp) => LiftStatus::MovingUp,
        (LiftStatus::Idle, Action::MoveDown) => LiftStatus::MovingDown,
        (LiftStatus::Idle, Action::OpenDoor) => LiftStatus::DoorsOpen,

        // Arrival edges: doors open straight from travel, or the lift settles
        // when there is nothing left to service. Reversing between decisions
        // is allowed while moving.
        (LiftStatus::MovingUp, Action::MoveDown) => LiftStatus::MovingDown,
        (LiftStatus::MovingUp, Action::OpenDoor) => LiftStatus::DoorsOpen,
        (LiftStatus::MovingUp, Action::Idle) => LiftStatus::Idle,
        (LiftStatus::MovingDown, Action::MoveUp) => LiftStatus::MovingUp,
        (LiftStatus::MovingDown, Action::OpenDoor) => LiftStatus::DoorsOpen,
        (LiftStatus::MovingDown, Action::Idle) => LiftStatus::Idle,

        (LiftStatus::DoorsOpen, Action::CloseDoor) => LiftStatus::DoorsClosing,
        (LiftStatus::DoorsClosing, Action::Idle) => LiftStatus::Idle,

        (current, _) => current,
    }
}

/// Whether a controller may answer `action` while the lift is in `status`.
pub fn is_action_allowed(status: LiftStatus, action: Action) -> bool {
    match status {
        // The doors are already closed, so closing them is the one thing a
        // stationary or travelling lift cannot be asked to do.
        LiftStatus::Idle | LiftStatus::MovingUp | LiftStatus::MovingDown => {
            !matches!(action, Action::CloseDoor)
        }
        LiftStatus::DoorsOpen => {
            matches!(action, Action::OpenDoor | Action::CloseDoor | Action::Idle)
        }
        LiftStatus::DoorsClosing => matches!(action, Action::CloseDoor | Action::Idle),
        LiftStatus::DoorsOpening => matches!(action, Action::OpenDoor | Action::Idle),
        LiftStatus::OutOfService => matches!(action, Action::Idle),
    }
}

/// The set of statuses reachable from `status` in one transition, used
/// defensively by the engine before it commits a status change.
///
/// Every status except `OutOfService` can reach `OutOfService`, and
/// `OutOfService` can reach only `Idle`. `DoorsClosing` never reaches a
/// moving status directly; a full return to `Idle` is required first, though
/// the reopen window may take it back to `DoorsOpen`.
pub fn valid_next_states(status: LiftStatus) -> &'static [LiftStatus] {
    match status {
        LiftStatus::Idle => &[
            LiftStatus::Idle,
            LiftStatus::MovingUp,
            LiftStatus::MovingDown,
            LiftStatus::DoorsOpen,
            LiftStatus::OutOfService,
        ],
        LiftStatus::MovingUp => &[
            LiftStatus::MovingUp,
            LiftStatus::MovingDown,
            LiftStatus::DoorsOpen,
            LiftStatus::Idle,
            LiftStatus::OutOfService,
        ],
        LiftStatus::MovingDown => &[
            LiftStatus::MovingDown,
            LiftStatus::MovingUp,
            LiftStatus::DoorsOpen,
            LiftStatus::Idle,
            LiftStatus::OutOfService,
        ],
        LiftStatus::DoorsOpening => &[
            LiftStatus::DoorsOpening,
            LiftStatus::DoorsOpen,
            LiftStatus::OutOfService,
        ],
        LiftStatus::DoorsOpen => &[
            LiftStatus::DoorsOpen,
            LiftStatus::DoorsClosing,
            LiftStatus::OutOfService,
        ],
        LiftStatus::DoorsClosing => &[
            LiftStatus::DoorsClosing,
            LiftStatus::DoorsOpen,
            LiftStatus::Idle,
            LiftStatus::OutOfService,
        ],
        LiftStatus::OutOfService => &[LiftStatus::OutOfService, LiftStatus::Idle],
    }
}

/// Whether `from -> to` is a legal status transition. A self-transition is
/// always valid: it models an operation that spans more than one tick.
pub fn is_valid_transition(from: LiftStatus, to: LiftStatus) -> bool {
    if from == to {
        return true;
    }
    valid_next_states(from).contains(&to)
}
