//----------------------------------TESTS-------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::modules::lift_object::lift_status::{Action, Direction, DoorState, LiftStatus};
    use crate::modules::lift_object::lift_transitions::{
        is_action_allowed, is_valid_transition, next_status, valid_next_states,
    };

    #[test]
    fn test_direction_is_derived_from_status() {
        assert_eq!(LiftStatus::MovingUp.direction(), Direction::Up);
        assert_eq!(LiftStatus::MovingDown.direction(), Direction::Down);
        assert_eq!(LiftStatus::Idle.direction(), Direction::Idle);
        assert_eq!(LiftStatus::DoorsOpen.direction(), Direction::Idle);
        assert_eq!(LiftStatus::OutOfService.direction(), Direction::Idle);
    }

    #[test]
    fn test_door_state_is_derived_from_status() {
        assert_eq!(LiftStatus::DoorsOpen.door_state(), DoorState::Open);
        assert_eq!(LiftStatus::DoorsOpening.door_state(), DoorState::Open);
        assert_eq!(LiftStatus::DoorsClosing.door_state(), DoorState::Open);
        assert_eq!(LiftStatus::Idle.door_state(), DoorState::Closed);
        assert_eq!(LiftStatus::MovingUp.door_state(), DoorState::Closed);
        assert_eq!(LiftStatus::OutOfService.door_state(), DoorState::Closed);
    }

    #[test]
    fn test_next_status_key_entries() {
        assert_eq!(
            next_status(LiftStatus::Idle, Action::MoveUp),
            LiftStatus::MovingUp
        );
        assert_eq!(
            next_status(LiftStatus::Idle, Action::MoveDown),
            LiftStatus::MovingDown
        );
        assert_eq!(
            next_status(LiftStatus::Idle, Action::OpenDoor),
            LiftStatus::DoorsOpen
        );
        // Arrival opens the doors without passing through Idle.
        assert_eq!(
            next_status(LiftStatus::MovingUp, Action::OpenDoor),
            LiftStatus::DoorsOpen
        );
        assert_eq!(
            next_status(LiftStatus::MovingDown, Action::OpenDoor),
            LiftStatus::DoorsOpen
        );
        // Arrival with nothing to service settles to Idle.
        assert_eq!(
            next_status(LiftStatus::MovingUp, Action::Idle),
            LiftStatus::Idle
        );
        assert_eq!(
            next_status(LiftStatus::MovingDown, Action::Idle),
            LiftStatus::Idle
        );
        assert_eq!(
            next_status(LiftStatus::DoorsOpen, Action::CloseDoor),
            LiftStatus::DoorsClosing
        );
        assert_eq!(
            next_status(LiftStatus::DoorsClosing, Action::Idle),
            LiftStatus::Idle
        );
    }

    #[test]
    fn test_every_status_accepts_itself() {
        for status in LiftStatus::iter() {
            assert!(
                is_valid_transition(status, status),
                "{} must accept itself",
                status
            );
        }
    }

    #[test]
    fn test_out_of_service_reachable_from_everywhere() {
        for status in LiftStatus::iter() {
            if status == LiftStatus::OutOfService {
                continue;
            }
            assert!(
                is_valid_transition(status, LiftStatus::OutOfService),
                "{} must reach OutOfService",
                status
            );
        }
    }

    #[test]
    fn test_out_of_service_reaches_only_idle() {
        for status in LiftStatus::iter() {
            let valid = is_valid_transition(LiftStatus::OutOfService, status);
            let expected =
                status == LiftStatus::Idle || status == LiftStatus::OutOfService;
            assert_eq!(valid, expected, "OutOfService -> {}", status);
        }
    }

    #[test]
    fn test_doors_closing_cannot_reach_moving() {
        assert!(!is_valid_transition(
            LiftStatus::DoorsClosing,
            LiftStatus::MovingUp
        ));
        assert!(!is_valid_transition(
            LiftStatus::DoorsClosing,
            LiftStatus::MovingDown
        ));
        // A full return to Idle is required before moving again.
        assert!(is_valid_transition(LiftStatus::DoorsClosing, LiftStatus::Idle));
    }

    #[test]
    fn test_moving_disallowed_with_doors_open() {
        assert!(!is_action_allowed(LiftStatus::DoorsOpen, Action::MoveUp));
        assert!(!is_action_allowed(LiftStatus::DoorsOpen, Action::MoveDown));
        assert!(!is_action_allowed(LiftStatus::DoorsClosing, Action::MoveUp));
        assert!(is_action_allowed(LiftStatus::DoorsOpen, Action::CloseDoor));
        assert!(is_action_allowed(LiftStatus::Idle, Action::OpenDoor));
        assert!(!is_action_allowed(LiftStatus::Idle, Action::CloseDoor));
    }

    #[test]
    fn test_doors_opening_stays_reserved() {
        // No action produces DoorsOpening and none leaves it via the table.
        for status in LiftStatus::iter() {
            for action in Action::iter() {
                assert_ne!(next_status(status, action), LiftStatus::DoorsOpening);
            }
        }
        for action in Action::iter() {
            assert_eq!(
                next_status(LiftStatus::DoorsOpening, action),
                LiftStatus::DoorsOpening
            );
        }
    }

    fn any_status() -> impl Strategy<Value = LiftStatus> {
        proptest::sample::select(LiftStatus::iter().collect::<Vec<_>>())
    }

    fn any_action() -> impl Strategy<Value = Action> {
        proptest::sample::select(Action::iter().collect::<Vec<_>>())
    }

    proptest! {
        // The table is a pure function: same inputs, same outputs.
        #[test]
        fn prop_next_status_is_deterministic(status in any_status(), action in any_action()) {
            prop_assert_eq!(next_status(status, action), next_status(status, action));
            prop_assert_eq!(
                is_action_allowed(status, action),
                is_action_allowed(status, action)
            );
        }

        // Every allowed action commits to a status the table itself regards
        // as reachable.
        #[test]
        fn prop_allowed_actions_stay_in_the_table(status in any_status(), action in any_action()) {
            if is_action_allowed(status, action) {
                let next = next_status(status, action);
                prop_assert!(is_valid_transition(status, next));
                prop_assert!(valid_next_states(status).contains(&next) || next == status);
            }
        }

        // Disallowed pairs resolve to the current status, keeping the
        // function total.
        #[test]
        fn prop_disallowed_actions_do_not_move_the_table(status in any_status(), action in any_action()) {
            if !is_action_allowed(status, action) {
                prop_assert_eq!(next_status(status, action), status);
            }
        }
    }
}
