//! ## Scan Controller Module
//! Directional scan (the SCAN/LOOK family): commit to a travel direction,
//! service everything ahead that matches it, reverse only when nothing is
//! left ahead.

use tracing::{debug, info, warn};

use crate::modules::lift_object::lift_status::{Action, Direction, LiftStatus};
use crate::modules::request_object::request_init::{
    LiftRequest, RequestId, RequestState, RequestType,
};

use super::controller::{advance_request, LiftController};

/// LOOK dispatch over the owned request set. Car calls and same-direction
/// hall calls ahead of the lift are serviced in floor order; hall calls for
/// the opposite direction stay `Queued` until the scan turns or passes and
/// comes back. The sweep is recomputed every tick, so requests may be added
/// or cancelled mid-travel without being dropped or serviced twice.
pub struct DirectionalScanController {
    requests: Vec<LiftRequest>,
    committed: Direction,
    out_of_service: bool,
}

impl DirectionalScanController {
    pub fn init() -> Self {
        DirectionalScanController {
            requests: Vec::new(),
            committed: Direction::Idle,
            out_of_service: false,
        }
    }

    fn requests_above(&self, floor: i32) -> bool {
        self.requests.iter().any(|r| r.target_floor() > floor)
    }

    fn requests_below(&self, floor: i32) -> bool {
        self.requests.iter().any(|r| r.target_floor() < floor)
    }

    /// Whether a request at the lift's current floor is served by a stop
    /// right now. Car calls always are; hall calls are when they want the
    /// committed direction, when the lift has no commitment, or when the
    /// floor is the turnaround point of the sweep.
    fn serves_now(&self, request: &LiftRequest, floor: i32, direction: Direction) -> bool {
        if request.target_floor() != floor {
            return false;
        }
        match request.request_type() {
            RequestType::CarCall { .. } => true,
            RequestType::HallCall { direction: wanted, .. } => match direction {
                Direction::Idle => true,
                Direction::Up => wanted == Direction::Up || !self.requests_above(floor),
                Direction::Down => wanted == Direction::Down || !self.requests_below(floor),
            },
        }
    }

    fn stops_here(&self, floor: i32, direction: Direction) -> bool {
        self.requests
            .iter()
            .any(|r| self.serves_now(r, floor, direction))
    }

    /// Where to head next, LOOK style: keep going while work remains ahead,
    /// otherwise turn around, otherwise go idle.
    fn choose_direction(&self, floor: i32, direction: Direction) -> Direction {
        match direction {
            Direction::Up => {
                if self.requests_above(floor) {
                    Direction::Up
                } else if self.requests_below(floor) {
                    Direction::Down
                } else {
                    Direction::Idle
                }
            }
            Direction::Down => {
                if self.requests_below(floor) {
                    Direction::Down
                } else if self.requests_above(floor) {
                    Direction::Up
                } else {
                    Direction::Idle
                }
            }
            Direction::Idle => {
                if self.requests_above(floor) {
                    Direction::Up
                } else if self.requests_below(floor) {
                    Direction::Down
                } else {
                    Direction::Idle
                }
            }
        }
    }

    /// Drive every request served by a stop at this floor through
    /// `Serving` to `Completed` and drop it from the active set.
    fn complete_here(&mut self, floor: i32, direction: Direction) {
        let mut index = 0;
        while index < self.requests.len() {
            if self.serves_now(&self.requests[index], floor, direction) {
                let mut request = self.requests.remove(index);
                if request.state() == RequestState::Queued {
                    advance_request(&mut request, RequestState::Assigned);
                }
                advance_request(&mut request, RequestState::Serving);
                advance_request(&mut request, RequestState::Completed);
                info!(id = request.id(), floor, "request completed");
            } else {
                index += 1;
            }
        }
    }

    /// Keep lifecycle states in step with the sweep: requests ahead in the
    /// committed direction become `Assigned`, requests that fell out of the
    /// sweep (a reversal, or a cancellation changing the horizon) go back to
    /// `Queued`.
    fn refresh_assignments(&mut self, floor: i32, direction: Direction) {
        for request in &mut self.requests {
            // Car calls ride along in any sweep; only hall calls are held
            // back by the direction they ask for.
            let wanted = match request.request_type() {
                RequestType::CarCall { .. } => None,
                RequestType::HallCall { direction, .. } => Some(direction),
            };
            let in_sweep = match direction {
                Direction::Up => {
                    request.target_floor() > floor && wanted != Some(Direction::Down)
                }
                Direction::Down => {
                    request.target_floor() < floor && wanted != Some(Direction::Up)
                }
                Direction::Idle => false,
            };
            match (request.state(), in_sweep) {
                (RequestState::Queued, true) => {
                    advance_request(request, RequestState::Assigned);
                    debug!(id = request.id(), "request joined the sweep");
                }
                (RequestState::Assigned, false) => {
                    advance_request(request, RequestState::Queued);
                    debug!(id = request.id(), "request left the sweep");
                }
                _ => {}
            }
        }
    }

    fn sweep(&mut self, floor: i32, status: LiftStatus) -> Action {
        let direction = match status {
            LiftStatus::MovingUp => Direction::Up,
            LiftStatus::MovingDown => Direction::Down,
            _ => self.committed,
        };
        if self.stops_here(floor, direction) {
            self.complete_here(floor, direction);
            self.committed = direction;
            return Action::OpenDoor;
        }
        let next = self.choose_direction(floor, direction);
        self.committed = next;
        self.refresh_assignments(floor, next);
        match next {
            Direction::Up => Action::MoveUp,
            Direction::Down => Action::MoveDown,
            Direction::Idle => Action::Idle,
        }
    }
}

impl LiftController for DirectionalScanController {
    fn add_request(&mut self, mut request: LiftRequest) {
        advance_request(&mut request, RequestState::Queued);
        debug!(id = request.id(), floor = request.target_floor(), "request queued");
        self.requests.push(request);
    }

    fn cancel_request(&mut self, id: RequestId) -> bool {
        let index = match self.requests.iter().position(|r| r.id() == id) {
            Some(index) => index,
            None => return false,
        };
        let mut request = self.requests.remove(index);
        advance_request(&mut request, RequestState::Cancelled);
        info!(id, "request cancelled");
        true
    }

    fn active_requests(&self) -> &[LiftRequest] {
        &self.requests
    }

    fn decide_action(&mut self, current_floor: i32, current_status: LiftStatus) -> Action {
        if self.out_of_service {
            return Action::Idle;
        }
        match current_status {
            LiftStatus::Idle | LiftStatus::MovingUp | LiftStatus::MovingDown => {
                self.sweep(current_floor, current_status)
            }
            LiftStatus::DoorsOpen => {
                // A call for this floor that arrived mid-dwell is folded into
                // the stop instead of closing on it.
                if self.stops_here(current_floor, self.committed) {
                    self.complete_here(current_floor, self.committed);
                    Action::OpenDoor
                } else {
                    Action::CloseDoor
                }
            }
            LiftStatus::DoorsClosing | LiftStatus::DoorsOpening | LiftStatus::OutOfService => {
                Action::Idle
            }
        }
    }

    fn take_out_of_service(&mut self) {
        for request in &mut self.requests {
            advance_request(request, RequestState::Cancelled);
        }
        warn!(cancelled = self.requests.len(), "controller taken out of service");
        self.requests.clear();
        self.committed = Direction::Idle;
        self.out_of_service = true;
    }

    fn return_to_service(&mut self) {
        self.out_of_service = false;
        info!("controller returned to service");
    }
}
