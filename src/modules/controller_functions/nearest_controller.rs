//! ## Nearest Controller Module
//! Nearest-request routing: always head for the pending request whose target
//! floor is closest to wherever the lift currently is, regardless of travel
//! direction.

use tracing::{debug, info, warn};

use crate::modules::lift_object::lift_status::{Action, LiftStatus};
use crate::modules::request_object::request_init::{LiftRequest, RequestId, RequestState};

use super::controller::{advance_request, LiftController};

/// At each decision point this controller picks the queued request with the
/// smallest absolute floor distance, commits to it until served, and may
/// reverse direction immediately between targets. Equidistant candidates
/// resolve to the earliest-created request.
pub struct NearestRequestController {
    requests: Vec<LiftRequest>,
    target: Option<RequestId>,
    out_of_service: bool,
}

impl NearestRequestController {
    pub fn init() -> Self {
        NearestRequestController {
            requests: Vec::new(),
            target: None,
            out_of_service: false,
        }
    }

    /// Pick a new target among the queued requests. `min_by_key` keeps the
    /// first of equally distant candidates, and the vector is in insertion
    /// order, so ties fall to the lowest id.
    fn select_target(&mut self, current_floor: i32) {
        if self.target.is_some() {
            return;
        }
        let nearest = self
            .requests
            .iter_mut()
            .filter(|r| r.state() == RequestState::Queued)
            .min_by_key(|r| (r.target_floor() - current_floor).abs());
        if let Some(request) = nearest {
            advance_request(request, RequestState::Assigned);
            advance_request(request, RequestState::Serving);
            self.target = Some(request.id());
            debug!(
                id = request.id(),
                floor = request.target_floor(),
                "selected nearest request"
            );
        }
    }

    /// Serve the committed target: doors open at its floor, otherwise move
    /// toward it.
    fn head_for_target(&mut self, current_floor: i32) -> Action {
        let id = match self.target {
            Some(id) => id,
            None => return Action::Idle,
        };
        let index = self
            .requests
            .iter()
            .position(|r| r.id() == id)
            .unwrap_or_else(|| panic!("target request {} vanished from the active set", id));
        let target_floor = self.requests[index].target_floor();
        if target_floor > current_floor {
            Action::MoveUp
        } else if target_floor < current_floor {
            Action::MoveDown
        } else {
            let mut request = self.requests.remove(index);
            advance_request(&mut request, RequestState::Completed);
            self.target = None;
            info!(id = request.id(), floor = target_floor, "request completed");
            Action::OpenDoor
        }
    }
}

impl LiftController for NearestRequestController {
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
        if self.target == Some(id) {
            self.target = None;
        }
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
                self.select_target(current_floor);
                self.head_for_target(current_floor)
            }
            LiftStatus::DoorsOpen => {
                // A target at this floor (possibly picked up mid-dwell) is
                // served while the doors are already open.
                self.select_target(current_floor);
                match self.target {
                    Some(id)
                        if self
                            .requests
                            .iter()
                            .any(|r| r.id() == id && r.target_floor() == current_floor) =>
                    {
                        self.head_for_target(current_floor)
                    }
                    _ => Action::CloseDoor,
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
        self.target = None;
        self.out_of_service = true;
    }

    fn return_to_service(&mut self) {
        self.out_of_service = false;
        info!("controller returned to service");
    }
}
