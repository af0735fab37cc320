//! ## Controller Module
//! This module provides the shared contract for the dispatch controllers
//!
//! ## The traits include:
//! - **LiftController**
//!
//! ## The enums include:
//! - **ControllerStrategy**
//!
//! ## The functions include:
//! - 'make_controller'

use serde::{Deserialize, Serialize};

use crate::modules::lift_object::lift_status::{Action, LiftStatus};
use crate::modules::request_object::request_init::{LiftRequest, RequestId, RequestState};

use super::nearest_controller::NearestRequestController;
use super::scan_controller::DirectionalScanController;

/// Which dispatch algorithm a configuration selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerStrategy {
    NearestRequestRouting,
    DirectionalScan,
}

impl ControllerStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            ControllerStrategy::NearestRequestRouting => "NEAREST_REQUEST_ROUTING",
            ControllerStrategy::DirectionalScan => "DIRECTIONAL_SCAN",
        }
    }
}

/// The contract every dispatch controller fulfils. A controller owns its
/// request set outright and is the only thing that mutates request
/// lifecycles; the engine consults it once per tick for the next [`Action`].
pub trait LiftController {
    /// Take ownership of a freshly created request and queue it. The request
    /// is expected in state `Created`.
    ///
    /// # Panics
    ///
    /// Panics if the request is not in state `Created` (a caller defect).
    fn add_request(&mut self, request: LiftRequest);

    /// Cancel the request with the given id.
    ///
    /// # Returns:
    ///
    /// Returns - bool - `true` if an active request was cancelled, `false`
    /// for an unknown or already-terminal id. Cancellation racing with
    /// natural completion is expected, so the miss is a soft failure.
    fn cancel_request(&mut self, id: RequestId) -> bool;

    /// The current non-terminal request set.
    fn active_requests(&self) -> &[LiftRequest];

    /// Decide the lift's next action given where it is and what it is doing.
    /// Called once per tick; the controller advances request lifecycles as a
    /// side effect of deciding.
    fn decide_action(&mut self, current_floor: i32, current_status: LiftStatus) -> Action;

    /// Atomically cancel every active request and refuse further decisions
    /// (they come back as `Idle`) until returned to service.
    fn take_out_of_service(&mut self);

    /// Accept decisions again. Cancelled requests are not resurrected.
    fn return_to_service(&mut self);
}

/// Build the controller a strategy selector names.
pub fn make_controller(strategy: ControllerStrategy) -> Box<dyn LiftController> {
    match strategy {
        ControllerStrategy::NearestRequestRouting => Box::new(NearestRequestController::init()),
        ControllerStrategy::DirectionalScan => Box::new(DirectionalScanController::init()),
    }
}

/// Advance a request's lifecycle or die. An illegal edge here is a
/// controller defect, never recoverable input.
pub(crate) fn advance_request(request: &mut LiftRequest, to: RequestState) {
    if let Err(e) = request.advance(to) {
        panic!("request {}: {}", request.id(), e);
    }
}
