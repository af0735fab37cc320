//! ## Request Module
//! This module provides the request entity and its lifecycle
//!
//! ## The structs include:
//! - **LiftRequest**
//! - **RequestFactory**
//!
//! ## The enums include:
//! - **RequestType**
//! - **RequestState**
//! - **RequestError**

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::lift_object::lift_status::Direction;

pub type RequestId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("hall call at floor {0} must carry an UP or DOWN direction")]
    HallCallWithoutDirection(i32),
    #[error("request lifecycle does not allow {from} -> {to}")]
    InvalidTransition { from: RequestState, to: RequestState },
}

/// Lifecycle state of a request. `Completed` and `Cancelled` are terminal;
/// once reached, no further transition is permitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    Created,
    Queued,
    Assigned,
    Serving,
    Completed,
    Cancelled,
}

impl RequestState {
    pub fn as_str(&self) -> &str {
        match self {
            RequestState::Created => "Created",
            RequestState::Queued => "Queued",
            RequestState::Assigned => "Assigned",
            RequestState::Serving => "Serving",
            RequestState::Completed => "Completed",
            RequestState::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Completed | RequestState::Cancelled)
    }

    /// Lifecycle step by value: consumes the current state and returns the
    /// next one, or a typed failure when the edge does not exist. There are
    /// no self-transitions; `Assigned -> Queued` is the only backward edge.
    pub fn step(self, to: RequestState) -> Result<RequestState, RequestError> {
        let allowed = match (self, to) {
            (RequestState::Created, RequestState::Queued | RequestState::Cancelled) => true,
            (RequestState::Queued, RequestState::Assigned | RequestState::Cancelled) => true,
            (
                RequestState::Assigned,
                RequestState::Serving | RequestState::Queued | RequestState::Cancelled,
            ) => true,
            (RequestState::Serving, RequestState::Completed | RequestState::Cancelled) => true,
            _ => false,
        };
        if allowed {
            Ok(to)
        } else {
            Err(RequestError::InvalidTransition { from: self, to })
        }
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of call a request is and where it wants the lift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    /// A call made from a floor, carrying a desired travel direction but no
    /// fixed destination.
    HallCall { floor: i32, direction: Direction },
    /// A call made from inside the lift, carrying an exact destination. The
    /// origin floor is known only when the passenger's boarding floor was
    /// recorded.
    CarCall {
        destination: i32,
        origin: Option<i32>,
    },
}

impl RequestType {
    /// The floor the lift must reach to serve this request: the origin floor
    /// for hall calls, the destination floor for car calls.
    pub fn target_floor(&self) -> i32 {
        match self {
            RequestType::HallCall { floor, .. } => *floor,
            RequestType::CarCall { destination, .. } => *destination,
        }
    }

    /// Desired travel direction. Car calls infer it from the sign of
    /// `destination - origin` when the origin is known, `Idle` otherwise.
    pub fn direction(&self) -> Direction {
        match self {
            RequestType::HallCall { direction, .. } => *direction,
            RequestType::CarCall {
                destination,
                origin: Some(origin),
            } => Direction::of_travel(*origin, *destination),
            RequestType::CarCall { origin: None, .. } => Direction::Idle,
        }
    }

    pub fn is_hall_call(&self) -> bool {
        matches!(self, RequestType::HallCall { .. })
    }

    pub fn is_car_call(&self) -> bool {
        matches!(self, RequestType::CarCall { .. })
    }
}

/// A single passenger request, from creation through to completion or
/// cancellation. Mutated exclusively by the controller that owns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiftRequest {
    id: RequestId,
    request_type: RequestType,
    state: RequestState,
}

impl LiftRequest {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn target_floor(&self) -> i32 {
        self.request_type.target_floor()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Advance the lifecycle by replacing the state value with the result of
    /// [`RequestState::step`]. A failed step leaves the request untouched.
    pub fn advance(&mut self, to: RequestState) -> Result<(), RequestError> {
        self.state = self.state.step(to)?;
        Ok(())
    }
}

/// Creates requests with identities drawn from its own monotonic counter, so
/// independent engine instances stay isolated and deterministic. One factory
/// belongs to whichever session originates the requests.
#[derive(Debug, Default)]
pub struct RequestFactory {
    next_id: RequestId,
}

impl RequestFactory {
    pub fn init() -> Self {
        RequestFactory { next_id: 0 }
    }

    fn create(&mut self, request_type: RequestType) -> LiftRequest {
        let id = self.next_id;
        self.next_id += 1;
        LiftRequest {
            id,
            request_type,
            state: RequestState::Created,
        }
    }

    /// A hall call must want to travel somewhere, so direction `Idle` is
    /// rejected.
    pub fn hall_call(
        &mut self,
        floor: i32,
        direction: Direction,
    ) -> Result<LiftRequest, RequestError> {
        if direction == Direction::Idle {
            return Err(RequestError::HallCallWithoutDirection(floor));
        }
        Ok(self.create(RequestType::HallCall { floor, direction }))
    }

    pub fn car_call(&mut self, destination: i32) -> LiftRequest {
        self.create(RequestType::CarCall {
            destination,
            origin: None,
        })
    }

    pub fn car_call_from(&mut self, origin: i32, destination: i32) -> LiftRequest {
        self.create(RequestType::CarCall {
            destination,
            origin: Some(origin),
        })
    }
}
