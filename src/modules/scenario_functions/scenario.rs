//! ## Scenario Module
//! Tick-indexed lifecycle commands and the runner that feeds them to an
//! engine/controller pair. The text grammar that produces these commands
//! lives outside the core; this is the typed surface it targets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::modules::engine_functions::engine::LiftEngine;
use crate::modules::lift_object::lift_status::Direction;
use crate::modules::request_object::request_init::{RequestError, RequestFactory, RequestId};

/// One lifecycle command, applied immediately before the tick it names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCommand {
    pub tick: u64,
    pub op: ScenarioOp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioOp {
    CarCall { alias: String, destination: i32 },
    HallCall {
        alias: String,
        floor: i32,
        direction: Direction,
    },
    Cancel { alias: String },
    OutOfService,
    ReturnToService,
}

/// A named command list with a tick horizon, matching the scenario header
/// directives (`name:`, `ticks:`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub ticks: u64,
    pub commands: Vec<ScenarioCommand>,
}

/// Drives one engine through a scenario. Owns the request factory, so every
/// run draws its identities from a counter of its own, and keeps the
/// alias-to-id map the cancel commands need.
pub struct ScenarioRunner {
    engine: LiftEngine,
    factory: RequestFactory,
    aliases: HashMap<String, RequestId>,
}

impl ScenarioRunner {
    pub fn init(engine: LiftEngine) -> Self {
        ScenarioRunner {
            engine,
            factory: RequestFactory::init(),
            aliases: HashMap::new(),
        }
    }

    /// Run the whole scenario: for each tick, apply the commands due at that
    /// tick and then advance the engine once.
    pub fn run(&mut self, scenario: &Scenario) -> Result<(), RequestError> {
        for tick in 0..scenario.ticks {
            for command in scenario.commands.iter().filter(|c| c.tick == tick) {
                self.apply(&command.op)?;
            }
            self.engine.tick();
        }
        Ok(())
    }

    /// Apply a single command. Cancelling an unknown alias or an already
    /// finished request is a soft miss, as with the controller itself.
    pub fn apply(&mut self, op: &ScenarioOp) -> Result<(), RequestError> {
        match op {
            ScenarioOp::CarCall { alias, destination } => {
                let request = self.factory.car_call(*destination);
                self.aliases.insert(alias.clone(), request.id());
                self.engine.add_request(request);
            }
            ScenarioOp::HallCall {
                alias,
                floor,
                direction,
            } => {
                let request = self.factory.hall_call(*floor, *direction)?;
                self.aliases.insert(alias.clone(), request.id());
                self.engine.add_request(request);
            }
            ScenarioOp::Cancel { alias } => match self.aliases.get(alias) {
                Some(&id) => {
                    if !self.engine.cancel_request(id) {
                        warn!(alias = %alias, id, "cancel missed, request already finished");
                    }
                }
                None => warn!(alias = %alias, "cancel names an unknown alias"),
            },
            ScenarioOp::OutOfService => self.engine.set_out_of_service(),
            ScenarioOp::ReturnToService => self.engine.return_to_service(),
        }
        Ok(())
    }

    /// The id a previously applied call command registered for `alias`.
    pub fn request_id(&self, alias: &str) -> Option<RequestId> {
        self.aliases.get(alias).copied()
    }

    pub fn engine(&self) -> &LiftEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LiftEngine {
        &mut self.engine
    }
}
