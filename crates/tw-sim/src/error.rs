use thiserror::Error;

use tw_core::AgentId;
use tw_world::WorldError;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error("agent {0} does not exist")]
    UnknownAgent(AgentId),

    #[error("lane {lane} of road '{road}' does not exist at s = {s}")]
    UnknownLane { road: String, lane: i32, s: f64 },
}

pub type SimResult<T> = Result<T, SimError>;
