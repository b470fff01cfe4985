//! Network-construction error type.
//!
//! Every variant is a build-time structural failure.  Queries never return
//! these; they use the invalid-lane sentinel instead.

use thiserror::Error;

use tw_core::{JunctionId, LaneId, RoadId, SectionId};
use tw_scenery::SceneryError;

#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("road {0} does not exist")]
    NonExistentRoad(RoadId),

    #[error("road '{0}' does not exist")]
    UnknownRoad(String),

    #[error("section {0} does not exist")]
    NonExistentSection(SectionId),

    #[error("lane {0} does not exist")]
    NonExistentLane(LaneId),

    #[error("junction {0} does not exist")]
    NonExistentJunction(JunctionId),

    #[error("junction '{0}' does not exist")]
    UnknownJunction(String),

    #[error("road '{road}' has no lane {lane} in section {section}")]
    UnknownLane { road: String, section: SectionId, lane: i32 },

    #[error("road '{0}' is defined more than once")]
    DuplicateRoad(String),

    #[error("lane {from} is already linked to {to}")]
    DuplicateLink { from: LaneId, to: LaneId },

    #[error("road '{0}' links to itself")]
    SelfReferencingLink(String),

    #[error("road '{0}' uses a link type that cannot propagate direction")]
    UnsupportedLinkType(String),

    #[error("road '{0}' has no lane sections")]
    EmptySections(String),

    #[error("junction '{junction}' has no link from incoming road '{road}'")]
    MissingJunctionLink { junction: String, road: String },

    #[error("geometry joint at s = {s} does not extend lane {lane} (last s = {last})")]
    NonIncreasingJoint { lane: LaneId, s: f64, last: f64 },

    #[error("invalid scenery: {0}")]
    Scenery(#[from] SceneryError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
