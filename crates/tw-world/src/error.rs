//! World data store error type.
//!
//! Only mutations fail.  Queries report "not found" as `None`, an empty
//! `Vec` or the invalid-lane sentinel.

use thiserror::Error;

use tw_core::CoreError;
use tw_network::NetworkError;

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),

    #[error("road network could not be built: {0}")]
    Network(#[from] NetworkError),

    #[error("road '{0}' does not exist")]
    UnknownRoad(String),
}

pub type WorldResult<T> = Result<T, WorldError>;
