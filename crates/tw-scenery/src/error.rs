//! Scene-description validation errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SceneryError {
    #[error("road '{0}' is defined more than once")]
    DuplicateRoad(String),

    #[error("junction '{0}' is defined more than once")]
    DuplicateJunction(String),

    #[error("road '{0}' has no lane sections")]
    NoLaneSections(String),

    #[error("road '{road}' has lane sections out of order at index {index}")]
    UnsortedSections { road: String, index: usize },

    #[error("road '{road}' has a geometry with non-positive length at s = {s}")]
    DegenerateGeometry { road: String, s: f64 },
}

pub type SceneryResult<T> = Result<T, SceneryError>;
