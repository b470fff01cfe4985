//! `tw-scenery` — the scene description handed to the world layer.
//!
//! Parsing a concrete file dialect is a collaborator's job; this crate only
//! defines the in-memory shape the parser fills and the network converter
//! reads.  All types are plain data with public fields.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`road`]     | `SceneryRoad`, geometries, polynomials, lane sections, links  |
//! | [`junction`] | `SceneryJunction`, `Connection`                               |
//! | [`objects`]  | `RoadSignal`, `RoadObject`                                    |
//! | [`scenery`]  | `Scenery` root and its validation                             |
//! | [`builder`]  | `RoadBuilder` fluent construction                             |
//! | [`error`]    | `SceneryError`, `SceneryResult<T>`                            |

pub mod builder;
pub mod error;
pub mod junction;
pub mod objects;
pub mod road;
pub mod scenery;

#[cfg(test)]
mod tests;

pub use builder::RoadBuilder;
pub use error::{SceneryError, SceneryResult};
pub use junction::{Connection, SceneryJunction};
pub use objects::{RoadObject, RoadSignal};
pub use road::{
    active_polynomial, ContactPoint, ElementType, GeometryKind, LinkType, Polynomial,
    RoadGeometry, RoadLane, RoadLaneSection, RoadLink, RoadMark, SceneryRoad,
};
pub use scenery::Scenery;
