//! `tw-network` — the road network model and everything that builds it.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`network`]      | `RoadNetwork` arenas: roads, sections, lanes, junctions   |
//! | [`lane`]         | `Lane`, `GeometryJoint`, joint interpolation              |
//! | [`stream`]       | `LaneStream` traversal, `StreamDirection`                 |
//! | [`directions`]   | `mark_directions` cluster direction normalization         |
//! | [`converter`]    | `convert` scenery → linked network                        |
//! | [`geometry`]     | Reference-line evaluation and lane sampling               |
//! | [`localization`] | R-tree `Localizer`: world point → lanes                   |
//! | [`error`]        | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Sentinels
//!
//! Lookups by id never fail: [`RoadNetwork::lane`] hands back a static
//! invalid lane whose [`Lane::exists`] is `false`, so neighbour walks can
//! chain without `Option` plumbing.

pub mod converter;
pub mod directions;
pub mod error;
pub mod geometry;
pub mod lane;
pub mod localization;
pub mod network;
pub mod stream;


pub use converter::convert;
pub use directions::{link_flips, mark_directions, DirectionMap};
pub use error::{NetworkError, NetworkResult};
pub use geometry::{reference_point, road_to_world, sample_road, LaneSample, ReferencePoint};
pub use lane::{GeometryJoint, JointSample, Lane};
pub use localization::{Footprint, LaneHit, LaneTouch, Localizer};
pub use network::{Junction, JunctionConnection, LinkTarget, Road, RoadNetwork, Section};
pub use stream::{stream_position, LaneStream, StreamDirection, StreamStep};
