//! `tw-core` — foundational types for the traffic world data layer.
//!
//! This crate is a dependency of every other `tw-*` crate.  It has no `tw-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `LaneId`, `SectionId`, `RoadId`, `JunctionId`, `ObjectId`, `AgentId` |
//! | [`geometry`]    | `Vector2d`, `Position`, `Orientation`, `Dimension`, angles |
//! | [`kinds`]       | `LaneType`, `TrafficSignType`, `IndicatorState`           |
//! | [`config`]      | `WorldConfig`                                             |
//! | [`stochastics`] | `Stochastics` trait, `SeededStochastics`                  |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod kinds;
pub mod stochastics;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::WorldConfig;
pub use error::{CoreError, CoreResult};
pub use geometry::{normalize_angle, Dimension, Orientation, Position, RoadCoordinate, Vector2d};
pub use ids::{AgentId, JunctionId, LaneId, ObjectId, RoadId, SectionId};
pub use kinds::{IndicatorState, LaneType, TrafficSignType};
pub use stochastics::{sample_weighted, SeededStochastics, Stochastics};
