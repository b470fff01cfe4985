//! `tw-world` — the world data store and the queries run against it.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                   |
//! |-------------------|------------------------------------------------------------|
//! | [`store`]         | `WorldData`: network, objects, signs, lane assignments     |
//! | [`object`]        | `WorldObject`, `MovingObject`, `StationaryObject`, handles |
//! | [`traffic_sign`]  | `TrafficSign`                                              |
//! | [`query`]         | Lane-stream searches, distances, `LaneInfo` snapshots      |
//! | [`sector`]        | `Sector`, `apply_sector_filter`                            |
//! | [`sensor_view`]   | `SensorView` perception snapshot                           |
//! | [`error`]         | `WorldError`, `WorldResult<T>`                             |
//!
//! # Lane assignments
//!
//! Which objects sit on which lane is derived data.  It is rebuilt from the
//! object poses by [`WorldData::locate_objects`] once per sync and is never
//! patched incrementally, except that removing an object detaches it.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Locate objects on lanes with Rayon.                     |
//! | `serde`    | Serialize/deserialize snapshots and value types.        |

pub mod error;
pub mod object;
pub mod query;
pub mod sector;
pub mod sensor_view;
pub mod store;
pub mod traffic_sign;

#[cfg(test)]
mod tests;

pub use error::{WorldError, WorldResult};
pub use object::{
    AnyKind, AsWorldObject, Lights, MovingKind, MovingObject, ObjectHandle, ObjectKind, ObjectLink,
    StationaryKind, StationaryObject, WorldObject,
};
pub use query::{LaneCategory, LaneInfo, LaneObject, LanePosition};
pub use sector::{apply_sector_filter, Located, Sector};
pub use sensor_view::{ObjectSnapshot, SensorView, SensorViewConfig, SignSnapshot};
pub use store::WorldData;
pub use traffic_sign::TrafficSign;
