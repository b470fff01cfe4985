//! Junctions and their connections.

use crate::ContactPoint;

/// A named connection from an incoming road onto a connecting (path) road.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub id:              String,
    pub incoming_road:   String,
    pub connecting_road: String,
    /// End of the connecting road that touches the incoming road.
    pub contact_point:   ContactPoint,
    /// Explicit `(incoming lane id, connecting lane id)` pairs.
    pub lane_links:      Vec<(i32, i32)>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneryJunction {
    pub id:          String,
    pub connections: Vec<Connection>,
}
