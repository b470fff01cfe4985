//! Road-attached signals and static objects.

use tw_core::{Dimension, TrafficSignType};

/// A traffic sign placed along a road.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSignal {
    pub id:          String,
    pub s:           f64,
    pub t:           f64,
    pub sign_type:   TrafficSignType,
    pub value:       f64,
    /// External ids of the lanes the sign applies to.  Empty means every
    /// lane on the sign's side of the road.
    pub valid_lanes: Vec<i32>,
}

/// A static obstacle placed along a road.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadObject {
    pub id:        String,
    pub s:         f64,
    pub t:         f64,
    /// Height of the object base above the road surface.
    pub z_offset:  f64,
    pub dimension: Dimension,
    /// Heading relative to the reference line.
    pub heading:   f64,
    pub pitch:     f64,
    pub roll:      f64,
}
