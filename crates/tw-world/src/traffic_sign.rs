//! Traffic signs placed along roads.

use tw_core::{LaneId, ObjectId, RoadId, TrafficSignType, Vector2d};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrafficSign {
    pub id:          ObjectId,
    /// Scene id of the signal this sign was converted from.
    pub name:        String,
    pub sign_type:   TrafficSignType,
    /// Type-dependent value, e.g. the limit of a speed sign in m/s.
    pub value:       f64,
    pub road:        RoadId,
    pub s:           f64,
    pub t:           f64,
    pub position:    Vector2d,
    /// Lanes the sign applies to.
    pub valid_lanes: Vec<LaneId>,
}

impl TrafficSign {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self { id, road: RoadId::INVALID, ..Self::default() }
    }

    #[inline]
    pub fn is_valid_for(&self, lane: LaneId) -> bool {
        self.valid_lanes.contains(&lane)
    }
}
