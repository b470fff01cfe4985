//! The read-only query surface simulation components consume.
//!
//! [`World`](crate::World) implements it over the live store.  Components
//! take `&dyn WorldInterface` (or a generic bound) so they can be exercised
//! against a fake.

use tw_core::{AgentId, LaneType, ObjectId};
use tw_world::{LaneInfo, LanePosition, MovingObject, SensorView, SensorViewConfig, SignSnapshot};

/// Lane queries addressed by scene road id and external lane id.  Search
/// distances are in metres along the lane stream.
pub trait WorldInterface {
    /// The moving object of `agent`.
    fn agent(&self, agent: AgentId) -> Option<&MovingObject>;

    fn next_agent_in_lane(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId>;

    fn last_agent_in_lane(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId>;

    fn closest_agent_upstream(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId>;

    fn farthest_agent_upstream(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId>;

    /// Agents between `backward` metres behind and `forward` metres ahead,
    /// nearest-behind first.
    fn agents_in_range(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        backward: f64,
        forward: f64,
    ) -> Vec<AgentId>;

    fn next_stationary_object_in_lane(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        max: f64,
    ) -> Option<ObjectId>;

    fn distance_to_end_of_lane(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        max: f64,
        types: &[LaneType],
    ) -> f64;

    fn lane_width(&self, road: &str, lane: i32, s: f64) -> Option<f64>;

    fn lane_curvature(&self, road: &str, lane: i32, s: f64) -> Option<f64>;

    fn lane_direction(&self, road: &str, lane: i32, s: f64) -> Option<f64>;

    /// Signs ahead with their distance, nearest first.
    fn traffic_signs_in_range(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        range: f64,
    ) -> Vec<(SignSnapshot, f64)>;

    fn lateral_distance(&self, src: LanePosition<'_>, dst: LanePosition<'_>) -> Option<f64>;

    fn query_lane(&self, road: &str, lane: i32, s: f64) -> Option<LaneInfo>;

    fn query_lanes(&self, road: &str, s: f64) -> Vec<LaneInfo>;

    fn sensor_view(&self, config: &SensorViewConfig, agent: AgentId) -> Option<SensorView>;
}
