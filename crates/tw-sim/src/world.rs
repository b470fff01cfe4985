//! The `World` facade.

use log::{debug, error, info, warn};

use tw_core::{
    normalize_angle, AgentId, LaneType, ObjectId, Orientation, Position, SeededStochastics,
    Vector2d, WorldConfig,
};
use tw_scenery::Scenery;
use tw_world::{
    AnyKind, LaneInfo, LaneObject, LanePosition, MovingKind, MovingObject, ObjectHandle,
    ObjectLink, SensorView, SensorViewConfig, SignSnapshot, StationaryKind, WorldData, WorldError,
};

use crate::{
    AgentBlueprint, AgentRegistry, AgentUpdate, Placement, Request, SimError, SimResult,
    UpdateQueue, WorldInterface,
};

/// Owns the world data store, the agents living in it and their pending
/// updates.
///
/// A simulation step has two phases:
///
/// 1. **Read**: components query the world (through [`WorldInterface`]) and
///    queue changes with [`queue_agent_update`](Self::queue_agent_update) /
///    [`queue_agent_remove`](Self::queue_agent_remove).  The world does not
///    change, so every component sees the same state.
/// 2. **Apply**: [`sync_global_data`](Self::sync_global_data) applies the
///    queue in FIFO order and re-locates every object on the lanes.
pub struct World {
    config:      WorldConfig,
    data:        WorldData,
    agents:      AgentRegistry,
    updates:     UpdateQueue,
    stochastics: SeededStochastics,
}

impl World {
    pub fn new(config: WorldConfig) -> SimResult<Self> {
        let data = WorldData::new(config.clone())?;
        Ok(Self {
            stochastics: SeededStochastics::new(config.seed),
            config,
            data,
            agents: AgentRegistry::new(),
            updates: UpdateQueue::new(),
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn data(&self) -> &WorldData {
        &self.data
    }

    #[inline]
    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    #[inline]
    pub fn pending_updates(&self) -> usize {
        self.updates.len()
    }

    /// Random draws for components, seeded from the configuration.
    #[inline]
    pub fn stochastics(&mut self) -> &mut SeededStochastics {
        &mut self.stochastics
    }

    // ── Scenery ───────────────────────────────────────────────────────────

    /// Replace the world with one built from `scenery`.  On failure the
    /// world is left empty.
    pub fn create_scenery(&mut self, scenery: &Scenery) -> SimResult<()> {
        self.clear();
        self.data
            .load_scenery(scenery)
            .inspect_err(|e| error!("scenery rejected: {e}"))?;
        info!("scenery created with {} roads", self.data.network().road_count());
        Ok(())
    }

    // ── Agents ────────────────────────────────────────────────────────────

    /// Create an agent and its moving object, placed and located at once.
    pub fn spawn_agent(&mut self, blueprint: AgentBlueprint) -> SimResult<AgentId> {
        let (position, orientation) = self.resolve_placement(&blueprint.placement)?;

        let object = self.data.add_moving_object(ObjectLink::Unlinked);
        object.base.dimension = blueprint.dimension;
        object.base.position = position;
        object.base.orientation = orientation;
        object.velocity = Vector2d::from_heading(orientation.yaw) * blueprint.speed;
        let object_id = object.base.id;

        let agent = self.agents.register(blueprint.name, object_id);
        object.base.link = ObjectLink::Agent(agent);
        self.data.locate_object(ObjectHandle::Moving(object_id));
        debug!("spawned agent {agent} as object {object_id}");
        Ok(agent)
    }

    fn resolve_placement(&self, placement: &Placement) -> SimResult<(Position, Orientation)> {
        match placement {
            Placement::Pose { position, orientation } => Ok((*position, *orientation)),
            Placement::Lane { road, lane, s, t, yaw } => {
                if self.data.network().road_id(road).is_none() {
                    return Err(WorldError::UnknownRoad(road.clone()).into());
                }
                let unknown = || SimError::UnknownLane { road: road.clone(), lane: *lane, s: *s };
                let (point, _) = self.data.lane_to_world(road, *lane, *s, *t).ok_or_else(unknown)?;
                let heading = self.data.lane_direction(road, *lane, *s).ok_or_else(unknown)?;
                let z = self
                    .data
                    .lane(road, *lane, *s)
                    .interpolate(*s)
                    .map_or(0.0, |j| j.elevation);
                Ok((
                    Position::new(point.x, point.y, z),
                    Orientation::from_yaw(normalize_angle(heading + yaw)),
                ))
            }
        }
    }

    /// Queue `update` for `agent`; it takes effect at the next sync.
    pub fn queue_agent_update(&mut self, agent: AgentId, update: AgentUpdate) -> SimResult<()> {
        if self.agents.get(agent).is_none() {
            return Err(SimError::UnknownAgent(agent));
        }
        self.updates.push_update(agent, update);
        Ok(())
    }

    /// Queue the removal of `agent`; it takes effect at the next sync.
    pub fn queue_agent_remove(&mut self, agent: AgentId) -> SimResult<()> {
        if self.agents.get(agent).is_none() {
            return Err(SimError::UnknownAgent(agent));
        }
        self.updates.push_remove(agent);
        Ok(())
    }

    /// Apply every queued request in order, then re-locate all objects.
    ///
    /// Requests for agents removed earlier in the same batch are skipped.
    /// Returns the number of requests applied.
    pub fn sync_global_data(&mut self) -> usize {
        let requests: Vec<Request> = self.updates.drain().collect();
        let mut applied = 0;
        for request in requests {
            let agent = request.agent();
            let Some(object) = self.agents.get(agent).map(|a| a.object) else {
                warn!("dropping request for departed agent {agent}");
                continue;
            };
            match request {
                Request::Update(_, update) => match self.data.moving_object_mut(object) {
                    Some(moving) => update.apply(moving),
                    None => {
                        warn!("agent {agent} has no object {object}");
                        continue;
                    }
                },
                Request::Remove(_) => {
                    self.agents.remove(agent);
                    self.data.remove_moving_object(object);
                }
            }
            applied += 1;
        }
        self.data.locate_objects();
        debug!("sync applied {applied} requests, {} agents live", self.agents.len());
        applied
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Prepare a rerun: drop agents, pending updates and moving objects.
    /// The road network, stationary objects and signs stay.
    pub fn reset(&mut self) {
        self.agents.clear();
        self.updates.clear();
        self.data.reset();
        self.stochastics = SeededStochastics::new(self.config.seed);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.agents.clear();
        self.updates.clear();
        self.data.clear();
        self.stochastics = SeededStochastics::new(self.config.seed);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Nearest object of any kind ahead, agents and obstacles alike.
    pub fn next_object_in_lane(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<ObjectHandle> {
        self.data
            .next_object_in_lane::<AnyKind>(road, lane, s, max)
            .map(|hit| hit.handle)
    }

    fn agent_of(&self, hit: LaneObject) -> Option<AgentId> {
        match hit.handle {
            ObjectHandle::Moving(id) => self.agents.agent_of(id),
            ObjectHandle::Stationary(_) => None,
        }
    }
}

// ── Query surface ─────────────────────────────────────────────────────────────

impl WorldInterface for World {
    fn agent(&self, agent: AgentId) -> Option<&MovingObject> {
        self.agents.get(agent).and_then(|a| self.data.moving_object(a.object))
    }

    fn next_agent_in_lane(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId> {
        self.data
            .next_object_in_lane::<MovingKind>(road, lane, s, max)
            .and_then(|hit| self.agent_of(hit))
    }

    fn last_agent_in_lane(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId> {
        self.data
            .last_object_in_lane::<MovingKind>(road, lane, s, max)
            .and_then(|hit| self.agent_of(hit))
    }

    fn closest_agent_upstream(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId> {
        self.data
            .closest_object_upstream::<MovingKind>(road, lane, s, max)
            .and_then(|hit| self.agent_of(hit))
    }

    fn farthest_agent_upstream(&self, road: &str, lane: i32, s: f64, max: f64) -> Option<AgentId> {
        self.data
            .farthest_object_upstream::<MovingKind>(road, lane, s, max)
            .and_then(|hit| self.agent_of(hit))
    }

    fn agents_in_range(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        backward: f64,
        forward: f64,
    ) -> Vec<AgentId> {
        self.data
            .objects_in_range::<MovingKind>(road, lane, s, backward, forward)
            .into_iter()
            .filter_map(|hit| self.agent_of(hit))
            .collect()
    }

    fn next_stationary_object_in_lane(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        max: f64,
    ) -> Option<ObjectId> {
        self.data
            .next_object_in_lane::<StationaryKind>(road, lane, s, max)
            .map(|hit| hit.handle.id())
    }

    fn distance_to_end_of_lane(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        max: f64,
        types: &[LaneType],
    ) -> f64 {
        self.data.distance_to_end_of_lane(road, lane, s, max, types)
    }

    fn lane_width(&self, road: &str, lane: i32, s: f64) -> Option<f64> {
        self.data.lane_width(road, lane, s)
    }

    fn lane_curvature(&self, road: &str, lane: i32, s: f64) -> Option<f64> {
        self.data.lane_curvature(road, lane, s)
    }

    fn lane_direction(&self, road: &str, lane: i32, s: f64) -> Option<f64> {
        self.data.lane_direction(road, lane, s)
    }

    fn traffic_signs_in_range(
        &self,
        road: &str,
        lane: i32,
        s: f64,
        range: f64,
    ) -> Vec<(SignSnapshot, f64)> {
        self.data
            .traffic_signs_in_range(road, lane, s, range)
            .into_iter()
            .map(|(sign, distance)| (SignSnapshot::from(sign), distance))
            .collect()
    }

    fn lateral_distance(&self, src: LanePosition<'_>, dst: LanePosition<'_>) -> Option<f64> {
        self.data.lateral_distance(src, dst)
    }

    fn query_lane(&self, road: &str, lane: i32, s: f64) -> Option<LaneInfo> {
        self.data.query_lane(road, lane, s)
    }

    fn query_lanes(&self, road: &str, s: f64) -> Vec<LaneInfo> {
        self.data.query_lanes(road, s)
    }

    fn sensor_view(&self, config: &SensorViewConfig, agent: AgentId) -> Option<SensorView> {
        let object = self.agents.get(agent)?.object;
        self.data.sensor_view(config, object)
    }
}
