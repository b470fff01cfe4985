//! Agent registry: resolves the typed back-reference stored in a moving
//! object's [`ObjectLink`](tw_world::ObjectLink) to the agent it belongs to.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use tw_core::{AgentId, Dimension, ObjectId, Orientation, Position};

// ── Blueprint ─────────────────────────────────────────────────────────────────

/// Where a new agent appears.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// On a lane: `t` is the lateral offset from the lane centre and `yaw`
    /// the heading relative to the lane's stream direction.
    Lane { road: String, lane: i32, s: f64, t: f64, yaw: f64 },
    /// Absolute pose.
    Pose { position: Position, orientation: Orientation },
}

/// Everything needed to spawn an agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentBlueprint {
    pub name:      String,
    pub dimension: Dimension,
    pub placement: Placement,
    /// Initial speed along the agent's heading.
    pub speed:     f64,
}

impl AgentBlueprint {
    /// A blueprint for a standing agent on lane `lane` of `road` at `s`.
    pub fn on_lane(name: impl Into<String>, road: impl Into<String>, lane: i32, s: f64) -> Self {
        Self {
            name:      name.into(),
            dimension: Dimension::new(4.5, 1.8, 1.5),
            placement: Placement::Lane { road: road.into(), lane, s, t: 0.0, yaw: 0.0 },
            speed:     0.0,
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// A registered agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:     AgentId,
    pub name:   String,
    /// The moving object representing the agent in the world.
    pub object: ObjectId,
}

#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents:    BTreeMap<AgentId, Agent>,
    by_object: FxHashMap<ObjectId, AgentId>,
    next_id:   u32,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent backed by `object` and return its fresh id.
    pub fn register(&mut self, name: impl Into<String>, object: ObjectId) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        self.agents.insert(id, Agent { id, name: name.into(), object });
        self.by_object.insert(object, id);
        id
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let agent = self.agents.remove(&id)?;
        self.by_object.remove(&agent.object);
        Some(agent)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// The agent owning moving object `object`.
    #[inline]
    pub fn agent_of(&self, object: ObjectId) -> Option<AgentId> {
        self.by_object.get(&object).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Forget every agent and restart ids at zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
