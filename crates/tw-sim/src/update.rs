//! Deferred agent mutations.
//!
//! Components read a consistent world during a step and only request
//! changes.  Requests are queued here and applied in FIFO order at
//! [`World::sync_global_data`](crate::World::sync_global_data).

use std::collections::VecDeque;
use std::fmt;

use tw_core::{AgentId, IndicatorState, Orientation, Position, Vector2d};
use tw_world::MovingObject;

/// A change to one agent's moving object.
pub enum AgentUpdate {
    Pose { position: Position, orientation: Orientation },
    Velocity(Vector2d),
    Acceleration(Vector2d),
    YawRate(f64),
    Indicator(IndicatorState),
    Brake(bool),
    HeadLight(bool),
    HighBeam(bool),
    /// Arbitrary mutation for changes the tagged variants do not cover.
    Custom(Box<dyn FnOnce(&mut MovingObject) + Send>),
}

impl AgentUpdate {
    /// Wrap a closure as an update.
    pub fn custom(f: impl FnOnce(&mut MovingObject) + Send + 'static) -> Self {
        AgentUpdate::Custom(Box::new(f))
    }

    pub fn apply(self, object: &mut MovingObject) {
        match self {
            AgentUpdate::Pose { position, orientation } => {
                object.base.position = position;
                object.base.orientation = orientation;
            }
            AgentUpdate::Velocity(v)     => object.velocity = v,
            AgentUpdate::Acceleration(a) => object.acceleration = a,
            AgentUpdate::YawRate(r)      => object.yaw_rate = r,
            AgentUpdate::Indicator(i)    => object.lights.indicator = i,
            AgentUpdate::Brake(on)       => object.lights.brake = on,
            AgentUpdate::HeadLight(on)   => object.lights.head_light = on,
            AgentUpdate::HighBeam(on)    => object.lights.high_beam = on,
            AgentUpdate::Custom(f)       => f(object),
        }
    }
}

impl fmt::Debug for AgentUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentUpdate::Pose { position, orientation } => f
                .debug_struct("Pose")
                .field("position", position)
                .field("orientation", orientation)
                .finish(),
            AgentUpdate::Velocity(v)     => f.debug_tuple("Velocity").field(v).finish(),
            AgentUpdate::Acceleration(a) => f.debug_tuple("Acceleration").field(a).finish(),
            AgentUpdate::YawRate(r)      => f.debug_tuple("YawRate").field(r).finish(),
            AgentUpdate::Indicator(i)    => f.debug_tuple("Indicator").field(i).finish(),
            AgentUpdate::Brake(on)       => f.debug_tuple("Brake").field(on).finish(),
            AgentUpdate::HeadLight(on)   => f.debug_tuple("HeadLight").field(on).finish(),
            AgentUpdate::HighBeam(on)    => f.debug_tuple("HighBeam").field(on).finish(),
            AgentUpdate::Custom(_)       => f.write_str("Custom(..)"),
        }
    }
}

/// One queued request.
#[derive(Debug)]
pub enum Request {
    Update(AgentId, AgentUpdate),
    Remove(AgentId),
}

impl Request {
    #[inline]
    pub fn agent(&self) -> AgentId {
        match self {
            Request::Update(agent, _) | Request::Remove(agent) => *agent,
        }
    }
}

/// FIFO of pending requests.
#[derive(Debug, Default)]
pub struct UpdateQueue {
    pending: VecDeque<Request>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_update(&mut self, agent: AgentId, update: AgentUpdate) {
        self.pending.push_back(Request::Update(agent, update));
    }

    pub fn push_remove(&mut self, agent: AgentId) {
        self.pending.push_back(Request::Remove(agent));
    }

    /// Take every pending request, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Request> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
