//! World objects: the shared base, moving objects, stationary objects.
//!
//! Objects do not own domain semantics (who drives, what kind of vehicle).
//! They carry an [`ObjectLink`] back to whatever does: an agent id resolved
//! by the facade's registry, or the id of the scene object they came from.

use tw_core::{
    normalize_angle, AgentId, Dimension, IndicatorState, LaneId, ObjectId, Orientation, Position,
    RoadCoordinate, Vector2d,
};
use tw_network::LaneTouch;

// ── Handles and links ─────────────────────────────────────────────────────────

/// Non-owning back-reference from an object to its owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectLink {
    Agent(AgentId),
    /// Static object converted from the scene; holds the scene object id.
    SceneryObject(String),
    #[default]
    Unlinked,
}

impl ObjectLink {
    /// The linked agent, if this object belongs to one.
    #[inline]
    pub fn agent(&self) -> Option<AgentId> {
        match self {
            ObjectLink::Agent(id) => Some(*id),
            _ => None,
        }
    }
}

/// Typed reference to an object stored in a lane's assignment list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectHandle {
    Moving(ObjectId),
    Stationary(ObjectId),
}

impl ObjectHandle {
    #[inline]
    pub fn id(self) -> ObjectId {
        match self {
            ObjectHandle::Moving(id) | ObjectHandle::Stationary(id) => id,
        }
    }

    #[inline]
    pub fn is_moving(self) -> bool {
        matches!(self, ObjectHandle::Moving(_))
    }
}

// ── Object-kind filters ───────────────────────────────────────────────────────

/// Compile-time filter selecting which objects a lane search reports.
pub trait ObjectKind {
    fn accepts(handle: ObjectHandle) -> bool;
}

/// Moving objects only.
pub struct MovingKind;

/// Stationary objects only.
pub struct StationaryKind;

/// Every object.
pub struct AnyKind;

impl ObjectKind for MovingKind {
    #[inline]
    fn accepts(handle: ObjectHandle) -> bool {
        handle.is_moving()
    }
}

impl ObjectKind for StationaryKind {
    #[inline]
    fn accepts(handle: ObjectHandle) -> bool {
        !handle.is_moving()
    }
}

impl ObjectKind for AnyKind {
    #[inline]
    fn accepts(_: ObjectHandle) -> bool {
        true
    }
}

// ── WorldObject ───────────────────────────────────────────────────────────────

/// State common to every object placed in the world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldObject {
    pub id:          ObjectId,
    pub dimension:   Dimension,
    /// Absolute position of the reference point (the bounding-box centre).
    pub position:    Position,
    pub orientation: Orientation,
    pub link:        ObjectLink,
    /// Road-relative placement of the reference point; `None` off-road.
    pub(crate) road_coordinate: Option<RoadCoordinate>,
    /// Lane the reference point lies on.
    pub(crate) main_lane:       LaneId,
    /// Lane assignment list; rebuilt on every localization.
    pub(crate) touches:         Vec<LaneTouch>,
}

impl WorldObject {
    pub(crate) fn new(id: ObjectId, link: ObjectLink) -> Self {
        Self { id, link, main_lane: LaneId::INVALID, ..Self::default() }
    }

    #[inline]
    pub fn road_coordinate(&self) -> Option<&RoadCoordinate> {
        self.road_coordinate.as_ref()
    }

    #[inline]
    pub fn main_lane(&self) -> LaneId {
        self.main_lane
    }

    /// Lanes the object currently overlaps.
    #[inline]
    pub fn lanes(&self) -> impl Iterator<Item = LaneId> + '_ {
        self.touches.iter().map(|t| t.lane)
    }

    #[inline]
    pub fn touches(&self) -> &[LaneTouch] {
        &self.touches
    }

    /// The object's s-range on the road of `lane`, if it touches that lane.
    pub fn touch(&self, lane: LaneId) -> Option<&LaneTouch> {
        self.touches.iter().find(|t| t.lane == lane)
    }

    #[inline]
    pub fn is_on_road(&self) -> bool {
        !self.touches.is_empty()
    }

    /// Ground-plane corners of the bounding box.
    pub fn corners(&self) -> [Vector2d; 4] {
        self.dimension.corners(self.position.planar(), self.orientation.yaw)
    }

    /// Heading of the road at the reference point, in road direction.
    pub fn road_heading(&self) -> Option<f64> {
        self.road_coordinate
            .map(|rc| normalize_angle(self.orientation.yaw - rc.yaw))
    }

    pub(crate) fn unlocate(&mut self) {
        self.road_coordinate = None;
        self.main_lane = LaneId::INVALID;
        self.touches.clear();
    }
}

/// Shared access to the [`WorldObject`] part of every object type.
pub trait AsWorldObject {
    fn base(&self) -> &WorldObject;
    fn base_mut(&mut self) -> &mut WorldObject;

    #[inline]
    fn id(&self) -> ObjectId {
        self.base().id
    }
}

// ── MovingObject ──────────────────────────────────────────────────────────────

/// Lighting state of a vehicle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lights {
    pub indicator:  IndicatorState,
    pub brake:      bool,
    pub head_light: bool,
    pub high_beam:  bool,
}

/// An object that moves: created at agent spawn, erased at agent removal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovingObject {
    pub base:         WorldObject,
    /// Absolute velocity.
    pub velocity:     Vector2d,
    /// Absolute acceleration.
    pub acceleration: Vector2d,
    pub yaw_rate:     f64,
    pub pitch_rate:   f64,
    pub roll_rate:    f64,
    pub lights:       Lights,
}

impl MovingObject {
    pub(crate) fn new(id: ObjectId, link: ObjectLink) -> Self {
        Self { base: WorldObject::new(id, link), ..Self::default() }
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Velocity projected onto the road direction at the reference point.
    /// Off-road it is projected onto the object's own heading.
    pub fn velocity_in_road_direction(&self) -> f64 {
        self.project_on_road(self.velocity)
    }

    /// Acceleration projected like
    /// [`velocity_in_road_direction`](Self::velocity_in_road_direction).
    pub fn acceleration_in_road_direction(&self) -> f64 {
        self.project_on_road(self.acceleration)
    }

    fn project_on_road(&self, v: Vector2d) -> f64 {
        let heading = self.base.road_heading().unwrap_or(self.base.orientation.yaw);
        v.dot(Vector2d::from_heading(heading))
    }
}

impl AsWorldObject for MovingObject {
    #[inline]
    fn base(&self) -> &WorldObject {
        &self.base
    }

    #[inline]
    fn base_mut(&mut self) -> &mut WorldObject {
        &mut self.base
    }
}

// ── StationaryObject ──────────────────────────────────────────────────────────

/// An immobile obstacle; lives until the next full clear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationaryObject {
    pub base: WorldObject,
}

impl StationaryObject {
    pub(crate) fn new(id: ObjectId, link: ObjectLink) -> Self {
        Self { base: WorldObject::new(id, link) }
    }
}

impl AsWorldObject for StationaryObject {
    #[inline]
    fn base(&self) -> &WorldObject {
        &self.base
    }

    #[inline]
    fn base_mut(&mut self) -> &mut WorldObject {
        &mut self.base
    }
}
