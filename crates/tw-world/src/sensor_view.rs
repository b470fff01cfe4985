//! Sector-filtered ground-truth snapshot for sensor components.

use std::f64::consts::TAU;

use tw_core::{
    normalize_angle, Dimension, LaneId, ObjectId, Orientation, Position, RoadCoordinate, RoadId,
    TrafficSignType, Vector2d,
};

use crate::{LaneInfo, MovingObject, Sector, TrafficSign, WorldData, WorldObject};

/// Sensor mounting and field of view.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorViewConfig {
    /// Mounting position in the host frame (x forward, y left).
    pub mounting:     Vector2d,
    /// Mounting yaw relative to the host heading.
    pub mounting_yaw: f64,
    /// Horizontal opening angle; `2π` or more sees all around.
    pub fov:          f64,
    pub range:        f64,
}

impl Default for SensorViewConfig {
    fn default() -> Self {
        Self { mounting: Vector2d::ZERO, mounting_yaw: 0.0, fov: TAU, range: 100.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectSnapshot {
    pub id:              ObjectId,
    pub position:        Position,
    pub orientation:     Orientation,
    pub dimension:       Dimension,
    pub velocity:        Vector2d,
    pub road_coordinate: Option<RoadCoordinate>,
    pub lanes:           Vec<LaneId>,
}

impl ObjectSnapshot {
    fn of(base: &WorldObject, velocity: Vector2d) -> Self {
        Self {
            id: base.id,
            position: base.position,
            orientation: base.orientation,
            dimension: base.dimension,
            velocity,
            road_coordinate: base.road_coordinate().copied(),
            lanes: base.lanes().collect(),
        }
    }

    fn of_moving(object: &MovingObject) -> Self {
        Self::of(&object.base, object.velocity)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignSnapshot {
    pub id:        ObjectId,
    pub sign_type: TrafficSignType,
    pub value:     f64,
    pub position:  Vector2d,
    pub road:      RoadId,
    pub s:         f64,
}

impl From<&TrafficSign> for SignSnapshot {
    fn from(sign: &TrafficSign) -> Self {
        Self {
            id: sign.id,
            sign_type: sign.sign_type,
            value: sign.value,
            position: sign.position,
            road: sign.road,
            s: sign.s,
        }
    }
}

/// What a sensor mounted on `host` perceives.  The host itself is always
/// among `moving_objects`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorView {
    pub host:               ObjectId,
    /// Sensor position in world coordinates.
    pub origin:             Vector2d,
    /// Sensor heading in world coordinates.
    pub heading:            f64,
    pub moving_objects:     Vec<ObjectSnapshot>,
    pub stationary_objects: Vec<ObjectSnapshot>,
    pub traffic_signs:      Vec<SignSnapshot>,
    pub lanes:              Vec<LaneInfo>,
}

impl WorldData {
    /// Snapshot of everything inside the sensor sector of moving object
    /// `host`.  `None` if the host does not exist.
    pub fn sensor_view(&self, config: &SensorViewConfig, host: ObjectId) -> Option<SensorView> {
        let host_object = self.moving_object(host)?;
        let yaw = host_object.base.orientation.yaw;
        let origin = host_object.base.position.planar() + config.mounting.rotate(yaw);
        let heading = normalize_angle(yaw + config.mounting_yaw);

        let sector = if config.fov >= TAU {
            Sector::circle(origin, config.range)
        } else {
            let half = config.fov * 0.5;
            Sector::new(origin, config.range, heading + half, heading - half)
        };

        let mut view = SensorView {
            host,
            origin,
            heading,
            moving_objects: Vec::new(),
            stationary_objects: Vec::new(),
            traffic_signs: Vec::new(),
            lanes: Vec::new(),
        };

        if let Some(sector) = sector {
            let visible = |base: &WorldObject| sector.contains(base.position.planar());
            view.moving_objects = self
                .moving_objects()
                .filter(|o| visible(&o.base))
                .map(ObjectSnapshot::of_moving)
                .collect();
            view.stationary_objects = self
                .stationary_objects()
                .filter(|o| visible(&o.base))
                .map(|o| ObjectSnapshot::of(&o.base, Vector2d::ZERO))
                .collect();
            view.traffic_signs = self
                .traffic_signs()
                .filter(|s| sector.contains(s.position))
                .map(SignSnapshot::from)
                .collect();
            view.lanes = self
                .network()
                .lanes()
                .filter(|lane| lane.joints().iter().any(|j| sector.contains(j.center)))
                .filter_map(|lane| self.lane_info(lane.id()))
                .collect();
        }

        if !view.moving_objects.iter().any(|o| o.id == host) {
            view.moving_objects.insert(0, ObjectSnapshot::of_moving(host_object));
        }
        Some(view)
    }
}
