//! Fluent construction of [`SceneryRoad`]s.
//!
//! Parser collaborators usually fill the structs directly; the builder is
//! for hand-made scenes (tests, synthetic benchmarks).
//!
//! # Example
//!
//! ```
//! use tw_core::LaneType;
//! use tw_scenery::{ContactPoint, RoadBuilder};
//!
//! let road = RoadBuilder::new("A")
//!     .line(0.0, 0.0, 0.0, 50.0)
//!     .section(0.0)
//!     .lane(-1, LaneType::Driving, 3.5)
//!     .lane_successors(-1, &[-1])
//!     .successor_road("B", ContactPoint::Start)
//!     .build();
//! assert_eq!(road.length(), 50.0);
//! assert_eq!(road.lane_sections[0].lanes[&-1].successors, vec![-1]);
//! ```

use tw_core::{Dimension, LaneType, TrafficSignType};

use crate::{
    ContactPoint, ElementType, GeometryKind, LinkType, Polynomial, RoadGeometry, RoadLane,
    RoadLaneSection, RoadLink, RoadObject, RoadSignal, SceneryRoad,
};

pub struct RoadBuilder {
    road: SceneryRoad,
}

impl RoadBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self { road: SceneryRoad { id: id.into(), ..SceneryRoad::default() } }
    }

    /// Mark the road as a connecting road of `junction`.
    pub fn in_junction(mut self, junction: impl Into<String>) -> Self {
        self.road.junction = Some(junction.into());
        self
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Append a geometry segment starting where the previous one ends.
    pub fn geometry(mut self, x: f64, y: f64, heading: f64, length: f64, kind: GeometryKind) -> Self {
        let s = self.road.length();
        self.road.geometries.push(RoadGeometry { s, x, y, heading, length, kind });
        self
    }

    pub fn line(self, x: f64, y: f64, heading: f64, length: f64) -> Self {
        self.geometry(x, y, heading, length, GeometryKind::Line)
    }

    pub fn arc(self, x: f64, y: f64, heading: f64, length: f64, curvature: f64) -> Self {
        self.geometry(x, y, heading, length, GeometryKind::Arc { curvature })
    }

    pub fn elevation(mut self, poly: Polynomial) -> Self {
        self.road.elevations.push(poly);
        self
    }

    pub fn lane_offset(mut self, poly: Polynomial) -> Self {
        self.road.lane_offsets.push(poly);
        self
    }

    // ── Lane sections ─────────────────────────────────────────────────────

    /// Open a new lane section at road coordinate `start`.  Subsequent lane
    /// calls apply to it.
    pub fn section(mut self, start: f64) -> Self {
        self.road.lane_sections.push(RoadLaneSection { start, ..RoadLaneSection::default() });
        self
    }

    /// Add a lane of constant `width` to the current section.
    pub fn lane(mut self, id: i32, lane_type: LaneType, width: f64) -> Self {
        let lane = RoadLane {
            id,
            lane_type,
            widths: vec![Polynomial::constant(0.0, width)],
            ..RoadLane::default()
        };
        self.current_section().lanes.insert(id, lane);
        self
    }

    /// Replace the width segments of lane `id` in the current section.
    pub fn lane_widths(mut self, id: i32, widths: Vec<Polynomial>) -> Self {
        if let Some(lane) = self.current_section().lanes.get_mut(&id) {
            lane.widths = widths;
        }
        self
    }

    pub fn lane_predecessors(mut self, id: i32, predecessors: &[i32]) -> Self {
        if let Some(lane) = self.current_section().lanes.get_mut(&id) {
            lane.predecessors = predecessors.to_vec();
        }
        self
    }

    pub fn lane_successors(mut self, id: i32, successors: &[i32]) -> Self {
        if let Some(lane) = self.current_section().lanes.get_mut(&id) {
            lane.successors = successors.to_vec();
        }
        self
    }

    fn current_section(&mut self) -> &mut RoadLaneSection {
        if self.road.lane_sections.is_empty() {
            self.road.lane_sections.push(RoadLaneSection::default());
        }
        let last = self.road.lane_sections.len() - 1;
        &mut self.road.lane_sections[last]
    }

    // ── Links ─────────────────────────────────────────────────────────────

    pub fn link(
        mut self,
        link_type: LinkType,
        element_type: ElementType,
        element_id: impl Into<String>,
        contact_point: ContactPoint,
    ) -> Self {
        self.road.links.push(RoadLink {
            link_type,
            element_type,
            element_id: element_id.into(),
            contact_point,
        });
        self
    }

    pub fn successor_road(self, road: impl Into<String>, contact: ContactPoint) -> Self {
        self.link(LinkType::Successor, ElementType::Road, road, contact)
    }

    pub fn predecessor_road(self, road: impl Into<String>, contact: ContactPoint) -> Self {
        self.link(LinkType::Predecessor, ElementType::Road, road, contact)
    }

    pub fn successor_junction(self, junction: impl Into<String>) -> Self {
        self.link(LinkType::Successor, ElementType::Junction, junction, ContactPoint::Start)
    }

    pub fn predecessor_junction(self, junction: impl Into<String>) -> Self {
        self.link(LinkType::Predecessor, ElementType::Junction, junction, ContactPoint::Start)
    }

    // ── Signals and objects ───────────────────────────────────────────────

    pub fn signal(
        mut self,
        id: impl Into<String>,
        s: f64,
        t: f64,
        sign_type: TrafficSignType,
        value: f64,
        valid_lanes: &[i32],
    ) -> Self {
        self.road.signals.push(RoadSignal {
            id: id.into(),
            s,
            t,
            sign_type,
            value,
            valid_lanes: valid_lanes.to_vec(),
        });
        self
    }

    pub fn object(mut self, id: impl Into<String>, s: f64, t: f64, dimension: Dimension) -> Self {
        self.road.objects.push(RoadObject {
            id: id.into(),
            s,
            t,
            z_offset: 0.0,
            dimension,
            heading: 0.0,
            pitch: 0.0,
            roll: 0.0,
        });
        self
    }

    pub fn build(self) -> SceneryRoad {
        self.road
    }
}
