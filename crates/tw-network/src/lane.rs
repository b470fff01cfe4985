//! The `Lane` entity and its sampled geometry.
//!
//! Links (`successors` / `predecessors`) are stored in the frame of the road
//! description, i.e. "successor" means "further along increasing s".  The
//! `in_stream_direction` flag says whether that frame agrees with the lane
//! stream's forward direction; [`Lane::stream_next`] applies the correction
//! so traversal code never has to.

use tw_core::{normalize_angle, LaneId, LaneType, RoadId, SectionId, Vector2d};

/// Sentinel returned for unknown lane ids.  `exists()` is `false`, every
/// neighbour/link is empty, and length is zero.
pub(crate) static INVALID_LANE: Lane = Lane::invalid();

// ── GeometryJoint ─────────────────────────────────────────────────────────────

/// One geometry sample across a lane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryJoint {
    /// Road coordinate of the sample.
    pub s:         f64,
    pub left:      Vector2d,
    pub center:    Vector2d,
    pub right:     Vector2d,
    pub elevation: f64,
    pub width:     f64,
    pub curvature: f64,
    /// Heading of the reference line in road direction.
    pub heading:   f64,
}

/// Geometry interpolated between two joints.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointSample {
    pub center:    Vector2d,
    pub elevation: f64,
    pub width:     f64,
    pub curvature: f64,
    pub heading:   f64,
}

#[inline]
fn lerp(a: f64, b: f64, f: f64) -> f64 {
    a + (b - a) * f
}

impl JointSample {
    fn between(a: &GeometryJoint, b: &GeometryJoint, s: f64) -> Self {
        let span = b.s - a.s;
        let f = if span > 0.0 { ((s - a.s) / span).clamp(0.0, 1.0) } else { 0.0 };
        Self {
            center:    a.center + (b.center - a.center) * f,
            elevation: lerp(a.elevation, b.elevation, f),
            width:     lerp(a.width, b.width, f),
            curvature: lerp(a.curvature, b.curvature, f),
            heading:   normalize_angle(a.heading + normalize_angle(b.heading - a.heading) * f),
        }
    }

    fn at(j: &GeometryJoint) -> Self {
        Self {
            center:    j.center,
            elevation: j.elevation,
            width:     j.width,
            curvature: j.curvature,
            heading:   j.heading,
        }
    }
}

// ── Lane ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Lane {
    pub(crate) id:                  LaneId,
    pub(crate) section:             SectionId,
    pub(crate) road:                RoadId,
    pub(crate) odr_id:              i32,
    pub(crate) lane_type:           LaneType,
    pub(crate) left:                LaneId,
    pub(crate) right:               LaneId,
    pub(crate) successors:          Vec<LaneId>,
    pub(crate) predecessors:        Vec<LaneId>,
    pub(crate) in_stream_direction: bool,
    pub(crate) stream_id:           LaneId,
    pub(crate) joints:              Vec<GeometryJoint>,
    /// Start of the owning section; the lane's s-range begins here until
    /// geometry has been added.
    pub(crate) section_start:       f64,
}

impl Lane {
    const fn invalid() -> Self {
        Self {
            id:                  LaneId::INVALID,
            section:             SectionId::INVALID,
            road:                RoadId::INVALID,
            odr_id:              0,
            lane_type:           LaneType::Undefined,
            left:                LaneId::INVALID,
            right:               LaneId::INVALID,
            successors:          Vec::new(),
            predecessors:        Vec::new(),
            in_stream_direction: true,
            stream_id:           LaneId::INVALID,
            joints:              Vec::new(),
            section_start:       0.0,
        }
    }

    pub(crate) fn new(
        id: LaneId,
        section: SectionId,
        road: RoadId,
        odr_id: i32,
        lane_type: LaneType,
        in_stream_direction: bool,
        section_start: f64,
    ) -> Self {
        Self {
            id,
            section,
            road,
            odr_id,
            lane_type,
            in_stream_direction,
            stream_id: id,
            section_start,
            ..Self::invalid()
        }
    }

    // ── Identity ──────────────────────────────────────────────────────────

    /// `false` only for the invalid-lane sentinel.
    #[inline]
    pub fn exists(&self) -> bool {
        self.id.is_valid()
    }

    #[inline]
    pub fn id(&self) -> LaneId {
        self.id
    }

    #[inline]
    pub fn section(&self) -> SectionId {
        self.section
    }

    #[inline]
    pub fn road(&self) -> RoadId {
        self.road
    }

    /// External (per-road, signed) id from the scene description.
    #[inline]
    pub fn odr_id(&self) -> i32 {
        self.odr_id
    }

    #[inline]
    pub fn lane_type(&self) -> LaneType {
        self.lane_type
    }

    /// Id of the first lane of this lane's forward chain.
    #[inline]
    pub fn stream_id(&self) -> LaneId {
        self.stream_id
    }

    // ── Topology ──────────────────────────────────────────────────────────

    /// Left neighbour in road direction, `LaneId::INVALID` if none.
    #[inline]
    pub fn left(&self) -> LaneId {
        self.left
    }

    /// Right neighbour in road direction, `LaneId::INVALID` if none.
    #[inline]
    pub fn right(&self) -> LaneId {
        self.right
    }

    #[inline]
    pub fn successors(&self) -> &[LaneId] {
        &self.successors
    }

    #[inline]
    pub fn predecessors(&self) -> &[LaneId] {
        &self.predecessors
    }

    #[inline]
    pub fn in_stream_direction(&self) -> bool {
        self.in_stream_direction
    }

    /// Lanes following this one in stream direction.
    #[inline]
    pub fn stream_next(&self) -> &[LaneId] {
        if self.in_stream_direction { &self.successors } else { &self.predecessors }
    }

    /// Lanes preceding this one in stream direction.
    #[inline]
    pub fn stream_previous(&self) -> &[LaneId] {
        if self.in_stream_direction { &self.predecessors } else { &self.successors }
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn joints(&self) -> &[GeometryJoint] {
        &self.joints
    }

    /// Road coordinate of the first joint.
    #[inline]
    pub fn start_s(&self) -> f64 {
        self.joints.first().map_or(self.section_start, |j| j.s)
    }

    /// Road coordinate of the last joint.
    #[inline]
    pub fn end_s(&self) -> f64 {
        self.start_s() + self.length()
    }

    /// Last joint's s-offset minus the first.
    #[inline]
    pub fn length(&self) -> f64 {
        match (self.joints.first(), self.joints.last()) {
            (Some(first), Some(last)) => last.s - first.s,
            _ => 0.0,
        }
    }

    /// Distance of road coordinate `s` from the edge where the stream
    /// enters this lane.
    #[inline]
    pub fn stream_offset(&self, s: f64) -> f64 {
        if self.in_stream_direction { s - self.start_s() } else { self.end_s() - s }
    }

    /// Geometry at road coordinate `s`, linearly interpolated between the
    /// surrounding joints.  `None` outside the sampled range.
    pub fn interpolate(&self, s: f64) -> Option<JointSample> {
        const EPS: f64 = 1e-9;
        let first = self.joints.first()?;
        let last = self.joints.last()?;
        if s < first.s - EPS || s > last.s + EPS {
            return None;
        }
        let idx = self.joints.partition_point(|j| j.s <= s);
        Some(match idx {
            0 => JointSample::at(first),
            i if i == self.joints.len() => JointSample::at(last),
            i => JointSample::between(&self.joints[i - 1], &self.joints[i], s),
        })
    }

    #[inline]
    pub fn width(&self, s: f64) -> Option<f64> {
        self.interpolate(s).map(|j| j.width)
    }

    #[inline]
    pub fn curvature(&self, s: f64) -> Option<f64> {
        self.interpolate(s).map(|j| j.curvature)
    }

    /// Heading in stream direction at `s`.
    pub fn direction(&self, s: f64) -> Option<f64> {
        self.interpolate(s).map(|j| {
            if self.in_stream_direction {
                j.heading
            } else {
                normalize_angle(j.heading + std::f64::consts::PI)
            }
        })
    }
}
