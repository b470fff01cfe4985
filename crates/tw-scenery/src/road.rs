//! Roads, their plan-view geometry, polynomial profiles, lane sections and
//! links.
//!
//! Conventions follow the common road-description format: `s` runs along the
//! reference line from the road start, lanes with positive external ids lie
//! left of the reference line, negative ids to the right, and id `0` is the
//! centre lane (a marking carrier with no width).

use std::collections::BTreeMap;

use tw_core::LaneType;

// ── Polynomials ───────────────────────────────────────────────────────────────

/// One cubic segment `a + b·ds + c·ds² + d·ds³`, valid from `s` until the
/// next segment of the same list starts.
///
/// For road-level lists (elevation, lane offset) `s` is absolute along the
/// road; for lane widths it is relative to the lane section start.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polynomial {
    pub s: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Polynomial {
    pub const fn constant(s: f64, a: f64) -> Self {
        Self { s, a, b: 0.0, c: 0.0, d: 0.0 }
    }

    /// Value at `ds` past the segment start.
    #[inline]
    pub fn evaluate(&self, ds: f64) -> f64 {
        self.a + ds * (self.b + ds * (self.c + ds * self.d))
    }
}

/// Evaluate a piecewise-cubic list at `offset`.
///
/// The active segment is the last one whose start is ≤ `offset`.  An empty
/// list, or an offset before the first segment, yields `0.0`.
pub fn active_polynomial(list: &[Polynomial], offset: f64) -> f64 {
    list.iter()
        .rev()
        .find(|p| p.s <= offset)
        .map_or(0.0, |p| p.evaluate(offset - p.s))
}

// ── Plan-view geometry ────────────────────────────────────────────────────────

/// Shape of one reference-line segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryKind {
    Line,
    Arc { curvature: f64 },
    /// Clothoid with linearly varying curvature.
    Spiral { curv_start: f64, curv_end: f64 },
    /// Cubic `v(u)` in the segment's local frame.
    Poly3 { a: f64, b: f64, c: f64, d: f64 },
    /// Parametric cubic `u(p)`, `v(p)`.  `normalized` selects p ∈ [0, 1]
    /// instead of p ∈ [0, length].
    ParamPoly3 {
        au: f64, bu: f64, cu: f64, du: f64,
        av: f64, bv: f64, cv: f64, dv: f64,
        normalized: bool,
    },
}

/// A reference-line segment starting at road coordinate `s`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadGeometry {
    pub s:       f64,
    pub x:       f64,
    pub y:       f64,
    pub heading: f64,
    pub length:  f64,
    pub kind:    GeometryKind,
}

impl RoadGeometry {
    /// Road coordinate where this segment ends.
    #[inline]
    pub fn end(&self) -> f64 {
        self.s + self.length
    }
}

// ── Lanes ─────────────────────────────────────────────────────────────────────

/// Painted marking along one lane border (carried through, not interpreted).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadMark {
    pub s_offset: f64,
    pub kind:     String,
    pub color:    String,
    pub width:    f64,
}

/// Lane descriptor inside one lane section.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadLane {
    /// External (per-road, signed) lane id.
    pub id:           i32,
    pub lane_type:    LaneType,
    /// External ids of predecessor lanes, in road direction.
    pub predecessors: Vec<i32>,
    /// External ids of successor lanes, in road direction.
    pub successors:   Vec<i32>,
    /// Width segments; `s` relative to the section start.
    pub widths:       Vec<Polynomial>,
    pub road_marks:   Vec<RoadMark>,
}

impl RoadLane {
    /// Width at `ds` past the section start.
    #[inline]
    pub fn width(&self, ds: f64) -> f64 {
        active_polynomial(&self.widths, ds)
    }
}

/// A stretch of road with a constant lane layout.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadLaneSection {
    /// Road coordinate where the section starts.
    pub start: f64,
    /// Lanes keyed by external id.  Id `0` (centre lane) may be present; it
    /// never becomes a network lane.
    pub lanes: BTreeMap<i32, RoadLane>,
}

// ── Links ─────────────────────────────────────────────────────────────────────

/// Which end of the owning road a link leaves from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkType {
    Predecessor,
    Successor,
    Neighbor,
}

/// What a link points at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    Road,
    Junction,
}

/// Which end of the target road is touched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactPoint {
    Start,
    End,
}

/// Road-level link to another road or a junction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadLink {
    pub link_type:     LinkType,
    pub element_type:  ElementType,
    pub element_id:    String,
    /// Meaningful for road targets only.
    pub contact_point: ContactPoint,
}

// ── SceneryRoad ───────────────────────────────────────────────────────────────

/// One road of the scene.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneryRoad {
    pub id:            String,
    /// Id of the junction this road is a connecting (path) road of.
    pub junction:      Option<String>,
    pub geometries:    Vec<RoadGeometry>,
    pub elevations:    Vec<Polynomial>,
    pub lane_offsets:  Vec<Polynomial>,
    pub lane_sections: Vec<RoadLaneSection>,
    pub links:         Vec<RoadLink>,
    pub signals:       Vec<crate::RoadSignal>,
    pub objects:       Vec<crate::RoadObject>,
}

impl SceneryRoad {
    /// Total reference-line length.
    pub fn length(&self) -> f64 {
        self.geometries.iter().map(|g| g.length).sum()
    }

    /// Length of lane section `index`: up to the next section start, or to
    /// the road end for the last section.
    pub fn section_length(&self, index: usize) -> f64 {
        let start = self.lane_sections[index].start;
        let end = self
            .lane_sections
            .get(index + 1)
            .map_or_else(|| self.length(), |next| next.start);
        (end - start).max(0.0)
    }

    /// Index of the lane section covering `s`.
    pub fn section_index_at(&self, s: f64) -> Option<usize> {
        if self.lane_sections.is_empty() {
            return None;
        }
        let idx = self.lane_sections.partition_point(|sec| sec.start <= s);
        Some(idx.saturating_sub(1))
    }

    /// `true` if this road is a connecting road inside a junction.
    #[inline]
    pub fn in_junction(&self) -> bool {
        self.junction.is_some()
    }

    /// The first link of the given type, if any.
    pub fn link(&self, link_type: LinkType) -> Option<&RoadLink> {
        self.links.iter().find(|l| l.link_type == link_type)
    }
}
