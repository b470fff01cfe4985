//! Geometry converter: reference-line evaluation and lane sampling.
//!
//! Each road is sampled section by section and geometry segment by geometry
//! segment.  Within the overlap of a segment and a section the samples sit
//! at `lo, lo + step, lo + 2·step, …` and the overlap end is always added,
//! so no sample ever overshoots a segment.  A sample landing on a boundary
//! that the previous segment already produced is not repeated.
//!
//! At every sample the lateral layout is rebuilt from the reference line:
//!
//! ```text
//!   t  ▲   lane  2   outer = offset + w1 + w2
//!      │   lane  1   outer = offset + w1
//!  ────┼── offset (reference line shifted by the lane offset)
//!      │   lane -1   outer = offset - w-1
//!      │   lane -2   outer = offset - w-1 - w-2
//! ```
//!
//! Left lanes (positive ids) grow towards positive t, right lanes towards
//! negative t.  Left/right of a joint are always given in road direction.

use tw_core::Vector2d;
use tw_scenery::{active_polynomial, GeometryKind, RoadGeometry, SceneryRoad};

use crate::GeometryJoint;

const EPS: f64 = 1e-9;

// ── Reference line ────────────────────────────────────────────────────────────

/// A point on a road's reference line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReferencePoint {
    pub position:  Vector2d,
    pub heading:   f64,
    pub curvature: f64,
}

/// Evaluate `geometry` at `ds` past its start.  `ds` is clamped to the
/// segment.
pub fn evaluate_geometry(geometry: &RoadGeometry, ds: f64) -> ReferencePoint {
    let ds = ds.clamp(0.0, geometry.length.max(0.0));
    let origin = Vector2d::new(geometry.x, geometry.y);
    let h = geometry.heading;

    match geometry.kind {
        GeometryKind::Line => ReferencePoint {
            position:  origin + Vector2d::from_heading(h) * ds,
            heading:   h,
            curvature: 0.0,
        },
        GeometryKind::Arc { curvature } => arc(origin, h, curvature, ds),
        GeometryKind::Spiral { curv_start, curv_end } => {
            let rate = if geometry.length > EPS {
                (curv_end - curv_start) / geometry.length
            } else {
                0.0
            };
            spiral(origin, h, curv_start, rate, ds)
        }
        GeometryKind::Poly3 { a, b, c, d } => {
            // Arc length along the local u axis is taken as u itself.
            let u = ds;
            let v = a + u * (b + u * (c + u * d));
            let dv = b + u * (2.0 * c + u * 3.0 * d);
            let ddv = 2.0 * c + 6.0 * d * u;
            ReferencePoint {
                position:  origin + Vector2d::new(u, v).rotate(h),
                heading:   h + dv.atan(),
                curvature: ddv / (1.0 + dv * dv).powf(1.5),
            }
        }
        GeometryKind::ParamPoly3 { au, bu, cu, du, av, bv, cv, dv, normalized } => {
            let p = if normalized && geometry.length > EPS { ds / geometry.length } else { ds };
            let u = au + p * (bu + p * (cu + p * du));
            let v = av + p * (bv + p * (cv + p * dv));
            // Derivatives w.r.t. p; curvature does not depend on the
            // parametrisation.
            let du_dp = bu + p * (2.0 * cu + p * 3.0 * du);
            let dv_dp = bv + p * (2.0 * cv + p * 3.0 * dv);
            let ddu = 2.0 * cu + 6.0 * du * p;
            let ddv = 2.0 * cv + 6.0 * dv * p;
            let speed_sq = du_dp * du_dp + dv_dp * dv_dp;
            let curvature = if speed_sq > EPS {
                (du_dp * ddv - dv_dp * ddu) / speed_sq.powf(1.5)
            } else {
                0.0
            };
            ReferencePoint {
                position: origin + Vector2d::new(u, v).rotate(h),
                heading: h + dv_dp.atan2(du_dp),
                curvature,
            }
        }
    }
}

fn arc(origin: Vector2d, h: f64, k: f64, ds: f64) -> ReferencePoint {
    if k.abs() < EPS {
        return ReferencePoint {
            position:  origin + Vector2d::from_heading(h) * ds,
            heading:   h,
            curvature: 0.0,
        };
    }
    let end_heading = h + k * ds;
    let offset = Vector2d::new(
        (end_heading.sin() - h.sin()) / k,
        (h.cos() - end_heading.cos()) / k,
    );
    ReferencePoint { position: origin + offset, heading: end_heading, curvature: k }
}

/// Clothoid with curvature `k0 + rate·u`, integrated with Simpson's rule.
fn spiral(origin: Vector2d, h: f64, k0: f64, rate: f64, ds: f64) -> ReferencePoint {
    let heading_at = |u: f64| h + k0 * u + 0.5 * rate * u * u;

    // Even number of intervals, at most 0.25 long.
    let n = (((ds / 0.25).ceil() as usize).max(1)) * 2;
    let step = ds / n as f64;
    let mut sum = Vector2d::ZERO;
    for i in 0..=n {
        let weight = match i {
            0 => 1.0,
            i if i == n => 1.0,
            i if i % 2 == 1 => 4.0,
            _ => 2.0,
        };
        sum = sum + Vector2d::from_heading(heading_at(i as f64 * step)) * weight;
    }

    ReferencePoint {
        position:  origin + sum * (step / 3.0),
        heading:   heading_at(ds),
        curvature: k0 + rate * ds,
    }
}

/// Reference-line point at road coordinate `s`.
///
/// The active segment is the last one starting at or before `s`; `s` before
/// the first segment clamps to the road start, beyond the last to the road
/// end.  `None` for a road without geometry.
pub fn reference_point(road: &SceneryRoad, s: f64) -> Option<ReferencePoint> {
    let geometry = road
        .geometries
        .iter()
        .rev()
        .find(|g| g.s <= s + EPS)
        .or_else(|| road.geometries.first())?;
    Some(evaluate_geometry(geometry, s - geometry.s))
}

/// World position of road coordinate `(s, t)`, with `t` measured from the
/// reference line (not from the lane offset).
pub fn road_to_world(road: &SceneryRoad, s: f64, t: f64) -> Option<(Vector2d, f64)> {
    let p = reference_point(road, s)?;
    Some((p.position + Vector2d::left_normal(p.heading) * t, p.heading))
}

// ── Lane sampling ─────────────────────────────────────────────────────────────

/// A joint produced for one lane of one section.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneSample {
    /// Index of the section within the road.
    pub section: usize,
    /// External lane id.
    pub odr_id:  i32,
    pub joint:   GeometryJoint,
}

/// Sample positions along one road: `(section index, geometry, s)` in
/// increasing s order per section.
fn sample_positions(road: &SceneryRoad, step: f64) -> Vec<(usize, &RoadGeometry, f64)> {
    // A non-positive step samples segment ends only.
    let step = if step > EPS { step } else { f64::MAX };
    let mut out = Vec::new();
    for (index, section) in road.lane_sections.iter().enumerate() {
        let start = section.start;
        let end = start + road.section_length(index);
        let mut last: Option<f64> = None;

        for geometry in &road.geometries {
            let lo = geometry.s.max(start);
            let hi = geometry.end().min(end);
            if hi - lo <= EPS {
                continue;
            }
            let mut k = 0usize;
            loop {
                let s = lo + k as f64 * step;
                if s >= hi - EPS {
                    break;
                }
                if last.is_none_or(|prev| s > prev + EPS) {
                    out.push((index, geometry, s));
                    last = Some(s);
                }
                k += 1;
            }
            if last.is_none_or(|prev| hi > prev + EPS) {
                out.push((index, geometry, hi));
                last = Some(hi);
            }
        }
    }
    out
}

#[inline]
fn parallel_curvature(kappa: f64, t: f64) -> f64 {
    let denom = 1.0 - kappa * t;
    if denom.abs() < EPS { kappa } else { kappa / denom }
}

/// Sample every lane of `road` every `step` along s.
///
/// Lanes are processed innermost to outermost on each side so widths can be
/// accumulated.  The centre lane (id 0) carries no geometry.  Samples are
/// emitted in increasing s per lane.
pub fn sample_road(road: &SceneryRoad, step: f64) -> Vec<LaneSample> {
    let mut out = Vec::new();
    for (index, geometry, s) in sample_positions(road, step) {
        let section = &road.lane_sections[index];
        let ds_section = s - section.start;

        let reference = evaluate_geometry(geometry, s - geometry.s);
        let normal = Vector2d::left_normal(reference.heading);
        let offset = active_polynomial(&road.lane_offsets, s);
        let elevation = active_polynomial(&road.elevations, s);
        let at = |t: f64| reference.position + normal * t;

        let mut joint = |odr_id: i32, inner: f64, outer: f64, width: f64| {
            let center_t = 0.5 * (inner + outer);
            let (left_t, right_t) = if odr_id > 0 { (outer, inner) } else { (inner, outer) };
            out.push(LaneSample {
                section: index,
                odr_id,
                joint: GeometryJoint {
                    s,
                    left: at(left_t),
                    center: at(center_t),
                    right: at(right_t),
                    elevation,
                    width,
                    curvature: parallel_curvature(reference.curvature, center_t),
                    heading: reference.heading,
                },
            });
        };

        let mut inner = offset;
        for lane in section.lanes.range(1..).map(|(_, l)| l) {
            let width = lane.width(ds_section).max(0.0);
            joint(lane.id, inner, inner + width, width);
            inner += width;
        }

        let mut inner = offset;
        for lane in section.lanes.range(..0).rev().map(|(_, l)| l) {
            let width = lane.width(ds_section).max(0.0);
            joint(lane.id, inner, inner - width, width);
            inner -= width;
        }
    }
    out
}
