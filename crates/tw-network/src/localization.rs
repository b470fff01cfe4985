//! Point-to-lane localization.
//!
//! Every pair of consecutive geometry joints of a lane spans a quad
//! `left0 → left1 → right1 → right0`.  The quads are bulk-loaded into an
//! R-tree keyed by their bounding boxes.  A point query collects the boxes
//! containing the point, then runs an exact point-in-quad test; a footprint
//! query collects the boxes overlapping the object's envelope and clips the
//! object box against each quad.

use rstar::{RTree, RTreeObject, AABB};

use tw_core::{LaneId, RoadId, Vector2d};

use crate::{GeometryJoint, RoadNetwork};

const EPS: f64 = 1e-9;
/// Overlaps below this area (m²) are edge contacts, not occupancy.
const AREA_EPS: f64 = 1e-6;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct LaneElement {
    lane:    LaneId,
    /// left0, left1, right1, right0.
    corners: [Vector2d; 4],
    center0: Vector2d,
    center1: Vector2d,
    s0:      f64,
    s1:      f64,
}

impl LaneElement {
    fn new(lane: LaneId, a: &GeometryJoint, b: &GeometryJoint) -> Self {
        Self {
            lane,
            corners: [a.left, b.left, b.right, a.right],
            center0: a.center,
            center1: b.center,
            s0: a.s,
            s1: b.s,
        }
    }

    fn contains(&self, p: Vector2d) -> bool {
        let [a, b, c, d] = self.corners;
        in_triangle(p, a, b, c) || in_triangle(p, a, c, d)
    }

    /// Road coordinate `s` and lateral offset `t` from the lane centre line
    /// (positive to the left in road direction).
    fn project(&self, p: Vector2d) -> (f64, f64) {
        let axis = self.center1 - self.center0;
        let len_sq = axis.dot(axis);
        if len_sq < EPS {
            return (self.s0, 0.0);
        }
        let rel = p - self.center0;
        let f = (rel.dot(axis) / len_sq).clamp(0.0, 1.0);
        let t = axis.cross(rel) / len_sq.sqrt();
        (self.s0 + f * (self.s1 - self.s0), t)
    }
}

impl RTreeObject for LaneElement {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (mut min, mut max) = ([f64::MAX; 2], [f64::MIN; 2]);
        for c in self.corners {
            min = [min[0].min(c.x), min[1].min(c.y)];
            max = [max[0].max(c.x), max[1].max(c.y)];
        }
        AABB::from_corners(min, max)
    }
}

/// Signed shoelace area, positive for counter-clockwise winding.
fn signed_area(poly: &[Vector2d]) -> f64 {
    let n = poly.len();
    (0..n).map(|i| poly[i].cross(poly[(i + 1) % n])).sum::<f64>() * 0.5
}

fn centroid(poly: &[Vector2d]) -> Vector2d {
    let sum = poly.iter().fold(Vector2d::ZERO, |acc, &p| acc + p);
    sum * (1.0 / poly.len() as f64)
}

/// Sutherland–Hodgman: the part of `subject` inside the convex polygon
/// `clip`.  Either winding of `clip` is accepted.
fn clip_convex(subject: &[Vector2d], clip: &[Vector2d]) -> Vec<Vector2d> {
    let winding = signed_area(clip).signum();
    let mut output: Vec<Vector2d> = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let (a, b) = (clip[i], clip[(i + 1) % clip.len()]);
        let side = |p: Vector2d| winding * (b - a).cross(p - a);
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let (p, q) = (input[j], input[(j + 1) % input.len()]);
            let (dp, dq) = (side(p), side(q));
            if dp >= 0.0 {
                output.push(p);
            }
            if (dp >= 0.0) != (dq >= 0.0) {
                output.push(p + (q - p) * (dp / (dp - dq)));
            }
        }
    }
    output
}

/// Inclusive point-in-triangle test, independent of winding.
fn in_triangle(p: Vector2d, a: Vector2d, b: Vector2d, c: Vector2d) -> bool {
    let d1 = (b - a).cross(p - a);
    let d2 = (c - b).cross(p - b);
    let d3 = (a - c).cross(p - c);
    let has_neg = d1 < -EPS || d2 < -EPS || d3 < -EPS;
    let has_pos = d1 > EPS || d2 > EPS || d3 > EPS;
    !(has_neg && has_pos)
}

// ── Results ───────────────────────────────────────────────────────────────────

/// A lane containing a queried point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaneHit {
    pub lane: LaneId,
    pub road: RoadId,
    /// Road coordinate.
    pub s:    f64,
    /// Lateral offset from the lane centre, positive to the left.
    pub t:    f64,
}

/// A lane touched by an object footprint, with the s-range the object
/// covers on the lane's road.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaneTouch {
    pub lane:    LaneId,
    pub s_start: f64,
    pub s_end:   f64,
}

/// Result of [`Localizer::locate_footprint`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Footprint {
    /// Where the reference point lies.  Falls back to the centre of the
    /// largest lane overlap when the reference point itself is off-road.
    pub reference: Option<LaneHit>,
    pub touches:   Vec<LaneTouch>,
}

impl Footprint {
    #[inline]
    pub fn is_on_road(&self) -> bool {
        !self.touches.is_empty()
    }
}

// ── Localizer ─────────────────────────────────────────────────────────────────

/// Spatial index over the sampled lane geometry of a network.
#[derive(Default)]
pub struct Localizer {
    tree: RTree<LaneElement>,
}

impl Localizer {
    pub fn new(network: &RoadNetwork) -> Self {
        let elements: Vec<LaneElement> = network
            .lanes()
            .flat_map(|lane| {
                lane.joints()
                    .windows(2)
                    .map(move |pair| LaneElement::new(lane.id(), &pair[0], &pair[1]))
            })
            .collect();
        Self { tree: RTree::bulk_load(elements) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Every lane containing `point`, one hit per lane.
    pub fn locate(&self, network: &RoadNetwork, point: Vector2d) -> Vec<LaneHit> {
        let envelope = AABB::from_point([point.x, point.y]);
        let mut hits: Vec<LaneHit> = Vec::new();
        for element in self.tree.locate_in_envelope_intersecting(&envelope) {
            if !element.contains(point) || hits.iter().any(|h| h.lane == element.lane) {
                continue;
            }
            let (s, t) = element.project(point);
            hits.push(LaneHit { lane: element.lane, road: network.lane(element.lane).road(), s, t });
        }
        hits.sort_by_key(|h| h.lane);
        hits
    }

    /// Locate an object given its reference point and ground corners.
    ///
    /// The box is clipped against every lane element whose envelope it
    /// overlaps.  A lane is touched when the clipped area is positive, and
    /// its s-range spans the clipped polygon projected onto the lane.  A box
    /// without area is located as a single point.
    pub fn locate_footprint(
        &self,
        network: &RoadNetwork,
        reference: Vector2d,
        corners: &[Vector2d],
    ) -> Footprint {
        if corners.len() < 3 || signed_area(corners).abs() < AREA_EPS {
            let hits = self.locate(network, reference);
            let touches = hits
                .iter()
                .map(|h| LaneTouch { lane: h.lane, s_start: h.s, s_end: h.s })
                .collect();
            return Footprint { reference: hits.first().copied(), touches };
        }

        let (mut min, mut max) = ([f64::MAX; 2], [f64::MIN; 2]);
        for c in corners {
            min = [min[0].min(c.x), min[1].min(c.y)];
            max = [max[0].max(c.x), max[1].max(c.y)];
        }
        let envelope = AABB::from_corners(min, max);

        let mut touches: Vec<LaneTouch> = Vec::new();
        let mut largest: Option<(f64, &LaneElement, Vector2d)> = None;
        for element in self.tree.locate_in_envelope_intersecting(&envelope) {
            let overlap = clip_convex(&element.corners, corners);
            let area = signed_area(&overlap).abs();
            if overlap.len() < 3 || area < AREA_EPS {
                continue;
            }

            let (mut s_start, mut s_end) = (f64::MAX, f64::MIN);
            for &p in &overlap {
                let (s, _) = element.project(p);
                s_start = s_start.min(s);
                s_end = s_end.max(s);
            }
            match touches.iter_mut().find(|t| t.lane == element.lane) {
                Some(touch) => {
                    touch.s_start = touch.s_start.min(s_start);
                    touch.s_end = touch.s_end.max(s_end);
                }
                None => touches.push(LaneTouch { lane: element.lane, s_start, s_end }),
            }

            if largest.is_none_or(|(best, _, _)| area > best) {
                largest = Some((area, element, centroid(&overlap)));
            }
        }
        touches.sort_by_key(|t| t.lane);

        let reference_hit = self.locate(network, reference).into_iter().next().or_else(|| {
            largest.map(|(_, element, center)| {
                let (s, t) = element.project(center);
                LaneHit { lane: element.lane, road: network.lane(element.lane).road(), s, t }
            })
        });

        Footprint { reference: reference_hit, touches }
    }
}
