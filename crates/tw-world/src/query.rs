//! Read-only queries over a [`WorldData`].
//!
//! Every search walks a lane stream and is bounded twice: by the distance
//! the caller asks for and by the configured event horizon.  Distances are
//! measured in one running frame along the stream, so a window keeps its
//! meaning across section and road boundaries.
//!
//! Nothing here fails.  A lane that does not exist yields `None`, an empty
//! `Vec`, `0.0` or the invalid-lane sentinel, as documented per method.

use rustc_hash::FxHashSet;

use tw_core::{LaneId, LaneType, ObjectId, RoadId, Vector2d};
use tw_network::{stream_position, Lane, StreamDirection};

use crate::{ObjectHandle, ObjectKind, TrafficSign, WorldData};

// ── Query types ───────────────────────────────────────────────────────────────

/// A road position addressed by scene road id and external lane id.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LanePosition<'a> {
    pub road: &'a str,
    pub lane: i32,
    pub s:    f64,
    /// Lateral offset from the lane centre, positive to the left.
    pub t:    f64,
}

/// An object found by a lane search.
///
/// `start` and `end` are the object's extent in the search frame: metres
/// from the query position, positive in search direction.  Results of
/// [`WorldData::objects_in_range`] are signed in stream direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaneObject {
    pub handle: ObjectHandle,
    pub start:  f64,
    pub end:    f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneCategory {
    Regular,
    /// No driving lane of the same direction lies further right.
    Rightmost,
}

/// Detached lane metadata for consumers that must not hold references into
/// the store.
///
/// The validity bounds are measured from where the stream enters this lane:
/// `valid_from` is minus the distance back to the stream's first lane,
/// `valid_until` the distance to the end of its last.  A stream longer than
/// the event horizon reports infinity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneInfo {
    pub id:          LaneId,
    pub road:        RoadId,
    pub odr_id:      i32,
    pub lane_type:   LaneType,
    pub stream_id:   LaneId,
    pub valid_from:  f64,
    pub valid_until: f64,
    pub category:    LaneCategory,
    pub is_driving:  bool,
}

// ── Queries ───────────────────────────────────────────────────────────────────

impl WorldData {
    /// Lane `odr_id` of road `road` at `s`, or the invalid-lane sentinel.
    #[inline]
    pub fn lane(&self, road: &str, odr_id: i32, s: f64) -> &Lane {
        self.network().lane_by_name(road, odr_id, s)
    }

    fn horizon(&self, max: f64) -> f64 {
        max.min(self.config().event_horizon)
    }

    /// Objects of kind `K` overlapping the window `[0, max]` ahead of `s` in
    /// `direction`, sorted by start.
    fn search<K: ObjectKind>(
        &self,
        start: &Lane,
        s: f64,
        direction: StreamDirection,
        max: f64,
    ) -> Vec<LaneObject> {
        if !start.exists() {
            return Vec::new();
        }
        let origin = stream_position(start, s, direction);
        let window_end = origin + self.horizon(max);

        let mut seen: FxHashSet<ObjectHandle> = FxHashSet::default();
        let mut found: Vec<LaneObject> = Vec::new();
        for step in self.network().stream(start.id(), direction, window_end) {
            for &handle in self.lane_objects(step.lane.id()) {
                if !K::accepts(handle) || seen.contains(&handle) {
                    continue;
                }
                let Some(touch) = self.object(handle).and_then(|o| o.touch(step.lane.id())) else {
                    continue;
                };
                let a = stream_position(step.lane, touch.s_start, direction);
                let b = stream_position(step.lane, touch.s_end, direction);
                let (lo, hi) = (step.offset + a.min(b), step.offset + a.max(b));
                if hi > origin && lo < window_end {
                    seen.insert(handle);
                    found.push(LaneObject { handle, start: lo - origin, end: hi - origin });
                }
            }
        }
        found.sort_by(|a, b| a.start.total_cmp(&b.start));
        found
    }

    /// Nearest object of kind `K` ahead of `s` within `max` metres.
    pub fn next_object_in_lane<K: ObjectKind>(
        &self,
        road: &str,
        odr_id: i32,
        s: f64,
        max: f64,
    ) -> Option<LaneObject> {
        let lane = self.lane(road, odr_id, s);
        self.search::<K>(lane, s, StreamDirection::Forward, max).into_iter().next()
    }

    /// Farthest object of kind `K` ahead of `s` within `max` metres.
    pub fn last_object_in_lane<K: ObjectKind>(
        &self,
        road: &str,
        odr_id: i32,
        s: f64,
        max: f64,
    ) -> Option<LaneObject> {
        let lane = self.lane(road, odr_id, s);
        self.search::<K>(lane, s, StreamDirection::Forward, max).pop()
    }

    /// Nearest object of kind `K` behind `s` within `max` metres.
    pub fn closest_object_upstream<K: ObjectKind>(
        &self,
        road: &str,
        odr_id: i32,
        s: f64,
        max: f64,
    ) -> Option<LaneObject> {
        let lane = self.lane(road, odr_id, s);
        self.search::<K>(lane, s, StreamDirection::Backward, max).into_iter().next()
    }

    /// Farthest object of kind `K` behind `s` within `max` metres.
    pub fn farthest_object_upstream<K: ObjectKind>(
        &self,
        road: &str,
        odr_id: i32,
        s: f64,
        max: f64,
    ) -> Option<LaneObject> {
        let lane = self.lane(road, odr_id, s);
        self.search::<K>(lane, s, StreamDirection::Backward, max).pop()
    }

    /// Objects of kind `K` between `backward` metres behind and `forward`
    /// metres ahead of `s`, signed in stream direction and sorted by start.
    pub fn objects_in_range<K: ObjectKind>(
        &self,
        road: &str,
        odr_id: i32,
        s: f64,
        backward: f64,
        forward: f64,
    ) -> Vec<LaneObject> {
        let lane = self.lane(road, odr_id, s);
        let mut found = self.search::<K>(lane, s, StreamDirection::Forward, forward);
        for behind in self.search::<K>(lane, s, StreamDirection::Backward, backward) {
            if !found.iter().any(|o| o.handle == behind.handle) {
                found.push(LaneObject { handle: behind.handle, start: -behind.end, end: -behind.start });
            }
        }
        found.sort_by(|a, b| a.start.total_cmp(&b.start));
        found
    }

    /// Distance from `s` to where the stream leaves the lane types in
    /// `types`.
    ///
    /// `0.0` if the lane at `s` is missing or not of one of `types`;
    /// infinity if the distance exceeds `max`.
    pub fn distance_to_end_of_lane(
        &self,
        road: &str,
        odr_id: i32,
        s: f64,
        max: f64,
        types: &[LaneType],
    ) -> f64 {
        let start = self.lane(road, odr_id, s);
        if !start.exists() || !types.contains(&start.lane_type()) {
            return 0.0;
        }
        let max = self.horizon(max);
        let origin = stream_position(start, s, StreamDirection::Forward);

        let mut distance = 0.0;
        for step in self.network().stream(start.id(), StreamDirection::Forward, origin + max) {
            if !types.contains(&step.lane.lane_type()) {
                break;
            }
            distance = step.end() - origin;
            if distance > max {
                return f64::INFINITY;
            }
        }
        distance
    }

    /// Lateral distance from `src` to `dst`, positive if `dst` lies to the
    /// left.
    ///
    /// Positions on the same stream compare their offsets directly.
    /// Otherwise the neighbour chains of the destination lane are searched
    /// for the source stream, summing lane widths at the destination `s`;
    /// when widths vary along the road this is an approximation.  `None`
    /// when either lane is missing or the streams are not side by side.
    pub fn lateral_distance(&self, src: LanePosition<'_>, dst: LanePosition<'_>) -> Option<f64> {
        let src_lane = self.lane(src.road, src.lane, src.s);
        let dst_lane = self.lane(dst.road, dst.lane, dst.s);
        if !src_lane.exists() || !dst_lane.exists() {
            return None;
        }
        let src_t = if src_lane.in_stream_direction() == dst_lane.in_stream_direction() {
            src.t
        } else {
            -src.t
        };
        if src_lane.stream_id() == dst_lane.stream_id() {
            return Some(dst.t - src_t);
        }

        let half_width = |lane: &Lane| lane.width(dst.s).unwrap_or(0.0) * 0.5;
        for to_left in [true, false] {
            let mut current = dst_lane;
            let mut offset = 0.0;
            for _ in 0..self.network().lane_count() {
                let next = self.network().lane(if to_left { current.left() } else { current.right() });
                if !next.exists() {
                    break;
                }
                offset += half_width(current) + half_width(next);
                if next.stream_id() == src_lane.stream_id() {
                    return Some(if to_left { dst.t - src_t - offset } else { dst.t - src_t + offset });
                }
                current = next;
            }
        }
        None
    }

    /// Signs valid for the stream from `s` up to `range` metres ahead,
    /// with their distance, nearest first.
    pub fn traffic_signs_in_range(
        &self,
        road: &str,
        odr_id: i32,
        s: f64,
        range: f64,
    ) -> Vec<(&TrafficSign, f64)> {
        let start = self.lane(road, odr_id, s);
        if !start.exists() {
            return Vec::new();
        }
        let range = self.horizon(range);
        let origin = stream_position(start, s, StreamDirection::Forward);

        let mut seen: FxHashSet<ObjectId> = FxHashSet::default();
        let mut found: Vec<(&TrafficSign, f64)> = Vec::new();
        for step in self.network().stream(start.id(), StreamDirection::Forward, origin + range) {
            for &id in self.lane_signs(step.lane.id()) {
                let Some(sign) = self.traffic_sign(id) else { continue };
                let distance =
                    step.offset + stream_position(step.lane, sign.s, StreamDirection::Forward) - origin;
                if (0.0..=range).contains(&distance) && seen.insert(id) {
                    found.push((sign, distance));
                }
            }
        }
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found
    }

    #[inline]
    pub fn lane_width(&self, road: &str, odr_id: i32, s: f64) -> Option<f64> {
        self.lane(road, odr_id, s).width(s)
    }

    #[inline]
    pub fn lane_curvature(&self, road: &str, odr_id: i32, s: f64) -> Option<f64> {
        self.lane(road, odr_id, s).curvature(s)
    }

    /// Heading of the lane at `s` in stream direction.
    #[inline]
    pub fn lane_direction(&self, road: &str, odr_id: i32, s: f64) -> Option<f64> {
        self.lane(road, odr_id, s).direction(s)
    }

    /// World position `t` metres left of the lane centre at `s`, with the
    /// lane heading in road direction.
    pub fn lane_to_world(&self, road: &str, odr_id: i32, s: f64, t: f64) -> Option<(Vector2d, f64)> {
        let joint = self.lane(road, odr_id, s).interpolate(s)?;
        Some((joint.center + Vector2d::left_normal(joint.heading) * t, joint.heading))
    }

    // ── Lane snapshots ────────────────────────────────────────────────────

    pub fn query_lane(&self, road: &str, odr_id: i32, s: f64) -> Option<LaneInfo> {
        self.lane_info(self.lane(road, odr_id, s).id())
    }

    /// Snapshots of every lane of the section at `s`, left to right.
    pub fn query_lanes(&self, road: &str, s: f64) -> Vec<LaneInfo> {
        let Some(section) = self
            .network()
            .road_id(road)
            .and_then(|id| self.network().section_at(id, s))
        else {
            return Vec::new();
        };
        section.lanes.iter().filter_map(|&id| self.lane_info(id)).collect()
    }

    pub fn lane_info(&self, id: LaneId) -> Option<LaneInfo> {
        let lane = self.network().lane(id);
        if !lane.exists() {
            return None;
        }
        let horizon = self.config().event_horizon;
        let reach = |direction: StreamDirection| -> f64 {
            let mut reach = 0.0;
            for step in self.network().stream(id, direction, horizon + lane.length()).skip(1) {
                reach = step.end() - lane.length();
                if reach > horizon {
                    return f64::INFINITY;
                }
            }
            reach
        };

        Some(LaneInfo {
            id,
            road: lane.road(),
            odr_id: lane.odr_id(),
            lane_type: lane.lane_type(),
            stream_id: lane.stream_id(),
            valid_from: -reach(StreamDirection::Backward),
            valid_until: lane.length() + reach(StreamDirection::Forward),
            category: self.lane_category(lane),
            is_driving: self.config().is_driving(lane.lane_type()),
        })
    }

    fn lane_category(&self, lane: &Lane) -> LaneCategory {
        let right_id = if lane.in_stream_direction() { lane.right() } else { lane.left() };
        let right = self.network().lane(right_id);
        let blocked = right.exists()
            && right.in_stream_direction() == lane.in_stream_direction()
            && self.config().is_driving(right.lane_type());
        if blocked { LaneCategory::Regular } else { LaneCategory::Rightmost }
    }
}
