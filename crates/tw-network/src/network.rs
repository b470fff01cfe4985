//! Road network representation and its append-only mutation API.
//!
//! # Data layout
//!
//! Roads, sections, lanes and junctions live in four arena `Vec`s indexed by
//! their typed ids.  Parents hold child id lists (road → sections ordered by
//! s, section → lanes ordered left to right); children hold their parent id.
//! Ids are never reused; the network is rebuilt from scratch on a new scene.
//!
//! # Build order
//!
//! A road must exist before its sections, a section before its lanes.  Every
//! mutator validates the ids it touches and fails with a `NonExistent*`
//! error otherwise, so a half-built network can never be handed on.

use rustc_hash::FxHashMap;

use tw_core::{JunctionId, LaneId, LaneType, RoadId, SectionId};
use tw_scenery::ContactPoint;

use crate::lane::{GeometryJoint, Lane, INVALID_LANE};
use crate::{NetworkError, NetworkResult};

// ── Section ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Section {
    pub id:                  SectionId,
    pub road:                RoadId,
    /// Road coordinate of the section start.
    pub start:               f64,
    pub length:              f64,
    /// Lanes ordered from leftmost to rightmost in road direction.
    pub lanes:               Vec<LaneId>,
    pub in_stream_direction: bool,
    /// Next section in road direction, `SectionId::INVALID` if none.
    pub successor:           SectionId,
    pub predecessor:         SectionId,
}

impl Section {
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    /// Next section in stream direction.
    #[inline]
    pub fn stream_next(&self) -> SectionId {
        if self.in_stream_direction { self.successor } else { self.predecessor }
    }

    /// Previous section in stream direction.
    #[inline]
    pub fn stream_previous(&self) -> SectionId {
        if self.in_stream_direction { self.predecessor } else { self.successor }
    }
}

// ── Road ──────────────────────────────────────────────────────────────────────

/// What a road end is attached to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkTarget {
    #[default]
    None,
    Road(RoadId),
    Junction(JunctionId),
}

#[derive(Clone, Debug)]
pub struct Road {
    pub id:                  RoadId,
    /// Id from the scene description.
    pub name:                String,
    pub length:              f64,
    /// Sections ordered by start coordinate.
    pub sections:            Vec<SectionId>,
    pub in_stream_direction: bool,
    /// Junction this road is a connecting road of.
    pub junction:            JunctionId,
    pub successor:           LinkTarget,
    pub predecessor:         LinkTarget,
}

// ── Junction ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JunctionConnection {
    pub incoming:      RoadId,
    pub connecting:    RoadId,
    pub contact_point: ContactPoint,
}

#[derive(Clone, Debug)]
pub struct Junction {
    pub id:               JunctionId,
    pub name:             String,
    pub connecting_roads: Vec<RoadId>,
    pub connections:      Vec<JunctionConnection>,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Road → Section → Lane hierarchy plus junctions.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    lanes:          Vec<Lane>,
    sections:       Vec<Section>,
    roads:          Vec<Road>,
    junctions:      Vec<Junction>,
    road_index:     FxHashMap<String, RoadId>,
    junction_index: FxHashMap<String, JunctionId>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn road_count(&self) -> usize {
        self.roads.len()
    }

    pub fn junction_count(&self) -> usize {
        self.junctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    // ── Entity access ─────────────────────────────────────────────────────

    /// The lane with `id`, or the invalid-lane sentinel.
    #[inline]
    pub fn lane(&self, id: LaneId) -> &Lane {
        self.lanes.get(id.index()).unwrap_or(&INVALID_LANE)
    }

    #[inline]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.get(id.index())
    }

    #[inline]
    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id.index())
    }

    #[inline]
    pub fn junction(&self, id: JunctionId) -> Option<&Junction> {
        self.junctions.get(id.index())
    }

    pub fn lanes(&self) -> impl Iterator<Item = &Lane> + '_ {
        self.lanes.iter()
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> + '_ {
        self.sections.iter()
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> + '_ {
        self.roads.iter()
    }

    pub fn junctions(&self) -> impl Iterator<Item = &Junction> + '_ {
        self.junctions.iter()
    }

    /// Resolve a scene road id.
    #[inline]
    pub fn road_id(&self, name: &str) -> Option<RoadId> {
        self.road_index.get(name).copied()
    }

    #[inline]
    pub fn junction_id(&self, name: &str) -> Option<JunctionId> {
        self.junction_index.get(name).copied()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Section of `road` covering road coordinate `s`.
    ///
    /// Sections are kept sorted, so this is a binary search.  The road end
    /// itself belongs to the last section.
    pub fn section_at(&self, road: RoadId, s: f64) -> Option<&Section> {
        const EPS: f64 = 1e-9;
        let road = self.road(road)?;
        let idx = road
            .sections
            .partition_point(|&sec| self.sections[sec.index()].start <= s + EPS);
        let section = &self.sections[road.sections.get(idx.checked_sub(1)?)?.index()];
        (s <= section.end() + EPS).then_some(section)
    }

    /// Lane with external id `odr_id` on `road` at coordinate `s`, or the
    /// invalid-lane sentinel.
    pub fn lane_by_odr_id(&self, road: RoadId, odr_id: i32, s: f64) -> &Lane {
        self.section_at(road, s)
            .and_then(|sec| {
                sec.lanes
                    .iter()
                    .map(|&l| &self.lanes[l.index()])
                    .find(|lane| lane.odr_id == odr_id)
            })
            .unwrap_or(&INVALID_LANE)
    }

    /// Same as [`lane_by_odr_id`](Self::lane_by_odr_id) keyed by scene road id.
    pub fn lane_by_name(&self, road: &str, odr_id: i32, s: f64) -> &Lane {
        match self.road_id(road) {
            Some(id) => self.lane_by_odr_id(id, odr_id, s),
            None => &INVALID_LANE,
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    pub fn add_road(
        &mut self,
        name: impl Into<String>,
        length: f64,
        in_stream_direction: bool,
    ) -> NetworkResult<RoadId> {
        let name = name.into();
        if self.road_index.contains_key(&name) {
            return Err(NetworkError::DuplicateRoad(name));
        }
        let id = RoadId(self.roads.len() as u32);
        self.road_index.insert(name.clone(), id);
        self.roads.push(Road {
            id,
            name,
            length,
            sections: Vec::new(),
            in_stream_direction,
            junction: JunctionId::INVALID,
            successor: LinkTarget::None,
            predecessor: LinkTarget::None,
        });
        Ok(id)
    }

    /// Add a section to `road`.  The section inherits the road's direction.
    pub fn add_section(&mut self, road: RoadId, start: f64, length: f64) -> NetworkResult<SectionId> {
        let in_stream_direction = self
            .road(road)
            .ok_or(NetworkError::NonExistentRoad(road))?
            .in_stream_direction;

        let id = SectionId(self.sections.len() as u32);
        self.sections.push(Section {
            id,
            road,
            start,
            length,
            lanes: Vec::new(),
            in_stream_direction,
            successor: SectionId::INVALID,
            predecessor: SectionId::INVALID,
        });

        let sections = &self.sections;
        let list = &mut self.roads[road.index()].sections;
        let pos = list.partition_point(|&s| sections[s.index()].start <= start);
        list.insert(pos, id);
        Ok(id)
    }

    /// Add a lane to `section`.  The lane inherits the section's direction.
    pub fn add_lane(
        &mut self,
        section: SectionId,
        odr_id: i32,
        lane_type: LaneType,
    ) -> NetworkResult<LaneId> {
        let sec = self
            .section(section)
            .ok_or(NetworkError::NonExistentSection(section))?;
        let (road, dir, start) = (sec.road, sec.in_stream_direction, sec.start);

        let id = LaneId(self.lanes.len() as u32);
        self.lanes.push(Lane::new(id, section, road, odr_id, lane_type, dir, start));

        let lanes = &self.lanes;
        let list = &mut self.sections[section.index()].lanes;
        // Left to right: descending external id.
        let pos = list.partition_point(|&l| lanes[l.index()].odr_id > odr_id);
        list.insert(pos, id);
        Ok(id)
    }

    pub fn add_junction(&mut self, name: impl Into<String>) -> JunctionId {
        let name = name.into();
        if let Some(&id) = self.junction_index.get(&name) {
            return id;
        }
        let id = JunctionId(self.junctions.len() as u32);
        self.junction_index.insert(name.clone(), id);
        self.junctions.push(Junction {
            id,
            name,
            connecting_roads: Vec::new(),
            connections: Vec::new(),
        });
        id
    }

    /// Register a connection and mark `connecting` as a path road of the
    /// junction.
    pub fn add_junction_connection(
        &mut self,
        junction: JunctionId,
        incoming: RoadId,
        connecting: RoadId,
        contact_point: ContactPoint,
    ) -> NetworkResult<()> {
        self.junction(junction).ok_or(NetworkError::NonExistentJunction(junction))?;
        self.road(incoming).ok_or(NetworkError::NonExistentRoad(incoming))?;
        self.road(connecting).ok_or(NetworkError::NonExistentRoad(connecting))?;

        self.roads[connecting.index()].junction = junction;
        let j = &mut self.junctions[junction.index()];
        if !j.connecting_roads.contains(&connecting) {
            j.connecting_roads.push(connecting);
        }
        j.connections.push(JunctionConnection { incoming, connecting, contact_point });
        Ok(())
    }

    // ── Links ─────────────────────────────────────────────────────────────

    fn check_lane(&self, id: LaneId) -> NetworkResult<()> {
        if id.index() < self.lanes.len() {
            Ok(())
        } else {
            Err(NetworkError::NonExistentLane(id))
        }
    }

    fn check_section(&self, id: SectionId) -> NetworkResult<()> {
        if id.index() < self.sections.len() {
            Ok(())
        } else {
            Err(NetworkError::NonExistentSection(id))
        }
    }

    fn check_target(&self, target: LinkTarget) -> NetworkResult<()> {
        match target {
            LinkTarget::None => Ok(()),
            LinkTarget::Road(r) => self.road(r).map(|_| ()).ok_or(NetworkError::NonExistentRoad(r)),
            LinkTarget::Junction(j) => self
                .junction(j)
                .map(|_| ())
                .ok_or(NetworkError::NonExistentJunction(j)),
        }
    }

    /// Record `successor` as following `lane` in road direction.  A link is
    /// set at most once.
    pub fn add_lane_successor(&mut self, lane: LaneId, successor: LaneId) -> NetworkResult<()> {
        self.check_lane(lane)?;
        self.check_lane(successor)?;
        let list = &mut self.lanes[lane.index()].successors;
        if list.contains(&successor) {
            return Err(NetworkError::DuplicateLink { from: lane, to: successor });
        }
        list.push(successor);
        Ok(())
    }

    /// Record `predecessor` as preceding `lane` in road direction.  A link is
    /// set at most once.
    pub fn add_lane_predecessor(&mut self, lane: LaneId, predecessor: LaneId) -> NetworkResult<()> {
        self.check_lane(lane)?;
        self.check_lane(predecessor)?;
        let list = &mut self.lanes[lane.index()].predecessors;
        if list.contains(&predecessor) {
            return Err(NetworkError::DuplicateLink { from: lane, to: predecessor });
        }
        list.push(predecessor);
        Ok(())
    }

    /// Make `left` and `right` adjacent (`left` lies left of `right` in road
    /// direction).  Both sides are written, and any previous partner is
    /// detached, so the relation stays symmetric.
    pub fn set_lane_neighbours(&mut self, left: LaneId, right: LaneId) -> NetworkResult<()> {
        self.check_lane(left)?;
        self.check_lane(right)?;

        let old_right = self.lanes[left.index()].right;
        if old_right.is_valid() && old_right != right {
            self.lanes[old_right.index()].left = LaneId::INVALID;
        }
        let old_left = self.lanes[right.index()].left;
        if old_left.is_valid() && old_left != left {
            self.lanes[old_left.index()].right = LaneId::INVALID;
        }

        self.lanes[left.index()].right = right;
        self.lanes[right.index()].left = left;
        Ok(())
    }

    pub fn set_section_successor(&mut self, section: SectionId, successor: SectionId) -> NetworkResult<()> {
        self.check_section(section)?;
        self.check_section(successor)?;
        self.sections[section.index()].successor = successor;
        Ok(())
    }

    pub fn set_section_predecessor(&mut self, section: SectionId, predecessor: SectionId) -> NetworkResult<()> {
        self.check_section(section)?;
        self.check_section(predecessor)?;
        self.sections[section.index()].predecessor = predecessor;
        Ok(())
    }

    pub fn set_road_successor(&mut self, road: RoadId, target: LinkTarget) -> NetworkResult<()> {
        self.road(road).ok_or(NetworkError::NonExistentRoad(road))?;
        self.check_target(target)?;
        self.roads[road.index()].successor = target;
        Ok(())
    }

    pub fn set_road_predecessor(&mut self, road: RoadId, target: LinkTarget) -> NetworkResult<()> {
        self.road(road).ok_or(NetworkError::NonExistentRoad(road))?;
        self.check_target(target)?;
        self.roads[road.index()].predecessor = target;
        Ok(())
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Append a geometry joint.  Joints must strictly increase in s; the
    /// lane length follows from the first and last joint.
    pub fn add_lane_geometry_point(&mut self, lane: LaneId, joint: GeometryJoint) -> NetworkResult<()> {
        self.check_lane(lane)?;
        let joints = &mut self.lanes[lane.index()].joints;
        if let Some(last) = joints.last() {
            if joint.s <= last.s {
                return Err(NetworkError::NonIncreasingJoint { lane, s: joint.s, last: last.s });
            }
        }
        joints.push(joint);
        Ok(())
    }

    // ── Streams ───────────────────────────────────────────────────────────

    /// Set every lane's stream id to the first lane of its forward chain.
    ///
    /// The chain is walked backwards along the primary (first) stream
    /// predecessor.  A chain that closes on itself has no first lane; its
    /// members share the smallest lane id on the cycle.  Each lane is walked
    /// at most once; later walks stop at the first lane already resolved.
    pub fn assign_stream_ids(&mut self) {
        let mut stream_ids = vec![LaneId::INVALID; self.lanes.len()];
        let mut path: Vec<LaneId> = Vec::new();
        let mut on_path: FxHashMap<LaneId, usize> = FxHashMap::default();

        for start in 0..self.lanes.len() {
            if stream_ids[start].is_valid() {
                continue;
            }
            path.clear();
            on_path.clear();
            let mut current = self.lanes[start].id;
            let head = loop {
                let known = stream_ids[current.index()];
                if known.is_valid() {
                    break known;
                }
                if let Some(&pos) = on_path.get(&current) {
                    break path[pos..].iter().copied().min().unwrap_or(current);
                }
                on_path.insert(current, path.len());
                path.push(current);
                match self.lanes[current.index()].stream_previous().first() {
                    Some(&prev) => current = prev,
                    None => break current,
                }
            };
            for &lane in &path {
                stream_ids[lane.index()] = head;
            }
        }

        for (lane, stream_id) in self.lanes.iter_mut().zip(stream_ids) {
            lane.stream_id = stream_id;
        }
    }
}
