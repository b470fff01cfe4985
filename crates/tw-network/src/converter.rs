//! Scenery-to-network converter.
//!
//! # Phases
//!
//! 1. Validate the scenery and normalize road directions
//!    ([`mark_directions`]).
//! 2. Topology: one network road per scenery road, one section per lane
//!    section (section ids are assigned linearly across all roads in
//!    scenery order), one lane per non-centre lane, plus neighbour pointers
//!    within each section.
//! 3. Connection: sections inside a road, road-to-road links of roads
//!    outside junctions, then junction connections.  Lane links are
//!    collected as half-links first so a link declared from both sides is
//!    stored once.
//! 4. Stream ids, then sampled lane geometry.
//!
//! Any unresolvable reference aborts the whole conversion; no partially
//! linked network is ever returned.

use std::collections::BTreeSet;

use log::{error, info};
use rustc_hash::FxHashMap;

use tw_core::{LaneId, RoadId, SectionId, WorldConfig};
use tw_scenery::{
    ContactPoint, ElementType, LinkType, RoadLaneSection, RoadLink, Scenery, SceneryRoad,
};

use crate::directions::{mark_directions, DirectionMap};
use crate::geometry::sample_road;
use crate::{LinkTarget, NetworkError, NetworkResult, RoadNetwork};

// ── Public entry points ───────────────────────────────────────────────────────

/// Build a fully linked network with sampled geometry from `scenery`.
///
/// # Errors
///
/// Any structural problem: invalid scenery, self or neighbour road links,
/// references to unknown roads, junctions or lanes.
pub fn convert(scenery: &Scenery, sampling_step: f64) -> NetworkResult<RoadNetwork> {
    convert_inner(scenery, sampling_step).inspect_err(|e| error!("scenery conversion failed: {e}"))
}

impl RoadNetwork {
    /// [`convert`] with the sampling step from `config`.
    pub fn from_scenery(scenery: &Scenery, config: &WorldConfig) -> NetworkResult<Self> {
        convert(scenery, config.sampling_step)
    }
}

fn convert_inner(scenery: &Scenery, sampling_step: f64) -> NetworkResult<RoadNetwork> {
    scenery.validate()?;
    let directions = mark_directions(scenery)?;

    let mut converter = Converter::new(scenery);
    converter.build_topology(&directions)?;
    converter.connect_sections()?;
    converter.connect_roads()?;
    converter.connect_junctions()?;
    converter.apply_lane_links()?;
    converter.network.assign_stream_ids();
    converter.add_geometry(sampling_step)?;

    let network = converter.network;
    info!(
        "converted scenery: {} roads in {} clusters, {} sections, {} lanes, {} junctions",
        network.road_count(),
        directions.cluster_count(),
        network.section_count(),
        network.lane_count(),
        network.junction_count(),
    );
    Ok(network)
}

// ── Converter state ───────────────────────────────────────────────────────────

/// Which end of a lane (or section, or road) a link leaves from, in road
/// direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum End {
    Predecessor,
    Successor,
}

impl End {
    fn of_link(link_type: LinkType, road: &str) -> NetworkResult<Self> {
        match link_type {
            LinkType::Predecessor => Ok(End::Predecessor),
            LinkType::Successor => Ok(End::Successor),
            LinkType::Neighbor => Err(NetworkError::UnsupportedLinkType(road.to_owned())),
        }
    }

    /// End of a road touched at `contact`.
    fn of_contact(contact: ContactPoint) -> Self {
        match contact {
            ContactPoint::Start => End::Predecessor,
            ContactPoint::End => End::Successor,
        }
    }
}

struct Converter<'a> {
    scenery: &'a Scenery,
    network: RoadNetwork,
    /// `(section, external lane id)` → lane.
    lanes:   FxHashMap<(SectionId, i32), LaneId>,
    /// Half-links `(lane, end of lane, linked lane)`.
    links:   BTreeSet<(LaneId, End, LaneId)>,
}

impl<'a> Converter<'a> {
    fn new(scenery: &'a Scenery) -> Self {
        Self {
            scenery,
            network: RoadNetwork::new(),
            lanes:   FxHashMap::default(),
            links:   BTreeSet::new(),
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    fn road_id(&self, name: &str) -> NetworkResult<RoadId> {
        self.network
            .road_id(name)
            .ok_or_else(|| NetworkError::UnknownRoad(name.to_owned()))
    }

    fn scenery_road(&self, name: &str) -> NetworkResult<&'a SceneryRoad> {
        self.scenery
            .road(name)
            .ok_or_else(|| NetworkError::UnknownRoad(name.to_owned()))
    }

    fn sections(&self, road: RoadId) -> NetworkResult<&[SectionId]> {
        self.network
            .road(road)
            .map(|r| r.sections.as_slice())
            .ok_or(NetworkError::NonExistentRoad(road))
    }

    /// Network section at `end` of `road`.
    fn end_section(&self, road: RoadId, end: End) -> NetworkResult<SectionId> {
        let sections = self.sections(road)?;
        let section = match end {
            End::Predecessor => sections.first(),
            End::Successor => sections.last(),
        };
        section.copied().ok_or_else(|| {
            let name = self.network.road(road).map(|r| r.name.clone()).unwrap_or_default();
            NetworkError::EmptySections(name)
        })
    }

    fn lane(&self, road: &str, section: SectionId, odr_id: i32) -> NetworkResult<LaneId> {
        self.lanes
            .get(&(section, odr_id))
            .copied()
            .ok_or_else(|| NetworkError::UnknownLane { road: road.to_owned(), section, lane: odr_id })
    }

    /// Record that `a` (at its `a_end`) meets `b` (at its `b_end`).
    fn link(&mut self, a: LaneId, a_end: End, b: LaneId, b_end: End) {
        self.links.insert((a, a_end, b));
        self.links.insert((b, b_end, a));
    }

    /// Set section links in both directions.
    fn link_sections(&mut self, a: SectionId, a_end: End, b: SectionId, b_end: End) -> NetworkResult<()> {
        for (section, end, other) in [(a, a_end, b), (b, b_end, a)] {
            match end {
                End::Successor => self.network.set_section_successor(section, other)?,
                End::Predecessor => self.network.set_section_predecessor(section, other)?,
            }
        }
        Ok(())
    }

    fn set_road_link(&mut self, road: RoadId, end: End, target: LinkTarget) -> NetworkResult<()> {
        match end {
            End::Successor => self.network.set_road_successor(road, target),
            End::Predecessor => self.network.set_road_predecessor(road, target),
        }
    }

    // ── Phase 2: topology ─────────────────────────────────────────────────

    fn build_topology(&mut self, directions: &DirectionMap) -> NetworkResult<()> {
        let scenery = self.scenery;
        for junction in &scenery.junctions {
            self.network.add_junction(junction.id.as_str());
        }

        for road in &scenery.roads {
            if let Some(junction) = &road.junction {
                if self.network.junction_id(junction).is_none() {
                    return Err(NetworkError::UnknownJunction(junction.clone()));
                }
            }
            if road.lane_sections.is_empty() {
                return Err(NetworkError::EmptySections(road.id.clone()));
            }

            let road_id = self
                .network
                .add_road(road.id.as_str(), road.length(), directions.direction(&road.id))?;

            for (index, section) in road.lane_sections.iter().enumerate() {
                let section_id =
                    self.network.add_section(road_id, section.start, road.section_length(index))?;

                for (&odr_id, lane) in section.lanes.iter().filter(|(id, _)| **id != 0) {
                    let lane_id = self.network.add_lane(section_id, odr_id, lane.lane_type)?;
                    self.lanes.insert((section_id, odr_id), lane_id);
                }

                let ordered = self
                    .network
                    .section(section_id)
                    .map(|s| s.lanes.clone())
                    .unwrap_or_default();
                for pair in ordered.windows(2) {
                    self.network.set_lane_neighbours(pair[0], pair[1])?;
                }
            }
        }
        Ok(())
    }

    // ── Phase 3a: sections within a road ──────────────────────────────────

    fn connect_sections(&mut self) -> NetworkResult<()> {
        let scenery = self.scenery;
        for road in &scenery.roads {
            let road_id = self.road_id(&road.id)?;
            let sections = self.sections(road_id)?.to_vec();

            for (index, pair) in sections.windows(2).enumerate() {
                let (first, second) = (pair[0], pair[1]);
                self.link_sections(first, End::Successor, second, End::Predecessor)?;

                let upstream = &road.lane_sections[index];
                let downstream = &road.lane_sections[index + 1];
                for (&odr_id, lane) in non_centre(upstream) {
                    if let Some(&next) = lane.successors.first() {
                        let a = self.lane(&road.id, first, odr_id)?;
                        let b = self.lane(&road.id, second, next)?;
                        self.link(a, End::Successor, b, End::Predecessor);
                    }
                }
                for (&odr_id, lane) in non_centre(downstream) {
                    if let Some(&prev) = lane.predecessors.first() {
                        let a = self.lane(&road.id, second, odr_id)?;
                        let b = self.lane(&road.id, first, prev)?;
                        self.link(a, End::Predecessor, b, End::Successor);
                    }
                }
            }
        }
        Ok(())
    }

    // ── Phase 3b: road-to-road links ──────────────────────────────────────

    fn connect_roads(&mut self) -> NetworkResult<()> {
        let scenery = self.scenery;
        for road in scenery.roads.iter().filter(|r| !r.in_junction()) {
            for link in &road.links {
                self.connect_road_link(road, link)?;
            }
        }
        Ok(())
    }

    /// Link the end of `road` named by `link` to its target.
    fn connect_road_link(&mut self, road: &'a SceneryRoad, link: &RoadLink) -> NetworkResult<()> {
        let road_id = self.road_id(&road.id)?;
        let own_end = End::of_link(link.link_type, &road.id)?;

        if link.element_type == ElementType::Junction {
            let junction = self
                .network
                .junction_id(&link.element_id)
                .ok_or_else(|| NetworkError::UnknownJunction(link.element_id.clone()))?;
            return self.set_road_link(road_id, own_end, LinkTarget::Junction(junction));
        }

        let target = self.scenery_road(&link.element_id)?;
        let target_id = self.road_id(&target.id)?;
        let target_end = End::of_contact(link.contact_point);

        let own_section = self.end_section(road_id, own_end)?;
        let target_section = self.end_section(target_id, target_end)?;
        self.set_road_link(road_id, own_end, LinkTarget::Road(target_id))?;
        self.link_sections(own_section, own_end, target_section, target_end)?;

        let scenery_section = end_of(road, own_end);
        for (&odr_id, lane) in scenery_section.into_iter().flat_map(non_centre) {
            let declared = match own_end {
                End::Successor => lane.successors.first(),
                End::Predecessor => lane.predecessors.first(),
            };
            if let Some(&other) = declared {
                let a = self.lane(&road.id, own_section, odr_id)?;
                let b = self.lane(&target.id, target_section, other)?;
                self.link(a, own_end, b, target_end);
            }
        }
        Ok(())
    }

    // ── Phase 3c: junctions ───────────────────────────────────────────────

    fn connect_junctions(&mut self) -> NetworkResult<()> {
        let scenery = self.scenery;
        for junction in &scenery.junctions {
            let junction_id = self
                .network
                .junction_id(&junction.id)
                .ok_or_else(|| NetworkError::UnknownJunction(junction.id.clone()))?;

            for connection in &junction.connections {
                let incoming = self.scenery_road(&connection.incoming_road)?;
                let connecting = self.scenery_road(&connection.connecting_road)?;
                let incoming_id = self.road_id(&incoming.id)?;
                let connecting_id = self.road_id(&connecting.id)?;

                self.network.add_junction_connection(
                    junction_id,
                    incoming_id,
                    connecting_id,
                    connection.contact_point,
                )?;

                // Near end: the incoming road's side comes from its own link
                // to this junction, lane pairs from the connection.
                let incoming_link = incoming
                    .links
                    .iter()
                    .find(|l| l.element_type == ElementType::Junction && l.element_id == junction.id)
                    .ok_or_else(|| NetworkError::MissingJunctionLink {
                        junction: junction.id.clone(),
                        road:     incoming.id.clone(),
                    })?;
                let incoming_end = End::of_link(incoming_link.link_type, &incoming.id)?;
                let near_end = End::of_contact(connection.contact_point);

                let incoming_section = self.end_section(incoming_id, incoming_end)?;
                let connecting_section = self.end_section(connecting_id, near_end)?;
                self.link_sections(incoming_section, incoming_end, connecting_section, near_end)?;
                self.set_road_link(connecting_id, near_end, LinkTarget::Road(incoming_id))?;

                for &(from, to) in &connection.lane_links {
                    let a = self.lane(&incoming.id, incoming_section, from)?;
                    let b = self.lane(&connecting.id, connecting_section, to)?;
                    self.link(a, incoming_end, b, near_end);
                }

                // Far end: the connecting road's own declarations.
                let far_type = match near_end {
                    End::Predecessor => LinkType::Successor,
                    End::Successor => LinkType::Predecessor,
                };
                if let Some(far) = connecting.link(far_type) {
                    self.connect_road_link(connecting, far)?;
                }
            }
        }
        Ok(())
    }

    // ── Phase 3d: lane links ──────────────────────────────────────────────

    fn apply_lane_links(&mut self) -> NetworkResult<()> {
        for (lane, end, other) in std::mem::take(&mut self.links) {
            match end {
                End::Successor => self.network.add_lane_successor(lane, other)?,
                End::Predecessor => self.network.add_lane_predecessor(lane, other)?,
            }
        }
        Ok(())
    }

    // ── Phase 4: geometry ─────────────────────────────────────────────────

    fn add_geometry(&mut self, sampling_step: f64) -> NetworkResult<()> {
        let scenery = self.scenery;
        for road in &scenery.roads {
            let road_id = self.road_id(&road.id)?;
            let sections = self.sections(road_id)?.to_vec();
            for sample in sample_road(road, sampling_step) {
                let section = sections
                    .get(sample.section)
                    .copied()
                    .ok_or(NetworkError::NonExistentSection(SectionId::INVALID))?;
                let lane = self.lane(&road.id, section, sample.odr_id)?;
                self.network.add_lane_geometry_point(lane, sample.joint)?;
            }
        }
        Ok(())
    }
}

fn non_centre(section: &RoadLaneSection) -> impl Iterator<Item = (&i32, &tw_scenery::RoadLane)> {
    section.lanes.iter().filter(|(id, _)| **id != 0)
}

fn end_of(road: &SceneryRoad, end: End) -> Option<&RoadLaneSection> {
    match end {
        End::Predecessor => road.lane_sections.first(),
        End::Successor => road.lane_sections.last(),
    }
}
