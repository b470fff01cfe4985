//! The `WorldData` store: road network, objects, signs and lane assignments.
//!
//! # Ownership
//!
//! `WorldData` owns everything: the [`RoadNetwork`], its [`Localizer`], all
//! moving and stationary objects, all traffic signs, and two per-lane side
//! tables (object assignment lists and sign lists) indexed by `LaneId`.
//!
//! # Lifecycle
//!
//! | Operation                                 | Topology | Stationary / signs | Moving | Id counter |
//! |-------------------------------------------|----------|--------------------|--------|------------|
//! | [`load_scenery`](WorldData::load_scenery) | rebuilt  | rebuilt            | none   | restarted  |
//! | [`reset`](WorldData::reset)               | kept     | kept               | erased | kept       |
//! | [`clear`](WorldData::clear)               | erased   | erased             | erased | restarted  |
//!
//! Lane assignments are derived data: [`locate_objects`](WorldData::locate_objects)
//! rebuilds them from scratch from the current object poses.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use tw_core::{
    normalize_angle, LaneId, ObjectId, Orientation, Position, RoadCoordinate, RoadId, WorldConfig,
};
use tw_network::{road_to_world, Footprint, Localizer, RoadNetwork};
use tw_scenery::{active_polynomial, RoadObject, RoadSignal, Scenery, SceneryRoad};

use crate::{
    MovingObject, ObjectHandle, ObjectLink, StationaryObject, TrafficSign, WorldError,
    WorldObject, WorldResult,
};

#[derive(Default)]
pub struct WorldData {
    config:        WorldConfig,
    network:       RoadNetwork,
    localizer:     Localizer,
    moving:        BTreeMap<ObjectId, MovingObject>,
    stationary:    BTreeMap<ObjectId, StationaryObject>,
    signs:         BTreeMap<ObjectId, TrafficSign>,
    /// Object assignment list per lane, indexed by `LaneId`.
    lane_objects:  Vec<Vec<ObjectHandle>>,
    /// Signs valid for each lane, indexed by `LaneId`.
    lane_signs:    Vec<Vec<ObjectId>>,
    next_free_uid: u64,
}

impl WorldData {
    /// An empty store.
    pub fn new(config: WorldConfig) -> WorldResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    /// A store over an already built network, without objects.
    pub fn with_network(network: RoadNetwork, config: WorldConfig) -> WorldResult<Self> {
        let mut world = Self::new(config)?;
        world.install_network(network);
        Ok(world)
    }

    fn install_network(&mut self, network: RoadNetwork) {
        self.localizer = Localizer::new(&network);
        self.lane_objects = vec![Vec::new(); network.lane_count()];
        self.lane_signs = vec![Vec::new(); network.lane_count()];
        self.network = network;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    #[inline]
    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    // ── Scenery ───────────────────────────────────────────────────────────

    /// Replace the whole world with one built from `scenery`.
    ///
    /// Converts the road network, samples its geometry, then creates a
    /// traffic sign per road signal and a stationary object per road
    /// object.  On error the store is left empty.
    pub fn load_scenery(&mut self, scenery: &Scenery) -> WorldResult<()> {
        self.clear();
        let result = self.build_from(scenery);
        if result.is_err() {
            self.clear();
        }
        result
    }

    fn build_from(&mut self, scenery: &Scenery) -> WorldResult<()> {
        let network = RoadNetwork::from_scenery(scenery, &self.config)?;
        self.install_network(network);

        for road in &scenery.roads {
            let road_id = self
                .network
                .road_id(&road.id)
                .ok_or_else(|| WorldError::UnknownRoad(road.id.clone()))?;
            for signal in &road.signals {
                self.add_scenery_signal(road_id, road, signal);
            }
            for object in &road.objects {
                self.add_scenery_object(road, object);
            }
        }

        self.locate_objects();
        info!(
            "world loaded: {} lanes, {} stationary objects, {} traffic signs",
            self.network.lane_count(),
            self.stationary.len(),
            self.signs.len()
        );
        Ok(())
    }

    fn add_scenery_signal(&mut self, road_id: RoadId, road: &SceneryRoad, signal: &RoadSignal) {
        let valid_lanes = self.resolve_valid_lanes(road_id, signal);
        if valid_lanes.is_empty() {
            warn!("sign '{}' on road '{}' applies to no lane", signal.id, road.id);
        }
        let position = road_to_world(road, signal.s, signal.t).map(|(p, _)| p).unwrap_or_default();

        let sign = self.add_traffic_sign();
        sign.name = signal.id.clone();
        sign.sign_type = signal.sign_type;
        sign.value = signal.value;
        sign.road = road_id;
        sign.s = signal.s;
        sign.t = signal.t;
        sign.position = position;
        let id = sign.id;

        for lane in valid_lanes {
            self.assign_sign(id, lane);
        }
    }

    /// Lanes at the sign's s named by its valid-lane list, or every lane on
    /// the sign's side of the road if the list is empty.
    fn resolve_valid_lanes(&self, road: RoadId, signal: &RoadSignal) -> Vec<LaneId> {
        let Some(section) = self.network.section_at(road, signal.s) else {
            return Vec::new();
        };
        section
            .lanes
            .iter()
            .map(|&id| self.network.lane(id))
            .filter(|lane| {
                if signal.valid_lanes.is_empty() {
                    (lane.odr_id() > 0) == (signal.t > 0.0)
                } else {
                    signal.valid_lanes.contains(&lane.odr_id())
                }
            })
            .map(|lane| lane.id())
            .collect()
    }

    fn add_scenery_object(&mut self, road: &SceneryRoad, object: &RoadObject) {
        let Some((position, heading)) = road_to_world(road, object.s, object.t) else {
            warn!("object '{}' on road '{}' has no geometry to sit on", object.id, road.id);
            return;
        };
        let z = active_polynomial(&road.elevations, object.s) + object.z_offset;

        let stationary = self.add_stationary_object(ObjectLink::SceneryObject(object.id.clone()));
        stationary.base.dimension = object.dimension;
        stationary.base.position = Position::new(position.x, position.y, z);
        stationary.base.orientation = Orientation {
            yaw:   normalize_angle(heading + object.heading),
            pitch: object.pitch,
            roll:  object.roll,
        };
    }

    // ── Entity creation / removal ─────────────────────────────────────────

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_free_uid);
        self.next_free_uid += 1;
        id
    }

    /// Create a moving object with a fresh id.  It is not on any lane until
    /// it is located.
    pub fn add_moving_object(&mut self, link: ObjectLink) -> &mut MovingObject {
        let id = self.allocate_id();
        self.moving.entry(id).or_insert(MovingObject::new(id, link))
    }

    pub fn add_stationary_object(&mut self, link: ObjectLink) -> &mut StationaryObject {
        let id = self.allocate_id();
        self.stationary.entry(id).or_insert(StationaryObject::new(id, link))
    }

    /// Create an empty traffic sign with a fresh id.  The caller fills it in
    /// and registers it on lanes with [`assign_sign`](Self::assign_sign).
    pub fn add_traffic_sign(&mut self) -> &mut TrafficSign {
        let id = self.allocate_id();
        self.signs.entry(id).or_insert(TrafficSign::new(id))
    }

    /// Make sign `id` visible to lane searches on `lane`.
    pub fn assign_sign(&mut self, id: ObjectId, lane: LaneId) {
        let (Some(sign), Some(list)) = (self.signs.get_mut(&id), self.lane_signs.get_mut(lane.index()))
        else {
            return;
        };
        if !list.contains(&id) {
            list.push(id);
            sign.valid_lanes.push(lane);
        }
    }

    /// Erase a moving object.  It is detached from every lane assignment
    /// list first, so no lane keeps a dangling handle.  Absent ids are a
    /// no-op.
    pub fn remove_moving_object(&mut self, id: ObjectId) -> Option<MovingObject> {
        let object = self.moving.remove(&id)?;
        let handle = ObjectHandle::Moving(id);
        for lane in object.base.lanes() {
            if let Some(list) = self.lane_objects.get_mut(lane.index()) {
                list.retain(|h| *h != handle);
            }
        }
        Some(object)
    }

    // ── Entity access ─────────────────────────────────────────────────────

    #[inline]
    pub fn moving_object(&self, id: ObjectId) -> Option<&MovingObject> {
        self.moving.get(&id)
    }

    #[inline]
    pub fn moving_object_mut(&mut self, id: ObjectId) -> Option<&mut MovingObject> {
        self.moving.get_mut(&id)
    }

    #[inline]
    pub fn stationary_object(&self, id: ObjectId) -> Option<&StationaryObject> {
        self.stationary.get(&id)
    }

    #[inline]
    pub fn traffic_sign(&self, id: ObjectId) -> Option<&TrafficSign> {
        self.signs.get(&id)
    }

    pub fn moving_objects(&self) -> impl Iterator<Item = &MovingObject> + '_ {
        self.moving.values()
    }

    pub fn stationary_objects(&self) -> impl Iterator<Item = &StationaryObject> + '_ {
        self.stationary.values()
    }

    pub fn traffic_signs(&self) -> impl Iterator<Item = &TrafficSign> + '_ {
        self.signs.values()
    }

    pub fn moving_count(&self) -> usize {
        self.moving.len()
    }

    pub fn stationary_count(&self) -> usize {
        self.stationary.len()
    }

    pub fn sign_count(&self) -> usize {
        self.signs.len()
    }

    /// Base part of the object behind `handle`.
    pub fn object(&self, handle: ObjectHandle) -> Option<&WorldObject> {
        match handle {
            ObjectHandle::Moving(id) => self.moving.get(&id).map(|o| &o.base),
            ObjectHandle::Stationary(id) => self.stationary.get(&id).map(|o| &o.base),
        }
    }

    /// Objects currently assigned to `lane`.
    #[inline]
    pub fn lane_objects(&self, lane: LaneId) -> &[ObjectHandle] {
        self.lane_objects.get(lane.index()).map_or(&[], Vec::as_slice)
    }

    /// Signs valid for `lane`.
    #[inline]
    pub fn lane_signs(&self, lane: LaneId) -> &[ObjectId] {
        self.lane_signs.get(lane.index()).map_or(&[], Vec::as_slice)
    }

    // ── Localization ──────────────────────────────────────────────────────

    /// Re-locate one object and refresh its lane assignments.
    pub fn locate_object(&mut self, handle: ObjectHandle) {
        let base = match handle {
            ObjectHandle::Moving(id) => self.moving.get_mut(&id).map(|o| &mut o.base),
            ObjectHandle::Stationary(id) => self.stationary.get_mut(&id).map(|o| &mut o.base),
        };
        let Some(base) = base else { return };

        for lane in base.lanes() {
            if let Some(list) = self.lane_objects.get_mut(lane.index()) {
                list.retain(|h| *h != handle);
            }
        }
        let footprint = footprint_of(&self.localizer, &self.network, base);
        apply_footprint(base, &self.network, footprint);
        for lane in base.lanes() {
            if let Some(list) = self.lane_objects.get_mut(lane.index()) {
                list.push(handle);
            }
        }
    }

    /// Rebuild every object's road coordinate and every lane's assignment
    /// list from scratch.
    pub fn locate_objects(&mut self) {
        for list in &mut self.lane_objects {
            list.clear();
        }

        let network = &self.network;
        let localizer = &self.localizer;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.moving.par_iter_mut().for_each(|(_, o)| {
                let footprint = footprint_of(localizer, network, &o.base);
                apply_footprint(&mut o.base, network, footprint);
            });
            self.stationary.par_iter_mut().for_each(|(_, o)| {
                let footprint = footprint_of(localizer, network, &o.base);
                apply_footprint(&mut o.base, network, footprint);
            });
        }

        #[cfg(not(feature = "parallel"))]
        {
            for o in self.moving.values_mut() {
                let footprint = footprint_of(localizer, network, &o.base);
                apply_footprint(&mut o.base, network, footprint);
            }
            for o in self.stationary.values_mut() {
                let footprint = footprint_of(localizer, network, &o.base);
                apply_footprint(&mut o.base, network, footprint);
            }
        }

        for (&id, o) in &self.moving {
            for lane in o.base.lanes() {
                self.lane_objects[lane.index()].push(ObjectHandle::Moving(id));
            }
        }
        for (&id, o) in &self.stationary {
            for lane in o.base.lanes() {
                self.lane_objects[lane.index()].push(ObjectHandle::Stationary(id));
            }
        }

        debug!(
            "located {} moving and {} stationary objects",
            self.moving.len(),
            self.stationary.len()
        );
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Prepare a rerun of the same scenario: erase every moving object and
    /// its lane assignments.  Topology, stationary objects, signs and the id
    /// counter are kept.
    pub fn reset(&mut self) {
        self.moving.clear();
        for list in &mut self.lane_objects {
            list.retain(|h| !h.is_moving());
        }
    }

    /// Drop everything, including the road network.  Only the configuration
    /// survives.
    pub fn clear(&mut self) {
        let config = std::mem::take(&mut self.config);
        *self = Self { config, ..Self::default() };
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn footprint_of(localizer: &Localizer, network: &RoadNetwork, base: &WorldObject) -> Footprint {
    localizer.locate_footprint(network, base.position.planar(), &base.corners())
}

fn apply_footprint(base: &mut WorldObject, network: &RoadNetwork, footprint: Footprint) {
    base.unlocate();
    if let Some(hit) = footprint.reference {
        let lane_heading = network
            .lane(hit.lane)
            .interpolate(hit.s)
            .map_or(base.orientation.yaw, |j| j.heading);
        base.road_coordinate = Some(RoadCoordinate {
            road: hit.road,
            s:    hit.s,
            t:    hit.t,
            yaw:  normalize_angle(base.orientation.yaw - lane_heading),
        });
        base.main_lane = hit.lane;
    }
    base.touches = footprint.touches;
}
