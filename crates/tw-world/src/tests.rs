//! Unit tests for tw-world.
//!
//! Roads are straight lines along the x axis.  Lane -1 of a road starting
//! at the origin covers y ∈ [-3.5, 0], so its centre line is y = -1.75.

#[cfg(test)]
mod helpers {
    use std::f64::consts::PI;

    use tw_core::{Dimension, LaneType, ObjectId, Orientation, Position, WorldConfig};
    use tw_scenery::{ContactPoint, RoadBuilder, Scenery, SceneryRoad};

    use crate::{ObjectHandle, ObjectLink, WorldData};

    pub const CENTER: f64 = -1.75;

    pub fn straight(id: &str, x: f64, length: f64) -> RoadBuilder {
        RoadBuilder::new(id)
            .line(x, 0.0, 0.0, length)
            .section(0.0)
            .lane(-1, LaneType::Driving, 3.5)
    }

    pub fn scenery(roads: Vec<SceneryRoad>) -> Scenery {
        Scenery { roads, junctions: vec![] }
    }

    /// A (x 0..50) followed by B (x 50..100).
    pub fn two_roads_with(b_type: LaneType) -> Scenery {
        scenery(vec![
            straight("A", 0.0, 50.0)
                .lane_successors(-1, &[-1])
                .successor_road("B", ContactPoint::Start)
                .build(),
            RoadBuilder::new("B")
                .line(50.0, 0.0, 0.0, 50.0)
                .section(0.0)
                .lane(-1, b_type, 3.5)
                .lane_predecessors(-1, &[-1])
                .predecessor_road("A", ContactPoint::End)
                .build(),
        ])
    }

    pub fn two_roads() -> Scenery {
        two_roads_with(LaneType::Driving)
    }

    /// Road M (x 0..100): lanes 1, -1, -2 driving and -3 shoulder.
    pub fn multi_lane() -> Scenery {
        scenery(vec![
            RoadBuilder::new("M")
                .line(0.0, 0.0, 0.0, 100.0)
                .section(0.0)
                .lane(1, LaneType::Driving, 3.5)
                .lane(-1, LaneType::Driving, 3.5)
                .lane(-2, LaneType::Driving, 3.5)
                .lane(-3, LaneType::Shoulder, 2.0)
                .build(),
        ])
    }

    /// A and B closing a loop.
    pub fn ring() -> Scenery {
        scenery(vec![
            straight("A", 0.0, 50.0)
                .lane_successors(-1, &[-1])
                .lane_predecessors(-1, &[-1])
                .successor_road("B", ContactPoint::Start)
                .predecessor_road("B", ContactPoint::End)
                .build(),
            RoadBuilder::new("B")
                .line(50.0, 10.0, PI, 50.0)
                .section(0.0)
                .lane(-1, LaneType::Driving, 3.5)
                .lane_successors(-1, &[-1])
                .lane_predecessors(-1, &[-1])
                .successor_road("A", ContactPoint::Start)
                .predecessor_road("A", ContactPoint::End)
                .build(),
        ])
    }

    pub fn world_with(scenery: &Scenery, config: WorldConfig) -> WorldData {
        let mut world = WorldData::new(config).unwrap();
        world.load_scenery(scenery).unwrap();
        world
    }

    pub fn world(scenery: &Scenery) -> WorldData {
        world_with(scenery, WorldConfig::default())
    }

    /// A (x 0..50), B (x 50..55) and C (x 55..105) in a row.
    pub fn short_middle() -> Scenery {
        scenery(vec![
            straight("A", 0.0, 50.0)
                .lane_successors(-1, &[-1])
                .successor_road("B", ContactPoint::Start)
                .build(),
            straight("B", 50.0, 5.0)
                .lane_predecessors(-1, &[-1])
                .lane_successors(-1, &[-1])
                .predecessor_road("A", ContactPoint::End)
                .successor_road("C", ContactPoint::Start)
                .build(),
            straight("C", 55.0, 50.0)
                .lane_predecessors(-1, &[-1])
                .predecessor_road("B", ContactPoint::End)
                .build(),
        ])
    }

    /// A moving object of size `dimension` at `(x, y)` heading along +x,
    /// located.
    pub fn place(world: &mut WorldData, x: f64, y: f64, dimension: Dimension) -> ObjectId {
        let object = world.add_moving_object(ObjectLink::Unlinked);
        object.base.position = Position::new(x, y, 0.0);
        object.base.orientation = Orientation::from_yaw(0.0);
        object.base.dimension = dimension;
        let id = object.base.id;
        world.locate_object(ObjectHandle::Moving(id));
        id
    }

    /// A 4 m × 2 m moving object at `(x, y)` heading along +x, located.
    pub fn spawn(world: &mut WorldData, x: f64, y: f64) -> ObjectId {
        place(world, x, y, Dimension::new(4.0, 2.0, 1.5))
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use tw_core::{Dimension, LaneType, ObjectId, Orientation, Position, TrafficSignType, WorldConfig};
    use tw_scenery::RoadBuilder;

    use super::helpers::*;
    use crate::{AnyKind, ObjectHandle, ObjectLink, WorldData, WorldError};

    fn furnished() -> WorldData {
        world(&scenery(vec![
            straight("A", 0.0, 50.0)
                .lane(-2, LaneType::Driving, 3.5)
                .signal("s1", 20.0, -2.0, TrafficSignType::MaximumSpeedLimit, 13.9, &[])
                .signal("s2", 25.0, -2.0, TrafficSignType::Stop, 0.0, &[-2])
                .object("cone", 30.0, CENTER, Dimension::new(1.0, 1.0, 1.0))
                .build(),
        ]))
    }

    #[test]
    fn scenery_signals_become_signs() {
        let w = furnished();
        assert_eq!(w.sign_count(), 2);
        let minus_one = w.lane("A", -1, 20.0).id();
        let minus_two = w.lane("A", -2, 20.0).id();
        // No valid-lane list: every lane on the sign's side.
        assert_eq!(w.lane_signs(minus_one).len(), 1);
        assert_eq!(w.lane_signs(minus_two).len(), 2);
        let stop = w.traffic_signs().find(|s| s.name == "s2").unwrap();
        assert_eq!(stop.valid_lanes, vec![minus_two]);
        assert!((stop.position.x - 25.0).abs() < 1e-9);
        assert!((stop.position.y + 2.0).abs() < 1e-9);
    }

    #[test]
    fn scenery_objects_are_located() {
        let w = furnished();
        assert_eq!(w.stationary_count(), 1);
        let cone = w.stationary_objects().next().unwrap();
        assert_eq!(cone.base.link, ObjectLink::SceneryObject("cone".into()));
        let rc = cone.base.road_coordinate().unwrap();
        assert!((rc.s - 30.0).abs() < 1e-9);
        assert!(rc.t.abs() < 1e-9);
        let lane = w.lane("A", -1, 30.0).id();
        assert_eq!(cone.base.main_lane(), lane);
        assert_eq!(w.lane_objects(lane), &[ObjectHandle::Stationary(cone.base.id)]);
    }

    #[test]
    fn road_coordinate_of_moving_object() {
        let mut w = world(&two_roads());
        let id = spawn(&mut w, 10.0, -1.0);
        w.moving_object_mut(id).unwrap().base.orientation = Orientation::from_yaw(0.1);
        w.locate_objects();

        let object = w.moving_object(id).unwrap();
        let rc = object.base.road_coordinate().unwrap();
        assert_eq!(rc.road, w.network().road_id("A").unwrap());
        assert!((rc.s - 10.0).abs() < 1e-9);
        assert!((rc.t - 0.75).abs() < 1e-9);
        assert!((rc.yaw - 0.1).abs() < 1e-9);
        assert!(object.base.road_heading().unwrap().abs() < 1e-9);
        assert_eq!(object.base.main_lane(), w.lane("A", -1, 10.0).id());
    }

    #[test]
    fn object_across_boundary_touches_both_lanes() {
        let mut w = world(&two_roads());
        let id = spawn(&mut w, 50.0, CENTER);
        let a = w.lane("A", -1, 0.0).id();
        let b = w.lane("B", -1, 0.0).id();
        assert!(w.lane_objects(a).contains(&ObjectHandle::Moving(id)));
        assert!(w.lane_objects(b).contains(&ObjectHandle::Moving(id)));
        let on_b = w.moving_object(id).unwrap().base.touch(b).copied().unwrap();
        assert!(on_b.s_start.abs() < 1e-9);
        assert!((on_b.s_end - 2.0).abs() < 1e-9);
    }

    #[test]
    fn wide_object_covers_inner_lanes() {
        let mut w = world(&scenery(vec![
            RoadBuilder::new("W")
                .line(0.0, 0.0, 0.0, 50.0)
                .section(0.0)
                .lane(-1, LaneType::Driving, 3.5)
                .lane(-2, LaneType::Driving, 3.5)
                .lane(-3, LaneType::Driving, 3.5)
                .lane(-4, LaneType::Driving, 3.5)
                .build(),
        ]));
        // y from -11.3 to -0.7: no corner lands on lane -2 or -3.
        let id = place(&mut w, 20.0, -6.0, Dimension::new(4.0, 10.6, 2.0));

        let mut odr: Vec<i32> = w
            .moving_object(id)
            .unwrap()
            .base
            .lanes()
            .map(|lane| w.network().lane(lane).odr_id())
            .collect();
        odr.sort_unstable();
        assert_eq!(odr, vec![-4, -3, -2, -1]);

        let hit = w.next_object_in_lane::<AnyKind>("W", -3, 0.0, 100.0).unwrap();
        assert_eq!(hit.handle, ObjectHandle::Moving(id));
        assert!((hit.start - 18.0).abs() < 1e-9);
        assert!((hit.end - 22.0).abs() < 1e-9);
    }

    #[test]
    fn long_object_covers_short_road() {
        let mut w = world(&short_middle());
        // x from 48 to 68: both ends lie off road B.
        let id = place(&mut w, 58.0, CENTER, Dimension::new(20.0, 2.0, 3.0));
        let object = w.moving_object(id).unwrap();

        let b = w.lane("B", -1, 0.0).id();
        let on_b = object.base.touch(b).copied().unwrap();
        assert!(on_b.s_start.abs() < 1e-9);
        assert!((on_b.s_end - 5.0).abs() < 1e-9);

        let on_a = object.base.touch(w.lane("A", -1, 0.0).id()).copied().unwrap();
        assert!((on_a.s_start - 48.0).abs() < 1e-9);
        assert!((on_a.s_end - 50.0).abs() < 1e-9);

        let on_c = object.base.touch(w.lane("C", -1, 0.0).id()).copied().unwrap();
        assert!(on_c.s_start.abs() < 1e-9);
        assert!((on_c.s_end - 13.0).abs() < 1e-9);

        let hit = w.next_object_in_lane::<AnyKind>("B", -1, 0.0, 3.0).unwrap();
        assert_eq!(hit.handle, ObjectHandle::Moving(id));
        assert!(w.lane_objects(b).contains(&ObjectHandle::Moving(id)));
    }

    #[test]
    fn off_road_object_has_no_lane() {
        let mut w = world(&two_roads());
        let id = spawn(&mut w, 10.0, 30.0);
        let object = w.moving_object(id).unwrap();
        assert!(!object.base.is_on_road());
        assert!(object.base.road_coordinate().is_none());
        assert!(!object.base.main_lane().is_valid());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut w = world(&two_roads());
        let first = spawn(&mut w, 10.0, CENTER);
        w.remove_moving_object(first);
        let second = spawn(&mut w, 10.0, CENTER);
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn remove_detaches_from_lanes() {
        let mut w = world(&two_roads());
        let gone = spawn(&mut w, 50.0, CENTER);
        let kept = spawn(&mut w, 20.0, CENTER);
        assert!(w.remove_moving_object(gone).is_some());

        for lane in w.network().lanes() {
            assert!(!w.lane_objects(lane.id()).contains(&ObjectHandle::Moving(gone)));
        }
        assert!(w.lane_objects(w.lane("A", -1, 0.0).id()).contains(&ObjectHandle::Moving(kept)));
        assert!(w.remove_moving_object(gone).is_none());
        assert_eq!(w.moving_count(), 1);
    }

    #[test]
    fn relocation_moves_assignment() {
        let mut w = world(&two_roads());
        let id = spawn(&mut w, 10.0, CENTER);
        w.moving_object_mut(id).unwrap().base.position = Position::new(80.0, CENTER, 0.0);
        w.locate_objects();
        assert!(w.lane_objects(w.lane("A", -1, 0.0).id()).is_empty());
        assert_eq!(w.lane_objects(w.lane("B", -1, 0.0).id()), &[ObjectHandle::Moving(id)]);
    }

    #[test]
    fn reset_keeps_static_content() {
        let mut w = world(&scenery(vec![
            straight("A", 0.0, 50.0)
                .signal("s1", 20.0, -2.0, TrafficSignType::Stop, 0.0, &[])
                .object("cone", 30.0, CENTER, Dimension::new(1.0, 1.0, 1.0))
                .build(),
        ]));
        let lanes = w.network().lane_count();
        let cone = w.stationary_objects().next().unwrap().base.id;
        let sign = w.traffic_signs().next().unwrap().id;
        let moving = spawn(&mut w, 10.0, CENTER);

        w.reset();

        assert_eq!(w.network().lane_count(), lanes);
        assert!(w.lane("A", -1, 10.0).exists());
        assert!(w.stationary_object(cone).is_some());
        assert!(w.traffic_sign(sign).is_some());
        assert!(w.moving_object(moving).is_none());
        assert_eq!(w.moving_count(), 0);
        let lane = w.lane("A", -1, 0.0).id();
        assert_eq!(w.lane_objects(lane), &[ObjectHandle::Stationary(cone)]);
        // The counter survives a reset.
        assert!(spawn(&mut w, 10.0, CENTER) > moving);
    }

    #[test]
    fn clear_drops_everything() {
        let mut w = furnished();
        let cone = w.stationary_objects().next().unwrap().base.id;
        spawn(&mut w, 10.0, CENTER);

        w.clear();

        assert!(w.network().is_empty());
        assert!(!w.lane("A", -1, 10.0).exists());
        assert!(w.stationary_object(cone).is_none());
        assert_eq!(w.sign_count(), 0);
        assert_eq!(w.moving_count(), 0);
        assert_eq!(w.add_moving_object(ObjectLink::Unlinked).base.id, ObjectId(0));
    }

    #[test]
    fn failed_load_leaves_empty_world() {
        let mut w = world(&two_roads());
        let broken = scenery(vec![
            RoadBuilder::new("A")
                .line(0.0, 0.0, 0.0, 50.0)
                .section(0.0)
                .lane(-1, LaneType::Driving, 3.5)
                .successor_road("nowhere", tw_scenery::ContactPoint::Start)
                .build(),
        ]);
        let err = w.load_scenery(&broken).unwrap_err();
        assert!(matches!(err, WorldError::Network(_)));
        assert!(w.network().is_empty());
        assert_eq!(w.moving_count(), 0);
    }

    #[test]
    fn prebuilt_network_with_manual_sign() {
        let config = WorldConfig::default();
        let network = tw_network::RoadNetwork::from_scenery(&two_roads(), &config).unwrap();
        let mut w = WorldData::with_network(network, config).unwrap();
        assert!(!w.localizer().is_empty());

        let lane = w.lane("B", -1, 0.0).id();
        let sign = w.add_traffic_sign();
        sign.sign_type = TrafficSignType::GiveWay;
        sign.s = 5.0;
        let id = sign.id;
        w.assign_sign(id, lane);
        w.assign_sign(id, lane);

        assert_eq!(w.lane_signs(lane), &[id]);
        assert!(w.traffic_sign(id).unwrap().is_valid_for(lane));
        let ahead = w.traffic_signs_in_range("A", -1, 40.0, 20.0);
        assert_eq!(ahead.len(), 1);
        assert!((ahead[0].1 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = WorldConfig { event_horizon: 0.0, ..WorldConfig::default() };
        assert!(matches!(WorldData::new(config), Err(WorldError::Config(_))));
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod query {
    use tw_core::{Dimension, LaneType, TrafficSignType, WorldConfig};
    use tw_scenery::{Polynomial, RoadBuilder};

    use super::helpers::*;
    use crate::{
        AnyKind, LaneCategory, LanePosition, MovingKind, ObjectHandle, StationaryKind,
    };

    const FAR: f64 = 1000.0;

    #[test]
    fn next_object_found_from_lane_start() {
        let mut w = world(&two_roads());
        let id = spawn(&mut w, 10.0, CENTER);
        let hit = w.next_object_in_lane::<MovingKind>("A", -1, 0.0, FAR).unwrap();
        assert_eq!(hit.handle, ObjectHandle::Moving(id));
        assert!((hit.start - 8.0).abs() < 1e-9);
        assert!((hit.end - 12.0).abs() < 1e-9);
    }

    #[test]
    fn search_crosses_road_boundary() {
        let mut w = world(&two_roads());
        let id = spawn(&mut w, 70.0, CENTER);
        let hit = w.next_object_in_lane::<MovingKind>("A", -1, 10.0, FAR).unwrap();
        assert_eq!(hit.handle, ObjectHandle::Moving(id));
        assert!((hit.start - 58.0).abs() < 1e-9);
    }

    #[test]
    fn partial_overlap_counts() {
        let mut w = world(&two_roads());
        let id = spawn(&mut w, 10.0, CENTER);
        let hit = w.next_object_in_lane::<MovingKind>("A", -1, 11.0, FAR).unwrap();
        assert_eq!(hit.handle, ObjectHandle::Moving(id));
        assert!(hit.start < 0.0);
        assert!(w.next_object_in_lane::<MovingKind>("A", -1, 12.5, FAR).is_none());
    }

    #[test]
    fn search_window_is_bounded() {
        let mut w = world(&two_roads());
        spawn(&mut w, 10.0, CENTER);
        assert!(w.next_object_in_lane::<MovingKind>("A", -1, 0.0, 5.0).is_none());
        assert!(w.next_object_in_lane::<MovingKind>("A", -1, 0.0, 9.0).is_some());
    }

    #[test]
    fn kind_filter_applies() {
        let mut w = world(&scenery(vec![
            straight("A", 0.0, 50.0)
                .object("cone", 30.0, CENTER, Dimension::new(1.0, 1.0, 1.0))
                .build(),
        ]));
        let car = spawn(&mut w, 10.0, CENTER);
        let cone = w.stationary_objects().next().unwrap().base.id;

        let moving = w.next_object_in_lane::<MovingKind>("A", -1, 15.0, FAR);
        assert!(moving.is_none());
        let stationary = w.next_object_in_lane::<StationaryKind>("A", -1, 0.0, FAR).unwrap();
        assert_eq!(stationary.handle, ObjectHandle::Stationary(cone));
        let any = w.next_object_in_lane::<AnyKind>("A", -1, 0.0, FAR).unwrap();
        assert_eq!(any.handle, ObjectHandle::Moving(car));
    }

    #[test]
    fn last_and_upstream() {
        let mut w = world(&two_roads());
        let near = spawn(&mut w, 30.0, CENTER);
        let far = spawn(&mut w, 10.0, CENTER);

        let last = w.last_object_in_lane::<MovingKind>("A", -1, 0.0, FAR).unwrap();
        assert_eq!(last.handle, ObjectHandle::Moving(near));

        let closest = w.closest_object_upstream::<MovingKind>("B", -1, 20.0, FAR).unwrap();
        assert_eq!(closest.handle, ObjectHandle::Moving(near));
        assert!((closest.start - 38.0).abs() < 1e-9);
        let farthest = w.farthest_object_upstream::<MovingKind>("B", -1, 20.0, FAR).unwrap();
        assert_eq!(farthest.handle, ObjectHandle::Moving(far));
        assert!((farthest.start - 58.0).abs() < 1e-9);
    }

    #[test]
    fn range_covers_both_directions() {
        let mut w = world(&two_roads());
        let behind = spawn(&mut w, 5.0, CENTER);
        let ahead = spawn(&mut w, 30.0, CENTER);
        spawn(&mut w, 90.0, CENTER);

        let found = w.objects_in_range::<MovingKind>("A", -1, 20.0, 30.0, 30.0);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].handle, ObjectHandle::Moving(behind));
        assert!((found[0].start + 17.0).abs() < 1e-9);
        assert!((found[0].end + 13.0).abs() < 1e-9);
        assert_eq!(found[1].handle, ObjectHandle::Moving(ahead));
        assert!((found[1].start - 8.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_lane_finds_nothing() {
        let mut w = world(&two_roads());
        spawn(&mut w, 10.0, CENTER);
        assert!(w.next_object_in_lane::<AnyKind>("A", -7, 0.0, FAR).is_none());
        assert!(w.next_object_in_lane::<AnyKind>("nope", -1, 0.0, FAR).is_none());
        assert!(w.objects_in_range::<AnyKind>("A", -1, 70.0, 10.0, 10.0).is_empty());
    }

    #[test]
    fn distance_to_end_single_road() {
        let w = world(&scenery(vec![straight("A", 0.0, 50.0).build()]));
        let d = w.distance_to_end_of_lane("A", -1, 10.0, FAR, &[LaneType::Driving]);
        assert!((d - 40.0).abs() < 1e-9);
    }

    #[test]
    fn distance_to_end_stops_at_type_change() {
        let w = world(&two_roads_with(LaneType::Shoulder));
        let d = w.distance_to_end_of_lane("A", -1, 10.0, FAR, &[LaneType::Driving]);
        assert!((d - 40.0).abs() < 1e-9);
        let both = [LaneType::Driving, LaneType::Shoulder];
        let d = w.distance_to_end_of_lane("A", -1, 10.0, FAR, &both);
        assert!((d - 90.0).abs() < 1e-9);
    }

    #[test]
    fn distance_to_end_special_values() {
        let w = world(&two_roads());
        assert_eq!(w.distance_to_end_of_lane("A", -1, 10.0, FAR, &[LaneType::Shoulder]), 0.0);
        assert_eq!(w.distance_to_end_of_lane("A", -1, 10.0, 50.0, &[LaneType::Driving]), f64::INFINITY);
        assert_eq!(w.distance_to_end_of_lane("X", -1, 10.0, FAR, &[LaneType::Driving]), 0.0);
    }

    #[test]
    fn cyclic_stream_terminates() {
        let config = WorldConfig { event_horizon: 500.0, ..WorldConfig::default() };
        let mut w = world_with(&ring(), config);
        let d = w.distance_to_end_of_lane("A", -1, 0.0, f64::MAX, &[LaneType::Driving]);
        assert_eq!(d, f64::INFINITY);
        assert!(w.next_object_in_lane::<AnyKind>("A", -1, 0.0, f64::MAX).is_none());
        assert!(w.closest_object_upstream::<AnyKind>("A", -1, 0.0, f64::MAX).is_none());

        let id = spawn(&mut w, 20.0, CENTER);
        let found = w.objects_in_range::<AnyKind>("A", -1, 10.0, f64::MAX, f64::MAX);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].handle, ObjectHandle::Moving(id));

        let info = w.query_lane("A", -1, 0.0).unwrap();
        assert_eq!(info.valid_until, f64::INFINITY);
        assert_eq!(info.valid_from, f64::NEG_INFINITY);
    }

    #[test]
    fn lateral_distance_same_stream() {
        let w = world(&two_roads());
        let src = LanePosition { road: "A", lane: -1, s: 10.0, t: -1.5 };
        let dst = LanePosition { road: "B", lane: -1, s: 10.0, t: 1.5 };
        assert_eq!(w.lateral_distance(src, dst), Some(3.0));
    }

    #[test]
    fn lateral_distance_across_neighbours() {
        let w = world(&multi_lane());
        let src = LanePosition { road: "M", lane: -2, s: 10.0, t: 0.0 };
        let dst = LanePosition { road: "M", lane: -1, s: 10.0, t: 0.5 };
        let d = w.lateral_distance(src, dst).unwrap();
        assert!((d - 4.0).abs() < 1e-9);
        let back = w.lateral_distance(dst, src).unwrap();
        assert!((back + 4.0).abs() < 1e-9);
    }

    #[test]
    fn lateral_distance_reads_widths_at_destination() {
        // Lane -2 widens from 3.5 m at s = 10 to 5 m at s = 40.
        let w = world(&scenery(vec![
            RoadBuilder::new("V")
                .line(0.0, 0.0, 0.0, 60.0)
                .section(0.0)
                .lane(-1, LaneType::Driving, 3.5)
                .lane(-2, LaneType::Driving, 3.5)
                .lane_widths(-2, vec![Polynomial { s: 0.0, a: 3.0, b: 0.05, c: 0.0, d: 0.0 }])
                .lane(-3, LaneType::Driving, 3.5)
                .build(),
        ]));
        let near = LanePosition { road: "V", lane: -3, s: 10.0, t: 0.0 };
        let far = LanePosition { road: "V", lane: -1, s: 40.0, t: 0.0 };

        // 1.75 + 5.0 + 1.75, the middle width taken at s = 40.
        let d = w.lateral_distance(near, far).unwrap();
        assert!((d - 8.5).abs() < 1e-9);
        // The reverse query reads the middle lane at s = 10.
        let back = w.lateral_distance(far, near).unwrap();
        assert!((back + 7.0).abs() < 1e-9);
    }

    #[test]
    fn lateral_distance_unrelated() {
        let w = world(&scenery(vec![
            straight("A", 0.0, 50.0).build(),
            straight("Z", 200.0, 50.0).build(),
        ]));
        let src = LanePosition { road: "A", lane: -1, s: 10.0, t: 0.0 };
        let dst = LanePosition { road: "Z", lane: -1, s: 10.0, t: 0.0 };
        assert_eq!(w.lateral_distance(src, dst), None);
        let missing = LanePosition { road: "A", lane: -4, s: 10.0, t: 0.0 };
        assert_eq!(w.lateral_distance(missing, dst), None);
    }

    #[test]
    fn signs_ahead_sorted() {
        let w = world(&scenery(vec![
            straight("A", 0.0, 50.0)
                .signal("far", 40.0, -2.0, TrafficSignType::Stop, 0.0, &[-1])
                .signal("near", 30.0, -2.0, TrafficSignType::MaximumSpeedLimit, 27.8, &[-1])
                .build(),
        ]));
        let signs = w.traffic_signs_in_range("A", -1, 10.0, 50.0);
        let names: Vec<&str> = signs.iter().map(|(s, _)| s.name.as_str()).collect();
        assert_eq!(names, vec!["near", "far"]);
        assert!((signs[0].1 - 20.0).abs() < 1e-9);
        assert!((signs[1].1 - 30.0).abs() < 1e-9);

        assert_eq!(w.traffic_signs_in_range("A", -1, 10.0, 25.0).len(), 1);
        assert!(w.traffic_signs_in_range("A", -1, 45.0, 50.0).is_empty());
    }

    #[test]
    fn lane_geometry_queries() {
        let w = world(&two_roads());
        assert!((w.lane_width("A", -1, 10.0).unwrap() - 3.5).abs() < 1e-9);
        assert!(w.lane_curvature("A", -1, 10.0).unwrap().abs() < 1e-12);
        assert!(w.lane_direction("A", -1, 10.0).unwrap().abs() < 1e-12);
        assert!(w.lane_width("A", -9, 10.0).is_none());

        let (position, heading) = w.lane_to_world("A", -1, 10.0, 0.5).unwrap();
        assert!((position.x - 10.0).abs() < 1e-9);
        assert!((position.y - (CENTER + 0.5)).abs() < 1e-9);
        assert!(heading.abs() < 1e-12);
    }

    #[test]
    fn lane_info_bounds_and_category() {
        let w = world(&two_roads());
        let a = w.query_lane("A", -1, 10.0).unwrap();
        assert_eq!(a.stream_id, w.lane("A", -1, 0.0).id());
        assert_eq!(a.valid_from, 0.0);
        assert!((a.valid_until - 100.0).abs() < 1e-9);
        assert!(a.is_driving);
        let b = w.query_lane("B", -1, 10.0).unwrap();
        assert_eq!(b.stream_id, a.stream_id);
        assert!((b.valid_from + 50.0).abs() < 1e-9);
        assert!(w.query_lane("A", 3, 10.0).is_none());
    }

    #[test]
    fn rightmost_ignores_shoulder() {
        let w = world(&multi_lane());
        let lanes = w.query_lanes("M", 10.0);
        let ids: Vec<i32> = lanes.iter().map(|l| l.odr_id).collect();
        assert_eq!(ids, vec![1, -1, -2, -3]);
        assert_eq!(lanes[1].category, LaneCategory::Regular);
        assert_eq!(lanes[2].category, LaneCategory::Rightmost);
        assert!(!lanes[3].is_driving);
        assert!(w.query_lanes("nope", 10.0).is_empty());
    }
}

// ── Sector filter ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod sector {
    use std::f64::consts::{FRAC_PI_2, PI};

    use tw_core::Vector2d;

    use crate::{apply_sector_filter, Sector};

    const ORIGIN: Vector2d = Vector2d::ZERO;

    #[test]
    fn radius_is_inclusive() {
        let points = [Vector2d::new(10.0, 0.0), Vector2d::new(10.0 + 1e-6, 0.0)];
        let kept = apply_sector_filter(&points, ORIGIN, 10.0, FRAC_PI_2, -FRAC_PI_2);
        assert_eq!(kept, vec![&points[0]]);
    }

    #[test]
    fn boundary_angles_are_inclusive() {
        let on_left = Vector2d::new(3.0, 4.0);
        let on_right = Vector2d::new(4.0, -3.0);
        let left = on_left.heading();
        let right = on_right.heading();
        let beyond_left = on_left.rotate(1e-6);
        let beyond_right = on_right.rotate(-1e-6);
        let points = [on_left, on_right, beyond_left, beyond_right];
        let kept = apply_sector_filter(&points, ORIGIN, 10.0, left, right);
        assert_eq!(kept, vec![&points[0], &points[1]]);
    }

    #[test]
    fn window_wraps_through_pi() {
        let behind = Vector2d::new(-5.0, 0.0);
        let ahead = Vector2d::new(5.0, 0.0);
        let up_left = Vector2d::new(-5.0, 0.5);
        let points = [behind, ahead, up_left];
        // From 170° counter-clockwise to -170°.
        let kept = apply_sector_filter(&points, ORIGIN, 10.0, -PI + 0.17, PI - 0.17);
        assert_eq!(kept, vec![&points[0], &points[2]]);
    }

    #[test]
    fn degenerate_sectors_match_nothing() {
        let points = [Vector2d::new(1.0, 0.0)];
        assert!(apply_sector_filter(&points, ORIGIN, 0.0, 1.0, -1.0).is_empty());
        assert!(apply_sector_filter(&points, ORIGIN, -3.0, 1.0, -1.0).is_empty());
        assert!(apply_sector_filter(&points, ORIGIN, 10.0, 0.5, 0.5).is_empty());
        // -π and π are the same boundary.
        assert!(Sector::new(ORIGIN, 10.0, PI, -PI).is_none());
        assert!(Sector::circle(ORIGIN, 0.0).is_none());
    }

    #[test]
    fn origin_is_always_inside() {
        let sector = Sector::new(ORIGIN, 10.0, 0.1, -0.1).unwrap();
        assert!(sector.contains(ORIGIN));
        assert!(!sector.contains(Vector2d::new(0.0, 5.0)));
        let circle = Sector::circle(ORIGIN, 10.0).unwrap();
        assert!(circle.contains(Vector2d::new(0.0, -9.0)));
        assert!(!circle.contains(Vector2d::new(0.0, -11.0)));
    }
}

// ── Sensor view ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod sensor_view {
    use std::f64::consts::{FRAC_PI_2, TAU};

    use tw_core::{ObjectId, TrafficSignType, Vector2d};

    use super::helpers::*;
    use crate::SensorViewConfig;

    fn front_sensor() -> SensorViewConfig {
        SensorViewConfig { mounting: Vector2d::new(2.0, 0.0), mounting_yaw: 0.0, fov: FRAC_PI_2, range: 30.0 }
    }

    #[test]
    fn host_is_always_present() {
        let mut w = world(&two_roads());
        let host = spawn(&mut w, 10.0, CENTER);
        // The host's own centre lies behind the sensor.
        let view = w.sensor_view(&front_sensor(), host).unwrap();
        assert_eq!(view.host, host);
        assert_eq!(view.moving_objects.len(), 1);
        assert_eq!(view.moving_objects[0].id, host);
        assert!((view.origin.x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn only_objects_in_sector() {
        let mut w = world(&scenery(vec![
            straight("A", 0.0, 100.0)
                .signal("limit", 30.0, -2.0, TrafficSignType::MaximumSpeedLimit, 13.9, &[])
                .build(),
        ]));
        let host = spawn(&mut w, 10.0, CENTER);
        let ahead = spawn(&mut w, 25.0, CENTER);
        let behind = spawn(&mut w, 2.0, CENTER);
        let too_far = spawn(&mut w, 60.0, CENTER);

        let view = w.sensor_view(&front_sensor(), host).unwrap();
        let ids: Vec<ObjectId> = view.moving_objects.iter().map(|o| o.id).collect();
        assert!(ids.contains(&host));
        assert!(ids.contains(&ahead));
        assert!(!ids.contains(&behind));
        assert!(!ids.contains(&too_far));
        assert_eq!(view.traffic_signs.len(), 1);
        assert_eq!(view.lanes.len(), 1);

        let all_round = SensorViewConfig { fov: TAU, ..front_sensor() };
        let view = w.sensor_view(&all_round, host).unwrap();
        assert!(view.moving_objects.iter().any(|o| o.id == behind));
    }

    #[test]
    fn unknown_host_has_no_view() {
        let w = world(&two_roads());
        assert!(w.sensor_view(&front_sensor(), ObjectId(99)).is_none());
    }
}
