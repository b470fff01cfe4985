//! Unit tests for tw-scenery.

#[cfg(test)]
mod polynomials {
    use crate::{active_polynomial, Polynomial};

    #[test]
    fn cubic_evaluation() {
        let p = Polynomial { s: 0.0, a: 1.0, b: 2.0, c: 3.0, d: 4.0 };
        assert_eq!(p.evaluate(0.0), 1.0);
        assert_eq!(p.evaluate(1.0), 10.0);
        assert_eq!(p.evaluate(2.0), 1.0 + 4.0 + 12.0 + 32.0);
    }

    #[test]
    fn last_segment_starting_before_offset_is_active() {
        let list = [
            Polynomial::constant(0.0, 3.0),
            Polynomial { s: 10.0, a: 3.0, b: 0.1, c: 0.0, d: 0.0 },
            Polynomial::constant(20.0, 4.0),
        ];
        assert_eq!(active_polynomial(&list, 5.0), 3.0);
        assert_eq!(active_polynomial(&list, 10.0), 3.0);
        assert!((active_polynomial(&list, 15.0) - 3.5).abs() < 1e-12);
        assert_eq!(active_polynomial(&list, 25.0), 4.0);
    }

    #[test]
    fn empty_list_is_zero() {
        assert_eq!(active_polynomial(&[], 5.0), 0.0);
    }
}

#[cfg(test)]
mod roads {
    use tw_core::LaneType;

    use crate::{ContactPoint, LinkType, RoadBuilder};

    #[test]
    fn builder_appends_geometries_in_sequence() {
        let road = RoadBuilder::new("R")
            .line(0.0, 0.0, 0.0, 30.0)
            .arc(30.0, 0.0, 0.0, 20.0, 0.01)
            .build();
        assert_eq!(road.geometries[1].s, 30.0);
        assert_eq!(road.length(), 50.0);
    }

    #[test]
    fn section_lengths_and_lookup() {
        let road = RoadBuilder::new("R")
            .line(0.0, 0.0, 0.0, 100.0)
            .section(0.0)
            .lane(-1, LaneType::Driving, 3.5)
            .section(40.0)
            .lane(-1, LaneType::Driving, 3.5)
            .build();
        assert_eq!(road.section_length(0), 40.0);
        assert_eq!(road.section_length(1), 60.0);
        assert_eq!(road.section_index_at(0.0), Some(0));
        assert_eq!(road.section_index_at(39.9), Some(0));
        assert_eq!(road.section_index_at(40.0), Some(1));
        assert_eq!(road.section_index_at(150.0), Some(1));
    }

    #[test]
    fn links_are_recorded() {
        let road = RoadBuilder::new("R")
            .successor_road("S", ContactPoint::End)
            .predecessor_junction("J")
            .build();
        assert_eq!(road.link(LinkType::Successor).unwrap().element_id, "S");
        assert_eq!(road.link(LinkType::Predecessor).unwrap().element_id, "J");
        assert!(road.link(LinkType::Neighbor).is_none());
    }
}

#[cfg(test)]
mod validation {
    use tw_core::LaneType;

    use crate::{RoadBuilder, Scenery, SceneryError, SceneryJunction};

    fn road(id: &str) -> crate::SceneryRoad {
        RoadBuilder::new(id)
            .line(0.0, 0.0, 0.0, 10.0)
            .section(0.0)
            .lane(-1, LaneType::Driving, 3.0)
            .build()
    }

    #[test]
    fn valid_scene_passes() {
        let scenery = Scenery { roads: vec![road("A"), road("B")], junctions: vec![] };
        assert!(scenery.validate().is_ok());
    }

    #[test]
    fn duplicate_road_rejected() {
        let scenery = Scenery { roads: vec![road("A"), road("A")], junctions: vec![] };
        assert_eq!(scenery.validate(), Err(SceneryError::DuplicateRoad("A".into())));
    }

    #[test]
    fn road_without_sections_rejected() {
        let bare = RoadBuilder::new("A").line(0.0, 0.0, 0.0, 10.0).build();
        let scenery = Scenery { roads: vec![bare], junctions: vec![] };
        assert_eq!(scenery.validate(), Err(SceneryError::NoLaneSections("A".into())));
    }

    #[test]
    fn unsorted_sections_rejected() {
        let r = RoadBuilder::new("A")
            .line(0.0, 0.0, 0.0, 10.0)
            .section(5.0)
            .section(2.0)
            .build();
        let scenery = Scenery { roads: vec![r], junctions: vec![] };
        assert!(matches!(scenery.validate(), Err(SceneryError::UnsortedSections { index: 1, .. })));
    }

    #[test]
    fn duplicate_junction_rejected() {
        let j = SceneryJunction { id: "J".into(), connections: vec![] };
        let scenery = Scenery { roads: vec![road("A")], junctions: vec![j.clone(), j] };
        assert_eq!(scenery.validate(), Err(SceneryError::DuplicateJunction("J".into())));
    }
}
