//! Direction normalization across road clusters.
//!
//! Road links do not promise a consistent "forward": road A may end where
//! road B ends too, so driving on through A means driving B backwards.  This
//! pass walks each cluster of roads connected by road-to-road links and
//! assigns every road a boolean saying whether its own s-direction is the
//! cluster's stream direction.
//!
//! Composition rule for a link from `r` to `n`:
//!
//! | link type   | contact on `n` | `dir(n)`     |
//! |-------------|----------------|--------------|
//! | Successor   | Start          | `dir(r)`     |
//! | Successor   | End            | `!dir(r)`    |
//! | Predecessor | End            | `dir(r)`     |
//! | Predecessor | Start          | `!dir(r)`    |
//!
//! Links to junctions carry no contact point and do not propagate; the
//! connecting roads inside the junction link to the outer roads themselves.

use std::collections::VecDeque;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use tw_scenery::{ContactPoint, ElementType, LinkType, Scenery, SceneryRoad};

use crate::{NetworkError, NetworkResult};

/// Result of [`mark_directions`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectionMap {
    /// Road id → `true` if the road's s-direction is its stream direction.
    pub directions:     FxHashMap<String, bool>,
    /// The first road of each cluster, in discovery order.
    pub defining_roads: Vec<String>,
}

impl DirectionMap {
    /// Direction of `road`; roads never seen default to `true`.
    pub fn direction(&self, road: &str) -> bool {
        self.directions.get(road).copied().unwrap_or(true)
    }

    pub fn cluster_count(&self) -> usize {
        self.defining_roads.len()
    }
}

/// `true` if following this link reverses the direction.
#[inline]
pub fn link_flips(link_type: LinkType, contact: ContactPoint) -> bool {
    matches!(
        (link_type, contact),
        (LinkType::Successor, ContactPoint::End) | (LinkType::Predecessor, ContactPoint::Start)
    )
}

fn road_neighbours<'a>(
    road: &'a SceneryRoad,
    scenery: &Scenery,
) -> NetworkResult<Vec<(&'a str, bool)>> {
    let mut out = Vec::new();
    for link in &road.links {
        if link.link_type == LinkType::Neighbor {
            return Err(NetworkError::UnsupportedLinkType(road.id.clone()));
        }
        if link.element_type != ElementType::Road {
            continue;
        }
        if link.element_id == road.id {
            return Err(NetworkError::SelfReferencingLink(road.id.clone()));
        }
        if scenery.road(&link.element_id).is_none() {
            return Err(NetworkError::UnknownRoad(link.element_id.clone()));
        }
        out.push((link.element_id.as_str(), link_flips(link.link_type, link.contact_point)));
    }
    Ok(out)
}

/// Assign a stream direction to every road of `scenery`.
///
/// Roads are visited in scenery order; each road not yet reached starts a
/// new cluster and is direction-defining (`true`).  The link graph is
/// treated as undirected, so a link declared on only one of its two roads
/// still joins them.  When a cycle demands contradicting directions the
/// first assignment is kept and the conflict is logged.
pub fn mark_directions(scenery: &Scenery) -> NetworkResult<DirectionMap> {
    let mut adjacency: FxHashMap<&str, Vec<(&str, bool)>> = FxHashMap::default();
    for road in &scenery.roads {
        adjacency.entry(road.id.as_str()).or_default();
        for (target, flip) in road_neighbours(road, scenery)? {
            adjacency.entry(road.id.as_str()).or_default().push((target, flip));
            adjacency.entry(target).or_default().push((road.id.as_str(), flip));
        }
    }

    let mut map = DirectionMap::default();
    let mut queue = VecDeque::new();

    for road in &scenery.roads {
        if map.directions.contains_key(&road.id) {
            continue;
        }
        map.directions.insert(road.id.clone(), true);
        map.defining_roads.push(road.id.clone());
        queue.push_back(road.id.as_str());

        while let Some(current) = queue.pop_front() {
            let dir = map.direction(current);
            for &(next, flip) in adjacency.get(current).map(Vec::as_slice).unwrap_or_default() {
                let wanted = dir ^ flip;
                match map.directions.get(next) {
                    Some(&have) if have != wanted => {
                        warn!("road '{next}' reached with conflicting direction from '{current}', keeping first assignment");
                    }
                    Some(_) => {}
                    None => {
                        map.directions.insert(next.to_owned(), wanted);
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    debug!(
        "marked directions of {} roads in {} clusters",
        map.directions.len(),
        map.cluster_count()
    );
    Ok(map)
}
