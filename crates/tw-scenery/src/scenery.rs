//! The scene root.

use std::collections::HashSet;

use crate::{SceneryError, SceneryJunction, SceneryResult, SceneryRoad};

/// Everything the world layer needs to build its static topology.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenery {
    pub roads:     Vec<SceneryRoad>,
    pub junctions: Vec<SceneryJunction>,
}

impl Scenery {
    pub fn road(&self, id: &str) -> Option<&SceneryRoad> {
        self.roads.iter().find(|r| r.id == id)
    }

    pub fn junction(&self, id: &str) -> Option<&SceneryJunction> {
        self.junctions.iter().find(|j| j.id == id)
    }

    /// Structural checks that do not need the link graph.
    ///
    /// Link consistency (missing targets, self references, unsupported link
    /// types) is the converter's concern and fails there.
    pub fn validate(&self) -> SceneryResult<()> {
        let mut seen = HashSet::with_capacity(self.roads.len());
        for road in &self.roads {
            if !seen.insert(road.id.as_str()) {
                return Err(SceneryError::DuplicateRoad(road.id.clone()));
            }
            if road.lane_sections.is_empty() {
                return Err(SceneryError::NoLaneSections(road.id.clone()));
            }
            if let Some(index) = road
                .lane_sections
                .windows(2)
                .position(|w| w[1].start <= w[0].start)
            {
                return Err(SceneryError::UnsortedSections {
                    road:  road.id.clone(),
                    index: index + 1,
                });
            }
            if let Some(g) = road.geometries.iter().find(|g| !(g.length > 0.0)) {
                return Err(SceneryError::DegenerateGeometry { road: road.id.clone(), s: g.s });
            }
        }

        let mut junctions = HashSet::with_capacity(self.junctions.len());
        for junction in &self.junctions {
            if !junctions.insert(junction.id.as_str()) {
                return Err(SceneryError::DuplicateJunction(junction.id.clone()));
            }
        }
        Ok(())
    }
}
