//! World configuration.

use crate::{CoreError, CoreResult, LaneType};

/// Tunables of the world data layer.
///
/// Built by the host application (config parsing is a collaborator's job)
/// and handed to the facade once.  `Default` gives the values the query
/// engine was calibrated with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Upper bound in metres for every otherwise unbounded lane-stream walk.
    /// Lane graphs may be cyclic, so this is what guarantees termination.
    pub event_horizon: f64,

    /// Distance between two geometry samples along the reference line.
    pub sampling_step: f64,

    /// Lane types reported as driving lanes by `QueryLane`.
    pub driving_lane_types: Vec<LaneType>,

    /// Seed of the stochastics service.
    pub seed: u64,
}

impl WorldConfig {
    /// Reject values that would make traversals or sampling degenerate.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.event_horizon > 0.0) {
            return Err(CoreError::Config(format!(
                "event_horizon must be positive, got {}",
                self.event_horizon
            )));
        }
        if !(self.sampling_step > 0.0) || !self.sampling_step.is_finite() {
            return Err(CoreError::Config(format!(
                "sampling_step must be positive and finite, got {}",
                self.sampling_step
            )));
        }
        Ok(())
    }

    /// `true` if `lane_type` counts as a driving lane.
    #[inline]
    pub fn is_driving(&self, lane_type: LaneType) -> bool {
        self.driving_lane_types.contains(&lane_type)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            event_horizon: 1_000_000.0,
            sampling_step: 3.0,
            driving_lane_types: vec![
                LaneType::Driving,
                LaneType::Entry,
                LaneType::Exit,
                LaneType::OnRamp,
                LaneType::OffRamp,
            ],
            seed: 0,
        }
    }
}
