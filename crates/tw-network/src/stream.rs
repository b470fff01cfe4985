//! Lane-stream traversal.
//!
//! A lane stream is the chain of lanes a vehicle drives through without a
//! lane change, crossing section and road boundaries.  [`LaneStream`] walks
//! that chain from a start lane, forward or backward, and reports for each
//! lane where its entry edge lies in a single running distance frame.
//!
//! Traversal is bounded by distance, never by visited set: on a roundabout
//! the same lane is reported again on every lap until `max_length` is
//! exceeded.

use crate::{Lane, RoadNetwork};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreamDirection {
    Forward,
    Backward,
}

impl StreamDirection {
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            StreamDirection::Forward => StreamDirection::Backward,
            StreamDirection::Backward => StreamDirection::Forward,
        }
    }
}

/// One lane visited by a [`LaneStream`].
#[derive(Copy, Clone, Debug)]
pub struct StreamStep<'a> {
    pub lane:   &'a Lane,
    /// Running distance at which the walk enters `lane`.  The start lane is
    /// entered at `0.0`.
    pub offset: f64,
}

impl StreamStep<'_> {
    /// Running distance at which the walk leaves the lane.
    #[inline]
    pub fn end(&self) -> f64 {
        self.offset + self.lane.length()
    }
}

/// Distance of road coordinate `s` from the edge where a walk in
/// `direction` enters `lane`.
#[inline]
pub fn stream_position(lane: &Lane, s: f64, direction: StreamDirection) -> f64 {
    match direction {
        StreamDirection::Forward => lane.stream_offset(s),
        StreamDirection::Backward => lane.length() - lane.stream_offset(s),
    }
}

/// Iterator over the lanes of a stream.  See the module docs.
pub struct LaneStream<'a> {
    network:    &'a RoadNetwork,
    current:    Option<&'a Lane>,
    offset:     f64,
    max_length: f64,
    direction:  StreamDirection,
    /// Consecutive steps that did not advance the running distance.  A cycle
    /// made only of lanes without geometry would otherwise never reach the
    /// distance bound.
    stalled:    usize,
}

impl<'a> LaneStream<'a> {
    /// Walk from `start` (inclusive) until the running distance exceeds
    /// `max_length` or the chain ends.
    pub fn new(
        network: &'a RoadNetwork,
        start: &'a Lane,
        direction: StreamDirection,
        max_length: f64,
    ) -> Self {
        Self {
            network,
            current: start.exists().then_some(start),
            offset: 0.0,
            max_length,
            direction,
            stalled: 0,
        }
    }

    pub fn forward(network: &'a RoadNetwork, start: &'a Lane, max_length: f64) -> Self {
        Self::new(network, start, StreamDirection::Forward, max_length)
    }

    pub fn backward(network: &'a RoadNetwork, start: &'a Lane, max_length: f64) -> Self {
        Self::new(network, start, StreamDirection::Backward, max_length)
    }
}

impl<'a> Iterator for LaneStream<'a> {
    type Item = StreamStep<'a>;

    fn next(&mut self) -> Option<StreamStep<'a>> {
        let lane = self.current?;
        if self.offset > self.max_length || self.stalled > self.network.lane_count() {
            self.current = None;
            return None;
        }

        let step = StreamStep { lane, offset: self.offset };

        let links = match self.direction {
            StreamDirection::Forward => lane.stream_next(),
            StreamDirection::Backward => lane.stream_previous(),
        };
        self.current = links
            .first()
            .map(|&id| self.network.lane(id))
            .filter(|next| next.exists());

        let length = lane.length();
        if length > 0.0 {
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.offset += length;

        Some(step)
    }
}

impl RoadNetwork {
    /// Lane stream starting at `start`.  Unknown ids yield an empty stream.
    pub fn stream(
        &self,
        start: tw_core::LaneId,
        direction: StreamDirection,
        max_length: f64,
    ) -> LaneStream<'_> {
        LaneStream::new(self, self.lane(start), direction, max_length)
    }
}
