//! Semantic kind enums shared by the scene description, the network and the
//! world store.

/// Semantic type of a lane.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LaneType {
    #[default]
    Undefined,
    Driving,
    Shoulder,
    Stop,
    Biking,
    Sidewalk,
    Border,
    Restricted,
    Parking,
    Median,
    Roadworks,
    Tram,
    Rail,
    Entry,
    Exit,
    OnRamp,
    OffRamp,
    ConnectingRamp,
    Bidirectional,
    None,
}

impl LaneType {
    /// Human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            LaneType::Undefined      => "undefined",
            LaneType::Driving        => "driving",
            LaneType::Shoulder       => "shoulder",
            LaneType::Stop           => "stop",
            LaneType::Biking         => "biking",
            LaneType::Sidewalk       => "sidewalk",
            LaneType::Border         => "border",
            LaneType::Restricted     => "restricted",
            LaneType::Parking        => "parking",
            LaneType::Median         => "median",
            LaneType::Roadworks      => "roadworks",
            LaneType::Tram           => "tram",
            LaneType::Rail           => "rail",
            LaneType::Entry          => "entry",
            LaneType::Exit           => "exit",
            LaneType::OnRamp         => "onRamp",
            LaneType::OffRamp        => "offRamp",
            LaneType::ConnectingRamp => "connectingRamp",
            LaneType::Bidirectional  => "bidirectional",
            LaneType::None           => "none",
        }
    }
}

impl std::fmt::Display for LaneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of a traffic sign.  The numeric payload (speed, distance, …) lives
/// in the sign's `value`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficSignType {
    #[default]
    Undefined,
    MaximumSpeedLimit,
    EndOfMaximumSpeedLimit,
    MinimumSpeedLimit,
    Stop,
    GiveWay,
    DoNotEnter,
    OvertakingBanBegin,
    OvertakingBanEnd,
    HighwayBegin,
    HighwayEnd,
    TownBegin,
    TownEnd,
    AnnounceHighwayExit,
    PedestrianCrossing,
}

/// Turn-indicator state of a moving object.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndicatorState {
    #[default]
    Off,
    Left,
    Right,
    Warning,
}
