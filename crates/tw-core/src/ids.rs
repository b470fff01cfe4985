//! Strongly typed, zero-cost identifier wrappers.
//!
//! Topology ids (`LaneId`, `SectionId`, `RoadId`, `JunctionId`) are indices
//! into the network's arena `Vec`s and are handed out sequentially at build
//! time.  `ObjectId` is drawn from the world store's monotonic counter and is
//! never reused within a run.  `AgentId` indexes the facade's agent registry.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `false` for the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a lane in the network's lane arena.
    pub struct LaneId(u32);
}

typed_id! {
    /// Index of a lane section.  Doubles as the linear section index assigned
    /// across all roads during conversion.
    pub struct SectionId(u32);
}

typed_id! {
    /// Index of a road.  The scene's string id maps to this via
    /// `RoadNetwork::road_id`.
    pub struct RoadId(u32);
}

typed_id! {
    /// Index of a junction.
    pub struct JunctionId(u32);
}

typed_id! {
    /// Unique id of a world object or traffic sign.
    pub struct ObjectId(u64);
}

typed_id! {
    /// Index of an agent in the facade's registry.
    pub struct AgentId(u32);
}
