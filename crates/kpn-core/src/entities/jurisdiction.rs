//! Jurisdiction and seat entities - the seeded, read-only catalog

use serde::{Deserialize, Serialize};

use crate::value_objects::{Level, SeatFlags, Snowflake, Tier};

/// A node in the State ⊃ Zone ⊃ LGA ⊃ Ward tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jurisdiction {
    pub id: Snowflake,
    pub level: Level,
    pub name: String,
    pub parent_id: Option<Snowflake>,
}

impl Jurisdiction {
    pub fn new(id: Snowflake, level: Level, name: impl Into<String>, parent_id: Option<Snowflake>) -> Self {
        Self {
            id,
            level,
            name: name.into(),
            parent_id,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A named leadership position (role definition)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: Snowflake,
    pub tier: Tier,
    pub title: String,
    pub seat_number: i32,
    pub flags: SeatFlags,
}

impl Seat {
    pub fn new(id: Snowflake, tier: Tier, seat_number: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            tier,
            title: title.into(),
            seat_number,
            flags: SeatFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: SeatFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_top(&self) -> bool {
        self.flags.contains(SeatFlags::TOP)
    }

    #[inline]
    pub fn is_protected(&self) -> bool {
        self.flags.contains(SeatFlags::PROTECTED)
    }

    #[inline]
    pub fn is_coordinator(&self) -> bool {
        self.flags.contains(SeatFlags::COORDINATOR)
    }

    #[inline]
    pub fn is_publisher(&self) -> bool {
        self.flags.contains(SeatFlags::PUBLISHER)
    }
}
