//! Bitflag sets for seats and for the capability table
//!
//! Both are stored as BIGINT in the database.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Designations attached to a seat in the catalog
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SeatFlags: u32 {
        /// The single top admin seat
        const TOP         = 1 << 0;
        /// Immune to demotion, non-admin dismissal and swaps
        const PROTECTED   = 1 << 1;
        /// Receives reports addressed to its tier
        const COORDINATOR = 1 << 2;
        /// Publishes campaigns and media
        const PUBLISHER   = 1 << 3;
    }
}

bitflags! {
    /// What an actor may do, independent of the specific target
    ///
    /// Target-specific rules (jurisdiction coverage, outranking) are checked
    /// by the caller after the capability gate passes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        const AUTHOR_CONTENT     = 1 << 0;
        const SUBMIT_REPORTS     = 1 << 1;
        const ISSUE_DISCIPLINE   = 1 << 2;
        const RECORD_DUTY        = 1 << 3;
        const REVIEW_REPORTS     = 1 << 4;
        const APPROVE_MEMBERS    = 1 << 5;
        const RESOLVE_DISCIPLINE = 1 << 6;
        const MANAGE_POSITIONS   = 1 << 7;
        /// Bypass every capability check
        const ADMINISTRATOR      = 1 << 8;
    }
}

impl SeatFlags {
    #[inline]
    pub fn to_i64(self) -> i64 {
        i64::from(self.bits())
    }

    #[inline]
    pub fn from_i64(bits: i64) -> Self {
        SeatFlags::from_bits_truncate(bits as u32)
    }
}

impl Capabilities {
    /// Administrators pass every check
    #[inline]
    pub fn has(&self, capability: Capabilities) -> bool {
        self.contains(Capabilities::ADMINISTRATOR) || self.contains(capability)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

impl Serialize for SeatFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let names: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        names.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SeatFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(SeatFlags::empty(), |acc, name| {
            SeatFlags::from_name(name)
                .map(|flag| acc | flag)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown seat flag: {name}")))
        })
    }
}
