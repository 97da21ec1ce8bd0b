//! Hierarchy ladders
//!
//! Three related orderings live here:
//! - [`Level`]: the depth of a node in the geographic tree (State, Zone, LGA, Ward)
//! - [`Tier`]: a member's role tier on the promotion ladder
//! - [`Rung`]: a member's effective authority, which splits the STATE tier
//!   into ordinary executives and the single top seat

use serde::{Deserialize, Serialize};
use std::fmt;

/// Depth of a jurisdiction node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    State,
    Zone,
    Lga,
    Ward,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => "STATE",
            Self::Zone => "ZONE",
            Self::Lga => "LGA",
            Self::Ward => "WARD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "STATE" => Some(Self::State),
            "ZONE" | "ZONAL" => Some(Self::Zone),
            "LGA" => Some(Self::Lga),
            "WARD" => Some(Self::Ward),
            _ => None,
        }
    }

    /// Tier of the seats that govern a node of this level
    pub fn seat_tier(&self) -> Tier {
        match self {
            Self::State => Tier::State,
            Self::Zone => Tier::Zonal,
            Self::Lga => Tier::Lga,
            Self::Ward => Tier::Ward,
        }
    }

    /// Level a node of this level must hang from
    pub fn parent(&self) -> Option<Level> {
        match self {
            Self::State => None,
            Self::Zone => Some(Self::State),
            Self::Lga => Some(Self::Zone),
            Self::Ward => Some(Self::Lga),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role tier on the promotion ladder: GENERAL < WARD < LGA < ZONAL < STATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    General,
    Ward,
    Lga,
    Zonal,
    State,
}

impl Tier {
    pub const LADDER: [Tier; 5] = [
        Tier::General,
        Tier::Ward,
        Tier::Lga,
        Tier::Zonal,
        Tier::State,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Ward => "WARD",
            Self::Lga => "LGA",
            Self::Zonal => "ZONAL",
            Self::State => "STATE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GENERAL" => Some(Self::General),
            "WARD" => Some(Self::Ward),
            "LGA" => Some(Self::Lga),
            "ZONAL" | "ZONE" => Some(Self::Zonal),
            "STATE" => Some(Self::State),
            _ => None,
        }
    }

    /// Jurisdiction level a seat of this tier is scoped to
    ///
    /// GENERAL members hold no seat; STATE seats are organization-wide.
    pub fn seat_level(&self) -> Option<Level> {
        match self {
            Self::General | Self::State => None,
            Self::Ward => Some(Level::Ward),
            Self::Lga => Some(Level::Lga),
            Self::Zonal => Some(Level::Zone),
        }
    }

    pub fn is_leadership(&self) -> bool {
        !matches!(self, Self::General)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective authority of a member
///
/// Only APPROVED members carry authority above [`Rung::General`]. The
/// ordering is total, so "outranks" is a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rung {
    General,
    Ward,
    Lga,
    Zonal,
    StateExecutive,
    Top,
}

impl Rung {
    pub const ALL: [Rung; 6] = [
        Rung::General,
        Rung::Ward,
        Rung::Lga,
        Rung::Zonal,
        Rung::StateExecutive,
        Rung::Top,
    ];

    pub fn from_tier(tier: Tier, holds_top_seat: bool) -> Self {
        if holds_top_seat {
            return Self::Top;
        }
        match tier {
            Tier::General => Self::General,
            Tier::Ward => Self::Ward,
            Tier::Lga => Self::Lga,
            Tier::Zonal => Self::Zonal,
            Tier::State => Self::StateExecutive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "GENERAL",
            Self::Ward => "WARD",
            Self::Lga => "LGA",
            Self::Zonal => "ZONAL",
            Self::StateExecutive => "STATE_EXECUTIVE",
            Self::Top => "TOP",
        }
    }

    /// Jurisdiction level this rung's authority is confined to
    pub fn scope(&self) -> Option<Level> {
        match self {
            Self::Ward => Some(Level::Ward),
            Self::Lga => Some(Level::Lga),
            Self::Zonal => Some(Level::Zone),
            Self::General | Self::StateExecutive | Self::Top => None,
        }
    }
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ladder_is_ordered() {
        for pair in Tier::LADDER.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_tier_parse_roundtrip_and_aliases() {
        for tier in Tier::LADDER {
            assert_eq!(Tier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(Tier::parse("zone"), Some(Tier::Zonal));
        assert_eq!(Tier::parse("president"), None);
    }

    #[test]
    fn test_seat_levels() {
        assert_eq!(Tier::Ward.seat_level(), Some(Level::Ward));
        assert_eq!(Tier::Zonal.seat_level(), Some(Level::Zone));
        assert_eq!(Tier::State.seat_level(), None);
        assert_eq!(Tier::General.seat_level(), None);
    }

    #[test]
    fn test_level_parents() {
        assert_eq!(Level::Ward.parent(), Some(Level::Lga));
        assert_eq!(Level::Lga.parent(), Some(Level::Zone));
        assert_eq!(Level::Zone.parent(), Some(Level::State));
        assert_eq!(Level::State.parent(), None);
    }

    #[test]
    fn test_rung_from_tier() {
        assert_eq!(Rung::from_tier(Tier::State, false), Rung::StateExecutive);
        assert_eq!(Rung::from_tier(Tier::State, true), Rung::Top);
        assert_eq!(Rung::from_tier(Tier::Lga, false), Rung::Lga);
        assert!(Rung::Top > Rung::StateExecutive);
        assert!(Rung::Ward > Rung::General);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Tier::Lga).unwrap(), "\"LGA\"");
        assert_eq!(
            serde_json::to_string(&Rung::StateExecutive).unwrap(),
            "\"STATE_EXECUTIVE\""
        );
    }
}
