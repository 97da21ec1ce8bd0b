//! Seed dataset loaded once at startup
//!
//! IDs are assigned sequentially in declaration order, so seeding the same
//! dataset twice yields the same IDs and storage can insert idempotently.

mod geography;

use crate::entities::{Jurisdiction, Seat};
use crate::value_objects::{Level, SeatFlags, Snowflake, Tier};

use geography::KEBBI_ZONES;

/// First ID handed to seats; jurisdictions count up from 1
const SEAT_ID_BASE: i64 = 1_000_000;

pub const STATE_NAME: &str = "Kebbi State";
pub const TOP_SEAT_TITLE: &str = "President";
pub const PUBLISHER_SEAT_TITLE: &str = "Director of Media & Publicity";

const STATE_SEATS: &[&str] = &[
    TOP_SEAT_TITLE,
    "Vice President",
    "General Secretary",
    "Assistant General Secretary",
    "State Supervisor",
    "Legal & Ethics Adviser",
    "Treasurer",
    "Financial Secretary",
    "Director of Mobilization",
    "Assistant Director of Mobilization",
    "Organizing Secretary",
    "Assistant Organizing Secretary",
    "Auditor General",
    "Welfare Officer",
    "Youth Development & Empowerment Officer",
    "Women Leader",
    "Assistant Women Leader",
    PUBLISHER_SEAT_TITLE,
    "Assistant Director of Media & Publicity",
    "Public Relations & Community Engagement Officer",
];

const ZONAL_SEATS: &[&str] = &[
    "Zonal Coordinator",
    "Zonal Secretary",
    "Zonal Publicity Officer",
];

const LGA_SEATS: &[&str] = &[
    "LGA Coordinator",
    "Secretary",
    "Organizing Secretary",
    "Treasurer",
    "Publicity Officer",
    "LGA Supervisor",
    "Women Leader",
    "Welfare Officer",
    "Director of Contact and Mobilization",
    "LGA Adviser",
];

const WARD_SEATS: &[&str] = &[
    "Ward Coordinator",
    "Secretary",
    "Organizing Secretary",
    "Treasurer",
    "Publicity Officer",
    "Financial Secretary",
    "Ward Supervisor",
    "Ward Adviser",
];

/// Complete seed: geography plus seat catalog
#[derive(Debug, Clone)]
pub struct SeedData {
    pub jurisdictions: Vec<Jurisdiction>,
    pub seats: Vec<Seat>,
}

impl SeedData {
    pub fn kebbi() -> Self {
        Self {
            jurisdictions: kebbi_jurisdictions(),
            seats: seat_catalog(),
        }
    }
}

/// Kebbi State with its 3 zones, 21 LGAs and their wards
pub fn kebbi_jurisdictions() -> Vec<Jurisdiction> {
    let mut next_id = 0_i64;
    let mut mint = || {
        next_id += 1;
        Snowflake::new(next_id)
    };

    let state = Jurisdiction::new(mint(), Level::State, STATE_NAME, None);
    let state_id = state.id;
    let mut nodes = vec![state];

    for (zone_name, lgas) in KEBBI_ZONES {
        let zone = Jurisdiction::new(mint(), Level::Zone, *zone_name, Some(state_id));
        let zone_id = zone.id;
        nodes.push(zone);

        for (lga_name, wards) in *lgas {
            let lga = Jurisdiction::new(mint(), Level::Lga, *lga_name, Some(zone_id));
            let lga_id = lga.id;
            nodes.push(lga);

            for ward_name in *wards {
                nodes.push(Jurisdiction::new(mint(), Level::Ward, *ward_name, Some(lga_id)));
            }
        }
    }

    nodes
}

/// Seat catalog for all four tiers
///
/// Seat 1 of every tier is its coordinator; the President is also the top,
/// protected seat and the Director of Media & Publicity is the publisher.
pub fn seat_catalog() -> Vec<Seat> {
    let tiers: [(Tier, &[&str]); 4] = [
        (Tier::State, STATE_SEATS),
        (Tier::Zonal, ZONAL_SEATS),
        (Tier::Lga, LGA_SEATS),
        (Tier::Ward, WARD_SEATS),
    ];

    let mut seats = Vec::new();
    let mut next_id = SEAT_ID_BASE;
    for (tier, titles) in tiers {
        for (index, title) in titles.iter().enumerate() {
            next_id += 1;
            let seat_number = index as i32 + 1;
            let mut flags = SeatFlags::empty();
            if seat_number == 1 {
                flags |= SeatFlags::COORDINATOR;
            }
            if tier == Tier::State && *title == TOP_SEAT_TITLE {
                flags |= SeatFlags::TOP | SeatFlags::PROTECTED;
            }
            if tier == Tier::State && *title == PUBLISHER_SEAT_TITLE {
                flags |= SeatFlags::PUBLISHER;
            }
            seats.push(Seat::new(Snowflake::new(next_id), tier, seat_number, *title).with_flags(flags));
        }
    }
    seats
}
