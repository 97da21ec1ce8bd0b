//! Jurisdiction and seat model -> entity

use kpn_core::entities::{Jurisdiction, Seat};
use kpn_core::error::DomainError;
use kpn_core::{Level, SeatFlags, Snowflake, Tier};

use super::{decode, snowflake};
use crate::models::{JurisdictionModel, SeatModel};

impl TryFrom<JurisdictionModel> for Jurisdiction {
    type Error = DomainError;

    fn try_from(model: JurisdictionModel) -> Result<Self, Self::Error> {
        Ok(Jurisdiction {
            id: Snowflake::new(model.id),
            level: decode("jurisdictions.level", &model.level, Level::parse)?,
            name: model.name,
            parent_id: snowflake(model.parent_id),
        })
    }
}

impl TryFrom<SeatModel> for Seat {
    type Error = DomainError;

    fn try_from(model: SeatModel) -> Result<Self, Self::Error> {
        Ok(Seat {
            id: Snowflake::new(model.id),
            tier: decode("seats.tier", &model.tier, Tier::parse)?,
            title: model.title,
            seat_number: model.seat_number,
            flags: SeatFlags::from_i64(model.flags),
        })
    }
}
