//! Value objects - immutable types that represent domain concepts

mod flags;
mod snowflake;
mod status;
mod tier;

pub use flags::{Capabilities, SeatFlags};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use status::{
    ActionApproval, ActionStatus, ApprovalStatus, ContentKind, DisciplinaryType, PublishState,
    ReportStatus, ReviewOutcome, Standing, TierPath,
};
pub use tier::{Level, Rung, Tier};
