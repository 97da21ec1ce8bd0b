//! Status enums shared by entities, the database layer and the API
//!
//! Every enum round-trips through its SCREAMING_SNAKE_CASE text form, which
//! is also the representation stored in the database.

use serde::{Deserialize, Serialize};

use super::tier::{Level, Tier};

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum! {
    /// Membership lifecycle
    ApprovalStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
        Suspended => "SUSPENDED",
        Dismissed => "DISMISSED",
    }
}

impl ApprovalStatus {
    /// Statuses under which a bound seat counts as occupied
    pub fn occupies_seat(&self) -> bool {
        matches!(self, Self::Approved | Self::Suspended)
    }

    /// Terminal negative states; entering one always vacates the seat
    pub fn is_terminal_negative(&self) -> bool {
        matches!(self, Self::Rejected | Self::Dismissed)
    }
}

text_enum! {
    /// Derived activity classification
    Standing {
        Active => "ACTIVE",
        Irregular => "IRREGULAR",
        Inactive => "INACTIVE",
    }
}

text_enum! {
    DisciplinaryType {
        Warning => "WARNING",
        Reprimand => "REPRIMAND",
        Suspension => "SUSPENSION",
        Dismissal => "DISMISSAL",
    }
}

text_enum! {
    ActionStatus {
        Active => "ACTIVE",
        PendingApproval => "PENDING_APPROVAL",
        Resolved => "RESOLVED",
    }
}

text_enum! {
    ActionApproval {
        NotRequired => "NOT_REQUIRED",
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

text_enum! {
    /// Direction a report travels up the hierarchy
    TierPath {
        WardToLga => "WARD_TO_LGA",
        LgaToZonal => "LGA_TO_ZONAL",
        ZonalToState => "ZONAL_TO_STATE",
    }
}

impl TierPath {
    /// Tier a member must hold to file a report on this path
    pub fn submitter_tier(&self) -> Tier {
        match self {
            Self::WardToLga => Tier::Ward,
            Self::LgaToZonal => Tier::Lga,
            Self::ZonalToState => Tier::Zonal,
        }
    }

    /// Level whose coordinator receives the report
    pub fn receiver_level(&self) -> Level {
        match self {
            Self::WardToLga => Level::Lga,
            Self::LgaToZonal => Level::Zone,
            Self::ZonalToState => Level::State,
        }
    }

    /// Path an approved report escalates onto; `None` at the top tier
    pub fn next(&self) -> Option<TierPath> {
        match self {
            Self::WardToLga => Some(Self::LgaToZonal),
            Self::LgaToZonal => Some(Self::ZonalToState),
            Self::ZonalToState => None,
        }
    }
}

text_enum! {
    ReportStatus {
        Draft => "DRAFT",
        Submitted => "SUBMITTED",
        Approved => "APPROVED",
        Flagged => "FLAGGED",
        Rejected => "REJECTED",
        Escalated => "ESCALATED",
    }
}

text_enum! {
    /// Verdict a reviewer can hand down on a submitted report
    ReviewOutcome {
        Approved => "APPROVED",
        Flagged => "FLAGGED",
        Rejected => "REJECTED",
    }
}

impl From<ReviewOutcome> for ReportStatus {
    fn from(outcome: ReviewOutcome) -> Self {
        match outcome {
            ReviewOutcome::Approved => Self::Approved,
            ReviewOutcome::Flagged => Self::Flagged,
            ReviewOutcome::Rejected => Self::Rejected,
        }
    }
}

text_enum! {
    ContentKind {
        Campaign => "CAMPAIGN",
        Photo => "PHOTO",
        Video => "VIDEO",
    }
}

text_enum! {
    PublishState {
        Draft => "DRAFT",
        Pending => "PENDING",
        Published => "PUBLISHED",
        Rejected => "REJECTED",
    }
}
