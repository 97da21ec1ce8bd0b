//! Member model -> entity

use kpn_core::entities::Member;
use kpn_core::error::DomainError;
use kpn_core::{ApprovalStatus, Snowflake, Standing, Tier};

use super::{decode, snowflake};
use crate::models::MemberModel;

impl TryFrom<MemberModel> for Member {
    type Error = DomainError;

    fn try_from(model: MemberModel) -> Result<Self, Self::Error> {
        Ok(Member {
            id: Snowflake::new(model.id),
            full_name: model.full_name,
            role_tier: decode("members.role_tier", &model.role_tier, Tier::parse)?,
            seat_id: snowflake(model.seat_id),
            jurisdiction_id: snowflake(model.jurisdiction_id),
            approval_status: decode(
                "members.approval_status",
                &model.approval_status,
                ApprovalStatus::parse,
            )?,
            missed_duty_count: model.missed_duty_count,
            ignored_reminder_count: model.ignored_reminder_count,
            computed_standing: decode(
                "members.computed_standing",
                &model.computed_standing,
                Standing::parse,
            )?,
            last_activity_at: model.last_activity_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row() -> MemberModel {
        let now = Utc::now();
        MemberModel {
            id: 7,
            full_name: "Usman Danjuma".into(),
            role_tier: "WARD".into(),
            seat_id: Some(1_000_034),
            jurisdiction_id: Some(40),
            approval_status: "SUSPENDED".into(),
            missed_duty_count: 2,
            ignored_reminder_count: 0,
            computed_standing: "IRREGULAR".into(),
            last_activity_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_member_from_row() {
        let member = Member::try_from(row()).unwrap();
        assert_eq!(member.role_tier, Tier::Ward);
        assert_eq!(member.approval_status, ApprovalStatus::Suspended);
        assert_eq!(member.computed_standing, Standing::Irregular);
        assert!(member.occupies_seat());
    }

    #[test]
    fn test_bad_status_is_rejected() {
        let mut model = row();
        model.approval_status = "EXPELLED".into();
        assert!(matches!(
            Member::try_from(model),
            Err(DomainError::DatabaseError(_))
        ));
    }
}
