//! Disciplinary action model -> entity

use kpn_core::entities::DisciplinaryAction;
use kpn_core::error::DomainError;
use kpn_core::{ActionApproval, ActionStatus, DisciplinaryType, Snowflake};

use super::{decode, snowflake};
use crate::models::DisciplinaryActionModel;

impl TryFrom<DisciplinaryActionModel> for DisciplinaryAction {
    type Error = DomainError;

    fn try_from(model: DisciplinaryActionModel) -> Result<Self, Self::Error> {
        Ok(DisciplinaryAction {
            id: Snowflake::new(model.id),
            target_member_id: Snowflake::new(model.target_member_id),
            issuer_member_id: Snowflake::new(model.issuer_member_id),
            action_type: decode(
                "disciplinary_actions.action_type",
                &model.action_type,
                DisciplinaryType::parse,
            )?,
            status: decode("disciplinary_actions.status", &model.status, ActionStatus::parse)?,
            approval_status: decode(
                "disciplinary_actions.approval_status",
                &model.approval_status,
                ActionApproval::parse,
            )?,
            approver_member_id: snowflake(model.approver_member_id),
            approval_notes: model.approval_notes,
            reason: model.reason,
            created_at: model.created_at,
            approved_at: model.approved_at,
            resolved_at: model.resolved_at,
        })
    }
}
