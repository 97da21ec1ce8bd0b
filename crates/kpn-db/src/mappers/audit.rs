//! Audit entry model -> entity

use kpn_core::entities::{AuditEntry, AuditKind};
use kpn_core::error::DomainError;
use kpn_core::Snowflake;

use super::{decode, snowflake};
use crate::models::AuditEntryModel;

impl TryFrom<AuditEntryModel> for AuditEntry {
    type Error = DomainError;

    fn try_from(model: AuditEntryModel) -> Result<Self, Self::Error> {
        Ok(AuditEntry {
            id: Snowflake::new(model.id),
            action_kind: decode("audit_entries.action_kind", &model.action_kind, AuditKind::parse)?,
            performed_by_id: snowflake(model.performed_by_id),
            target_member_id: Snowflake::new(model.target_member_id),
            before_snapshot: model.before_snapshot,
            after_snapshot: model.after_snapshot,
            reason: model.reason,
            auto_generated: model.auto_generated,
            created_at: model.created_at,
        })
    }
}
