//! Report model -> entity

use kpn_core::entities::Report;
use kpn_core::error::DomainError;
use kpn_core::{ReportStatus, Snowflake, TierPath};

use super::{decode, snowflake};
use crate::models::ReportModel;

impl TryFrom<ReportModel> for Report {
    type Error = DomainError;

    fn try_from(model: ReportModel) -> Result<Self, Self::Error> {
        Ok(Report {
            id: Snowflake::new(model.id),
            tier_path: decode("reports.tier_path", &model.tier_path, TierPath::parse)?,
            submitted_by_id: Snowflake::new(model.submitted_by_id),
            submitted_to_id: snowflake(model.submitted_to_id),
            origin_jurisdiction_id: Snowflake::new(model.origin_jurisdiction_id),
            title: model.title,
            content: model.content,
            period: model.period,
            status: decode("reports.status", &model.status, ReportStatus::parse)?,
            parent_report_id: snowflake(model.parent_report_id),
            deadline: model.deadline,
            is_reviewed: model.is_reviewed,
            reviewed_by_id: snowflake(model.reviewed_by_id),
            review_notes: model.review_notes,
            escalation_pending: model.escalation_pending,
            created_at: model.created_at,
            submitted_at: model.submitted_at,
            reviewed_at: model.reviewed_at,
            escalated_at: model.escalated_at,
        })
    }
}
