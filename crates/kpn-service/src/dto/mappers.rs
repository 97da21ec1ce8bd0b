//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chrono::Utc;

use kpn_core::governance::ApprovalRoute;
use kpn_core::{
    AuditEntry, Catalog, ContentItem, DisciplinaryAction, Jurisdiction, Member, Report, Seat,
    Snowflake,
};

use super::responses::{
    ApproverRouteResponse, AuditEntryResponse, ContentResponse, DisciplinaryActionResponse,
    JurisdictionResponse, MemberResponse, ReportResponse, SeatResponse,
};

fn text(id: Option<Snowflake>) -> Option<String> {
    id.map(|id| id.to_string())
}

// ============================================================================
// Catalog Mappers
// ============================================================================

impl From<&Jurisdiction> for JurisdictionResponse {
    fn from(node: &Jurisdiction) -> Self {
        Self {
            id: node.id.to_string(),
            level: node.level,
            name: node.name.clone(),
            parent_id: text(node.parent_id),
        }
    }
}

impl From<&Seat> for SeatResponse {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id.to_string(),
            tier: seat.tier,
            title: seat.title.clone(),
            seat_number: seat.seat_number,
            flags: seat.flags,
            top: seat.is_top(),
            protected: seat.is_protected(),
            coordinator: seat.is_coordinator(),
            publisher: seat.is_publisher(),
        }
    }
}

// ============================================================================
// Member Mappers
// ============================================================================

/// Member paired with the catalog that resolves its seat and rung
pub struct MemberView<'a> {
    pub member: &'a Member,
    pub catalog: &'a Catalog,
}

impl<'a> MemberView<'a> {
    pub fn new(member: &'a Member, catalog: &'a Catalog) -> Self {
        Self { member, catalog }
    }
}

impl From<MemberView<'_>> for MemberResponse {
    fn from(view: MemberView<'_>) -> Self {
        let MemberView { member, catalog } = view;
        let seat_title = member
            .seat_id
            .and_then(|id| catalog.seats.seat(id).ok())
            .map(|seat| seat.title.clone());

        Self {
            id: member.id.to_string(),
            full_name: member.full_name.clone(),
            role_tier: member.role_tier,
            rung: catalog.position_of(member).rung,
            seat_id: text(member.seat_id),
            seat_title,
            jurisdiction_id: text(member.jurisdiction_id),
            approval_status: member.approval_status,
            protected: catalog.is_protected(member),
            computed_standing: member.computed_standing,
            missed_duty_count: member.missed_duty_count,
            ignored_reminder_count: member.ignored_reminder_count,
            last_activity_at: member.last_activity_at,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

// ============================================================================
// Disciplinary Mappers
// ============================================================================

impl From<&DisciplinaryAction> for DisciplinaryActionResponse {
    fn from(action: &DisciplinaryAction) -> Self {
        Self {
            id: action.id.to_string(),
            target_member_id: action.target_member_id.to_string(),
            issuer_member_id: action.issuer_member_id.to_string(),
            action_type: action.action_type,
            status: action.status,
            approval_status: action.approval_status,
            approver_member_id: text(action.approver_member_id),
            approval_notes: action.approval_notes.clone(),
            reason: action.reason.clone(),
            required_approver: None,
            created_at: action.created_at,
            approved_at: action.approved_at,
            resolved_at: action.resolved_at,
        }
    }
}

impl From<ApprovalRoute> for ApproverRouteResponse {
    fn from(route: ApprovalRoute) -> Self {
        Self {
            rung: route.rung,
            jurisdiction_id: text(route.jurisdiction_id),
        }
    }
}

// ============================================================================
// Report Mappers
// ============================================================================

impl From<&Report> for ReportResponse {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.to_string(),
            tier_path: report.tier_path,
            submitted_by_id: report.submitted_by_id.to_string(),
            submitted_to_id: text(report.submitted_to_id),
            origin_jurisdiction_id: report.origin_jurisdiction_id.to_string(),
            title: report.title.clone(),
            content: report.content.clone(),
            period: report.period.clone(),
            status: report.status,
            parent_report_id: text(report.parent_report_id),
            deadline: report.deadline,
            is_overdue: report.is_overdue(Utc::now()),
            is_reviewed: report.is_reviewed,
            reviewed_by_id: text(report.reviewed_by_id),
            review_notes: report.review_notes.clone(),
            escalation_pending: report.escalation_pending,
            created_at: report.created_at,
            submitted_at: report.submitted_at,
            reviewed_at: report.reviewed_at,
            escalated_at: report.escalated_at,
        }
    }
}

// ============================================================================
// Content Mappers
// ============================================================================

impl From<&ContentItem> for ContentResponse {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id.to_string(),
            kind: item.kind,
            author_id: item.author_id.to_string(),
            title: item.title.clone(),
            body: item.body.clone(),
            publish_state: item.publish_state,
            approver_id: text(item.approver_id),
            rejection_reason: item.rejection_reason.clone(),
            auto_approved: item.auto_approved,
            published_at: item.published_at,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

// ============================================================================
// Audit Mappers
// ============================================================================

impl From<&AuditEntry> for AuditEntryResponse {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            action_kind: entry.action_kind,
            performed_by_id: text(entry.performed_by_id),
            target_member_id: entry.target_member_id.to_string(),
            before_snapshot: entry.before_snapshot.clone(),
            after_snapshot: entry.after_snapshot.clone(),
            reason: entry.reason.clone(),
            auto_generated: entry.auto_generated,
            description: entry.describe(),
            created_at: entry.created_at,
        }
    }
}
