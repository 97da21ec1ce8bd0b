//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use kpn_core::{
    ActionApproval, ActionStatus, ApprovalStatus, AuditKind, ContentKind, DisciplinaryType, Level,
    PublishState, ReportStatus, Rung, SeatFlags, Standing, Tier, TierPath,
};

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Catalog Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionResponse {
    pub id: String,
    pub level: Level,
    pub name: String,
    pub parent_id: Option<String>,
}

/// A node with its path to the root and its direct children
#[derive(Debug, Clone, Serialize)]
pub struct JurisdictionDetailResponse {
    #[serde(flatten)]
    pub jurisdiction: JurisdictionResponse,
    /// Root first
    pub ancestors: Vec<JurisdictionResponse>,
    pub children: Vec<JurisdictionResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatResponse {
    pub id: String,
    pub tier: Tier,
    pub title: String,
    pub seat_number: i32,
    pub flags: SeatFlags,
    pub top: bool,
    pub protected: bool,
    pub coordinator: bool,
    pub publisher: bool,
}

// ============================================================================
// Member Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub full_name: String,
    pub role_tier: Tier,
    /// Authority the member currently carries
    pub rung: Rung,
    pub seat_id: Option<String>,
    pub seat_title: Option<String>,
    pub jurisdiction_id: Option<String>,
    pub approval_status: ApprovalStatus,
    pub protected: bool,
    pub computed_standing: Standing,
    pub missed_duty_count: i32,
    pub ignored_reminder_count: i32,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapResponse {
    pub member_a: MemberResponse,
    pub member_b: MemberResponse,
}

// ============================================================================
// Disciplinary Responses
// ============================================================================

/// Who has to sign off a pending dismissal
#[derive(Debug, Clone, Serialize)]
pub struct ApproverRouteResponse {
    pub rung: Rung,
    /// Node the approver must hold; absent for state-wide approvers
    pub jurisdiction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplinaryActionResponse {
    pub id: String,
    pub target_member_id: String,
    pub issuer_member_id: String,
    pub action_type: DisciplinaryType,
    pub status: ActionStatus,
    pub approval_status: ActionApproval,
    pub approver_member_id: Option<String>,
    pub approval_notes: Option<String>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_approver: Option<ApproverRouteResponse>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Report Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub tier_path: TierPath,
    pub submitted_by_id: String,
    pub submitted_to_id: Option<String>,
    pub origin_jurisdiction_id: String,
    pub title: String,
    pub content: String,
    pub period: String,
    pub status: ReportStatus,
    pub parent_report_id: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub is_overdue: bool,
    pub is_reviewed: bool,
    pub reviewed_by_id: Option<String>,
    pub review_notes: Option<String>,
    pub escalation_pending: bool,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub escalated_at: Option<DateTime<Utc>>,
}

/// Result of an escalation attempt
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscalationResponse {
    /// Child report created and addressed to the next-tier supervisor
    Escalated { child: ReportResponse },
    /// Next-tier supervisor seat is vacant; the parent is flagged
    Pending { vacant_level: Level },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub report: ReportResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<EscalationResponse>,
}

// ============================================================================
// Content Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    pub id: String,
    pub kind: ContentKind,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub publish_state: PublishState,
    pub approver_id: Option<String>,
    pub rejection_reason: Option<String>,
    pub auto_approved: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Audit & Standing Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryResponse {
    pub id: String,
    pub action_kind: AuditKind,
    pub performed_by_id: Option<String>,
    pub target_member_id: String,
    pub before_snapshot: Value,
    pub after_snapshot: Value,
    pub reason: Option<String>,
    pub auto_generated: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingResponse {
    pub member_id: String,
    pub standing: Standing,
    pub previous: Standing,
    pub changed: bool,
    pub last_activity_at: DateTime<Utc>,
    pub idle_days: i64,
    pub missed_duty_count: i32,
    pub ignored_reminder_count: i32,
    pub window_days: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status per dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: String,
    pub catalog: String,
}

impl ReadinessResponse {
    pub fn ready(storage_healthy: bool, catalog_loaded: bool) -> Self {
        let label = |ok: bool| if ok { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if storage_healthy && catalog_loaded { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                storage: label(storage_healthy),
                catalog: label(catalog_loaded),
            },
        }
    }
}
