//! Test fixtures: request bodies and the parts of responses tests read
//!
//! Enum fields are kept as their wire strings.

use serde::Deserialize;
use serde_json::{json, Value};

use kpn_core::{Snowflake, Tier};

pub fn register_body(name: &str, tier: Tier, seat: Option<Snowflake>, jurisdiction: Option<Snowflake>) -> Value {
    json!({
        "full_name": name,
        "role_tier": tier,
        "seat_id": seat,
        "jurisdiction_id": jurisdiction,
    })
}

pub fn dismissal_body(target: Snowflake) -> Value {
    json!({
        "target_member_id": target,
        "action_type": "DISMISSAL",
        "reason": "Absent from three consecutive ward meetings",
    })
}

pub fn report_body(tier_path: &str) -> Value {
    json!({
        "tier_path": tier_path,
        "title": "Monthly ward report",
        "content": "Voter registration up 12% across polling units.",
        "period": "2026-06",
    })
}

pub fn review_body(outcome: &str) -> Value {
    json!({ "outcome": outcome })
}

pub fn campaign_body() -> Value {
    json!({
        "kind": "CAMPAIGN",
        "title": "Voter registration drive",
        "body": "Registration centres open across all wards this weekend.",
    })
}

#[derive(Debug, Deserialize)]
pub struct MemberView {
    pub id: String,
    pub role_tier: String,
    pub approval_status: String,
    pub seat_id: Option<String>,
    pub jurisdiction_id: Option<String>,
    pub computed_standing: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproverRoute {
    pub rung: String,
    pub jurisdiction_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionView {
    pub id: String,
    pub status: String,
    pub approval_status: String,
    pub approver_member_id: Option<String>,
    pub required_approver: Option<ApproverRoute>,
}

#[derive(Debug, Deserialize)]
pub struct ReportView {
    pub id: String,
    pub status: String,
    pub submitted_to_id: Option<String>,
    pub parent_report_id: Option<String>,
    pub escalation_pending: bool,
}

#[derive(Debug, Deserialize)]
pub struct EscalationView {
    pub status: String,
    pub child: Option<ReportView>,
    pub vacant_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewView {
    pub report: ReportView,
    pub escalation: Option<EscalationView>,
}

#[derive(Debug, Deserialize)]
pub struct ContentView {
    pub id: String,
    pub publish_state: String,
    pub auto_approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct StandingView {
    pub standing: String,
    pub changed: bool,
    pub missed_duty_count: i32,
}
