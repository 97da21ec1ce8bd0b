//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{catalog, content, disciplinary, health, members, positions, reports, standing};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes, kept outside the rate limiter
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(member_routes())
        .merge(disciplinary_routes())
        .merge(report_routes())
        .merge(content_routes())
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/jurisdictions", get(catalog::list_jurisdictions))
        .route("/jurisdictions/:id", get(catalog::get_jurisdiction))
        .route("/jurisdictions/:id/members", get(catalog::list_jurisdiction_members))
        .route("/seats", get(catalog::list_seats))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        // Registry
        .route("/members", post(members::register))
        .route("/members/@me", get(members::get_current_member))
        .route("/members/pending", get(members::list_pending))
        .route("/members/:id", get(members::get_member))
        .route("/members/:id/approve", post(members::approve))
        .route("/members/:id/reject", post(members::reject))
        .route("/members/:id/seat", put(members::assign_seat))
        .route("/members/:id/seat/vacate", post(members::vacate_seat))
        .route("/members/:id/disciplinary", get(members::list_disciplinary))
        .route("/members/:id/content", get(content::list_by_author))
        // Positions
        .route("/members/:id/promote", post(positions::promote))
        .route("/members/:id/demote", post(positions::demote))
        .route("/positions/swap", post(positions::swap))
        // Duty and standing
        .route("/members/:id/duty/missed", post(standing::record_missed_duty))
        .route("/members/:id/duty/ignored-reminder", post(standing::record_ignored_reminder))
        .route("/members/:id/duty/reset", post(standing::reset_counters))
        .route("/members/:id/activity", post(standing::record_activity))
        .route("/members/:id/standing", post(standing::recompute))
        .route("/members/:id/history", get(standing::history))
        .route("/standing/sweep", post(standing::sweep))
}

fn disciplinary_routes() -> Router<AppState> {
    Router::new()
        .route("/disciplinary", post(disciplinary::submit))
        .route("/disciplinary/pending", get(disciplinary::list_pending))
        .route("/disciplinary/:id", get(disciplinary::get))
        .route("/disciplinary/:id/approve", post(disciplinary::approve))
        .route("/disciplinary/:id/reject", post(disciplinary::reject))
        .route("/disciplinary/:id/resolve", post(disciplinary::resolve))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(reports::submit))
        .route("/reports/drafts", post(reports::create_draft))
        .route("/reports/inbox", get(reports::inbox))
        .route("/reports/outbox", get(reports::outbox))
        .route("/reports/:id", get(reports::get))
        .route("/reports/:id/submit", post(reports::submit_draft))
        .route("/reports/:id/review", post(reports::review))
        .route("/reports/:id/escalate", post(reports::escalate))
        .route("/reports/:id/chain", get(reports::chain))
}

fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/content", post(content::create))
        .route("/content/pending", get(content::list_pending))
        .route("/content/:id", get(content::get).patch(content::edit))
        .route("/content/:id/submit", post(content::submit))
        .route("/content/:id/approve", post(content::approve))
        .route("/content/:id/reject", post(content::reject))
}
