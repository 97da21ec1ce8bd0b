//! API workflow tests
//!
//! Each test spawns its own server over the in-memory backend, so no
//! external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::*;
use kpn_core::{Level, Snowflake, Tier};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// W1 inside L1 inside Z1, plus a second zone Z2
struct Chain {
    server: TestServer,
    ward: Snowflake,
    lga: Snowflake,
    zone: Snowflake,
    other_zone: Snowflake,
}

fn chain(server: TestServer) -> Chain {
    let zone = server.zone(0);
    let other_zone = server.zone(1);
    let lga = server.first_child(zone);
    let ward = server.first_child(lga);
    Chain {
        server,
        ward,
        lga,
        zone,
        other_zone,
    }
}

// ============================================================================
// Health & Catalog
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");

    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["catalog"], "healthy");
}

#[tokio::test]
async fn test_catalog_is_browsable_without_token() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/jurisdictions?level=ZONE").await.unwrap();
    let zones: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(zones.len(), server.catalog().tree.at_level(Level::Zone).len());

    let ward = server.first_child(server.first_child(server.zone(0)));
    let response = server.get(&format!("/api/v1/jurisdictions/{ward}")).await.unwrap();
    let detail: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(detail["level"], "WARD");
    assert_eq!(detail["ancestors"].as_array().unwrap().len(), 3);

    let response = server.get("/api/v1/seats?tier=ZONAL").await.unwrap();
    let seats: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(seats.len(), 3);
}

#[tokio::test]
async fn test_bad_query_and_path_are_rejected() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/seats?tier=MAYOR").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");

    let response = server.get("/api/v1/jurisdictions/not-an-id").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");

    let response = server.get("/api/v1/jurisdictions/999999").await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_JURISDICTION");
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_missing_and_forged_tokens() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/members/@me").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");

    let response = server.get_auth("/api/v1/members/@me", "not.a.jwt").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_token_for_unknown_member() {
    let server = TestServer::start().await.unwrap();
    let token = server.token_for(Snowflake::new(42)).unwrap();

    let response = server.get_auth("/api/v1/members/@me", &token).await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_MEMBER");
}

// ============================================================================
// Registry
// ============================================================================

#[tokio::test]
async fn test_ward_applicant_admitted_by_lga_coordinator() {
    let Chain { server, ward, lga, .. } = chain(TestServer::start().await.unwrap());
    let coordinator = server
        .officer("Sani Yauri", Tier::Lga, Some(server.seat(Tier::Lga, 1)), Some(lga))
        .await
        .unwrap();

    let body = register_body("Aisha Bello", Tier::Ward, Some(server.seat(Tier::Ward, 2)), Some(ward));
    let response = server.post("/api/v1/members", &body).await.unwrap();
    let applicant: MemberView = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(applicant.approval_status, "PENDING");
    assert_eq!(applicant.role_tier, "WARD");

    let response = server.get_auth("/api/v1/members/pending", &coordinator.token).await.unwrap();
    let pending: Vec<MemberView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(pending.iter().any(|m| m.id == applicant.id));

    let response = server
        .post_empty(&format!("/api/v1/members/{}/approve", applicant.id), &coordinator.token)
        .await
        .unwrap();
    let approved: MemberView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(approved.approval_status, "APPROVED");
    assert_eq!(approved.jurisdiction_id, Some(ward.to_string()));
}

#[tokio::test]
async fn test_registration_is_validated() {
    let server = TestServer::start().await.unwrap();

    let body = register_body("A", Tier::General, None, None);
    let response = server.post("/api/v1/members", &body).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    let response = server.post("/api/v1/members", &json!({ "full_name": "Aisha Bello" })).await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_BODY");
}

// ============================================================================
// Disciplinary
// ============================================================================

#[tokio::test]
async fn test_dismissal_routed_to_covering_zonal_officer() {
    let Chain {
        server,
        ward,
        lga,
        zone,
        other_zone,
    } = chain(TestServer::start().await.unwrap());

    let target = server
        .officer("Aisha Bello", Tier::Ward, Some(server.seat(Tier::Ward, 2)), Some(ward))
        .await
        .unwrap();
    let issuer = server
        .officer("Sani Yauri", Tier::Lga, Some(server.seat(Tier::Lga, 1)), Some(lga))
        .await
        .unwrap();
    let covering = server
        .officer("Halima Argungu", Tier::Zonal, Some(server.seat(Tier::Zonal, 1)), Some(zone))
        .await
        .unwrap();
    let elsewhere = server
        .officer("Musa Zuru", Tier::Zonal, Some(server.seat(Tier::Zonal, 1)), Some(other_zone))
        .await
        .unwrap();

    let response = server
        .post_auth("/api/v1/disciplinary", &issuer.token, &dismissal_body(target.id))
        .await
        .unwrap();
    let action: ActionView = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(action.status, "PENDING_APPROVAL");
    assert_eq!(action.approval_status, "PENDING");
    let route = action.required_approver.unwrap();
    assert_eq!(route.rung, "ZONAL");
    assert_eq!(route.jurisdiction_id, Some(zone.to_string()));

    let approve = format!("/api/v1/disciplinary/{}/approve", action.id);

    let response = server.post_empty(&approve, &elsewhere.token).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "UNAUTHORIZED_APPROVER");

    let response = server.post_empty(&approve, &covering.token).await.unwrap();
    let decided: ActionView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(decided.approval_status, "APPROVED");
    assert_eq!(decided.approver_member_id, Some(covering.id.to_string()));

    let response = server
        .get_auth(&format!("/api/v1/members/{}", target.id), &issuer.token)
        .await
        .unwrap();
    let dismissed: MemberView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(dismissed.approval_status, "DISMISSED");
    assert_eq!(dismissed.seat_id, None);
    assert_eq!(dismissed.jurisdiction_id, None);

    let response = server.post_empty(&approve, &covering.token).await.unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_RESOLVED");
}

#[tokio::test]
async fn test_president_cannot_be_dismissed() {
    let Chain { server, lga, .. } = chain(TestServer::start().await.unwrap());
    let president = server.president().await.unwrap();
    let issuer = server
        .officer("Sani Yauri", Tier::Lga, Some(server.seat(Tier::Lga, 1)), Some(lga))
        .await
        .unwrap();

    let response = server
        .post_auth("/api/v1/disciplinary", &issuer.token, &dismissal_body(president.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Reports
// ============================================================================

#[tokio::test]
async fn test_ward_report_escalates_to_zone() {
    let Chain { server, ward, lga, zone, .. } = chain(TestServer::start().await.unwrap());
    let author = server
        .officer("Hauwa Bello", Tier::Ward, Some(server.seat(Tier::Ward, 1)), Some(ward))
        .await
        .unwrap();
    let lga_head = server
        .officer("Sani Yauri", Tier::Lga, Some(server.seat(Tier::Lga, 1)), Some(lga))
        .await
        .unwrap();
    let zone_head = server
        .officer("Halima Argungu", Tier::Zonal, Some(server.seat(Tier::Zonal, 1)), Some(zone))
        .await
        .unwrap();

    let response = server
        .post_auth("/api/v1/reports", &author.token, &report_body("WARD_TO_LGA"))
        .await
        .unwrap();
    let report: ReportView = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(report.status, "SUBMITTED");
    assert_eq!(report.submitted_to_id, Some(lga_head.id.to_string()));

    let response = server.get_auth("/api/v1/reports/inbox", &lga_head.token).await.unwrap();
    let inbox: Vec<ReportView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(inbox.len(), 1);

    let response = server
        .post_auth(
            &format!("/api/v1/reports/{}/review", report.id),
            &lga_head.token,
            &review_body("APPROVED"),
        )
        .await
        .unwrap();
    let review: ReviewView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(review.report.status, "ESCALATED");
    let escalation = review.escalation.unwrap();
    assert_eq!(escalation.status, "ESCALATED");
    let child = escalation.child.unwrap();
    assert_eq!(child.submitted_to_id, Some(zone_head.id.to_string()));
    assert_eq!(child.parent_report_id, Some(report.id.clone()));

    let response = server
        .get_auth(&format!("/api/v1/reports/{}/chain", child.id), &author.token)
        .await
        .unwrap();
    let chain: Vec<ReportView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].id, report.id);

    let response = server
        .post_empty(&format!("/api/v1/reports/{}/escalate", report.id), &lga_head.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(code, "ALREADY_ESCALATED");
}

#[tokio::test]
async fn test_vacant_zone_leaves_escalation_pending() {
    let Chain { server, ward, lga, .. } = chain(TestServer::start().await.unwrap());
    let author = server
        .officer("Hauwa Bello", Tier::Ward, Some(server.seat(Tier::Ward, 1)), Some(ward))
        .await
        .unwrap();
    let lga_head = server
        .officer("Sani Yauri", Tier::Lga, Some(server.seat(Tier::Lga, 1)), Some(lga))
        .await
        .unwrap();

    let response = server
        .post_auth("/api/v1/reports", &author.token, &report_body("WARD_TO_LGA"))
        .await
        .unwrap();
    let report: ReportView = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/reports/{}/review", report.id),
            &lga_head.token,
            &review_body("APPROVED"),
        )
        .await
        .unwrap();
    let review: ReviewView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(review.report.status, "APPROVED");
    assert!(review.report.escalation_pending);
    let escalation = review.escalation.unwrap();
    assert_eq!(escalation.status, "PENDING");
    assert_eq!(escalation.vacant_level.as_deref(), Some("ZONE"));
}

#[tokio::test]
async fn test_report_without_supervisor_is_unprocessable() {
    let Chain { server, ward, .. } = chain(TestServer::start().await.unwrap());
    let author = server
        .officer("Hauwa Bello", Tier::Ward, Some(server.seat(Tier::Ward, 1)), Some(ward))
        .await
        .unwrap();

    let response = server
        .post_auth("/api/v1/reports", &author.token, &report_body("WARD_TO_LGA"))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::UNPROCESSABLE_ENTITY).await.unwrap();
    assert_eq!(code, "NO_SUPERVISOR_FOUND");
}

// ============================================================================
// Content
// ============================================================================

#[tokio::test]
async fn test_content_review_by_publisher() {
    let Chain { server, ward, .. } = chain(TestServer::start().await.unwrap());
    let author = server
        .officer("Zainab Umar", Tier::General, None, Some(ward))
        .await
        .unwrap();
    let publisher_seat = server.catalog().seats.publisher_seat().unwrap().id;
    let publisher = server
        .officer("Binta Aliero", Tier::State, Some(publisher_seat), None)
        .await
        .unwrap();

    let response = server
        .post_auth("/api/v1/content", &author.token, &campaign_body())
        .await
        .unwrap();
    let draft: ContentView = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(draft.publish_state, "DRAFT");

    let response = server
        .post_empty(&format!("/api/v1/content/{}/submit", draft.id), &author.token)
        .await
        .unwrap();
    let pending: ContentView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(pending.publish_state, "PENDING");

    let response = server
        .post_empty(&format!("/api/v1/content/{}/approve", draft.id), &author.token)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "UNAUTHORIZED_APPROVER");

    let response = server
        .post_empty(&format!("/api/v1/content/{}/approve", draft.id), &publisher.token)
        .await
        .unwrap();
    let published: ContentView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(published.publish_state, "PUBLISHED");
    assert!(!published.auto_approved);
}

// ============================================================================
// Standing
// ============================================================================

#[tokio::test]
async fn test_missed_duties_flag_member_irregular() {
    let Chain { server, ward, .. } = chain(TestServer::start().await.unwrap());
    let coordinator = server
        .officer("Hauwa Bello", Tier::Ward, Some(server.seat(Tier::Ward, 1)), Some(ward))
        .await
        .unwrap();
    let member = server
        .officer("Zainab Umar", Tier::General, None, Some(ward))
        .await
        .unwrap();

    let path = format!("/api/v1/members/{}/duty/missed", member.id);
    let mut last = None;
    for _ in 0..3 {
        let response = server
            .post_auth(&path, &coordinator.token, &json!({ "reason": "Missed canvassing shift" }))
            .await
            .unwrap();
        last = Some(assert_json::<StandingView>(response, StatusCode::OK).await.unwrap());
    }
    let standing = last.unwrap();
    assert_eq!(standing.standing, "IRREGULAR");
    assert!(standing.changed);
    assert_eq!(standing.missed_duty_count, 3);

    let response = server
        .get_auth(&format!("/api/v1/members/{}", member.id), &member.token)
        .await
        .unwrap();
    let view: MemberView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(view.computed_standing, "IRREGULAR");

    let response = server
        .get_auth(&format!("/api/v1/members/{}/history?limit=1", member.id), &member.token)
        .await
        .unwrap();
    let history: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["action_kind"], "STANDING_CHANGED");
}

#[tokio::test]
async fn test_sweep_is_top_seat_only() {
    let Chain { server, ward, .. } = chain(TestServer::start().await.unwrap());
    let coordinator = server
        .officer("Hauwa Bello", Tier::Ward, Some(server.seat(Tier::Ward, 1)), Some(ward))
        .await
        .unwrap();
    let president = server.president().await.unwrap();

    let response = server.post_empty("/api/v1/standing/sweep", &coordinator.token).await.unwrap();
    let code = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(code, "PERMISSION_DENIED");

    let response = server.post_empty("/api/v1/standing/sweep", &president.token).await.unwrap();
    let report: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(report["total_checked"], 2);
    assert_eq!(report["errors"], 0);
}
