//! Test helpers for integration tests
//!
//! Spawns a server per test, seeds officers straight into storage and
//! mints their bearer tokens.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use kpn_api::{create_app, create_app_state, AppState};
use kpn_common::AppConfig;
use kpn_core::{
    ApprovalStatus, AuditEntry, AuditKind, Catalog, Level, Member, Snowflake, Tier,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A seeded member and a token acting as them
#[derive(Debug, Clone)]
pub struct Officer {
    pub id: Snowflake,
    pub token: String,
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over a fresh in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start with extra configuration entries, e.g. `GOVERNANCE_AUTO_ESCALATE`
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(overrides)?;
        let state = create_app_state(config).await?;
        let app = create_app(state.clone())?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn catalog(&self) -> &Catalog {
        self.state.service_context().catalog()
    }

    // === Catalog lookups ===

    /// Zone `index` in ID order
    pub fn zone(&self, index: usize) -> Snowflake {
        self.catalog().tree.at_level(Level::Zone)[index].id
    }

    pub fn first_child(&self, parent: Snowflake) -> Snowflake {
        self.catalog()
            .tree
            .children(parent)
            .ok()
            .and_then(|children| children.first().map(|j| j.id))
            .unwrap_or_else(|| panic!("jurisdiction {parent} has no children"))
    }

    /// Seat `number` of `tier`; seat 1 is the coordinator
    pub fn seat(&self, tier: Tier, number: i32) -> Snowflake {
        self.catalog()
            .seats
            .seats_at(tier)
            .into_iter()
            .find(|s| s.seat_number == number)
            .unwrap_or_else(|| panic!("no {tier} seat {number}"))
            .id
    }

    // === Seeding ===

    /// Insert an APPROVED member directly and mint a token for them
    pub async fn officer(
        &self,
        name: &str,
        tier: Tier,
        seat: Option<Snowflake>,
        jurisdiction: Option<Snowflake>,
    ) -> Result<Officer> {
        let ctx = self.state.service_context();
        let id = ctx.generate_id();
        let mut member = Member::new(id, name, tier, jurisdiction);
        if let Some(seat) = seat {
            member = member.with_seat(seat);
        }
        member.set_status(ApprovalStatus::Approved);

        let audit = AuditEntry::new(ctx.generate_id(), AuditKind::MemberRegistered, Some(id), id);
        ctx.member_repo().create(&member, &audit).await?;

        Ok(Officer {
            id,
            token: self.token_for(id)?,
        })
    }

    pub async fn president(&self) -> Result<Officer> {
        let seat = self.catalog().seats.top_seat().id;
        self.officer("Abubakar Bagudu", Tier::State, Some(seat), None).await
    }

    pub fn token_for(&self, member_id: Snowflake) -> Result<String> {
        Ok(self.state.jwt_service().issue(member_id)?)
    }

    // === Requests ===

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.get(self.url(path)).bearer_auth(token)).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        send(self.client.post(self.url(path)).json(body)).await
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        send(self.client.post(self.url(path)).bearer_auth(token).json(body)).await
    }

    /// POST without a body
    pub async fn post_empty(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.post(self.url(path)).bearer_auth(token)).await
    }

    pub async fn patch_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        send(self.client.patch(self.url(path)).bearer_auth(token).json(body)).await
    }

    pub async fn put_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        send(self.client.put(self.url(path)).bearer_auth(token).json(body)).await
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    request.send().await.context("request failed")
}

/// Memory-backed configuration with a generous rate limit
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let defaults = [
        ("API_PORT", "0"),
        ("JWT_SECRET", "integration-test-secret-of-decent-length"),
        ("KPN_STORAGE", "memory"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "1000"),
    ];

    let config = AppConfig::from_lookup(|key| {
        overrides
            .iter()
            .chain(defaults.iter())
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    })?;
    Ok(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert an error response and return its code
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .context("error envelope without a code")
}
