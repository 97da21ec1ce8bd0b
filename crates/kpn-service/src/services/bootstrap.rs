//! Startup loading of the jurisdiction tree and seat catalog, plus the
//! first President

use serde_json::Value;
use tracing::{info, instrument};

use kpn_core::traits::CatalogRepository;
use kpn_core::{ApprovalStatus, AuditKind, Catalog, DomainError, Member, SeedData, Snowflake};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Persist the seed dataset when asked to, then load the catalog from storage
#[instrument(skip(repo))]
pub async fn load_catalog(repo: &dyn CatalogRepository, seed: bool) -> ServiceResult<Catalog> {
    if seed {
        let data = SeedData::kebbi();
        repo.seed(&data.jurisdictions, &data.seats).await?;
    }

    let jurisdictions = repo.list_jurisdictions().await?;
    let seats = repo.list_seats().await?;
    if jurisdictions.is_empty() || seats.is_empty() {
        return Err(ServiceError::internal(
            "catalog is empty; enable GOVERNANCE_SEED_ON_STARTUP or seed the database",
        ));
    }

    let catalog = Catalog::build(jurisdictions, seats)?;
    info!(
        jurisdictions = catalog.tree.len(),
        seats = catalog.seats.all().len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Seat an approved President when the top seat is empty
///
/// Returns the holder of the top seat, newly inserted or already there.
/// Nobody can approve the first member, so the insert has no actor.
#[instrument(skip(ctx))]
pub async fn ensure_president(ctx: &ServiceContext, full_name: &str) -> ServiceResult<Snowflake> {
    let top = ctx.catalog().seats.top_seat();
    if let Some(holder) = ctx.member_repo().find_seat_holder(top.id, None).await? {
        info!(member_id = %holder.id, "President seat already held");
        return Ok(holder.id);
    }

    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(DomainError::ValidationError("president name is empty".to_string()).into());
    }

    let mut president = Member::new(ctx.generate_id(), full_name, top.tier, None).with_seat(top.id);
    president.set_status(ApprovalStatus::Approved);

    let audit = ctx
        .audit(AuditKind::MemberApproved, None, president.id)
        .with_change(&Value::Null, &president.snapshot())
        .with_reason(Some("bootstrap"))
        .auto_generated();
    ctx.member_repo().create(&president, &audit).await?;

    info!(member_id = %president.id, seat = %top.title, "President seated");
    Ok(president.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Harness;
    use kpn_db::MemoryStore;

    #[tokio::test]
    async fn test_seed_then_load() {
        let store = MemoryStore::new();
        let catalog = load_catalog(&store, true).await.unwrap();
        assert_eq!(catalog.tree.len(), SeedData::kebbi().jurisdictions.len());

        // Reloading without seeding sees the same rows
        let again = load_catalog(&store, false).await.unwrap();
        assert_eq!(again.seats.all().len(), catalog.seats.all().len());
    }

    #[tokio::test]
    async fn test_unseeded_store_is_rejected() {
        let err = load_catalog(&MemoryStore::new(), false).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_president_bootstrap_is_idempotent() {
        let h = Harness::new();
        let first = ensure_president(&h.ctx, " Ngozi Adeyemi ").await.unwrap();
        let again = ensure_president(&h.ctx, "Someone Else").await.unwrap();
        assert_eq!(first, again);

        let president = h.member(first).await;
        assert_eq!(president.full_name, "Ngozi Adeyemi");
        assert!(president.is_approved());
        assert_eq!(president.seat_id, Some(h.president_seat()));

        let history = h.ctx.audit_repo().list_by_target(first, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action_kind, AuditKind::MemberApproved);
        assert!(history[0].performed_by_id.is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_leaves_existing_president() {
        let h = Harness::new();
        let seated = h.president().await;
        assert_eq!(ensure_president(&h.ctx, "Ngozi Adeyemi").await.unwrap(), seated);
        assert!(h.ctx.audit_repo().list_by_target(seated, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_president_name_is_rejected() {
        let h = Harness::new();
        let err = ensure_president(&h.ctx, "   ").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
