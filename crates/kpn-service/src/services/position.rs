//! Promotion, demotion and position swaps
//!
//! Every move is a single placement write so the previous seat is released
//! in the same transaction that takes the new one.

use chrono::Utc;
use tracing::{info, instrument};

use kpn_core::events::PositionChangedEvent;
use kpn_core::governance::{require, Position};
use kpn_core::{
    AuditKind, Capabilities, DomainError, DomainEvent, Member, Placement, Snowflake,
};

use crate::dto::{DemoteRequest, MemberResponse, MemberView, PromoteRequest, SwapRequest, SwapResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Position service
pub struct PositionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PositionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Move an approved member up to the tier of the target seat
    #[instrument(skip(self, request))]
    pub async fn promote(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: PromoteRequest,
    ) -> ServiceResult<MemberResponse> {
        let position = self.authorize(actor_id, "promote members").await?;
        let member = self.movable(&position, member_id, false).await?;

        let catalog = self.ctx.catalog();
        let target_tier = catalog.seats.seat(request.seat_id)?.tier;
        if target_tier <= member.role_tier {
            return Err(DomainError::InvalidTierChange {
                from: member.role_tier,
                to: target_tier,
            }
            .into());
        }
        let seat = catalog.validate_binding(target_tier, request.seat_id, request.jurisdiction_id)?;
        let placement = Placement::seated(target_tier, seat.id, request.jurisdiction_id);

        let updated = self
            .move_to(actor_id, &member, &placement, AuditKind::Promotion)
            .await?;
        info!(member_id = %member_id, from = %member.role_tier, to = %target_tier, "Member promoted");

        Ok(MemberResponse::from(MemberView::new(&updated, catalog)))
    }

    /// Move a member down a tier, optionally into a new seat
    #[instrument(skip(self, request))]
    pub async fn demote(
        &self,
        actor_id: Snowflake,
        member_id: Snowflake,
        request: DemoteRequest,
    ) -> ServiceResult<MemberResponse> {
        let position = self.authorize(actor_id, "demote members").await?;
        let member = self.movable(&position, member_id, true).await?;

        let catalog = self.ctx.catalog();
        if request.role_tier >= member.role_tier {
            return Err(DomainError::InvalidTierChange {
                from: member.role_tier,
                to: request.role_tier,
            }
            .into());
        }

        let placement = match request.seat_id {
            Some(seat_id) => {
                let seat = catalog.validate_binding(request.role_tier, seat_id, request.jurisdiction_id)?;
                Placement::seated(request.role_tier, seat.id, request.jurisdiction_id)
            }
            None => Placement::unseated(request.role_tier),
        };

        let updated = self
            .move_to(actor_id, &member, &placement, AuditKind::Demotion)
            .await?;
        info!(member_id = %member_id, from = %member.role_tier, to = %request.role_tier, "Member demoted");

        Ok(MemberResponse::from(MemberView::new(&updated, catalog)))
    }

    /// Exchange the seats, tiers and jurisdictions of two members
    #[instrument(skip(self, request))]
    pub async fn swap(&self, actor_id: Snowflake, request: SwapRequest) -> ServiceResult<SwapResponse> {
        let position = self.authorize(actor_id, "swap positions").await?;
        let (a_id, b_id) = (request.member_a_id, request.member_b_id);
        if a_id == b_id {
            return Err(DomainError::ValidationError("a member cannot swap with itself".into()).into());
        }

        let a = self.movable(&position, a_id, true).await?;
        let b = self.movable(&position, b_id, true).await?;
        a.ensure_swappable()?;
        b.ensure_swappable()?;
        let catalog = self.ctx.catalog();

        let audit_a = self.swap_audit(actor_id, &a, &b);
        let audit_b = self.swap_audit(actor_id, &b, &a);
        let (new_a, new_b) = self
            .ctx
            .member_repo()
            .swap_positions(a_id, b_id, [&audit_a, &audit_b])
            .await?;

        info!(member_a = %a_id, member_b = %b_id, "Positions swapped");
        self.notify(&a, &new_a, actor_id).await;
        self.notify(&b, &new_b, actor_id).await;

        Ok(SwapResponse {
            member_a: MemberResponse::from(MemberView::new(&new_a, catalog)),
            member_b: MemberResponse::from(MemberView::new(&new_b, catalog)),
        })
    }

    async fn authorize(&self, actor_id: Snowflake, operation: &str) -> ServiceResult<Position> {
        let (_, position) = self.ctx.acting(actor_id).await?;
        require(&position, Capabilities::MANAGE_POSITIONS, operation)?;
        Ok(position)
    }

    /// Load an approved member other than the actor
    ///
    /// With `protect` set a protected seat holder is refused first, whoever
    /// the actor is.
    async fn movable(&self, actor: &Position, member_id: Snowflake, protect: bool) -> ServiceResult<Member> {
        let member = self.ctx.member(member_id).await?;
        if protect && self.ctx.catalog().is_protected(&member) {
            return Err(DomainError::ProtectedRole(member_id).into());
        }
        if actor.member_id == member_id {
            return Err(DomainError::SelfTarget.into());
        }
        if !member.is_approved() {
            return Err(DomainError::invalid_transition("member", member.approval_status, "REPOSITIONED").into());
        }
        Ok(member)
    }

    async fn move_to(
        &self,
        actor_id: Snowflake,
        member: &Member,
        placement: &Placement,
        kind: AuditKind,
    ) -> ServiceResult<Member> {
        let mut after = member.clone();
        after.place(placement);
        let audit = self
            .ctx
            .audit_change(kind, actor_id, member.id, &member.snapshot(), &after.snapshot());

        let updated = self
            .ctx
            .member_repo()
            .place(member.id, member.approval_status, placement, &audit)
            .await?;
        self.notify(member, &updated, actor_id).await;
        Ok(updated)
    }

    /// Audit entry for `member` taking over `other`'s placement
    fn swap_audit(&self, actor_id: Snowflake, member: &Member, other: &Member) -> kpn_core::AuditEntry {
        let mut after = member.clone();
        after.place(&other.placement());
        self.ctx
            .audit_change(
                AuditKind::PositionSwap,
                actor_id,
                member.id,
                &member.snapshot(),
                &after.snapshot(),
            )
            .with_reason(Some(format!("swapped with member {}", other.id)))
    }

    async fn notify(&self, before: &Member, after: &Member, changed_by: Snowflake) {
        self.ctx
            .notify(DomainEvent::PositionChanged(PositionChangedEvent {
                member_id: after.id,
                changed_by,
                from_tier: before.role_tier,
                to_tier: after.role_tier,
                seat_id: after.seat_id,
                timestamp: Utc::now(),
            }))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Harness;
    use kpn_core::Tier;

    #[tokio::test]
    async fn test_promotion_moves_member_up_a_tier() {
        let h = Harness::new();
        let president = h.president().await;
        let lga = h.first_child(h.zone(0));
        let ward = h.first_child(lga);
        let member = h.approved("Hauwa Bello", Tier::Ward, Some(h.seat(Tier::Ward, 2)), Some(ward)).await;

        let promoted = PositionService::new(&h.ctx)
            .promote(
                president,
                member,
                PromoteRequest {
                    seat_id: h.seat(Tier::Lga, 2),
                    jurisdiction_id: Some(lga),
                },
            )
            .await
            .unwrap();
        assert_eq!(promoted.role_tier, Tier::Lga);
        assert_eq!(promoted.jurisdiction_id, Some(lga.to_string()));
        assert_eq!(h.events.event_types(), vec!["POSITION_CHANGED"]);
    }

    #[tokio::test]
    async fn test_promotion_must_go_up() {
        let h = Harness::new();
        let president = h.president().await;
        let lga = h.first_child(h.zone(0));
        let member = h.approved("Sani Yauri", Tier::Lga, Some(h.seat(Tier::Lga, 2)), Some(lga)).await;

        let err = PositionService::new(&h.ctx)
            .promote(
                president,
                member,
                PromoteRequest {
                    seat_id: h.seat(Tier::Ward, 2),
                    jurisdiction_id: Some(h.first_child(lga)),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidTierChange { .. })));
    }

    #[tokio::test]
    async fn test_only_top_seat_manages_positions() {
        let h = Harness::new();
        let zone = h.zone(0);
        let lga = h.first_child(zone);
        let zonal = h.approved("Chiroma Idris", Tier::Zonal, Some(h.seat(Tier::Zonal, 1)), Some(zone)).await;
        let member = h.approved("Sani Yauri", Tier::Lga, Some(h.seat(Tier::Lga, 2)), Some(lga)).await;

        let err = PositionService::new(&h.ctx)
            .demote(
                zonal,
                member,
                DemoteRequest {
                    role_tier: Tier::Ward,
                    seat_id: None,
                    jurisdiction_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn test_demotion_without_seat_unseats() {
        let h = Harness::new();
        let president = h.president().await;
        let lga = h.first_child(h.zone(0));
        let member = h.approved("Sani Yauri", Tier::Lga, Some(h.seat(Tier::Lga, 2)), Some(lga)).await;

        let demoted = PositionService::new(&h.ctx)
            .demote(
                president,
                member,
                DemoteRequest {
                    role_tier: Tier::General,
                    seat_id: None,
                    jurisdiction_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(demoted.role_tier, Tier::General);
        assert_eq!(demoted.seat_id, None);
    }

    #[tokio::test]
    async fn test_swap_exchanges_placements() {
        let h = Harness::new();
        let president = h.president().await;
        let lga = h.first_child(h.zone(0));
        let ward = h.first_child(lga);
        let a = h.approved("Sani Yauri", Tier::Lga, Some(h.seat(Tier::Lga, 2)), Some(lga)).await;
        let b = h.approved("Hauwa Bello", Tier::Ward, Some(h.seat(Tier::Ward, 1)), Some(ward)).await;

        let swapped = PositionService::new(&h.ctx)
            .swap(president, SwapRequest { member_a_id: a, member_b_id: b })
            .await
            .unwrap();
        assert_eq!(swapped.member_a.role_tier, Tier::Ward);
        assert_eq!(swapped.member_a.jurisdiction_id, Some(ward.to_string()));
        assert_eq!(swapped.member_b.role_tier, Tier::Lga);
        assert_eq!(swapped.member_b.jurisdiction_id, Some(lga.to_string()));
    }

    #[tokio::test]
    async fn test_president_cannot_be_demoted() {
        let h = Harness::new();
        let president = h.president().await;

        let err = PositionService::new(&h.ctx)
            .demote(
                president,
                president,
                DemoteRequest {
                    role_tier: Tier::Zonal,
                    seat_id: None,
                    jurisdiction_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::ProtectedRole(id)) if *id == president));
        assert_eq!(h.member(president).await.seat_id, Some(h.president_seat()));
    }

    #[tokio::test]
    async fn test_president_cannot_be_swapped() {
        let h = Harness::new();
        let president = h.president().await;
        let zone = h.zone(0);
        let zonal = h.approved("Chiroma Idris", Tier::Zonal, Some(h.seat(Tier::Zonal, 1)), Some(zone)).await;
        let service = PositionService::new(&h.ctx);

        for request in [
            SwapRequest { member_a_id: president, member_b_id: zonal },
            SwapRequest { member_a_id: zonal, member_b_id: president },
        ] {
            let err = service.swap(president, request).await.unwrap_err();
            assert!(matches!(err.as_domain(), Some(DomainError::ProtectedRole(id)) if *id == president));
        }
        assert_eq!(h.member(zonal).await.role_tier, Tier::Zonal);
        assert!(h.events.event_types().is_empty());
    }

    #[tokio::test]
    async fn test_swap_needs_seated_members() {
        let h = Harness::new();
        let president = h.president().await;
        let lga = h.first_child(h.zone(0));
        let seated = h.approved("Sani Yauri", Tier::Lga, Some(h.seat(Tier::Lga, 2)), Some(lga)).await;
        let unseated = h.approved("Zainab Umar", Tier::General, None, None).await;

        let err = PositionService::new(&h.ctx)
            .swap(president, SwapRequest { member_a_id: seated, member_b_id: unseated })
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_actor_cannot_promote_itself() {
        let h = Harness::new();
        let president = h.president().await;

        let err = PositionService::new(&h.ctx)
            .promote(
                president,
                president,
                PromoteRequest {
                    seat_id: h.president_seat(),
                    jurisdiction_id: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::SelfTarget)));
    }
}
