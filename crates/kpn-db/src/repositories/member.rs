//! PostgreSQL implementation of MemberRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use kpn_core::entities::{AuditEntry, Member, Placement, StatusChange};
use kpn_core::error::DomainError;
use kpn_core::governance::StandingInputs;
use kpn_core::traits::{MemberRepository, RepoResult};
use kpn_core::value_objects::{ApprovalStatus, Snowflake, Standing};

use crate::mappers::{raw, snowflake};
use crate::models::MemberModel;

use super::error::{insert_audit, map_db_error, map_unique_violation, seat_occupied};

macro_rules! member_columns {
    () => {
        "id, full_name, role_tier, seat_id, jurisdiction_id, approval_status, \
         missed_duty_count, ignored_reminder_count, computed_standing, \
         last_activity_at, created_at, updated_at"
    };
}

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock a member row for the rest of the transaction
    async fn lock(conn: &mut PgConnection, id: Snowflake) -> RepoResult<MemberModel> {
        sqlx::query_as::<_, MemberModel>(concat!(
            "SELECT ",
            member_columns!(),
            " FROM members WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::MemberNotFound(id))
    }

    async fn write_placement(
        conn: &mut PgConnection,
        id: Snowflake,
        placement: &Placement,
    ) -> RepoResult<MemberModel> {
        sqlx::query_as::<_, MemberModel>(concat!(
            "UPDATE members SET role_tier = $2, seat_id = $3, jurisdiction_id = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING ",
            member_columns!()
        ))
        .bind(id.into_inner())
        .bind(placement.role_tier.as_str())
        .bind(raw(placement.seat_id))
        .bind(raw(placement.jurisdiction_id))
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                seat_occupied(placement.seat_id, placement.jurisdiction_id)
            })
        })?
        .ok_or(DomainError::MemberNotFound(id))
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberModel>(concat!(
            "SELECT ",
            member_columns!(),
            " FROM members WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Member::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_seat_holder(
        &self,
        seat_id: Snowflake,
        jurisdiction_id: Option<Snowflake>,
    ) -> RepoResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberModel>(concat!(
            "SELECT ",
            member_columns!(),
            " FROM members \
             WHERE seat_id = $1 \
               AND COALESCE(jurisdiction_id, 0) = COALESCE($2::bigint, 0) \
               AND approval_status IN ('APPROVED', 'SUSPENDED')"
        ))
        .bind(seat_id.into_inner())
        .bind(raw(jurisdiction_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Member::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_jurisdiction(&self, jurisdiction_id: Snowflake) -> RepoResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberModel>(concat!(
            "SELECT ",
            member_columns!(),
            " FROM members WHERE jurisdiction_id = $1 ORDER BY id"
        ))
        .bind(jurisdiction_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Member::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn list_by_status(&self, status: ApprovalStatus) -> RepoResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberModel>(concat!(
            "SELECT ",
            member_columns!(),
            " FROM members WHERE approval_status = $1 ORDER BY created_at, id"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Member::try_from).collect()
    }

    #[instrument(skip(self, member, audit), fields(member_id = %member.id))]
    async fn create(&self, member: &Member, audit: &AuditEntry) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO members (
                id, full_name, role_tier, seat_id, jurisdiction_id, approval_status,
                missed_duty_count, ignored_reminder_count, computed_standing,
                last_activity_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(member.id.into_inner())
        .bind(&member.full_name)
        .bind(member.role_tier.as_str())
        .bind(raw(member.seat_id))
        .bind(raw(member.jurisdiction_id))
        .bind(member.approval_status.as_str())
        .bind(member.missed_duty_count)
        .bind(member.ignored_reminder_count)
        .bind(member.computed_standing.as_str())
        .bind(member.last_activity_at)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || seat_occupied(member.seat_id, member.jurisdiction_id)))?;

        insert_audit(&mut tx, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, audit))]
    async fn place(
        &self,
        member_id: Snowflake,
        expected: ApprovalStatus,
        placement: &Placement,
        audit: &AuditEntry,
    ) -> RepoResult<Member> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current = Member::try_from(Self::lock(&mut tx, member_id).await?)?;
        current.ensure_status(expected)?;

        let row = Self::write_placement(&mut tx, member_id, placement).await?;
        insert_audit(&mut tx, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Member::try_from(row)
    }

    #[instrument(skip(self, audit))]
    async fn set_status(&self, change: &StatusChange, audit: &AuditEntry) -> RepoResult<Member> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current = Self::lock(&mut tx, change.member_id).await?;
        if let Some(expected) = change.expected {
            if current.approval_status != expected.as_str() {
                return Err(DomainError::AlreadyResolved(change.member_id));
            }
        }

        let row = sqlx::query_as::<_, MemberModel>(concat!(
            "UPDATE members \
             SET approval_status = $2, \
                 seat_id = CASE WHEN $3 THEN NULL ELSE seat_id END, \
                 jurisdiction_id = CASE WHEN $3 THEN NULL ELSE jurisdiction_id END, \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING ",
            member_columns!()
        ))
        .bind(change.member_id.into_inner())
        .bind(change.status.as_str())
        .bind(change.vacates())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                seat_occupied(snowflake(current.seat_id), snowflake(current.jurisdiction_id))
            })
        })?;

        insert_audit(&mut tx, audit).await?;
        tx.commit().await.map_err(map_db_error)?;

        Member::try_from(row)
    }

    #[instrument(skip(self, audits))]
    async fn swap_positions(
        &self,
        a: Snowflake,
        b: Snowflake,
        audits: [&AuditEntry; 2],
    ) -> RepoResult<(Member, Member)> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock in id order so concurrent swaps cannot deadlock
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        let first_row = Self::lock(&mut tx, first).await?;
        let second_row = Self::lock(&mut tx, second).await?;
        let (row_a, row_b) = if a <= b {
            (first_row, second_row)
        } else {
            (second_row, first_row)
        };

        let member_a = Member::try_from(row_a)?;
        let member_b = Member::try_from(row_b)?;
        member_a.ensure_swappable()?;
        member_b.ensure_swappable()?;
        let placement_a = member_a.placement();
        let placement_b = member_b.placement();

        // Release a's key before b takes it
        Self::write_placement(&mut tx, a, &Placement::unseated(placement_a.role_tier)).await?;
        let new_b = Self::write_placement(&mut tx, b, &placement_a).await?;
        let new_a = Self::write_placement(&mut tx, a, &placement_b).await?;

        for audit in audits {
            insert_audit(&mut tx, audit).await?;
        }
        tx.commit().await.map_err(map_db_error)?;

        Ok((Member::try_from(new_a)?, Member::try_from(new_b)?))
    }

    #[instrument(skip(self, audit))]
    async fn update_standing(
        &self,
        member_id: Snowflake,
        inputs: &StandingInputs,
        standing: Standing,
        audit: Option<&AuditEntry>,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE members
            SET last_activity_at = $2,
                missed_duty_count = $3,
                ignored_reminder_count = $4,
                computed_standing = $5
            WHERE id = $1
            "#,
        )
        .bind(member_id.into_inner())
        .bind(inputs.last_activity_at)
        .bind(inputs.missed_duty_count)
        .bind(inputs.ignored_reminder_count)
        .bind(standing.as_str())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MemberNotFound(member_id));
        }

        if let Some(audit) = audit {
            insert_audit(&mut tx, audit).await?;
        }
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
