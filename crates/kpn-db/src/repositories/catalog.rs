//! PostgreSQL implementation of CatalogRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use kpn_core::entities::{Jurisdiction, Seat};
use kpn_core::traits::{CatalogRepository, RepoResult};

use crate::mappers::raw;
use crate::models::{JurisdictionModel, SeatModel};

use super::error::map_db_error;

/// PostgreSQL implementation of CatalogRepository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    #[instrument(skip_all, fields(jurisdictions = jurisdictions.len(), seats = seats.len()))]
    async fn seed(&self, jurisdictions: &[Jurisdiction], seats: &[Seat]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Parents precede children in the seed order
        for node in jurisdictions {
            sqlx::query(
                r#"
                INSERT INTO jurisdictions (id, level, name, parent_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(node.id.into_inner())
            .bind(node.level.as_str())
            .bind(&node.name)
            .bind(raw(node.parent_id))
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        for seat in seats {
            sqlx::query(
                r#"
                INSERT INTO seats (id, tier, title, seat_number, flags)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(seat.id.into_inner())
            .bind(seat.tier.as_str())
            .bind(&seat.title)
            .bind(seat.seat_number)
            .bind(seat.flags.to_i64())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_jurisdictions(&self) -> RepoResult<Vec<Jurisdiction>> {
        let rows = sqlx::query_as::<_, JurisdictionModel>(
            r#"
            SELECT id, level, name, parent_id
            FROM jurisdictions
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Jurisdiction::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn list_seats(&self) -> RepoResult<Vec<Seat>> {
        let rows = sqlx::query_as::<_, SeatModel>(
            r#"
            SELECT id, tier, title, seat_number, flags
            FROM seats
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(Seat::try_from).collect()
    }
}
