//! # kpn-db
//!
//! Storage layer implementing the repository traits from `kpn-core`.
//!
//! ## Overview
//!
//! - PostgreSQL repositories over SQLx, one transaction per governance
//!   mutation with the audit entry written alongside
//! - Schema migrations applied at runtime from `migrations/`
//! - Database models with SQLx `FromRow` derives and fallible
//!   model -> entity mappers
//! - [`MemoryStore`], an in-process backend with the same atomicity
//!   guarantees, used by tests and `KPN_STORAGE=memory`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kpn_db::pool::{create_pool, run_migrations, PoolConfig};
//! use kpn_db::repositories::PgMemberRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::from_env()).await?;
//!     run_migrations(&pool).await?;
//!     let members = PgMemberRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_from_env, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgAuditRepository, PgCatalogRepository, PgContentRepository, PgDisciplinaryRepository,
    PgMemberRepository, PgReportRepository,
};
