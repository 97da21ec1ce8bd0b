//! Path parameter extractor
//!
//! Every parameterised route carries exactly one Snowflake ID.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use kpn_core::Snowflake;

use crate::response::ApiError;

/// The single Snowflake ID in the request path
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Snowflake);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        let id = Snowflake::parse(&raw).map_err(|_| ApiError::invalid_path(format!("'{raw}' is not a valid ID")))?;
        Ok(Self(id))
    }
}
