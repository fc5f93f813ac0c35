use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    cache::{CacheSnapshotEntry, Revalidate},
    error::AppError,
    feature::Features,
};

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RevalidateScope {
    /// Entries marked stale by a write or a failed fetch.
    #[default]
    Invalidated,
    /// Also entries whose refetch interval has elapsed.
    Due,
    All,
}

impl From<RevalidateScope> for Revalidate {
    fn from(scope: RevalidateScope) -> Self {
        match scope {
            RevalidateScope::Invalidated => Revalidate::Invalidated,
            RevalidateScope::Due => Revalidate::Due,
            RevalidateScope::All => Revalidate::All,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RevalidateRequest {
    #[serde(default)]
    pub scope: RevalidateScope,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevalidateResponse {
    #[schema(example = 3)]
    pub refetched: usize,
}

/// Every cached read with its status
#[utoipa::path(
    get,
    path = "/api/v1/cache",
    responses(
        (status = 200, description = "Cache entries", body = [CacheSnapshotEntry])
    ),
    tag = "Cache"
)]
pub async fn snapshot(features: web::Data<Features>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(features.client.snapshot()))
}

/// Refetch cached reads now, as a dashboard does when it regains focus.
#[utoipa::path(
    post,
    path = "/api/v1/cache/revalidate",
    request_body(content = RevalidateRequest, description = "Defaults to `invalidated`"),
    responses(
        (status = 200, description = "Number of reads refetched", body = RevalidateResponse)
    ),
    tag = "Cache"
)]
pub async fn revalidate(
    features: web::Data<Features>,
    body: Option<web::Json<RevalidateRequest>>,
) -> Result<HttpResponse, AppError> {
    let scope = body.map(|b| b.into_inner().scope).unwrap_or_default();
    let refetched = features.client.revalidate(scope.into()).await;
    info!(?scope, refetched, "Manual revalidation");
    Ok(HttpResponse::Ok().json(RevalidateResponse { refetched }))
}
