//! JSON endpoints over the feature layer.

pub mod cache;
pub mod employee;
pub mod payroll;
pub mod team;
pub mod ui_state;

use actix_web::HttpResponse;
use serde::Serialize;

use crate::{cache::QueryState, error::AppError};

/// 200 with the data, 404 when the read produced nothing.
pub(crate) fn respond<T: Serialize>(state: QueryState<T>, what: &str) -> Result<HttpResponse, AppError> {
    match state.into_result()? {
        Some(data) => Ok(HttpResponse::Ok().json(data.as_ref())),
        None => Err(AppError::NotFound(what.to_string())),
    }
}
