//! HR/payroll dashboard gateway: typed backend services behind a shared query
//! cache, exposed as JSON endpoints.

pub mod api;
pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod feature;
pub mod http;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;
