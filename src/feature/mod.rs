//! Cached reads and invalidating writes per resource family.
//!
//! Reads go through the shared [`QueryClient`]; writes validate their
//! payload, call the backend, and on success mark the affected reads stale
//! according to [`invalidation`].

pub mod employee;
pub mod invalidation;
pub mod keys;
pub mod payroll;
pub mod team;

pub use employee::EmployeeQueries;
pub use payroll::{BonusDeductionRef, PayrollQueries};
pub use team::TeamQueries;

use std::sync::Arc;

use crate::{
    cache::QueryClient,
    http::ApiClient,
    service::{EmployeeService, PayrollService, TeamService},
};

/// Every feature sharing one cache and one backend client.
#[derive(Clone)]
pub struct Features {
    pub client: QueryClient,
    pub employees: EmployeeQueries,
    pub teams: TeamQueries,
    pub payrolls: PayrollQueries,
}

impl Features {
    pub fn new(client: QueryClient, http: ApiClient) -> Self {
        Self {
            employees: EmployeeQueries::new(
                client.clone(),
                Arc::new(EmployeeService::new(http.clone())),
            ),
            teams: TeamQueries::new(client.clone(), Arc::new(TeamService::new(http.clone()))),
            payrolls: PayrollQueries::new(client.clone(), Arc::new(PayrollService::new(http))),
            client,
        }
    }
}
