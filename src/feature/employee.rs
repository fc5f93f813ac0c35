use std::sync::Arc;

use super::{invalidation, keys};
use crate::{
    cache::{MutationOptions, QueryClient, QueryError, QueryOptions, QueryState},
    http::Page,
    model::{
        employee::{CreateEmployee, Employee, EmployeeFilter, SuspendEmployee, UpdateEmployee},
        validation::Validate,
    },
    service::EmployeeService,
};

#[derive(Clone)]
pub struct EmployeeQueries {
    client: QueryClient,
    service: Arc<EmployeeService>,
    options: QueryOptions,
}

impl EmployeeQueries {
    pub fn new(client: QueryClient, service: Arc<EmployeeService>) -> Self {
        let options = client.default_options();
        Self {
            client,
            service,
            options,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn list(&self, filter: EmployeeFilter) -> QueryState<Page<Employee>> {
        let service = Arc::clone(&self.service);
        let key = keys::employee::list(&filter);
        self.client
            .query(key, &self.options, move || {
                let service = Arc::clone(&service);
                let filter = filter.clone();
                async move {
                    service
                        .list_employees(&filter)
                        .await
                        .map_err(QueryError::from)
                }
            })
            .await
    }

    pub async fn detail(&self, id: &str) -> QueryState<Employee> {
        let service = Arc::clone(&self.service);
        let owned = id.to_string();
        let options = self.options.clone().enabled(!id.is_empty());
        self.client
            .query(keys::employee::detail(id), &options, move || {
                let service = Arc::clone(&service);
                let id = owned.clone();
                async move {
                    service
                        .get_employee(&id)
                        .await
                        .map_err(QueryError::from)
                }
            })
            .await
    }

    /// Employees excluded from a payroll. Disabled until a payroll is chosen.
    pub async fn suspended_by_payroll(&self, payroll_id: &str) -> QueryState<Vec<Employee>> {
        let service = Arc::clone(&self.service);
        let owned = payroll_id.to_string();
        let options = self.options.clone().enabled(!payroll_id.is_empty());
        self.client
            .query(keys::employee::suspended_by_payroll(payroll_id), &options, move || {
                let service = Arc::clone(&service);
                let payroll_id = owned.clone();
                async move {
                    service
                        .list_suspended_by_payroll(&payroll_id)
                        .await
                        .map_err(QueryError::from)
                }
            })
            .await
    }

    pub async fn create(&self, payload: CreateEmployee) -> Result<Employee, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                payload,
                MutationOptions::invalidating("employee.create", |_, _| {
                    invalidation::employee_created()
                }),
                |payload| async move {
                    self.service
                        .create_employee(&payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn update(&self, id: &str, payload: UpdateEmployee) -> Result<Employee, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                (id.to_string(), payload),
                MutationOptions::invalidating("employee.update", |_, (id, _): &(String, UpdateEmployee)| {
                    invalidation::employee_updated(id)
                }),
                |(id, payload)| async move {
                    self.service
                        .update_employee(&id, &payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), QueryError> {
        self.client
            .mutate(
                id.to_string(),
                MutationOptions::invalidating("employee.delete", |_, _| {
                    invalidation::employee_deleted()
                })
                .removing(|_, id: &String| invalidation::employee_removed(id)),
                |id| async move {
                    self.service
                        .delete_employee(&id)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn suspend(&self, payload: SuspendEmployee) -> Result<(), QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                payload,
                MutationOptions::invalidating("employee.suspend", |_, p: &SuspendEmployee| {
                    invalidation::employee_suspended(&p.payroll_id)
                }),
                |payload| async move {
                    self.service
                        .suspend_from_payroll(&payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }
}
