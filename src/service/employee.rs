use serde::de::IgnoredAny;

use crate::{
    http::{ApiClient, HttpError, ListPayload, Page},
    model::employee::{CreateEmployee, Employee, EmployeeFilter, SuspendEmployee, UpdateEmployee},
};

pub struct EmployeeService {
    http: ApiClient,
}

impl EmployeeService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub async fn list_employees(
        &self,
        filter: &EmployeeFilter,
    ) -> Result<Option<Page<Employee>>, HttpError> {
        let res = self
            .http
            .get::<ListPayload<Employee>>("/employees", filter.query_pairs())
            .await?;
        Ok(res.expect(&[200])?.map(ListPayload::normalize))
    }

    pub async fn get_employee(&self, id: &str) -> Result<Option<Employee>, HttpError> {
        let res = self
            .http
            .get::<Employee>(&format!("/employees/{id}"), Vec::new())
            .await?;
        res.expect(&[200])
    }

    pub async fn create_employee(
        &self,
        payload: &CreateEmployee,
    ) -> Result<Option<Employee>, HttpError> {
        let res = self.http.post::<_, Employee>("/employees", payload).await?;
        res.expect(&[201])
    }

    pub async fn update_employee(
        &self,
        id: &str,
        payload: &UpdateEmployee,
    ) -> Result<Option<Employee>, HttpError> {
        let res = self
            .http
            .patch::<_, Employee>(&format!("/employees/{id}"), payload)
            .await?;
        res.expect(&[200])
    }

    pub async fn delete_employee(&self, id: &str) -> Result<Option<()>, HttpError> {
        let res = self
            .http
            .delete::<IgnoredAny>(&format!("/employees/{id}"))
            .await?;
        Ok(res.expect(&[200, 204])?.map(|_| ()))
    }

    /// Employees excluded from a payroll run.
    pub async fn list_suspended_by_payroll(
        &self,
        payroll_id: &str,
    ) -> Result<Option<Vec<Employee>>, HttpError> {
        let res = self
            .http
            .get::<ListPayload<Employee>>(
                "/employees/suspended",
                vec![("payrollId".to_string(), payroll_id.to_string())],
            )
            .await?;
        Ok(res.expect(&[200])?.map(|list| list.normalize().items))
    }

    pub async fn suspend_from_payroll(
        &self,
        payload: &SuspendEmployee,
    ) -> Result<Option<()>, HttpError> {
        let res = self
            .http
            .post::<_, IgnoredAny>("/employees/suspended", payload)
            .await?;
        Ok(res.expect(&[200, 201])?.map(|_| ()))
    }
}
