use std::sync::Arc;

use super::{invalidation, keys};
use crate::{
    cache::{MutationOptions, QueryClient, QueryError, QueryOptions, QueryState},
    http::Page,
    model::{
        company::{CompanyPayrollPolicy, CompanyWallet, UpdatePayrollPolicy},
        payroll::{CreatePayroll, Payroll, PayrollFilter, UpdatePayroll},
        payslip::{BonusDeduction, BonusKind, CreatePayslip, Payslip, UpsertBonusDeduction},
        validation::Validate,
    },
    service::PayrollService,
};

/// Identifies a bonus or deduction together with the views it belongs to.
#[derive(Debug, Clone)]
pub struct BonusDeductionRef {
    pub kind: BonusKind,
    pub id: String,
    pub payslip_id: String,
    pub payroll_id: String,
}

#[derive(Clone)]
pub struct PayrollQueries {
    client: QueryClient,
    service: Arc<PayrollService>,
    options: QueryOptions,
}

impl PayrollQueries {
    pub fn new(client: QueryClient, service: Arc<PayrollService>) -> Self {
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

    pub async fn list(&self, filter: PayrollFilter) -> QueryState<Page<Payroll>> {
        let service = Arc::clone(&self.service);
        let key = keys::payroll::list(&filter);
        self.client
            .query(key, &self.options, move || {
                let service = Arc::clone(&service);
                let filter = filter.clone();
                async move {
                    service
                        .list_payrolls(&filter)
                        .await
                        .map_err(QueryError::from)
                }
            })
            .await
    }

    pub async fn detail(&self, id: &str) -> QueryState<Payroll> {
        let service = Arc::clone(&self.service);
        let owned = id.to_string();
        let options = self.options.clone().enabled(!id.is_empty());
        self.client
            .query(keys::payroll::detail(id), &options, move || {
                let service = Arc::clone(&service);
                let id = owned.clone();
                async move { service.get_payroll(&id).await.map_err(QueryError::from) }
            })
            .await
    }

    pub async fn payslips(&self, payroll_id: &str) -> QueryState<Vec<Payslip>> {
        let service = Arc::clone(&self.service);
        let owned = payroll_id.to_string();
        let options = self.options.clone().enabled(!payroll_id.is_empty());
        self.client
            .query(keys::payroll::payslips(payroll_id), &options, move || {
                let service = Arc::clone(&service);
                let payroll_id = owned.clone();
                async move {
                    service
                        .list_payslips(&payroll_id)
                        .await
                        .map_err(QueryError::from)
                }
            })
            .await
    }

    pub async fn bonus_deductions(
        &self,
        kind: BonusKind,
        payslip_id: &str,
    ) -> QueryState<Vec<BonusDeduction>> {
        let service = Arc::clone(&self.service);
        let owned = payslip_id.to_string();
        let options = self.options.clone().enabled(!payslip_id.is_empty());
        self.client
            .query(keys::payroll::bonus_deductions(kind, payslip_id), &options, move || {
                let service = Arc::clone(&service);
                let payslip_id = owned.clone();
                async move {
                    service
                        .list_bonus_deductions(kind, &payslip_id)
                        .await
                        .map_err(QueryError::from)
                }
            })
            .await
    }

    pub async fn company_policy(&self) -> QueryState<CompanyPayrollPolicy> {
        let service = Arc::clone(&self.service);
        self.client
            .query(keys::payroll::company_policy(), &self.options, move || {
                let service = Arc::clone(&service);
                async move { service.get_company_policy().await.map_err(QueryError::from) }
            })
            .await
    }

    pub async fn company_wallet(&self) -> QueryState<CompanyWallet> {
        let service = Arc::clone(&self.service);
        self.client
            .query(keys::payroll::company_wallet(), &self.options, move || {
                let service = Arc::clone(&service);
                async move { service.get_company_wallet().await.map_err(QueryError::from) }
            })
            .await
    }

    pub async fn create(&self, payload: CreatePayroll) -> Result<Payroll, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                payload,
                MutationOptions::invalidating("payroll.create", |_, _| {
                    invalidation::payroll_created()
                }),
                |payload| async move {
                    self.service
                        .create_payroll(&payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn update(&self, id: &str, payload: UpdatePayroll) -> Result<Payroll, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                (id.to_string(), payload),
                MutationOptions::invalidating(
                    "payroll.update",
                    |_, (id, _): &(String, UpdatePayroll)| invalidation::payroll_updated(id),
                ),
                |(id, payload)| async move {
                    self.service
                        .update_payroll(&id, &payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn approve(&self, id: &str) -> Result<Payroll, QueryError> {
        self.client
            .mutate(
                id.to_string(),
                MutationOptions::invalidating("payroll.approve", |_, id: &String| {
                    invalidation::payroll_updated(id)
                }),
                |id| async move {
                    self.service
                        .approve_payroll(&id)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn disburse(&self, id: &str) -> Result<Payroll, QueryError> {
        self.client
            .mutate(
                id.to_string(),
                MutationOptions::invalidating("payroll.disburse", |_, id: &String| {
                    invalidation::payroll_disbursed(id)
                }),
                |id| async move {
                    self.service
                        .disburse_payroll(&id)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn create_payslip(&self, payload: CreatePayslip) -> Result<Payslip, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                payload,
                MutationOptions::invalidating("payslip.create", |_, p: &CreatePayslip| {
                    invalidation::payslip_changed(&p.payroll_id)
                }),
                |payload| async move {
                    self.service
                        .create_payslip(&payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn delete_payslip(&self, id: &str, payroll_id: &str) -> Result<(), QueryError> {
        self.client
            .mutate(
                (id.to_string(), payroll_id.to_string()),
                MutationOptions::invalidating(
                    "payslip.delete",
                    |_, (_, payroll_id): &(String, String)| invalidation::payslip_changed(payroll_id),
                ),
                |(id, _)| async move {
                    self.service
                        .delete_payslip(&id)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn create_bonus_deduction(
        &self,
        kind: BonusKind,
        payload: UpsertBonusDeduction,
    ) -> Result<BonusDeduction, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                payload,
                MutationOptions::invalidating("bonus_deduction.create", move |_, p: &UpsertBonusDeduction| {
                    invalidation::bonus_deduction_changed(kind, &p.payslip_id, &p.payroll_id)
                }),
                |payload| async move {
                    self.service
                        .create_bonus_deduction(kind, &payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn update_bonus_deduction(
        &self,
        kind: BonusKind,
        id: &str,
        payload: UpsertBonusDeduction,
    ) -> Result<BonusDeduction, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                (id.to_string(), payload),
                MutationOptions::invalidating(
                    "bonus_deduction.update",
                    move |_, (_, p): &(String, UpsertBonusDeduction)| {
                        invalidation::bonus_deduction_changed(kind, &p.payslip_id, &p.payroll_id)
                    },
                ),
                |(id, payload)| async move {
                    self.service
                        .update_bonus_deduction(kind, &id, &payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn delete_bonus_deduction(&self, target: BonusDeductionRef) -> Result<(), QueryError> {
        self.client
            .mutate(
                target,
                MutationOptions::invalidating("bonus_deduction.delete", |_, t: &BonusDeductionRef| {
                    invalidation::bonus_deduction_changed(t.kind, &t.payslip_id, &t.payroll_id)
                }),
                |target| async move {
                    self.service
                        .delete_bonus_deduction(target.kind, &target.id)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn update_policy(
        &self,
        payload: UpdatePayrollPolicy,
    ) -> Result<CompanyPayrollPolicy, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                payload,
                MutationOptions::invalidating("payroll_policy.update", |_, _| {
                    invalidation::policy_updated()
                }),
                |payload| async move {
                    self.service
                        .update_company_policy(&payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{CacheConfig, QueryStatus},
        feature::EmployeeQueries,
        http::{Method, fake::FakeTransport},
        model::{amount::Amount, payroll_status::PayrollStatus},
        service::EmployeeService,
    };
    use serde_json::{Value, json};
    use std::time::Duration;

    fn client() -> QueryClient {
        QueryClient::new(CacheConfig {
            defaults: QueryOptions::default().stale_time(Duration::from_secs(60)),
            ..CacheConfig::default()
        })
    }

    fn payroll_json(id: &str, status: &str) -> Value {
        json!({ "id": id, "name": "January", "status": status, "totalAmount": 1000.0 })
    }

    #[tokio::test]
    async fn new_payslip_refreshes_payslips_and_suspended_list() {
        let transport = FakeTransport::new();
        transport.respond_data(Method::Get, "/payslips", 200, json!([]));
        transport.respond_data(
            Method::Get,
            "/payslips",
            200,
            json!([{ "id": "S1", "payrollId": "P1", "employeeId": "E1" }]),
        );
        transport.respond_data(
            Method::Get,
            "/employees/suspended",
            200,
            json!([{ "id": "E1", "firstName": "Ann", "lastName": "Lee", "email": "ann@acme.io" }]),
        );
        transport.respond_data(Method::Get, "/employees/suspended", 200, json!([]));
        transport.respond_data(
            Method::Post,
            "/payslips",
            201,
            json!({ "id": "S1", "payrollId": "P1", "employeeId": "E1" }),
        );

        let client = client();
        let payrolls = PayrollQueries::new(
            client.clone(),
            Arc::new(PayrollService::new(transport.client())),
        );
        let employees = EmployeeQueries::new(
            client.clone(),
            Arc::new(EmployeeService::new(transport.client())),
        );

        assert!(payrolls.payslips("P1").await.data().unwrap().is_empty());
        assert_eq!(employees.suspended_by_payroll("P1").await.data().unwrap().len(), 1);

        payrolls
            .create_payslip(CreatePayslip {
                payroll_id: "P1".into(),
                employee_id: "E1".into(),
                gross_amount: Amount::from(4200.0),
            })
            .await
            .unwrap();

        assert_eq!(
            client.status(&keys::payroll::payslips("P1")).await,
            QueryStatus::Stale
        );
        assert_eq!(payrolls.payslips("P1").await.data().unwrap().len(), 1);
        assert!(employees.suspended_by_payroll("P1").await.data().unwrap().is_empty());
        assert_eq!(transport.calls_to(Method::Get, "/employees/suspended"), 2);
    }

    #[tokio::test]
    async fn approving_refetches_detail_with_new_status() {
        let transport = FakeTransport::new();
        transport.respond_data(Method::Get, "/payrolls/P1", 200, payroll_json("P1", "idle"));
        transport.respond_data(Method::Get, "/payrolls/P1", 200, payroll_json("P1", "awaiting"));
        transport.respond_data(
            Method::Patch,
            "/payrolls/P1/approve",
            200,
            payroll_json("P1", "awaiting"),
        );
        let queries = PayrollQueries::new(
            client(),
            Arc::new(PayrollService::new(transport.client())),
        );

        let before = queries.detail("P1").await;
        assert_eq!(before.data().unwrap().status, PayrollStatus::Idle);
        queries.approve("P1").await.unwrap();
        let after = queries.detail("P1").await;
        assert_eq!(after.data().unwrap().status, PayrollStatus::Awaiting);
    }

    #[tokio::test]
    async fn disbursement_marks_wallet_stale() {
        let transport = FakeTransport::new();
        transport.respond_data(
            Method::Get,
            "/wallets/company",
            200,
            json!({ "id": "W1", "balance": 5000.0, "currency": "USD" }),
        );
        transport.respond_data(
            Method::Post,
            "/payrolls/P1/disburse",
            200,
            payroll_json("P1", "disbursed"),
        );
        let client = client();
        let queries = PayrollQueries::new(
            client.clone(),
            Arc::new(PayrollService::new(transport.client())),
        );

        queries.company_wallet().await;
        queries.disburse("P1").await.unwrap();

        assert_eq!(
            client.status(&keys::payroll::company_wallet()).await,
            QueryStatus::Stale
        );
    }

    #[tokio::test]
    async fn unexpected_success_status_is_a_failed_mutation() {
        let transport = FakeTransport::new();
        transport.respond_data(Method::Get, "/payrolls", 200, json!([payroll_json("P1", "idle")]));
        // 200 where 201 is expected: the service reports no data.
        transport.respond_data(Method::Post, "/payrolls", 200, payroll_json("P2", "idle"));
        let client = client();
        let queries = PayrollQueries::new(
            client.clone(),
            Arc::new(PayrollService::new(transport.client())),
        );
        queries.list(PayrollFilter::default()).await;

        let err = queries
            .create(CreatePayroll {
                name: "February".into(),
                period_start: "2026-02-01".parse().unwrap(),
                period_end: "2026-02-28".parse().unwrap(),
                pay_date: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::Unsuccessful { .. }));
        assert_eq!(
            client.status(&keys::payroll::list(&PayrollFilter::default())).await,
            QueryStatus::Fresh
        );
    }

    #[tokio::test]
    async fn deleting_deduction_leaves_bonuses_alone() {
        let transport = FakeTransport::new();
        transport.respond_data(Method::Get, "/bonuses", 200, json!([]));
        transport.respond_data(Method::Get, "/deductions", 200, json!([]));
        transport.respond(Method::Delete, "/deductions/D1", 204, Value::Null);
        let client = client();
        let queries = PayrollQueries::new(
            client.clone(),
            Arc::new(PayrollService::new(transport.client())),
        );
        queries.bonus_deductions(BonusKind::Bonus, "S1").await;
        queries.bonus_deductions(BonusKind::Deduction, "S1").await;

        queries
            .delete_bonus_deduction(BonusDeductionRef {
                kind: BonusKind::Deduction,
                id: "D1".into(),
                payslip_id: "S1".into(),
                payroll_id: "P1".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            client
                .status(&keys::payroll::bonus_deductions(BonusKind::Deduction, "S1"))
                .await,
            QueryStatus::Stale
        );
        assert_eq!(
            client
                .status(&keys::payroll::bonus_deductions(BonusKind::Bonus, "S1"))
                .await,
            QueryStatus::Fresh
        );
    }
}
