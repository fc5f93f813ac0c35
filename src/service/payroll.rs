use serde::de::IgnoredAny;

use crate::{
    http::{ApiClient, HttpError, ListPayload, Page},
    model::{
        company::{CompanyPayrollPolicy, CompanyWallet, UpdatePayrollPolicy},
        payroll::{CreatePayroll, Payroll, PayrollFilter, UpdatePayroll},
        payslip::{BonusDeduction, BonusKind, CreatePayslip, Payslip, UpsertBonusDeduction},
    },
};

/// Payroll runs, payslips, bonuses/deductions, company policy and wallet.
pub struct PayrollService {
    http: ApiClient,
}

impl PayrollService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub async fn list_payrolls(
        &self,
        filter: &PayrollFilter,
    ) -> Result<Option<Page<Payroll>>, HttpError> {
        let res = self
            .http
            .get::<ListPayload<Payroll>>("/payrolls", filter.query_pairs())
            .await?;
        Ok(res.expect(&[200])?.map(ListPayload::normalize))
    }

    pub async fn get_payroll(&self, id: &str) -> Result<Option<Payroll>, HttpError> {
        let res = self.http.get::<Payroll>(&format!("/payrolls/{id}"), Vec::new()).await?;
        res.expect(&[200])
    }

    pub async fn create_payroll(&self, payload: &CreatePayroll) -> Result<Option<Payroll>, HttpError> {
        let res = self.http.post::<_, Payroll>("/payrolls", payload).await?;
        res.expect(&[201])
    }

    pub async fn update_payroll(
        &self,
        id: &str,
        payload: &UpdatePayroll,
    ) -> Result<Option<Payroll>, HttpError> {
        let res = self
            .http
            .patch::<_, Payroll>(&format!("/payrolls/{id}"), payload)
            .await?;
        res.expect(&[200])
    }

    pub async fn approve_payroll(&self, id: &str) -> Result<Option<Payroll>, HttpError> {
        let res = self
            .http
            .patch::<_, Payroll>(&format!("/payrolls/{id}/approve"), &serde_json::json!({}))
            .await?;
        res.expect(&[200])
    }

    pub async fn disburse_payroll(&self, id: &str) -> Result<Option<Payroll>, HttpError> {
        let res = self
            .http
            .post::<_, Payroll>(&format!("/payrolls/{id}/disburse"), &serde_json::json!({}))
            .await?;
        res.expect(&[200, 201])
    }

    pub async fn list_payslips(&self, payroll_id: &str) -> Result<Option<Vec<Payslip>>, HttpError> {
        let res = self
            .http
            .get::<ListPayload<Payslip>>(
                "/payslips",
                vec![("payrollId".to_string(), payroll_id.to_string())],
            )
            .await?;
        Ok(res.expect(&[200])?.map(|list| list.normalize().items))
    }

    pub async fn create_payslip(&self, payload: &CreatePayslip) -> Result<Option<Payslip>, HttpError> {
        let res = self.http.post::<_, Payslip>("/payslips", payload).await?;
        res.expect(&[201])
    }

    pub async fn delete_payslip(&self, id: &str) -> Result<Option<()>, HttpError> {
        let res = self.http.delete::<IgnoredAny>(&format!("/payslips/{id}")).await?;
        Ok(res.expect(&[200, 204])?.map(|_| ()))
    }

    pub async fn list_bonus_deductions(
        &self,
        kind: BonusKind,
        payslip_id: &str,
    ) -> Result<Option<Vec<BonusDeduction>>, HttpError> {
        let res = self
            .http
            .get::<ListPayload<BonusDeduction>>(
                kind.path(),
                vec![("payslipId".to_string(), payslip_id.to_string())],
            )
            .await?;
        Ok(res.expect(&[200])?.map(|list| list.normalize().items))
    }

    pub async fn create_bonus_deduction(
        &self,
        kind: BonusKind,
        payload: &UpsertBonusDeduction,
    ) -> Result<Option<BonusDeduction>, HttpError> {
        let res = self.http.post::<_, BonusDeduction>(kind.path(), payload).await?;
        res.expect(&[201])
    }

    pub async fn update_bonus_deduction(
        &self,
        kind: BonusKind,
        id: &str,
        payload: &UpsertBonusDeduction,
    ) -> Result<Option<BonusDeduction>, HttpError> {
        let res = self
            .http
            .patch::<_, BonusDeduction>(&format!("{}/{id}", kind.path()), payload)
            .await?;
        res.expect(&[200])
    }

    pub async fn delete_bonus_deduction(
        &self,
        kind: BonusKind,
        id: &str,
    ) -> Result<Option<()>, HttpError> {
        let res = self
            .http
            .delete::<IgnoredAny>(&format!("{}/{id}", kind.path()))
            .await?;
        Ok(res.expect(&[200, 204])?.map(|_| ()))
    }

    pub async fn get_company_policy(&self) -> Result<Option<CompanyPayrollPolicy>, HttpError> {
        let res = self
            .http
            .get::<CompanyPayrollPolicy>("/payroll-policy/company", Vec::new())
            .await?;
        res.expect(&[200])
    }

    pub async fn update_company_policy(
        &self,
        payload: &UpdatePayrollPolicy,
    ) -> Result<Option<CompanyPayrollPolicy>, HttpError> {
        let res = self
            .http
            .patch::<_, CompanyPayrollPolicy>("/payroll-policy/company", payload)
            .await?;
        res.expect(&[200])
    }

    pub async fn get_company_wallet(&self) -> Result<Option<CompanyWallet>, HttpError> {
        let res = self
            .http
            .get::<CompanyWallet>("/wallets/company", Vec::new())
            .await?;
        res.expect(&[200])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{http::{Method, fake::FakeTransport}, model::payroll_status::PayrollStatus};
    use serde_json::json;

    #[tokio::test]
    async fn payroll_detail_normalizes_status() {
        let transport = FakeTransport::new();
        transport.respond_data(
            Method::Get,
            "/payrolls/P1",
            200,
            json!({ "id": "P1", "status": "Awaiting_Approval", "totalAmount": 900.0 }),
        );
        let service = PayrollService::new(transport.client());

        let payroll = service.get_payroll("P1").await.unwrap().unwrap();
        assert_eq!(payroll.status, PayrollStatus::Awaiting);
    }

    #[tokio::test]
    async fn bonus_and_deduction_use_their_own_collections() {
        let transport = FakeTransport::new();
        transport.respond_data(Method::Get, "/bonuses", 200, json!([]));
        transport.respond(Method::Delete, "/deductions/D1", 204, serde_json::Value::Null);
        let service = PayrollService::new(transport.client());

        let bonuses = service
            .list_bonus_deductions(BonusKind::Bonus, "S1")
            .await
            .unwrap()
            .unwrap();
        assert!(bonuses.is_empty());
        assert_eq!(
            service
                .delete_bonus_deduction(BonusKind::Deduction, "D1")
                .await
                .unwrap(),
            Some(())
        );

        let call = transport.last_call(Method::Get, "/bonuses").unwrap();
        assert_eq!(call.query, vec![("payslipId".to_string(), "S1".to_string())]);
    }

    #[tokio::test]
    async fn wallet_amounts_pass_through_verbatim() {
        let transport = FakeTransport::new();
        transport.respond_data(
            Method::Get,
            "/wallets/company",
            200,
            json!({ "id": "W1", "balance": 1234.567, "currency": "EUR" }),
        );
        let service = PayrollService::new(transport.client());

        let wallet = service.get_company_wallet().await.unwrap().unwrap();
        assert_eq!(wallet.balance.as_f64(), Some(1234.567));
        assert_eq!(wallet.currency.as_deref(), Some("EUR"));
    }
}
