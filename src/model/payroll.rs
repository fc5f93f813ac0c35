use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::{IntoParams, ToSchema};

use super::{
    amount::Amount,
    payroll_status::PayrollStatus,
    validation::{Validate, ValidationErrors},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    #[schema(example = "pay_2026_01")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "January 2026")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2026-01-01")]
    pub period_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2026-01-31")]
    pub period_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_date: Option<String>,
    #[serde(default)]
    #[schema(value_type = String, example = "awaiting")]
    pub status: PayrollStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>, example = 125000.0)]
    pub total_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "USD")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PayrollFilter {
    #[param(example = 1)]
    pub page: Option<u32>,
    #[param(example = 10)]
    pub limit: Option<u32>,
    #[param(example = "awaiting")]
    pub status: Option<String>,
    #[param(example = 2026)]
    pub year: Option<i32>,
}

impl PayrollFilter {
    pub fn key_part(&self) -> Value {
        json!({
            "page": self.page,
            "limit": self.limit,
            "status": self.status,
            "year": self.year,
        })
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        if let Some(year) = self.year {
            pairs.push(("year".to_string(), year.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayroll {
    #[schema(example = "January 2026")]
    pub name: String,
    #[schema(example = "2026-01-01")]
    pub period_start: NaiveDate,
    #[schema(example = "2026-01-31")]
    pub period_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2026-02-01")]
    pub pay_date: Option<NaiveDate>,
}

impl Validate for CreatePayroll {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name);
        if self.period_end < self.period_start {
            errors.add("periodEnd", "must not be before the period start");
        }
        if self.pay_date.is_some_and(|d| d < self.period_start) {
            errors.add("payDate", "must not be before the period start");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayroll {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_date: Option<NaiveDate>,
}

impl Validate for UpdatePayroll {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_opt("name", self.name.as_deref());
        errors.into_result()
    }
}
