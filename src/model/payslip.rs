use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{
    amount::Amount,
    validation::{Validate, ValidationErrors},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payslip {
    #[schema(example = "slip_01")]
    pub id: String,
    #[schema(example = "pay_2026_01")]
    pub payroll_id: String,
    #[schema(example = "emp_01")]
    pub employee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub gross_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub net_amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayslip {
    #[schema(example = "pay_2026_01")]
    pub payroll_id: String,
    #[schema(example = "emp_01")]
    pub employee_id: String,
    #[schema(value_type = f64, example = 4200.0)]
    pub gross_amount: Amount,
}

impl Validate for CreatePayslip {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("payrollId", &self.payroll_id);
        errors.require("employeeId", &self.employee_id);
        errors.amount("grossAmount", &self.gross_amount);
        errors.into_result()
    }
}

/// Bonuses and deductions share one shape; the kind picks the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    #[display(fmt = "bonus")]
    Bonus,
    #[display(fmt = "deduction")]
    Deduction,
}

impl BonusKind {
    /// Backend collection path.
    pub fn path(self) -> &'static str {
        match self {
            BonusKind::Bonus => "/bonuses",
            BonusKind::Deduction => "/deductions",
        }
    }

    /// Plural name used in cache keys and gateway routes.
    pub fn plural(self) -> &'static str {
        match self {
            BonusKind::Bonus => "bonuses",
            BonusKind::Deduction => "deductions",
        }
    }

    pub fn from_plural(s: &str) -> Option<Self> {
        match s {
            "bonuses" => Some(BonusKind::Bonus),
            "deductions" => Some(BonusKind::Deduction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BonusDeduction {
    #[schema(example = "bon_01")]
    pub id: String,
    #[schema(example = "slip_01")]
    pub payslip_id: String,
    #[schema(example = "Performance bonus")]
    pub label: String,
    #[schema(value_type = f64, example = 250.0)]
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create or update payload for a bonus or deduction.
///
/// `payroll_id` is never sent upstream; it identifies the payroll whose
/// cached views change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBonusDeduction {
    /// Filled from the route when creating under a payslip.
    #[serde(default)]
    #[schema(example = "slip_01")]
    pub payslip_id: String,
    #[serde(skip_serializing)]
    #[schema(example = "pay_2026_01")]
    pub payroll_id: String,
    #[schema(example = "Performance bonus")]
    pub label: String,
    #[schema(value_type = f64, example = 250.0)]
    pub amount: Amount,
    #[serde(default)]
    pub recurring: bool,
}

impl Validate for UpsertBonusDeduction {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("payslipId", &self.payslip_id);
        errors.require("payrollId", &self.payroll_id);
        errors.require("label", &self.label);
        errors.amount("amount", &self.amount);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payroll_id_is_not_sent_upstream() {
        let payload = UpsertBonusDeduction {
            payslip_id: "slip_01".into(),
            payroll_id: "pay_01".into(),
            label: "Bonus".into(),
            amount: Amount::from("10.00"),
            recurring: false,
        };

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            body,
            json!({ "payslipId": "slip_01", "label": "Bonus", "amount": "10.00", "recurring": false })
        );
    }

    #[test]
    fn kind_maps_to_paths_and_plurals() {
        assert_eq!(BonusKind::Bonus.path(), "/bonuses");
        assert_eq!(BonusKind::Deduction.to_string(), "deduction");
        assert_eq!(BonusKind::from_plural("deductions"), Some(BonusKind::Deduction));
        assert_eq!(BonusKind::from_plural("fines"), None);
    }
}
