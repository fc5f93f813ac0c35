use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::{
    amount::Amount,
    validation::{Validate, ValidationErrors},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayrollPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "monthly")]
    pub pay_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 28)]
    pub pay_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "USD")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub tax_rate: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub pension_rate: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub overtime_multiplier: Option<Amount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayrollPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub tax_rate: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub pension_rate: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub overtime_multiplier: Option<Amount>,
}

impl Validate for UpdatePayrollPolicy {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_opt("payFrequency", self.pay_frequency.as_deref());
        errors.require_opt("currency", self.currency.as_deref());
        if self.pay_day.is_some_and(|d| !(1..=31).contains(&d)) {
            errors.add("payDay", "must be between 1 and 31");
        }
        if let Some(rate) = &self.tax_rate {
            errors.rate("taxRate", rate);
        }
        if let Some(rate) = &self.pension_rate {
            errors.rate("pensionRate", rate);
        }
        if let Some(multiplier) = &self.overtime_multiplier {
            errors.amount("overtimeMultiplier", multiplier);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyWallet {
    #[schema(example = "wal_01")]
    pub id: String,
    #[schema(value_type = f64, example = 250000.0)]
    pub balance: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "USD")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_funded_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_update_checks_ranges() {
        let update = UpdatePayrollPolicy {
            pay_day: Some(0),
            tax_rate: Some(Amount::from(140.0)),
            pension_rate: Some(Amount::from("5")),
            ..Default::default()
        };

        let errors = update.validate().unwrap_err();
        assert!(errors.has("payDay"));
        assert!(errors.has("taxRate"));
        assert!(!errors.has("pensionRate"));
    }

    #[test]
    fn wallet_balance_keeps_its_text() {
        let raw = serde_json::json!({
            "id": "wal_01",
            "balance": "1000.50",
            "currency": "USD",
            "bank": { "iban": "DE00" }
        });

        let wallet: CompanyWallet = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(wallet.balance.as_f64(), Some(1000.5));
        assert_eq!(serde_json::to_value(&wallet).unwrap(), raw);
    }
}
