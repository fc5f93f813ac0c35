use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A money amount or rate kept exactly as it was written, whether the
/// backend sends a JSON number (`1000.5`) or a numeric string (`"1000.50"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Value);

impl Amount {
    /// Numeric value, for checks only; never written back.
    pub fn as_f64(&self) -> Option<f64> {
        match &self.0 {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok().filter(|v: &f64| v.is_finite()),
            _ => None,
        }
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(Value::from(value))
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_amounts_keep_their_text() {
        let amount: Amount = serde_json::from_value(json!("1000.50")).unwrap();

        assert_eq!(amount.as_f64(), Some(1000.5));
        assert_eq!(serde_json::to_value(&amount).unwrap(), json!("1000.50"));
    }

    #[test]
    fn non_numeric_amounts_have_no_value() {
        assert_eq!(Amount::from("n/a").as_f64(), None);
        assert_eq!(Amount::from(12.5).as_f64(), Some(12.5));
    }
}
