use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

/// Payroll run status as reported by the backend. Display only; nothing in
/// this service transitions it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum PayrollStatus {
    Idle,
    Awaiting,
    Disbursed,
    Completed,
    /// Any value outside the known set, kept verbatim.
    #[strum(default)]
    Unknown(String),
}

impl PayrollStatus {
    /// Maps a raw backend value onto the known set.
    ///
    /// Exact names match case-insensitively. Legacy `awaiting_*` spellings
    /// such as `awaiting_approval` map to `Awaiting`; anything else is kept as
    /// `Unknown` with the original text.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        match PayrollStatus::from_str(trimmed) {
            Ok(PayrollStatus::Unknown(_)) | Err(_) => {
                if trimmed.to_ascii_lowercase().starts_with("await") {
                    PayrollStatus::Awaiting
                } else {
                    PayrollStatus::Unknown(raw.to_string())
                }
            }
            Ok(status) => status,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PayrollStatus::Idle => "idle",
            PayrollStatus::Awaiting => "awaiting",
            PayrollStatus::Disbursed => "disbursed",
            PayrollStatus::Completed => "completed",
            PayrollStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PayrollStatus::Unknown(_))
    }
}

impl Default for PayrollStatus {
    fn default() -> Self {
        PayrollStatus::Idle
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PayrollStatus {
    fn from(raw: String) -> Self {
        PayrollStatus::normalize(&raw)
    }
}

impl From<PayrollStatus> for String {
    fn from(status: PayrollStatus) -> Self {
        status.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn known_statuses_match_case_insensitively() {
        assert_eq!(PayrollStatus::normalize("Disbursed"), PayrollStatus::Disbursed);
        assert_eq!(PayrollStatus::normalize(" completed "), PayrollStatus::Completed);
        assert_eq!(PayrollStatus::normalize("IDLE"), PayrollStatus::Idle);
    }

    #[test]
    fn legacy_awaiting_spellings_map_to_awaiting() {
        assert_eq!(PayrollStatus::normalize("awaiting_approval"), PayrollStatus::Awaiting);
        assert_eq!(PayrollStatus::normalize("Awaiting-Funds"), PayrollStatus::Awaiting);
    }

    #[test]
    fn unknown_values_are_kept_verbatim() {
        let status = PayrollStatus::normalize("on_hold");
        assert_eq!(status, PayrollStatus::Unknown("on_hold".into()));
        assert!(!status.is_known());
        assert_eq!(serde_json::to_value(&status).unwrap(), serde_json::json!("on_hold"));
    }

    #[test]
    fn serde_round_trips_known_names() {
        for status in PayrollStatus::iter().filter(PayrollStatus::is_known) {
            let json = serde_json::to_value(&status).unwrap();
            let back: PayrollStatus = serde_json::from_value(json).unwrap();
            assert_eq!(back, status);
        }
    }
}
