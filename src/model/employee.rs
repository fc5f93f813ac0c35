use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use utoipa::{IntoParams, ToSchema};

use super::{
    amount::Amount,
    validation::{Validate, ValidationErrors},
};

/// Employee record as the backend returns it. Fields not listed here are
/// kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "emp_01",
        "employeeCode": "EMP-001",
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@company.com",
        "phone": "+8801712345678",
        "teamId": "team_01",
        "roleId": "role_03",
        "hireDate": "2024-01-01",
        "status": "active",
        "salary": 52000.0
    })
)]
pub struct Employee {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub salary: Option<Amount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    #[param(example = 1)]
    pub page: Option<u32>,
    #[param(example = 10)]
    pub limit: Option<u32>,
    /// Search by name or email
    pub search: Option<String>,
    pub team_id: Option<String>,
    #[param(example = "active")]
    pub status: Option<String>,
}

impl EmployeeFilter {
    /// Trimmed search text, `None` when blank. Keys and requests both use it,
    /// so filters that send the same request share one cache entry.
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn key_part(&self) -> Value {
        json!({
            "page": self.page,
            "limit": self.limit,
            "search": self.search_term(),
            "teamId": self.team_id,
            "status": self.status,
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
        if let Some(search) = self.search_term() {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(team_id) = &self.team_id {
            pairs.push(("teamId".to_string(), team_id.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status".to_string(), status.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john@email.com", format = "email")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2026-01-01")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>, example = 50000.0)]
    pub salary: Option<Amount>,
}

impl Validate for CreateEmployee {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("firstName", &self.first_name);
        errors.require("lastName", &self.last_name);
        errors.email("email", &self.email);
        if let Some(salary) = &self.salary {
            errors.amount("salary", salary);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub salary: Option<Amount>,
}

impl Validate for UpdateEmployee {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_opt("firstName", self.first_name.as_deref());
        errors.require_opt("lastName", self.last_name.as_deref());
        if let Some(email) = &self.email {
            errors.email("email", email);
        }
        if let Some(salary) = &self.salary {
            errors.amount("salary", salary);
        }
        errors.into_result()
    }
}

/// Excludes an employee from a payroll run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuspendEmployee {
    #[schema(example = "pay_2026_01")]
    pub payroll_id: String,
    #[schema(example = "emp_01")]
    pub employee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validate for SuspendEmployee {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("payrollId", &self.payroll_id);
        errors.require("employeeId", &self.employee_id);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_tolerates_missing_optional_fields() {
        let employee: Employee = serde_json::from_value(json!({
            "id": "emp_01",
            "firstName": "Ann",
            "email": "ann@acme.io",
            "legacyField": true
        }))
        .unwrap();

        assert!(employee.last_name.is_none());
        assert!(employee.team_id.is_none());
        assert_eq!(employee.extra["legacyField"], json!(true));
    }

    #[test]
    fn employee_round_trips_unknown_fields_and_amount_text() {
        let raw = json!({
            "id": "emp_01",
            "firstName": "Ann",
            "email": "ann@acme.io",
            "hireDate": "2024-01-01T00:00:00.000Z",
            "salary": "52000.00",
            "department": { "id": "dep_1", "name": "R&D" },
            "avatarUrl": "https://cdn.acme.io/ann.png"
        });

        let employee: Employee = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(serde_json::to_value(&employee).unwrap(), raw);
    }

    #[test]
    fn blank_and_padded_searches_share_a_key() {
        let unset = EmployeeFilter::default();
        let blank = EmployeeFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        let padded = EmployeeFilter {
            search: Some(" ann ".into()),
            ..Default::default()
        };
        let plain = EmployeeFilter {
            search: Some("ann".into()),
            ..Default::default()
        };

        assert_eq!(unset.key_part(), blank.key_part());
        assert_eq!(padded.key_part(), plain.key_part());
        assert_eq!(padded.query_pairs(), plain.query_pairs());
    }

    #[test]
    fn filter_query_skips_unset_and_blank_fields() {
        let filter = EmployeeFilter {
            page: Some(2),
            search: Some("  ".into()),
            team_id: Some("team_01".into()),
            ..Default::default()
        };

        assert_eq!(
            filter.query_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("teamId".to_string(), "team_01".to_string())
            ]
        );
    }

    #[test]
    fn create_employee_requires_names_and_valid_email() {
        let payload = CreateEmployee {
            first_name: "".into(),
            last_name: "Doe".into(),
            email: "not-an-email".into(),
            phone: None,
            team_id: None,
            role_id: None,
            hire_date: None,
            salary: Some(Amount::from(-5.0)),
        };

        let errors = payload.validate().unwrap_err();
        assert!(errors.has("firstName"));
        assert!(errors.has("email"));
        assert!(errors.has("salary"));
        assert!(!errors.has("lastName"));
    }

    #[test]
    fn update_employee_only_checks_present_fields() {
        assert!(UpdateEmployee::default().validate().is_ok());

        let update = UpdateEmployee {
            email: Some("bad".into()),
            ..Default::default()
        };
        assert!(update.validate().unwrap_err().has("email"));
    }
}
