use crate::api::cache::{RevalidateRequest, RevalidateResponse, RevalidateScope};
use crate::cache::{CacheSnapshotEntry, QueryStatus};
use crate::model::company::{CompanyPayrollPolicy, CompanyWallet, UpdatePayrollPolicy};
use crate::model::employee::{CreateEmployee, Employee, SuspendEmployee, UpdateEmployee};
use crate::model::payroll::{CreatePayroll, Payroll, UpdatePayroll};
use crate::model::payslip::{
    BonusDeduction, BonusKind, CreatePayslip, Payslip, UpsertBonusDeduction,
};
use crate::model::role::{CreateRole, Role};
use crate::model::team::{AssignMember, CreateTeam, Team, TeamMember, UpdateTeam};
use crate::model::validation::{FieldError, ValidationErrors};
use crate::store::ui_state::{
    DashboardUiState, DrawerMode, EmployeeUi, PayrollUi, Preferences, TeamUi,
};
use crate::http::PageMetadata;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Dashboard Gateway API",
        version = "1.0.0",
        description = r#"
## HR & Payroll Dashboard Gateway

JSON endpoints behind the HR/payroll administration dashboard. Every read is
served from a shared query cache and every write marks the affected reads
stale, so the next read returns what the backend now holds.

### Key Features
- **Employees**: list, create, update, delete, suspend from a payroll
- **Teams**: teams, roles and members, with a guided setup flow
- **Payroll**: payroll runs, payslips, bonuses and deductions, approval and disbursement
- **Company**: payroll policy and wallet balance
- **Cache**: inspect cached reads and trigger revalidation

### Response Format
- Entities are returned as the backend sends them (camelCase)
- Errors are `{ "message": ... }`; validation failures add `errors` with one entry per field
- Amounts pass through unchanged

---
Built with **Rust**, **Actix Web**, **Moka**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::list_suspended,
        crate::api::employee::suspend_employee,

        crate::api::team::list_teams,
        crate::api::team::create_team,
        crate::api::team::get_team,
        crate::api::team::update_team,
        crate::api::team::delete_team,
        crate::api::team::list_roles,
        crate::api::team::create_role,
        crate::api::team::list_members,
        crate::api::team::assign_member,

        crate::api::payroll::list_payrolls,
        crate::api::payroll::create_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::update_payroll,
        crate::api::payroll::approve_payroll,
        crate::api::payroll::disburse_payroll,
        crate::api::payroll::list_payslips,
        crate::api::payroll::create_payslip,
        crate::api::payroll::delete_payslip,
        crate::api::payroll::list_adjustments,
        crate::api::payroll::create_adjustment,
        crate::api::payroll::update_adjustment,
        crate::api::payroll::delete_adjustment,
        crate::api::payroll::get_policy,
        crate::api::payroll::update_policy,
        crate::api::payroll::get_wallet,

        crate::api::cache::snapshot,
        crate::api::cache::revalidate,

        crate::api::ui_state::get_ui_state,
        crate::api::ui_state::dispatch_action
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            UpdateEmployee,
            SuspendEmployee,
            Team,
            TeamMember,
            CreateTeam,
            UpdateTeam,
            AssignMember,
            Role,
            CreateRole,
            Payroll,
            CreatePayroll,
            UpdatePayroll,
            Payslip,
            CreatePayslip,
            BonusKind,
            BonusDeduction,
            UpsertBonusDeduction,
            CompanyPayrollPolicy,
            UpdatePayrollPolicy,
            CompanyWallet,
            PageMetadata,
            FieldError,
            ValidationErrors,
            QueryStatus,
            CacheSnapshotEntry,
            RevalidateScope,
            RevalidateRequest,
            RevalidateResponse,
            DashboardUiState,
            EmployeeUi,
            PayrollUi,
            TeamUi,
            Preferences,
            DrawerMode
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Team", description = "Teams, roles and members"),
        (name = "Payroll", description = "Payroll run APIs"),
        (name = "Payslip", description = "Payslips, bonuses and deductions"),
        (name = "Company", description = "Company payroll policy and wallet"),
        (name = "Cache", description = "Query cache inspection and revalidation"),
        (name = "UI state", description = "Dashboard UI state"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_family_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/v1/employees/suspended",
            "/api/v1/teams/{team_id}/members",
            "/api/v1/payslips/{payslip_id}/{kind}",
            "/api/v1/{kind}/{id}",
            "/api/v1/cache/revalidate",
            "/api/v1/ui-state/actions",
        ] {
            assert!(paths.contains_key(path), "{path} missing");
        }
    }
}
