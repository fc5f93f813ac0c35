//! Cache key builders, one module per resource family.

pub mod employee {
    use crate::{cache::QueryKey, model::employee::EmployeeFilter};

    pub fn all() -> QueryKey {
        QueryKey::new("employee")
    }

    /// Prefix of every employee list, whatever the filter.
    pub fn lists() -> QueryKey {
        all().push("list")
    }

    pub fn list(filter: &EmployeeFilter) -> QueryKey {
        lists().push_filter(filter.key_part())
    }

    pub fn detail(id: &str) -> QueryKey {
        all().push("detail").push(id)
    }

    pub fn suspended_lists() -> QueryKey {
        all().push("suspendedByPayroll")
    }

    pub fn suspended_by_payroll(payroll_id: &str) -> QueryKey {
        suspended_lists().push(payroll_id)
    }
}

pub mod team {
    use crate::cache::QueryKey;

    pub fn all() -> QueryKey {
        QueryKey::new("team")
    }

    pub fn list() -> QueryKey {
        all().push("list")
    }

    pub fn detail(id: &str) -> QueryKey {
        all().push("detail").push(id)
    }

    pub fn roles(team_id: &str) -> QueryKey {
        all().push("roles").push(team_id)
    }

    pub fn all_members() -> QueryKey {
        all().push("members")
    }

    pub fn members(team_id: &str) -> QueryKey {
        all_members().push(team_id)
    }
}

pub mod payroll {
    use crate::{
        cache::QueryKey,
        model::{payroll::PayrollFilter, payslip::BonusKind},
    };

    pub fn all() -> QueryKey {
        QueryKey::new("payrolls")
    }

    pub fn lists() -> QueryKey {
        all().push("list")
    }

    pub fn list(filter: &PayrollFilter) -> QueryKey {
        lists().push_filter(filter.key_part())
    }

    pub fn detail(id: &str) -> QueryKey {
        all().push("detail").push(id)
    }

    pub fn payslips(payroll_id: &str) -> QueryKey {
        all().push("payslips").push(payroll_id)
    }

    pub fn bonus_deductions(kind: BonusKind, payslip_id: &str) -> QueryKey {
        all().push(kind.plural()).push(payslip_id)
    }

    pub fn company_policy() -> QueryKey {
        QueryKey::new("payrollPolicy").push("company")
    }

    pub fn company_wallet() -> QueryKey {
        QueryKey::new("wallet").push("company")
    }
}
