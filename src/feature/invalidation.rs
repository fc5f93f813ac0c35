//! Which cached reads each write makes stale.
//!
//! Every function returns key prefixes. A set must cover every read whose
//! data the write can change: a missing key shows stale data, an extra key
//! only costs a refetch.

use super::keys::{employee, payroll, team};
use crate::{cache::QueryKey, model::payslip::BonusKind};

/// A new employee may join a team on creation, which changes that team's
/// members and member count.
pub fn employee_created() -> Vec<QueryKey> {
    vec![employee::lists(), team::all()]
}

pub fn employee_updated(id: &str) -> Vec<QueryKey> {
    vec![
        employee::lists(),
        employee::detail(id),
        employee::suspended_lists(),
        team::all(),
    ]
}

pub fn employee_deleted() -> Vec<QueryKey> {
    vec![
        employee::lists(),
        employee::suspended_lists(),
        team::all(),
    ]
}

/// Entries dropped outright when an employee is deleted.
pub fn employee_removed(id: &str) -> Vec<QueryKey> {
    vec![employee::detail(id)]
}

pub fn employee_suspended(payroll_id: &str) -> Vec<QueryKey> {
    vec![
        employee::suspended_by_payroll(payroll_id),
        payroll::payslips(payroll_id),
        payroll::detail(payroll_id),
    ]
}

pub fn team_saved(id: &str) -> Vec<QueryKey> {
    vec![team::list(), team::detail(id)]
}

/// Employee records carry their `teamId`, so every employee view changes.
pub fn team_deleted(id: &str) -> Vec<QueryKey> {
    vec![
        team::list(),
        team::detail(id),
        team::roles(id),
        team::members(id),
        employee::all(),
    ]
}

pub fn role_created(team_id: &str) -> Vec<QueryKey> {
    vec![team::roles(team_id), team::detail(team_id)]
}

pub fn member_assigned(team_id: &str, employee_id: &str) -> Vec<QueryKey> {
    vec![
        team::list(),
        team::members(team_id),
        team::detail(team_id),
        employee::detail(employee_id),
        employee::lists(),
        employee::suspended_lists(),
    ]
}

pub fn payroll_created() -> Vec<QueryKey> {
    vec![payroll::lists()]
}

pub fn payroll_updated(id: &str) -> Vec<QueryKey> {
    vec![payroll::lists(), payroll::detail(id)]
}

pub fn payroll_disbursed(id: &str) -> Vec<QueryKey> {
    vec![
        payroll::lists(),
        payroll::detail(id),
        payroll::payslips(id),
        payroll::company_wallet(),
    ]
}

/// A payslip was created or deleted. Creating one takes the employee off
/// the payroll's suspended list, so that list changes too.
pub fn payslip_changed(payroll_id: &str) -> Vec<QueryKey> {
    vec![
        payroll::payslips(payroll_id),
        employee::suspended_by_payroll(payroll_id),
        payroll::detail(payroll_id),
    ]
}

pub fn bonus_deduction_changed(kind: BonusKind, payslip_id: &str, payroll_id: &str) -> Vec<QueryKey> {
    vec![
        payroll::bonus_deductions(kind, payslip_id),
        payroll::payslips(payroll_id),
        payroll::detail(payroll_id),
    ]
}

pub fn policy_updated() -> Vec<QueryKey> {
    vec![payroll::company_policy(), payroll::all()]
}
