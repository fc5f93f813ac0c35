//! Per-feature dashboard UI state.
//!
//! Each struct is plain data with pure setters. [`apply`] is the only way the
//! aggregated [`DashboardUiState`] changes.

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::setup_flow::{SetupEvent, SetupFlow};
use crate::model::payslip::BonusKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DrawerMode {
    #[default]
    Closed,
    Create,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUi {
    pub drawer: DrawerMode,
    pub selected_employee_id: Option<String>,
    pub suspend_modal_open: bool,
    pub search: Option<String>,
    pub page: u32,
}

impl EmployeeUi {
    pub fn open_drawer(self, mode: DrawerMode, employee_id: Option<String>) -> Self {
        Self {
            drawer: mode,
            selected_employee_id: employee_id.or(self.selected_employee_id),
            ..self
        }
    }

    pub fn close_drawer(self) -> Self {
        Self {
            drawer: DrawerMode::Closed,
            ..self
        }
    }

    pub fn select(self, employee_id: Option<String>) -> Self {
        Self {
            selected_employee_id: employee_id,
            ..self
        }
    }

    pub fn set_suspend_modal(self, open: bool) -> Self {
        Self {
            suspend_modal_open: open,
            ..self
        }
    }

    /// A new search starts from the first page.
    pub fn set_search(self, search: Option<String>) -> Self {
        Self {
            search: search.filter(|s| !s.trim().is_empty()),
            page: 1,
            ..self
        }
    }

    pub fn set_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollUi {
    pub selected_payroll_id: Option<String>,
    pub selected_payslip_id: Option<String>,
    pub create_drawer_open: bool,
    /// Which bonus/deduction drawer is open, if any.
    pub adjustment_drawer: Option<BonusKind>,
    pub approve_modal_open: bool,
    pub disburse_modal_open: bool,
}

impl PayrollUi {
    /// Switching payroll clears the payslip selection.
    pub fn select_payroll(self, payroll_id: Option<String>) -> Self {
        let payslip = if payroll_id == self.selected_payroll_id {
            self.selected_payslip_id.clone()
        } else {
            None
        };
        Self {
            selected_payroll_id: payroll_id,
            selected_payslip_id: payslip,
            ..self
        }
    }

    pub fn select_payslip(self, payslip_id: Option<String>) -> Self {
        Self {
            selected_payslip_id: payslip_id,
            ..self
        }
    }

    pub fn set_create_drawer(self, open: bool) -> Self {
        Self {
            create_drawer_open: open,
            ..self
        }
    }

    pub fn set_adjustment_drawer(self, kind: Option<BonusKind>) -> Self {
        Self {
            adjustment_drawer: kind,
            ..self
        }
    }

    pub fn set_approve_modal(self, open: bool) -> Self {
        Self {
            approve_modal_open: open,
            ..self
        }
    }

    pub fn set_disburse_modal(self, open: bool) -> Self {
        Self {
            disburse_modal_open: open,
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamUi {
    pub selected_team_id: Option<String>,
    pub drawer: DrawerMode,
    #[schema(value_type = Option<Object>)]
    pub setup: Option<SetupFlow>,
}

impl TeamUi {
    pub fn select(self, team_id: Option<String>) -> Self {
        Self {
            selected_team_id: team_id,
            ..self
        }
    }

    pub fn set_drawer(self, mode: DrawerMode) -> Self {
        Self {
            drawer: mode,
            ..self
        }
    }

    pub fn start_setup(self, team_id: String) -> Self {
        Self {
            selected_team_id: Some(team_id.clone()),
            setup: Some(SetupFlow::start(team_id)),
            ..self
        }
    }

    /// Events that do not fit the current step leave the flow unchanged.
    pub fn advance_setup(self, event: &SetupEvent) -> Self {
        let next = match &self.setup {
            Some(flow) => match flow.advance(event) {
                Some(next) => Some(next),
                None => {
                    debug!(?flow, ?event, "Ignoring setup event");
                    Some(flow.clone())
                }
            },
            None => None,
        };
        Self { setup: next, ..self }
    }

    pub fn dismiss_setup(self) -> Self {
        Self { setup: None, ..self }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub setup_modal_seen: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUiState {
    pub employee: EmployeeUi,
    pub payroll: PayrollUi,
    pub team: TeamUi,
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiAction {
    #[serde(rename_all = "camelCase")]
    OpenEmployeeDrawer {
        mode: DrawerMode,
        employee_id: Option<String>,
    },
    CloseEmployeeDrawer,
    #[serde(rename_all = "camelCase")]
    SelectEmployee { employee_id: Option<String> },
    SetSuspendModal { open: bool },
    SetEmployeeSearch { search: Option<String> },
    SetEmployeePage { page: u32 },

    #[serde(rename_all = "camelCase")]
    SelectPayroll { payroll_id: Option<String> },
    #[serde(rename_all = "camelCase")]
    SelectPayslip { payslip_id: Option<String> },
    SetPayrollDrawer { open: bool },
    SetAdjustmentDrawer { kind: Option<BonusKind> },
    SetApproveModal { open: bool },
    SetDisburseModal { open: bool },

    #[serde(rename_all = "camelCase")]
    SelectTeam { team_id: Option<String> },
    SetTeamDrawer { mode: DrawerMode },
    #[serde(rename_all = "camelCase")]
    StartTeamSetup { team_id: String },
    AdvanceTeamSetup { event: SetupEvent },
    DismissTeamSetup,

    MarkSetupModalSeen,
    Reset,
}

/// Returns the state after `action`. Preferences survive a reset.
pub fn apply(state: DashboardUiState, action: UiAction) -> DashboardUiState {
    let DashboardUiState {
        employee,
        payroll,
        team,
        preferences,
    } = state;

    match action {
        UiAction::OpenEmployeeDrawer { mode, employee_id } => DashboardUiState {
            employee: employee.open_drawer(mode, employee_id),
            payroll,
            team,
            preferences,
        },
        UiAction::CloseEmployeeDrawer => DashboardUiState {
            employee: employee.close_drawer(),
            payroll,
            team,
            preferences,
        },
        UiAction::SelectEmployee { employee_id } => DashboardUiState {
            employee: employee.select(employee_id),
            payroll,
            team,
            preferences,
        },
        UiAction::SetSuspendModal { open } => DashboardUiState {
            employee: employee.set_suspend_modal(open),
            payroll,
            team,
            preferences,
        },
        UiAction::SetEmployeeSearch { search } => DashboardUiState {
            employee: employee.set_search(search),
            payroll,
            team,
            preferences,
        },
        UiAction::SetEmployeePage { page } => DashboardUiState {
            employee: employee.set_page(page),
            payroll,
            team,
            preferences,
        },
        UiAction::SelectPayroll { payroll_id } => DashboardUiState {
            payroll: payroll.select_payroll(payroll_id),
            employee,
            team,
            preferences,
        },
        UiAction::SelectPayslip { payslip_id } => DashboardUiState {
            payroll: payroll.select_payslip(payslip_id),
            employee,
            team,
            preferences,
        },
        UiAction::SetPayrollDrawer { open } => DashboardUiState {
            payroll: payroll.set_create_drawer(open),
            employee,
            team,
            preferences,
        },
        UiAction::SetAdjustmentDrawer { kind } => DashboardUiState {
            payroll: payroll.set_adjustment_drawer(kind),
            employee,
            team,
            preferences,
        },
        UiAction::SetApproveModal { open } => DashboardUiState {
            payroll: payroll.set_approve_modal(open),
            employee,
            team,
            preferences,
        },
        UiAction::SetDisburseModal { open } => DashboardUiState {
            payroll: payroll.set_disburse_modal(open),
            employee,
            team,
            preferences,
        },
        UiAction::SelectTeam { team_id } => DashboardUiState {
            team: team.select(team_id),
            employee,
            payroll,
            preferences,
        },
        UiAction::SetTeamDrawer { mode } => DashboardUiState {
            team: team.set_drawer(mode),
            employee,
            payroll,
            preferences,
        },
        UiAction::StartTeamSetup { team_id } => {
            // Offered once; later teams skip the guided flow.
            let team = if preferences.setup_modal_seen {
                team.select(Some(team_id))
            } else {
                team.start_setup(team_id)
            };
            DashboardUiState {
                team,
                employee,
                payroll,
                preferences,
            }
        }
        UiAction::AdvanceTeamSetup { event } => DashboardUiState {
            team: team.advance_setup(&event),
            employee,
            payroll,
            preferences,
        },
        UiAction::DismissTeamSetup => DashboardUiState {
            team: team.dismiss_setup(),
            employee,
            payroll,
            preferences: Preferences {
                setup_modal_seen: true,
            },
        },
        UiAction::MarkSetupModalSeen => DashboardUiState {
            employee,
            payroll,
            team,
            preferences: Preferences {
                setup_modal_seen: true,
            },
        },
        UiAction::Reset => DashboardUiState {
            preferences,
            ..DashboardUiState::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(actions: Vec<UiAction>) -> DashboardUiState {
        actions
            .into_iter()
            .fold(DashboardUiState::default(), apply)
    }

    #[test]
    fn search_resets_page() {
        let state = run(vec![
            UiAction::SetEmployeePage { page: 4 },
            UiAction::SetEmployeeSearch {
                search: Some("ann".into()),
            },
        ]);
        assert_eq!(state.employee.page, 1);
        assert_eq!(state.employee.search.as_deref(), Some("ann"));
    }

    #[test]
    fn switching_payroll_clears_payslip() {
        let state = run(vec![
            UiAction::SelectPayroll {
                payroll_id: Some("P1".into()),
            },
            UiAction::SelectPayslip {
                payslip_id: Some("S1".into()),
            },
            UiAction::SelectPayroll {
                payroll_id: Some("P2".into()),
            },
        ]);
        assert_eq!(state.payroll.selected_payroll_id.as_deref(), Some("P2"));
        assert!(state.payroll.selected_payslip_id.is_none());
    }

    #[test]
    fn setup_flow_runs_to_completion() {
        let state = run(vec![
            UiAction::StartTeamSetup {
                team_id: "T1".into(),
            },
            UiAction::AdvanceTeamSetup {
                event: SetupEvent::Continue,
            },
            UiAction::AdvanceTeamSetup {
                event: SetupEvent::RoleCreated {
                    team_id: "T1".into(),
                    role_id: "R1".into(),
                },
            },
            UiAction::AdvanceTeamSetup {
                event: SetupEvent::MemberAssigned {
                    team_id: "T1".into(),
                    employee_id: "E1".into(),
                },
            },
        ]);
        assert!(state.team.setup.as_ref().is_some_and(SetupFlow::is_done));
        assert_eq!(state.team.selected_team_id.as_deref(), Some("T1"));
    }

    #[test]
    fn dismissed_setup_is_not_offered_again() {
        let state = run(vec![
            UiAction::StartTeamSetup {
                team_id: "T1".into(),
            },
            UiAction::DismissTeamSetup,
            UiAction::StartTeamSetup {
                team_id: "T2".into(),
            },
        ]);
        assert!(state.team.setup.is_none());
        assert!(state.preferences.setup_modal_seen);
        assert_eq!(state.team.selected_team_id.as_deref(), Some("T2"));
    }

    #[test]
    fn reset_keeps_preferences() {
        let state = run(vec![
            UiAction::MarkSetupModalSeen,
            UiAction::SetDisburseModal { open: true },
            UiAction::Reset,
        ]);
        assert!(!state.payroll.disburse_modal_open);
        assert!(state.preferences.setup_modal_seen);
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: UiAction = serde_json::from_value(serde_json::json!({
            "type": "setAdjustmentDrawer",
            "kind": "deduction"
        }))
        .unwrap();
        assert_eq!(
            action,
            UiAction::SetAdjustmentDrawer {
                kind: Some(BonusKind::Deduction)
            }
        );
    }
}
