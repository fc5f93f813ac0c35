use serde::{Deserialize, Serialize};

/// Guided setup after a team is created: add a role, then assign a first
/// employee to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum SetupFlow {
    #[serde(rename_all = "camelCase")]
    TeamCreated { team_id: String },
    #[serde(rename_all = "camelCase")]
    AwaitingRole { team_id: String },
    #[serde(rename_all = "camelCase")]
    AwaitingEmployee { team_id: String, role_id: String },
    #[serde(rename_all = "camelCase")]
    Done { team_id: String },
}

/// Completion callbacks that move the flow forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SetupEvent {
    /// The user acknowledged the "team created" prompt.
    Continue,
    #[serde(rename_all = "camelCase")]
    RoleCreated { team_id: String, role_id: String },
    #[serde(rename_all = "camelCase")]
    MemberAssigned { team_id: String, employee_id: String },
}

impl SetupFlow {
    pub fn start(team_id: impl Into<String>) -> Self {
        SetupFlow::TeamCreated {
            team_id: team_id.into(),
        }
    }

    pub fn team_id(&self) -> &str {
        match self {
            SetupFlow::TeamCreated { team_id }
            | SetupFlow::AwaitingRole { team_id }
            | SetupFlow::AwaitingEmployee { team_id, .. }
            | SetupFlow::Done { team_id } => team_id,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, SetupFlow::Done { .. })
    }

    /// Next step for `event`, or `None` when the event does not apply to the
    /// current step or belongs to another team.
    pub fn advance(&self, event: &SetupEvent) -> Option<SetupFlow> {
        match (self, event) {
            (SetupFlow::TeamCreated { team_id }, SetupEvent::Continue) => {
                Some(SetupFlow::AwaitingRole {
                    team_id: team_id.clone(),
                })
            }
            (
                SetupFlow::TeamCreated { team_id } | SetupFlow::AwaitingRole { team_id },
                SetupEvent::RoleCreated {
                    team_id: event_team,
                    role_id,
                },
            ) if team_id == event_team => Some(SetupFlow::AwaitingEmployee {
                team_id: team_id.clone(),
                role_id: role_id.clone(),
            }),
            (
                SetupFlow::AwaitingEmployee { team_id, .. },
                SetupEvent::MemberAssigned {
                    team_id: event_team,
                    ..
                },
            ) if team_id == event_team => Some(SetupFlow::Done {
                team_id: team_id.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_every_step_in_order() {
        let flow = SetupFlow::start("T1");
        let flow = flow.advance(&SetupEvent::Continue).unwrap();
        assert_eq!(
            flow,
            SetupFlow::AwaitingRole {
                team_id: "T1".into()
            }
        );

        let flow = flow
            .advance(&SetupEvent::RoleCreated {
                team_id: "T1".into(),
                role_id: "R1".into(),
            })
            .unwrap();
        let flow = flow
            .advance(&SetupEvent::MemberAssigned {
                team_id: "T1".into(),
                employee_id: "E1".into(),
            })
            .unwrap();

        assert!(flow.is_done());
        assert_eq!(flow.team_id(), "T1");
    }

    #[test]
    fn events_for_other_teams_are_ignored() {
        let flow = SetupFlow::AwaitingRole {
            team_id: "T1".into(),
        };
        assert!(flow
            .advance(&SetupEvent::RoleCreated {
                team_id: "T2".into(),
                role_id: "R1".into(),
            })
            .is_none());
    }

    #[test]
    fn cannot_skip_the_role_step() {
        let flow = SetupFlow::start("T1");
        assert!(flow
            .advance(&SetupEvent::MemberAssigned {
                team_id: "T1".into(),
                employee_id: "E1".into(),
            })
            .is_none());
    }

    #[test]
    fn serializes_with_step_tag() {
        let value = serde_json::to_value(SetupFlow::AwaitingEmployee {
            team_id: "T1".into(),
            role_id: "R1".into(),
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "step": "awaitingEmployee", "teamId": "T1", "roleId": "R1" })
        );
    }
}
