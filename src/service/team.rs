use serde::de::IgnoredAny;

use crate::{
    http::{ApiClient, HttpError, ListPayload},
    model::{
        role::{CreateRole, Role},
        team::{AssignMember, CreateTeam, Team, TeamMember, UpdateTeam},
    },
};

pub struct TeamService {
    http: ApiClient,
}

impl TeamService {
    pub fn new(http: ApiClient) -> Self {
        Self { http }
    }

    pub async fn list_teams(&self) -> Result<Option<Vec<Team>>, HttpError> {
        let res = self.http.get::<ListPayload<Team>>("/teams", Vec::new()).await?;
        Ok(res.expect(&[200])?.map(|list| list.normalize().items))
    }

    pub async fn get_team(&self, id: &str) -> Result<Option<Team>, HttpError> {
        let res = self.http.get::<Team>(&format!("/teams/{id}"), Vec::new()).await?;
        res.expect(&[200])
    }

    pub async fn create_team(&self, payload: &CreateTeam) -> Result<Option<Team>, HttpError> {
        let res = self.http.post::<_, Team>("/teams", payload).await?;
        res.expect(&[201])
    }

    pub async fn update_team(
        &self,
        id: &str,
        payload: &UpdateTeam,
    ) -> Result<Option<Team>, HttpError> {
        let res = self
            .http
            .patch::<_, Team>(&format!("/teams/{id}"), payload)
            .await?;
        res.expect(&[200])
    }

    pub async fn delete_team(&self, id: &str) -> Result<Option<()>, HttpError> {
        let res = self.http.delete::<IgnoredAny>(&format!("/teams/{id}")).await?;
        Ok(res.expect(&[200, 204])?.map(|_| ()))
    }

    pub async fn list_roles(&self, team_id: &str) -> Result<Option<Vec<Role>>, HttpError> {
        let res = self
            .http
            .get::<ListPayload<Role>>(&format!("/teams/{team_id}/roles"), Vec::new())
            .await?;
        Ok(res.expect(&[200])?.map(|list| list.normalize().items))
    }

    pub async fn create_role(
        &self,
        team_id: &str,
        payload: &CreateRole,
    ) -> Result<Option<Role>, HttpError> {
        let res = self
            .http
            .post::<_, Role>(&format!("/teams/{team_id}/roles"), payload)
            .await?;
        res.expect(&[201])
    }

    pub async fn list_members(&self, team_id: &str) -> Result<Option<Vec<TeamMember>>, HttpError> {
        let res = self
            .http
            .get::<ListPayload<TeamMember>>(&format!("/teams/{team_id}/members"), Vec::new())
            .await?;
        Ok(res.expect(&[200])?.map(|list| list.normalize().items))
    }

    pub async fn assign_member(
        &self,
        team_id: &str,
        payload: &AssignMember,
    ) -> Result<Option<TeamMember>, HttpError> {
        let res = self
            .http
            .post::<_, TeamMember>(&format!("/teams/{team_id}/members"), payload)
            .await?;
        res.expect(&[200, 201])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, fake::FakeTransport};
    use serde_json::json;

    #[tokio::test]
    async fn roles_are_listed_per_team() {
        let transport = FakeTransport::new();
        transport.respond_data(
            Method::Get,
            "/teams/T1/roles",
            200,
            json!({ "items": [{ "id": "R1", "name": "Lead", "permissions": ["payroll:read"] }] }),
        );
        let service = TeamService::new(transport.client());

        let roles = service.list_roles("T1").await.unwrap().unwrap();
        assert_eq!(roles[0].name, "Lead");
        assert_eq!(roles[0].permissions, Some(vec!["payroll:read".to_string()]));
    }

    #[tokio::test]
    async fn assign_member_posts_to_team() {
        let transport = FakeTransport::new();
        transport.respond_data(
            Method::Post,
            "/teams/T1/members",
            201,
            json!({ "employeeId": "E1", "roleId": "R1" }),
        );
        let service = TeamService::new(transport.client());

        let member = service
            .assign_member(
                "T1",
                &AssignMember {
                    employee_id: "E1".into(),
                    role_id: "R1".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(member.role_id.as_deref(), Some("R1"));
        assert_eq!(transport.calls_to(Method::Post, "/teams/T1/members"), 1);
    }
}
