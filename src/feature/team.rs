use std::sync::Arc;

use super::{invalidation, keys};
use crate::{
    cache::{MutationOptions, QueryClient, QueryError, QueryOptions, QueryState},
    model::{
        role::{CreateRole, Role},
        team::{AssignMember, CreateTeam, Team, TeamMember, UpdateTeam},
        validation::Validate,
    },
    service::TeamService,
};

#[derive(Clone)]
pub struct TeamQueries {
    client: QueryClient,
    service: Arc<TeamService>,
    options: QueryOptions,
}

impl TeamQueries {
    pub fn new(client: QueryClient, service: Arc<TeamService>) -> Self {
        let options = client.default_options();
        Self {
            client,
            service,
            options,
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn list(&self) -> QueryState<Vec<Team>> {
        let service = Arc::clone(&self.service);
        self.client
            .query(keys::team::list(), &self.options, move || {
                let service = Arc::clone(&service);
                async move { service.list_teams().await.map_err(QueryError::from) }
            })
            .await
    }

    pub async fn detail(&self, id: &str) -> QueryState<Team> {
        let service = Arc::clone(&self.service);
        let owned = id.to_string();
        self.client
            .query(keys::team::detail(id), &self.options, move || {
                let service = Arc::clone(&service);
                let id = owned.clone();
                async move { service.get_team(&id).await.map_err(QueryError::from) }
            })
            .await
    }

    pub async fn roles(&self, team_id: &str) -> QueryState<Vec<Role>> {
        let service = Arc::clone(&self.service);
        let owned = team_id.to_string();
        self.client
            .query(keys::team::roles(team_id), &self.options, move || {
                let service = Arc::clone(&service);
                let team_id = owned.clone();
                async move { service.list_roles(&team_id).await.map_err(QueryError::from) }
            })
            .await
    }

    pub async fn members(&self, team_id: &str) -> QueryState<Vec<TeamMember>> {
        let service = Arc::clone(&self.service);
        let owned = team_id.to_string();
        self.client
            .query(keys::team::members(team_id), &self.options, move || {
                let service = Arc::clone(&service);
                let team_id = owned.clone();
                async move { service.list_members(&team_id).await.map_err(QueryError::from) }
            })
            .await
    }

    pub async fn create(&self, payload: CreateTeam) -> Result<Team, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                payload,
                MutationOptions::invalidating("team.create", |team: &Team, _| {
                    invalidation::team_saved(&team.id)
                }),
                |payload| async move {
                    self.service
                        .create_team(&payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn update(&self, id: &str, payload: UpdateTeam) -> Result<Team, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                (id.to_string(), payload),
                MutationOptions::invalidating("team.update", |_, (id, _): &(String, UpdateTeam)| {
                    invalidation::team_saved(id)
                }),
                |(id, payload)| async move {
                    self.service
                        .update_team(&id, &payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), QueryError> {
        self.client
            .mutate(
                id.to_string(),
                MutationOptions::invalidating("team.delete", |_, id: &String| {
                    invalidation::team_deleted(id)
                }),
                |id| async move {
                    self.service
                        .delete_team(&id)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn create_role(&self, team_id: &str, payload: CreateRole) -> Result<Role, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                (team_id.to_string(), payload),
                MutationOptions::invalidating("team.role.create", |_, (team_id, _): &(String, CreateRole)| {
                    invalidation::role_created(team_id)
                }),
                |(team_id, payload)| async move {
                    self.service
                        .create_role(&team_id, &payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }

    pub async fn assign_member(
        &self,
        team_id: &str,
        payload: AssignMember,
    ) -> Result<TeamMember, QueryError> {
        payload.validate().map_err(QueryError::Validation)?;
        self.client
            .mutate(
                (team_id.to_string(), payload),
                MutationOptions::invalidating(
                    "team.member.assign",
                    |_, (team_id, payload): &(String, AssignMember)| {
                        invalidation::member_assigned(team_id, &payload.employee_id)
                    },
                ),
                |(team_id, payload)| async move {
                    self.service
                        .assign_member(&team_id, &payload)
                        .await
                        .map_err(QueryError::from)
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{CacheConfig, QueryStatus},
        feature::keys,
        http::{Method, fake::FakeTransport},
        model::employee::EmployeeFilter,
    };
    use serde_json::json;
    use std::time::Duration;

    fn setup(transport: &Arc<FakeTransport>) -> (QueryClient, TeamQueries) {
        let client = QueryClient::new(CacheConfig {
            defaults: QueryOptions::default().stale_time(Duration::from_secs(60)),
            ..CacheConfig::default()
        });
        let service = Arc::new(TeamService::new(transport.client()));
        let queries = TeamQueries::new(client.clone(), service);
        (client, queries)
    }

    #[tokio::test]
    async fn created_role_shows_up_on_next_read() {
        let transport = FakeTransport::new();
        transport.respond_data(Method::Get, "/teams/T1/roles", 200, json!([]));
        transport.respond_data(
            Method::Get,
            "/teams/T1/roles",
            200,
            json!([{ "id": "R1", "name": "Lead" }]),
        );
        transport.respond_data(
            Method::Post,
            "/teams/T1/roles",
            201,
            json!({ "id": "R1", "name": "Lead" }),
        );
        let (_, queries) = setup(&transport);

        assert_eq!(queries.roles("T1").await.data().unwrap().len(), 0);

        queries
            .create_role(
                "T1",
                CreateRole {
                    name: "Lead".into(),
                    permissions: Vec::new(),
                },
            )
            .await
            .unwrap();

        let roles = queries.roles("T1").await;
        assert_eq!(roles.data().unwrap()[0].id, "R1");
        assert_eq!(transport.calls_to(Method::Get, "/teams/T1/roles"), 2);
    }

    #[tokio::test]
    async fn assigning_member_marks_employee_views_stale() {
        let transport = FakeTransport::new();
        transport.respond_data(
            Method::Post,
            "/teams/T1/members",
            201,
            json!({ "employeeId": "E1", "roleId": "R1" }),
        );
        let (client, queries) = setup(&transport);
        let list_key = keys::employee::list(&EmployeeFilter::default());
        client.set_query_data(list_key.clone(), 1u32).await;
        client.set_query_data(keys::employee::detail("E1"), 1u32).await;
        client.set_query_data(keys::employee::detail("E2"), 1u32).await;
        client.set_query_data(keys::team::list(), 1u32).await;
        client
            .set_query_data(keys::employee::suspended_by_payroll("P1"), 1u32)
            .await;

        queries
            .assign_member(
                "T1",
                AssignMember {
                    employee_id: "E1".into(),
                    role_id: "R1".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(client.status(&list_key).await, QueryStatus::Stale);
        assert_eq!(
            client.status(&keys::employee::detail("E1")).await,
            QueryStatus::Stale
        );
        assert_eq!(
            client.status(&keys::employee::detail("E2")).await,
            QueryStatus::Fresh
        );
        assert_eq!(client.status(&keys::team::list()).await, QueryStatus::Stale);
        assert_eq!(
            client
                .status(&keys::employee::suspended_by_payroll("P1"))
                .await,
            QueryStatus::Stale
        );
    }

    #[tokio::test]
    async fn deleting_team_marks_every_employee_view_stale() {
        let transport = FakeTransport::new();
        transport.respond(Method::Delete, "/teams/T1", 204, serde_json::Value::Null);
        let (client, queries) = setup(&transport);
        client.set_query_data(keys::employee::detail("E1"), 1u32).await;
        client
            .set_query_data(keys::employee::suspended_by_payroll("P1"), 1u32)
            .await;
        client.set_query_data(keys::team::roles("T2"), 1u32).await;

        queries.delete("T1").await.unwrap();

        assert_eq!(
            client.status(&keys::employee::detail("E1")).await,
            QueryStatus::Stale
        );
        assert_eq!(
            client
                .status(&keys::employee::suspended_by_payroll("P1"))
                .await,
            QueryStatus::Stale
        );
        assert_eq!(client.status(&keys::team::roles("T2")).await, QueryStatus::Fresh);
    }
}
