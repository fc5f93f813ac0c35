use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::info;

use super::respond;
use crate::{
    error::AppError,
    feature::Features,
    model::{
        role::{CreateRole, Role},
        team::{AssignMember, CreateTeam, Team, TeamMember, UpdateTeam},
    },
    store::{SetupEvent, UiAction, UiStore},
};

/// List teams
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    responses(
        (status = 200, description = "All teams", body = [Team])
    ),
    tag = "Team"
)]
pub async fn list_teams(features: web::Data<Features>) -> Result<HttpResponse, AppError> {
    respond(features.teams.list().await, "team list")
}

/// Create a team and start the guided setup for it.
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    request_body = CreateTeam,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Team"
)]
pub async fn create_team(
    features: web::Data<Features>,
    ui: web::Data<UiStore>,
    payload: web::Json<CreateTeam>,
) -> Result<HttpResponse, AppError> {
    let team = features.teams.create(payload.into_inner()).await?;
    info!(team_id = %team.id, "Team created");
    ui.dispatch(UiAction::StartTeamSetup {
        team_id: team.id.clone(),
    });
    Ok(HttpResponse::Created().json(team))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}",
    params(("team_id", Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team found", body = Team),
        (status = 404, description = "Team not found")
    ),
    tag = "Team"
)]
pub async fn get_team(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    respond(features.teams.detail(&path.into_inner()).await, "team")
}

#[utoipa::path(
    patch,
    path = "/api/v1/teams/{team_id}",
    params(("team_id", Path, description = "Team ID")),
    request_body = UpdateTeam,
    responses(
        (status = 200, description = "Team updated", body = Team)
    ),
    tag = "Team"
)]
pub async fn update_team(
    features: web::Data<Features>,
    path: web::Path<String>,
    payload: web::Json<UpdateTeam>,
) -> Result<HttpResponse, AppError> {
    let team = features
        .teams
        .update(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(team))
}

#[utoipa::path(
    delete,
    path = "/api/v1/teams/{team_id}",
    params(("team_id", Path, description = "Team ID")),
    responses(
        (status = 200, description = "Successfully deleted")
    ),
    tag = "Team"
)]
pub async fn delete_team(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let team_id = path.into_inner();
    features.teams.delete(&team_id).await?;
    info!(team_id, "Team deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/roles",
    params(("team_id", Path, description = "Team ID")),
    responses(
        (status = 200, description = "Roles of the team", body = [Role])
    ),
    tag = "Team"
)]
pub async fn list_roles(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    respond(features.teams.roles(&path.into_inner()).await, "role list")
}

#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/roles",
    params(("team_id", Path, description = "Team ID")),
    request_body = CreateRole,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Team"
)]
pub async fn create_role(
    features: web::Data<Features>,
    ui: web::Data<UiStore>,
    path: web::Path<String>,
    payload: web::Json<CreateRole>,
) -> Result<HttpResponse, AppError> {
    let team_id = path.into_inner();
    let role = features.teams.create_role(&team_id, payload.into_inner()).await?;
    ui.dispatch(UiAction::AdvanceTeamSetup {
        event: SetupEvent::RoleCreated {
            team_id,
            role_id: role.id.clone(),
        },
    });
    Ok(HttpResponse::Created().json(role))
}

#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/members",
    params(("team_id", Path, description = "Team ID")),
    responses(
        (status = 200, description = "Members of the team", body = [TeamMember])
    ),
    tag = "Team"
)]
pub async fn list_members(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    respond(features.teams.members(&path.into_inner()).await, "member list")
}

#[utoipa::path(
    post,
    path = "/api/v1/teams/{team_id}/members",
    params(("team_id", Path, description = "Team ID")),
    request_body = AssignMember,
    responses(
        (status = 201, description = "Employee assigned", body = TeamMember),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Team"
)]
pub async fn assign_member(
    features: web::Data<Features>,
    ui: web::Data<UiStore>,
    path: web::Path<String>,
    payload: web::Json<AssignMember>,
) -> Result<HttpResponse, AppError> {
    let team_id = path.into_inner();
    let member = features
        .teams
        .assign_member(&team_id, payload.into_inner())
        .await?;
    ui.dispatch(UiAction::AdvanceTeamSetup {
        event: SetupEvent::MemberAssigned {
            team_id,
            employee_id: member.employee_id.clone(),
        },
    });
    Ok(HttpResponse::Created().json(member))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{CacheConfig, QueryClient},
        http::{Method, fake::FakeTransport},
        routes,
        store::SetupFlow,
    };
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn team_creation_callbacks_drive_the_setup_flow() {
        let transport = FakeTransport::new();
        transport.respond_data(Method::Post, "/teams", 201, json!({ "id": "T1", "name": "Ops" }));
        transport.respond_data(
            Method::Post,
            "/teams/T1/roles",
            201,
            json!({ "id": "R1", "name": "Lead" }),
        );
        transport.respond_data(
            Method::Post,
            "/teams/T1/members",
            201,
            json!({ "employeeId": "E1", "roleId": "R1" }),
        );
        let ui = UiStore::new();
        let features = Features::new(QueryClient::new(CacheConfig::default()), transport.client());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(features))
                .app_data(web::Data::new(ui.clone()))
                .configure(routes::api_routes),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/teams")
                .set_json(json!({ "name": "Ops" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(ui.snapshot().team.setup, Some(SetupFlow::start("T1")));

        ui.dispatch(UiAction::AdvanceTeamSetup {
            event: SetupEvent::Continue,
        });
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/teams/T1/roles")
                .set_json(json!({ "name": "Lead" }))
                .to_request(),
        )
        .await;
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/teams/T1/members")
                .set_json(json!({ "employeeId": "E1", "roleId": "R1" }))
                .to_request(),
        )
        .await;

        assert!(ui.snapshot().team.setup.is_some_and(|flow| flow.is_done()));
    }
}
