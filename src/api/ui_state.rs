use actix_web::{HttpResponse, web};

use crate::{
    error::AppError,
    store::{DashboardUiState, UiAction, UiStore},
};

#[utoipa::path(
    get,
    path = "/api/v1/ui-state",
    responses(
        (status = 200, description = "Current dashboard UI state", body = DashboardUiState)
    ),
    tag = "UI state"
)]
pub async fn get_ui_state(ui: web::Data<UiStore>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ui.snapshot()))
}

/// Apply one UI action, e.g. `{"type": "selectPayroll", "payrollId": "pay_01"}`.
#[utoipa::path(
    post,
    path = "/api/v1/ui-state/actions",
    request_body(content = Object, description = "A tagged UI action"),
    responses(
        (status = 200, description = "State after the action", body = DashboardUiState),
        (status = 400, description = "Unknown action")
    ),
    tag = "UI state"
)]
pub async fn dispatch_action(
    ui: web::Data<UiStore>,
    action: web::Json<UiAction>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ui.dispatch(action.into_inner())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn actions_update_the_shared_state() {
        let ui = UiStore::new();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ui.clone()))
                .configure(routes::api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ui-state/actions")
            .set_json(json!({ "type": "selectPayroll", "payrollId": "P1" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["payroll"]["selectedPayrollId"], "P1");
        assert_eq!(ui.snapshot().payroll.selected_payroll_id.as_deref(), Some("P1"));
    }

    #[actix_web::test]
    async fn unknown_action_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(UiStore::new()))
                .configure(routes::api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/ui-state/actions")
            .set_json(json!({ "type": "launchRocket" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
