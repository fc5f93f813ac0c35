use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::IntoParams;

use super::respond;
use crate::{
    error::AppError,
    feature::Features,
    model::employee::{CreateEmployee, Employee, EmployeeFilter, SuspendEmployee, UpdateEmployee},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SuspendedQuery {
    #[param(example = "pay_2026_01")]
    pub payroll_id: Option<String>,
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Paginated employee list", body = Object),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    features: web::Data<Features>,
    query: web::Query<EmployeeFilter>,
) -> Result<HttpResponse, AppError> {
    respond(features.employees.list(query.into_inner()).await, "employee list")
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 422, description = "Invalid payload", body = Object, example = json!({
            "message": "email: must be a valid email address",
            "errors": [{ "field": "email", "message": "must be a valid email address" }]
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    features: web::Data<Features>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee = features.employees.create(payload.into_inner()).await?;
    info!(employee_id = %employee.id, "Employee created");
    Ok(HttpResponse::Created().json(employee))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    respond(features.employees.detail(&path.into_inner()).await, "employee")
}

/// Update Employee
#[utoipa::path(
    patch,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    features: web::Data<Features>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, AppError> {
    let employee = features
        .employees
        .update(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    features.employees.delete(&employee_id).await?;
    info!(employee_id, "Employee deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

/// Employees suspended from a payroll
#[utoipa::path(
    get,
    path = "/api/v1/employees/suspended",
    params(SuspendedQuery),
    responses(
        (status = 200, description = "Suspended employees", body = [Employee]),
        (status = 400, description = "payrollId missing")
    ),
    tag = "Employee"
)]
pub async fn list_suspended(
    features: web::Data<Features>,
    query: web::Query<SuspendedQuery>,
) -> Result<HttpResponse, AppError> {
    let payroll_id = query
        .into_inner()
        .payroll_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("payrollId is required".to_string()))?;
    respond(
        features.employees.suspended_by_payroll(&payroll_id).await,
        "suspended employee list",
    )
}

/// Suspend an employee from a payroll
#[utoipa::path(
    post,
    path = "/api/v1/employees/suspended",
    request_body = SuspendEmployee,
    responses(
        (status = 200, description = "Employee suspended", body = Object, example = json!({
            "message": "Employee suspended"
        })),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Employee"
)]
pub async fn suspend_employee(
    features: web::Data<Features>,
    payload: web::Json<SuspendEmployee>,
) -> Result<HttpResponse, AppError> {
    features.employees.suspend(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Employee suspended" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::{CacheConfig, QueryClient},
        http::{Method, fake::FakeTransport},
        routes,
    };
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn features(transport: &Arc<FakeTransport>) -> Features {
        Features::new(QueryClient::new(CacheConfig::default()), transport.client())
    }

    #[actix_web::test]
    async fn create_with_bad_email_is_unprocessable() {
        let transport = FakeTransport::new();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(features(&transport)))
                .configure(routes::api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees")
            .set_json(json!({ "firstName": "Ann", "lastName": "Lee", "email": "nope" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "email");
        assert_eq!(transport.total_calls(), 0);
    }

    #[actix_web::test]
    async fn detail_is_served_from_upstream() {
        let transport = FakeTransport::new();
        transport.respond_data(
            Method::Get,
            "/employees/E1",
            200,
            json!({
                "id": "E1",
                "firstName": "Ann",
                "lastName": "Lee",
                "email": "ann@acme.io",
                "department": "R&D",
                "avatarUrl": "https://cdn.acme.io/ann.png"
            }),
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(features(&transport)))
                .configure(routes::api_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/employees/E1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["firstName"], "Ann");
        assert_eq!(body["department"], "R&D");
        assert_eq!(body["avatarUrl"], "https://cdn.acme.io/ann.png");
    }

    #[actix_web::test]
    async fn suspended_requires_payroll_id() {
        let transport = FakeTransport::new();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(features(&transport)))
                .configure(routes::api_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/employees/suspended").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn upstream_conflict_message_reaches_the_caller() {
        let transport = FakeTransport::new();
        transport.fail(
            Method::Post,
            "/employees",
            crate::http::HttpError::Status {
                status: 409,
                message: Some("Email already exists".into()),
            },
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(features(&transport)))
                .configure(routes::api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/employees")
            .set_json(json!({ "firstName": "Ann", "lastName": "Lee", "email": "ann@acme.io" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Email already exists");
    }
}
