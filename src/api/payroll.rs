use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::IntoParams;

use super::respond;
use crate::{
    error::AppError,
    feature::{BonusDeductionRef, Features},
    model::{
        company::{CompanyPayrollPolicy, CompanyWallet, UpdatePayrollPolicy},
        payroll::{CreatePayroll, Payroll, PayrollFilter, UpdatePayroll},
        payslip::{BonusDeduction, BonusKind, CreatePayslip, Payslip, UpsertBonusDeduction},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PayslipDeleteQuery {
    /// Payroll the payslip belongs to
    #[param(example = "pay_2026_01")]
    pub payroll_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdjustmentDeleteQuery {
    #[param(example = "slip_01")]
    pub payslip_id: String,
    #[param(example = "pay_2026_01")]
    pub payroll_id: String,
}

fn bonus_kind(raw: &str) -> Result<BonusKind, AppError> {
    BonusKind::from_plural(raw)
        .ok_or_else(|| AppError::BadRequest(format!("unknown adjustment kind {raw:?}")))
}

#[utoipa::path(
    get,
    path = "/api/v1/payrolls",
    params(PayrollFilter),
    responses(
        (status = 200, description = "Paginated payroll list", body = Object)
    ),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    features: web::Data<Features>,
    query: web::Query<PayrollFilter>,
) -> Result<HttpResponse, AppError> {
    respond(features.payrolls.list(query.into_inner()).await, "payroll list")
}

#[utoipa::path(
    post,
    path = "/api/v1/payrolls",
    request_body = CreatePayroll,
    responses(
        (status = 201, description = "Payroll created", body = Payroll),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Payroll"
)]
pub async fn create_payroll(
    features: web::Data<Features>,
    payload: web::Json<CreatePayroll>,
) -> Result<HttpResponse, AppError> {
    let payroll = features.payrolls.create(payload.into_inner()).await?;
    info!(payroll_id = %payroll.id, "Payroll created");
    Ok(HttpResponse::Created().json(payroll))
}

#[utoipa::path(
    get,
    path = "/api/v1/payrolls/{payroll_id}",
    params(("payroll_id", Path, description = "Payroll ID")),
    responses(
        (status = 200, description = "Payroll found", body = Payroll),
        (status = 404, description = "Payroll not found")
    ),
    tag = "Payroll"
)]
pub async fn get_payroll(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    respond(features.payrolls.detail(&path.into_inner()).await, "payroll")
}

#[utoipa::path(
    patch,
    path = "/api/v1/payrolls/{payroll_id}",
    params(("payroll_id", Path, description = "Payroll ID")),
    request_body = UpdatePayroll,
    responses(
        (status = 200, description = "Payroll updated", body = Payroll)
    ),
    tag = "Payroll"
)]
pub async fn update_payroll(
    features: web::Data<Features>,
    path: web::Path<String>,
    payload: web::Json<UpdatePayroll>,
) -> Result<HttpResponse, AppError> {
    let payroll = features
        .payrolls
        .update(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    post,
    path = "/api/v1/payrolls/{payroll_id}/approve",
    params(("payroll_id", Path, description = "Payroll ID")),
    responses(
        (status = 200, description = "Payroll approved", body = Payroll)
    ),
    tag = "Payroll"
)]
pub async fn approve_payroll(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payroll = features.payrolls.approve(&path.into_inner()).await?;
    info!(payroll_id = %payroll.id, status = %payroll.status, "Payroll approved");
    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    post,
    path = "/api/v1/payrolls/{payroll_id}/disburse",
    params(("payroll_id", Path, description = "Payroll ID")),
    responses(
        (status = 200, description = "Payroll disbursed", body = Payroll)
    ),
    tag = "Payroll"
)]
pub async fn disburse_payroll(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payroll = features.payrolls.disburse(&path.into_inner()).await?;
    info!(payroll_id = %payroll.id, "Payroll disbursed");
    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    get,
    path = "/api/v1/payrolls/{payroll_id}/payslips",
    params(("payroll_id", Path, description = "Payroll ID")),
    responses(
        (status = 200, description = "Payslips of the payroll", body = [Payslip])
    ),
    tag = "Payslip"
)]
pub async fn list_payslips(
    features: web::Data<Features>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    respond(features.payrolls.payslips(&path.into_inner()).await, "payslip list")
}

#[utoipa::path(
    post,
    path = "/api/v1/payslips",
    request_body = CreatePayslip,
    responses(
        (status = 201, description = "Payslip created", body = Payslip),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Payslip"
)]
pub async fn create_payslip(
    features: web::Data<Features>,
    payload: web::Json<CreatePayslip>,
) -> Result<HttpResponse, AppError> {
    let payslip = features.payrolls.create_payslip(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(payslip))
}

#[utoipa::path(
    delete,
    path = "/api/v1/payslips/{payslip_id}",
    params(
        ("payslip_id", Path, description = "Payslip ID"),
        PayslipDeleteQuery
    ),
    responses(
        (status = 200, description = "Successfully deleted")
    ),
    tag = "Payslip"
)]
pub async fn delete_payslip(
    features: web::Data<Features>,
    path: web::Path<String>,
    query: web::Query<PayslipDeleteQuery>,
) -> Result<HttpResponse, AppError> {
    features
        .payrolls
        .delete_payslip(&path.into_inner(), &query.payroll_id)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/v1/payslips/{payslip_id}/{kind}",
    params(
        ("payslip_id", Path, description = "Payslip ID"),
        ("kind", Path, description = "`bonuses` or `deductions`")
    ),
    responses(
        (status = 200, description = "Bonuses or deductions of the payslip", body = [BonusDeduction])
    ),
    tag = "Payslip"
)]
pub async fn list_adjustments(
    features: web::Data<Features>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (payslip_id, kind) = path.into_inner();
    let kind = bonus_kind(&kind)?;
    respond(
        features.payrolls.bonus_deductions(kind, &payslip_id).await,
        kind.plural(),
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/payslips/{payslip_id}/{kind}",
    params(
        ("payslip_id", Path, description = "Payslip ID"),
        ("kind", Path, description = "`bonuses` or `deductions`")
    ),
    request_body = UpsertBonusDeduction,
    responses(
        (status = 201, description = "Bonus or deduction created", body = BonusDeduction),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Payslip"
)]
pub async fn create_adjustment(
    features: web::Data<Features>,
    path: web::Path<(String, String)>,
    payload: web::Json<UpsertBonusDeduction>,
) -> Result<HttpResponse, AppError> {
    let (payslip_id, kind) = path.into_inner();
    let kind = bonus_kind(&kind)?;
    let payload = UpsertBonusDeduction {
        payslip_id,
        ..payload.into_inner()
    };
    let created = features.payrolls.create_bonus_deduction(kind, payload).await?;
    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    patch,
    path = "/api/v1/{kind}/{id}",
    params(
        ("kind", Path, description = "`bonuses` or `deductions`"),
        ("id", Path, description = "Bonus or deduction ID")
    ),
    request_body = UpsertBonusDeduction,
    responses(
        (status = 200, description = "Bonus or deduction updated", body = BonusDeduction)
    ),
    tag = "Payslip"
)]
pub async fn update_adjustment(
    features: web::Data<Features>,
    path: web::Path<(String, String)>,
    payload: web::Json<UpsertBonusDeduction>,
) -> Result<HttpResponse, AppError> {
    let (kind, id) = path.into_inner();
    let updated = features
        .payrolls
        .update_bonus_deduction(bonus_kind(&kind)?, &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/{kind}/{id}",
    params(
        ("kind", Path, description = "`bonuses` or `deductions`"),
        ("id", Path, description = "Bonus or deduction ID"),
        AdjustmentDeleteQuery
    ),
    responses(
        (status = 200, description = "Successfully deleted")
    ),
    tag = "Payslip"
)]
pub async fn delete_adjustment(
    features: web::Data<Features>,
    path: web::Path<(String, String)>,
    query: web::Query<AdjustmentDeleteQuery>,
) -> Result<HttpResponse, AppError> {
    let (kind, id) = path.into_inner();
    let AdjustmentDeleteQuery {
        payslip_id,
        payroll_id,
    } = query.into_inner();
    features
        .payrolls
        .delete_bonus_deduction(BonusDeductionRef {
            kind: bonus_kind(&kind)?,
            id,
            payslip_id,
            payroll_id,
        })
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Successfully deleted" })))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll-policy/company",
    responses(
        (status = 200, description = "Company payroll policy", body = CompanyPayrollPolicy)
    ),
    tag = "Company"
)]
pub async fn get_policy(features: web::Data<Features>) -> Result<HttpResponse, AppError> {
    respond(features.payrolls.company_policy().await, "payroll policy")
}

#[utoipa::path(
    patch,
    path = "/api/v1/payroll-policy/company",
    request_body = UpdatePayrollPolicy,
    responses(
        (status = 200, description = "Policy updated", body = CompanyPayrollPolicy),
        (status = 422, description = "Invalid payload")
    ),
    tag = "Company"
)]
pub async fn update_policy(
    features: web::Data<Features>,
    payload: web::Json<UpdatePayrollPolicy>,
) -> Result<HttpResponse, AppError> {
    let policy = features.payrolls.update_policy(payload.into_inner()).await?;
    info!("Payroll policy updated");
    Ok(HttpResponse::Ok().json(policy))
}

#[utoipa::path(
    get,
    path = "/api/v1/wallets/company",
    responses(
        (status = 200, description = "Company wallet", body = CompanyWallet)
    ),
    tag = "Company"
)]
pub async fn get_wallet(features: web::Data<Features>) -> Result<HttpResponse, AppError> {
    respond(features.payrolls.company_wallet().await, "company wallet")
}
