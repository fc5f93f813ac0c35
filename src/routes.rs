use crate::{
    api::{cache, employee, payroll, team, ui_state},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let per_ms = (60_000 / requests_per_min as u64).max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("non-zero period and burst size");
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_per_min))
            .configure(api_routes),
    );
}

/// Every gateway endpoint, relative to the API prefix.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            // /employees/suspended, ahead of /{id}
            .service(
                web::resource("/suspended")
                    .route(web::get().to(employee::list_suspended))
                    .route(web::post().to(employee::suspend_employee)),
            )
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::patch().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/teams")
            .service(
                web::resource("")
                    .route(web::get().to(team::list_teams))
                    .route(web::post().to(team::create_team)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(team::get_team))
                    .route(web::patch().to(team::update_team))
                    .route(web::delete().to(team::delete_team)),
            )
            .service(
                web::resource("/{id}/roles")
                    .route(web::get().to(team::list_roles))
                    .route(web::post().to(team::create_role)),
            )
            .service(
                web::resource("/{id}/members")
                    .route(web::get().to(team::list_members))
                    .route(web::post().to(team::assign_member)),
            ),
    )
    .service(
        web::scope("/payrolls")
            .service(
                web::resource("")
                    .route(web::get().to(payroll::list_payrolls))
                    .route(web::post().to(payroll::create_payroll)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(payroll::get_payroll))
                    .route(web::patch().to(payroll::update_payroll)),
            )
            .service(web::resource("/{id}/approve").route(web::post().to(payroll::approve_payroll)))
            .service(
                web::resource("/{id}/disburse").route(web::post().to(payroll::disburse_payroll)),
            )
            .service(web::resource("/{id}/payslips").route(web::get().to(payroll::list_payslips))),
    )
    .service(
        web::scope("/payslips")
            .service(web::resource("").route(web::post().to(payroll::create_payslip)))
            .service(web::resource("/{id}").route(web::delete().to(payroll::delete_payslip)))
            .service(
                web::resource("/{id}/{kind:bonuses|deductions}")
                    .route(web::get().to(payroll::list_adjustments))
                    .route(web::post().to(payroll::create_adjustment)),
            ),
    )
    .service(
        web::resource("/payroll-policy/company")
            .route(web::get().to(payroll::get_policy))
            .route(web::patch().to(payroll::update_policy)),
    )
    .service(web::resource("/wallets/company").route(web::get().to(payroll::get_wallet)))
    .service(
        web::scope("/cache")
            .service(web::resource("").route(web::get().to(cache::snapshot)))
            .service(web::resource("/revalidate").route(web::post().to(cache::revalidate))),
    )
    .service(
        web::scope("/ui-state")
            .service(web::resource("").route(web::get().to(ui_state::get_ui_state)))
            .service(web::resource("/actions").route(web::post().to(ui_state::dispatch_action))),
    )
    // /bonuses/{id}, /deductions/{id}
    .service(
        web::resource("/{kind:bonuses|deductions}/{id}")
            .route(web::patch().to(payroll::update_adjustment))
            .route(web::delete().to(payroll::delete_adjustment)),
    );
}
