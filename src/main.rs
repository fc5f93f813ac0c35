use std::sync::Arc;

use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hrm_dashboard::{
    cache::{CacheConfig, QueryClient, QueryOptions, Revalidate},
    config::Config,
    docs::ApiDoc,
    feature::Features,
    http::{ApiClient, ReqwestTransport},
    routes,
    store::UiStore,
};

#[get("/")]
async fn index() -> impl Responder {
    "HRM dashboard gateway"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "gateway.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(backend = %config.backend_base_url, "Gateway starting...");

    let transport = ReqwestTransport::new(
        &config.backend_base_url,
        config.backend_api_token.clone(),
        config.http_timeout,
    )
    .context("building backend HTTP client")?;

    let mut defaults = QueryOptions::default().stale_time(config.query_stale_time);
    if !config.query_revalidate_interval.is_zero() {
        defaults = defaults.refetch_interval(config.query_revalidate_interval);
    }
    let query_client = QueryClient::new(CacheConfig {
        max_capacity: config.query_cache_capacity,
        gc_time: config.query_gc_time,
        defaults,
    });
    let features = Features::new(query_client.clone(), ApiClient::new(Arc::new(transport)));
    let ui = UiStore::new();

    if config.query_revalidate_interval.is_zero() {
        warn!("Background revalidation disabled");
    } else {
        let client = query_client.clone();
        let period = config.query_revalidate_interval;
        actix_web::rt::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                client.revalidate(Revalidate::Due).await;
            }
        });
    }

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(features.clone()))
            .app_data(Data::new(ui.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("binding {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
