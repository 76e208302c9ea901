use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::{Arc, Mutex};

mod api;
mod auth;
mod config;
mod docs;
mod filter;
mod gateway;
mod model;
mod models;
mod routes;
#[cfg(test)]
mod test_support;
mod transform;
mod utils;

use crate::auth::login_flow::LoginFlow;
use crate::auth::session::SessionStore;
use crate::docs::ApiDoc;
use crate::gateway::{ApiGateway, PortalApi};
use crate::utils::kv_store::RedbKvStore;
use config::Config;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Parent portal is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    let kv = RedbKvStore::open(&config.session_dir)
        .with_context(|| format!("Failed to open session dir {}", config.session_dir.display()))?;
    info!(session_dir = %kv.dir().display(), "Session store ready");
    let store = Data::new(
        SessionStore::new(Box::new(kv)).ttl(chrono::Duration::hours(config.session_ttl_hours)),
    );

    let gateway = ApiGateway::new(config.portal_api_base_url.clone());
    info!(portal = %gateway.base_url(), "Server starting...");
    let api: Arc<dyn PortalApi> = Arc::new(gateway);
    let api = Data::from(api);

    // One device, one login in progress
    let flow = Data::new(Mutex::new(LoginFlow::default()));

    let server_addr = config.server_addr.clone();
    let config_data = config;

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .app_data(api.clone())
            .app_data(flow.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
