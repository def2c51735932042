use std::sync::Arc;

use actix_web::web;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api;
use crate::infrastructure::{build_config, ServiceProvider};

pub fn run() {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
        .block_on(async_run());
}

pub async fn async_run() {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };
    if let Err(e) = initialize_telemetry() {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    }
    let service_provider = match ServiceProvider::build(config) {
        Ok(x) => Arc::new(x),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };
    tokio::select! {
        outcome = initialize_web_host(service_provider) => {
            if let Err(e) = outcome {
                eprintln!("{}: {}", "Web host stopped".red(), e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Stopping services (ctrl-c handling).");
        }
    }
}

fn initialize_telemetry() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|e| anyhow::anyhow!(e))
}

async fn initialize_web_host(sp: Arc<ServiceProvider>) -> anyhow::Result<()> {
    let host = sp.config().host.clone();
    info!("Listening on {}:{}", host.bind_address, host.bind_port);
    actix_web::HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_header()
            .allow_any_method()
            .max_age(86400);

        actix_web::App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .app_data(web::Data::from(sp.clone()))
            .service(api::tickets::list)
            .service(api::tickets::find)
            .service(api::tickets::create)
            .service(api::tickets::rename)
            .service(api::tickets::remove)
            .service(api::orders::list)
            .service(api::orders::find)
            .service(api::orders::create)
            .service(api::orders::update)
            .service(api::orders::remove)
    })
    .bind((host.bind_address.as_str(), host.bind_port))?
    .run()
    .await?;
    Ok(())
}
