mod error;
mod handlers;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use services::github::{ContributionSource, GitHubClient};
use utils::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file FIRST before anything else
    dotenv::dotenv().ok();

    // Initialize logger with default level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().expect("Failed to load configuration");
    let host = config.host.clone();
    let port = config.port;

    log::info!("Configuration loaded:");
    log::info!("   - Host: {}", host);
    log::info!("   - Port: {}", port);
    log::info!("   - GitHub API: {}", config.api_base_url);
    log::info!(
        "   - GitHub token: {}",
        if config.github_token.is_some() {
            "SET"
        } else {
            "NOT SET (unauthenticated)"
        }
    );

    let source: Arc<dyn ContributionSource> = Arc::new(GitHubClient::new(&config));

    log::info!("Server started at http://{}:{}", host, port);
    log::info!("   - GET http://{}:{}/api/stats?username=<login>", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(source.clone()))
            .wrap(Logger::default())
            // The badge is embedded in READMEs and profile pages, so the
            // endpoint allows any origin.
            .service(
                web::scope("/api")
                    .wrap(Cors::permissive())
                    .route("/stats", web::get().to(handlers::stats::get_stats)),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
