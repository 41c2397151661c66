use actix_web::HttpServer;
use anyhow::Context;
use tracing::{info, warn};
use us_api::{create_app, telemetry};
use us_core::TokenManager;
use us_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    telemetry::init_tracing(&config.logging).context("failed to initialize tracing")?;

    info!(environment = %config.environment, "starting user service");

    let token_manager =
        TokenManager::from_jwt_config(&config.jwt).context("failed to initialize token manager")?;
    info!(
        issuer = token_manager.config().issuer(),
        access_ttl_secs = token_manager.access_token_ttl().num_seconds(),
        refresh_ttl_secs = token_manager.refresh_token_ttl().num_seconds(),
        "token manager ready"
    );

    let verifier = token_manager.verifier().clone();
    let bind_address = config.server.bind_address();

    let mut attempt = 1;
    let server = loop {
        let verifier = verifier.clone();
        match HttpServer::new(move || create_app(verifier.clone())).bind(&bind_address) {
            Ok(server) => break server,
            Err(err) if attempt < config.server.max_retries => {
                warn!(
                    attempt,
                    max_retries = config.server.max_retries,
                    error = %err,
                    "failed to bind {}, retrying in {:?}",
                    bind_address,
                    config.server.retry_delay
                );
                attempt += 1;
                tokio::time::sleep(config.server.retry_delay).await;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to bind {}", bind_address));
            }
        }
    };

    info!(address = %bind_address, "listening");
    server.run().await.context("server terminated with an error")?;

    info!("user service stopped");
    Ok(())
}
