use std::sync::Arc;

use auth::Authenticator;
use auth::SecretOrigin;
use inventory_service::config::Config;
use inventory_service::domain::user::service::UserService;
use inventory_service::inbound::http::router::create_router;
use inventory_service::outbound::repositories::InMemoryUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "inventory-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_expiration_hours = config.jwt.expiration_hours,
        password_min_length = config.password.min_length,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::from_config(&config.jwt, &config.password)?);

    // Resolve the signing secret now so a weak configured secret stops startup.
    let secret = authenticator.secrets().get()?;
    if secret.origin() == SecretOrigin::Generated {
        tracing::warn!("No signing secret configured; tokens will not survive a restart");
    }

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let gate = authenticator.gate();
    let http_application = create_router(user_service, gate);

    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
