use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::ports::AccountRepository;
use account_service::domain::account::service::CredentialService;
use account_service::domain::identity::filter::AuthenticationFilter;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryAccountRepository;
use account_service::outbound::repositories::PostgresAccountRepository;
use auth::PasswordHasher;
use auth::TokenCodec;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        persistent = config.database.url.is_some(),
        token_ttl_minutes = config.jwt.expiration_minutes,
        lookup_timeout_ms = config.auth.lookup_timeout_ms,
        "Configuration loaded"
    );

    match config.database.url.as_deref() {
        Some(url) => {
            let pg_pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            tracing::info!(
                max_connections = 5,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            serve(&config, Arc::new(PostgresAccountRepository::new(pg_pool))).await
        }
        None => {
            tracing::warn!("No database configured, accounts are kept in memory");
            serve(&config, Arc::new(InMemoryAccountRepository::new())).await
        }
    }
}

async fn serve<R: AccountRepository>(
    config: &Config,
    account_repository: Arc<R>,
) -> Result<(), anyhow::Error> {
    let token_codec = Arc::new(TokenCodec::new(
        config.jwt.secret.as_bytes(),
        config.jwt.token_ttl(),
    ));
    let password_hasher = PasswordHasher::with_cost(config.password.hash_cost())?;

    let credential_service = Arc::new(CredentialService::new(
        Arc::clone(&account_repository),
        password_hasher,
        Arc::clone(&token_codec),
    )?);
    let authentication_filter = Arc::new(AuthenticationFilter::new(
        token_codec,
        account_repository,
        config.auth.lookup_timeout(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service, authentication_filter);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");
    Ok(())
}
