use std::sync::Arc;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use todo_service::config::Config;
use todo_service::domain::auth::models::AuthSettings;
use todo_service::inbound::http::router::create_router;
use todo_service::inbound::http::router::AppState;
use todo_service::outbound::email::LoggingEmailSender;
use todo_service::outbound::identity::GoogleIdentityProvider;
use todo_service::repositories::InMemoryStore;
use todo_service::repositories::PostgresTodoRepository;
use todo_service::repositories::PostgresUserRepository;
use todo_service::user::models::EmailAddress;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "todo-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        in_memory = config.database.is_in_memory(),
        http_port = config.server.http_port,
        emails_enabled = config.email.enabled,
        verification_required = config.email.verification_required,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::with_lifetimes(
        config.jwt.secret.as_bytes(),
        config.jwt.lifetimes(),
    ));
    tracing::info!(
        access_ttl_minutes = authenticator.lifetimes().access.num_minutes(),
        refresh_ttl_minutes = authenticator.lifetimes().refresh.num_minutes(),
        "Token lifetimes configured"
    );
    let email_sender = Arc::new(LoggingEmailSender::new(config.email.sender.clone()));
    let identity_provider = Arc::new(GoogleIdentityProvider::new(
        config.google.userinfo_url.clone(),
    ));
    let settings = AuthSettings {
        emails_enabled: config.email.enabled,
        verification_required: config.email.verification_required,
        base_url: config.email.base_url.clone(),
    };

    let state = if config.database.is_in_memory() {
        tracing::warn!("No database url configured, data lives in memory only");

        let store = Arc::new(InMemoryStore::new());
        AppState::new(
            Arc::clone(&store),
            store,
            email_sender,
            identity_provider,
            authenticator,
            settings,
        )
    } else {
        let pg_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            database = "postgresql",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pg_pool).await?;
        tracing::info!(database = "postgresql", "Database migrations completed");

        AppState::new(
            Arc::new(PostgresUserRepository::new(pg_pool.clone())),
            Arc::new(PostgresTodoRepository::new(pg_pool)),
            email_sender,
            identity_provider,
            authenticator,
            settings,
        )
    };

    if let Some(superuser) = &config.superuser {
        let email = EmailAddress::new(superuser.email.clone())?;
        let user = state
            .user_service
            .ensure_superuser(email, superuser.password.clone())
            .await?;
        tracing::info!(user_id = %user.id, email = %user.email, "Superuser ready");
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;
    tracing::info!("Server exited successfully");

    Ok(())
}
