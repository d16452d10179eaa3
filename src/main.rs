use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use user_management_api::{
    config::AppConfig,
    database::{self, MemoryStore, PgStore},
    router,
    services::user_service,
    AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "user-management-api", version, about = "User, level and group management API")]
struct Args {
    #[arg(long, help = "Port to listen on (overrides API_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Address to bind (overrides SERVER_BIND)")]
    bind: Option<String>,

    #[arg(long, value_enum, default_value = "postgres", help = "Where users, levels and groups are kept")]
    store: StoreKind,

    #[arg(long, env = "ADMIN_EMAIL", requires = "admin_password", help = "Create or promote this administrator at startup")]
    admin_email: Option<String>,

    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true, help = "Password for a newly created administrator")]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up keys and DATABASE_URL
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    tracing::info!("Starting in {:?} mode with {:?} store", config.environment, args.store);

    let state = match args.store {
        StoreKind::Postgres => {
            let pool = database::connect(&config.database)
                .await
                .context("could not connect to the database")?;
            database::migrate(&pool).await.context("could not prepare the database schema")?;
            let store = Arc::new(PgStore::new(pool));
            AppState::new(config, store.clone(), store)?
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            let store = Arc::new(MemoryStore::new());
            AppState::new(config, store.clone(), store)?
        }
    };

    if let (Some(email), Some(password)) = (args.admin_email.as_deref(), args.admin_password.as_deref()) {
        user_service::ensure_administrator(&state, email, password)
            .await
            .map_err(|e| anyhow::anyhow!("could not bootstrap administrator: {}", e))?;
    }

    let bind_addr = format!("{}:{}", state.config.server.bind, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
