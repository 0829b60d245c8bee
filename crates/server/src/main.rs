use std::sync::Arc;

use anyhow::Context;
use hrkit_api::{router, AppState};
use hrkit_auth::AuthService;
use hrkit_core::{logging, AppConfig, DatabaseConfig};
use hrkit_storage::{ensure_schema, DocumentStore, EmployeeService, MemoryStore, MongoStore};

const MEMORY_URL: &str = "memory://";

async fn open_store(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = if config.url.starts_with(MEMORY_URL) {
        tracing::warn!("using the in-memory store; records are lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let mongo = MongoStore::connect(&config.url, &config.name)
            .await
            .context("MongoDB connection failed")?;
        Arc::new(mongo)
    };

    ensure_schema(store.as_ref())
        .await
        .context("failed to create unique indexes")?;
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, overrides) = AppConfig::load_with_env().context(
        "failed to load configuration (auth.jwt_secret is required, e.g. HRKIT_AUTH__JWT_SECRET)",
    )?;
    logging::init(&config.log);

    for key in &overrides {
        tracing::info!(key = %key, "configuration value taken from environment");
    }

    let store = open_store(&config.database).await?;

    let auth_service = AuthService::new(
        Arc::clone(&store),
        config.auth.jwt_secret.clone(),
        config.auth.token_expiry_seconds,
    )
    .with_bcrypt_cost(config.auth.bcrypt_cost);
    let employee_service = EmployeeService::new(store);

    let state = AppState::new(auth_service, employee_service)
        .with_protected_employee_routes(config.auth.protect_employee_routes);
    let app = router(Arc::new(state));

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    tracing::info!(address = %listener.local_addr()?, "server has started");
    axum::serve(listener, app).await?;
    Ok(())
}
