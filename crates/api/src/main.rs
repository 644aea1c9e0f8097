use std::sync::Arc;

use anyhow::Context;

use cadastro_api::app::services::AppServices;
use cadastro_api::config::Config;
use cadastro_infra::PgUsuarioStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cadastro_observability::init();

    let config = Config::from_env()?;

    let pool = sqlx::PgPool::connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let store = PgUsuarioStore::new(pool);
    let server_time = store
        .ping()
        .await
        .context("database connection test failed")?;
    tracing::info!(%server_time, "database connection established");

    let services = Arc::new(AppServices::new(Arc::new(store)));
    let app = cadastro_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{}", config.port))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
