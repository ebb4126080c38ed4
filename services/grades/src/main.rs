use anyhow::Context as _;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait as _;
use tracing::info;

use gradebook_core::config::Config as _;
use gradebook_grades::config::GradesConfig;
use gradebook_grades::router::build_router;
use gradebook_grades::state::AppState;
use gradebook_grades_migration::Migrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gradebook_core::tracing::init_tracing();

    let config = GradesConfig::from_env().context("load configuration")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    if config.run_migrations {
        Migrator::up(&db, None).await.context("apply migrations")?;
        info!("migrations applied");
    }

    let router = build_router(AppState { db });
    let addr = format!("0.0.0.0:{}", config.grades_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("grades service listening on {addr}");
    axum::serve(listener, router).await.context("serve http")?;
    Ok(())
}
