//! A shopping list web service with axum.

use shopping_list::{
    app,
    infra::{config, database, logging},
};
use tokio::net::TcpListener;
use tower_sessions_sqlx_store::PostgresStore;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    let _guard = logging::init_logging();

    let config = config::load_config()?;
    let db = database::init_db(&config.database);
    sqlx::migrate!().run(&db).await?;

    let listener = TcpListener::bind(&format!(
        "{}:{}",
        config.server.http_address, config.server.http_port
    ))
    .await?;
    let store = PostgresStore::new(db.clone());
    app::run_app(listener, db, store, config).await?;

    Ok(())
}
