mod config;
mod domain;
mod storage;
mod sync;
mod sync_api;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use config::Config;
use migration::MigratorTrait;
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use storage::SqlStore;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type ReadingSyncResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> ReadingSyncResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for the database stack.
    let default_filter = format!(
        "{}=info,poem=info,sea_orm=warn,sqlx=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting reading sync server"
    );
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load()?;
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!(e));
    }

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let store = SqlStore::new(Arc::new(db_conn));
    run_poem(Arc::new(store), Arc::new(config)).await?;
    Ok(())
}

pub async fn run_poem(store: Arc<SqlStore>, config: Arc<Config>) -> ReadingSyncResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api = sync_api::SyncApi { store };
    let api_service = OpenApiService::new(api, "Reading Sync API", version)
        .server(config.public_url.clone());
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    let bind_addr = config.listen_addr();
    tracing::info!(
        %bind_addr,
        identity_header = sync_api::auth::USER_ID_HEADER,
        "starting HTTP server"
    );
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
