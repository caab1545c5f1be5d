use std::{net::TcpListener, sync::Arc};

use dotenv::dotenv;
use employee_grid::{
    config::{Config, StoreBackend},
    db, server,
    store::{EmployeeStore, MemoryEmployeeStore, PgEmployeeStore},
};
use log::{error, info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn EmployeeStore> = match &config.store {
        StoreBackend::Postgres { database_url } => {
            let pool = db::create_pool(database_url, config.max_connections)
                .await
                .map_err(|err| {
                    error!("Failed to connect to the database: {}", err);
                    std::io::Error::new(std::io::ErrorKind::Other, err)
                })?;
            db::ensure_schema(&pool).await.map_err(|err| {
                error!("Failed to prepare the employees table: {}", err);
                std::io::Error::new(std::io::ErrorKind::Other, err)
            })?;
            Arc::new(PgEmployeeStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using the in-memory store; records are lost on restart");
            Arc::new(MemoryEmployeeStore::new())
        }
    };

    if config.allowed_origins.is_empty() {
        info!("CORS: accepting any origin");
    } else {
        info!("CORS: accepting {}", config.allowed_origins.join(", "));
    }

    let listener = TcpListener::bind(config.bind_address())?;
    server::serve(listener, store, config.allowed_origins.clone())?.await
}
