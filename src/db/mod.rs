use log::info;
use sqlx::{postgres::PgPoolOptions, PgPool};

const CREATE_EMPLOYEES_TABLE: &str = "CREATE TABLE IF NOT EXISTS employees (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    department TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    info!("Connected to PostgreSQL database (max {} connections)", max_connections);
    Ok(pool)
}

/// Creates the `employees` table when it is missing. Existing tables are left untouched.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_EMPLOYEES_TABLE).execute(pool).await?;
    Ok(())
}
