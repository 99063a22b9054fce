//! Administrative database diagnostics.
//!
//! One-shot commands for operators: a connection test and a schema listing.
//! These run entirely outside the request-serving path and share nothing
//! with the gateway handlers.

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tracing::debug;

async fn connect(dsn: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(dsn)
        .await
        .context("Failed to connect to database")
}

/// Connection test: report server version and current database.
pub async fn ping(dsn: &str) -> Result<()> {
    let pool = connect(dsn).await?;

    let row = sqlx::query("SELECT current_database(), version()")
        .fetch_one(&pool)
        .await
        .context("Failed to query server version")?;

    let database: String = row.get(0);
    let version: String = row.get(1);

    debug!("connected to {}", database);

    println!("{database}: {version}");

    Ok(())
}

/// Schema inspection: list tables and column definitions in the public schema.
pub async fn schema(dsn: &str, table: Option<&str>) -> Result<()> {
    let pool = connect(dsn).await?;

    let query = "SELECT table_name, column_name, data_type, is_nullable \
         FROM information_schema.columns \
         WHERE table_schema = 'public' AND ($1::text IS NULL OR table_name = $1) \
         ORDER BY table_name, ordinal_position";

    let rows = sqlx::query(query)
        .bind(table)
        .fetch_all(&pool)
        .await
        .context("Failed to query information_schema")?;

    if rows.is_empty() {
        println!("no matching tables in schema 'public'");
        return Ok(());
    }

    for row in rows {
        let table_name: String = row.get(0);
        let column_name: String = row.get(1);
        let data_type: String = row.get(2);
        let is_nullable: String = row.get(3);

        let nullable = if is_nullable == "YES" {
            "NULL"
        } else {
            "NOT NULL"
        };

        println!("{table_name}.{column_name}: {data_type} {nullable}");
    }

    Ok(())
}
