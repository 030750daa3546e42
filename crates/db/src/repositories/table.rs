use crate::models::DbTable;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_tables(pool: &Pool<Postgres>) -> Result<Vec<DbTable>> {
    let tables = sqlx::query_as::<_, DbTable>(
        r#"
        SELECT id, capacity, label
        FROM dining_tables
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Loaded {} tables", tables.len());
    Ok(tables)
}

pub async fn upsert_table(pool: &Pool<Postgres>, table: &DbTable) -> Result<DbTable> {
    let table = sqlx::query_as::<_, DbTable>(
        r#"
        INSERT INTO dining_tables (id, capacity, label)
        VALUES ($1, $2, $3)
        ON CONFLICT (id)
        DO UPDATE SET capacity = $2, label = $3
        RETURNING id, capacity, label
        "#,
    )
    .bind(table.id)
    .bind(table.capacity)
    .bind(&table.label)
    .fetch_one(pool)
    .await?;

    Ok(table)
}

pub async fn count_tables(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dining_tables")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
