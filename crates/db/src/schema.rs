use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create dining_tables table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dining_tables (
            id INTEGER PRIMARY KEY,
            capacity INTEGER NOT NULL,
            label VARCHAR(255) NULL,
            CONSTRAINT positive_capacity CHECK (capacity > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create reservations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            customer_name VARCHAR(255) NOT NULL,
            customer_phone VARCHAR(64) NOT NULL,
            customer_email VARCHAR(255) NULL,
            reservation_date DATE NOT NULL,
            reservation_time TIME NOT NULL,
            party_size INTEGER NOT NULL,
            table_id INTEGER NULL REFERENCES dining_tables(id),
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            notes TEXT NULL,
            special_requests TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_party_size CHECK (party_size BETWEEN 1 AND 20),
            CONSTRAINT valid_status CHECK (status IN ('confirmed', 'seated', 'completed', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations(reservation_date)",
        "CREATE INDEX IF NOT EXISTS idx_reservations_slot ON reservations(reservation_date, reservation_time)",
        "CREATE INDEX IF NOT EXISTS idx_reservations_table_id ON reservations(table_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
