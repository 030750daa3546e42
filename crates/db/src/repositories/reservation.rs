use crate::models::DbReservation;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_reservations(pool: &Pool<Postgres>) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, customer_name, customer_phone, customer_email,
               reservation_date, reservation_time, party_size, table_id,
               status, notes, special_requests, created_at, updated_at
        FROM reservations
        ORDER BY reservation_date ASC, reservation_time ASC, created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Loaded {} reservations", reservations.len());
    Ok(reservations)
}

pub async fn upsert_reservation(
    pool: &Pool<Postgres>,
    reservation: &DbReservation,
) -> Result<()> {
    tracing::debug!(
        "Saving reservation: id={}, date={}, status={}",
        reservation.id,
        reservation.reservation_date,
        reservation.status
    );

    sqlx::query(
        r#"
        INSERT INTO reservations (
            id, customer_name, customer_phone, customer_email,
            reservation_date, reservation_time, party_size, table_id,
            status, notes, special_requests, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (id)
        DO UPDATE SET
            customer_name = $2,
            customer_phone = $3,
            customer_email = $4,
            reservation_date = $5,
            reservation_time = $6,
            party_size = $7,
            table_id = $8,
            status = $9,
            notes = $10,
            special_requests = $11,
            updated_at = $13
        WHERE reservations.updated_at <= EXCLUDED.updated_at
        "#,
    )
    .bind(reservation.id)
    .bind(&reservation.customer_name)
    .bind(&reservation.customer_phone)
    .bind(&reservation.customer_email)
    .bind(reservation.reservation_date)
    .bind(reservation.reservation_time)
    .bind(reservation.party_size)
    .bind(reservation.table_id)
    .bind(&reservation.status)
    .bind(&reservation.notes)
    .bind(&reservation.special_requests)
    .bind(reservation.created_at)
    .bind(reservation.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_reservation(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
