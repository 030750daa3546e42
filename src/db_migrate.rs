use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use seatplan_core::seed;
use seatplan_db::{schema::initialize_database, PgBookingStore};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    tracing::subscriber::set_global_default(FmtSubscriber::builder().finish())?;

    let database_url =
        std::env::var("DATABASE_URL").wrap_err("DATABASE_URL must be set to run migrations")?;

    info!("Connecting to database...");
    let db_pool = seatplan_db::create_pool(&database_url).await?;

    info!("Initializing database schema...");
    initialize_database(&db_pool).await?;

    let store = PgBookingStore::new(db_pool);
    if store.seed_tables_if_empty(&seed::demo_tables()).await? {
        info!("Table catalog seeded with the demo dining room");
    } else {
        info!("Table catalog already present, leaving it untouched");
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
