use color_eyre::eyre::Result;
use dotenv::dotenv;
use seatplan_api::{config::ApiConfig, state::build_state};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    seatplan_api::init_tracing(&config)?;

    // Load the reservation book from Postgres or the demo room
    let state = build_state(&config).await?;

    // Start API server
    seatplan_api::start_server(config, state).await?;

    Ok(())
}
