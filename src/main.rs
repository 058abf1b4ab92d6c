use kalenterivahti::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting kalenterivahti");

    // Load configuration
    let config = startup::load_config().await?;

    // Serve the classification flow
    startup::start_server(config).await
}
