use textcast_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, records, speech, routes)
    let (_state, router) = textcast_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    textcast_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
