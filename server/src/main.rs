use server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment (.env is optional)
    dotenv::dotenv().ok();

    let config = Config::from_env();
    server::init_logger_with_file(None, config.log_dir.as_deref());

    tracing::info!("Dine-in ordering server starting...");
    let state = ServerState::initialize(&config).await?;

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
