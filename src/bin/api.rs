use dividend_hunter::{
    agent::Orchestrator,
    api::start_server,
    config::Secrets,
    groq::GroqClient,
    memory::SessionRegistry,
    sectors::SectorsClient,
    tools::create_default_registry,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let secrets = match Secrets::from_env() {
        Ok(secrets) => secrets,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            eprintln!("Set SECTORS_API_KEY and GROQ_API_KEY in your environment or .env file.");
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Dividend assistant - API server");
    info!("Port: {}", api_port);

    // Create components
    let model = Arc::new(GroqClient::new(secrets.groq_api_key.clone()));
    let registry = create_default_registry(SectorsClient::new(secrets.sectors_api_key.clone()));
    let sessions = Arc::new(SessionRegistry::new());

    let orchestrator = Arc::new(Orchestrator::new(model, registry, sessions));

    info!("Orchestrator initialized");

    // Start API server
    start_server(orchestrator, api_port).await?;

    Ok(())
}
