use dividend_hunter::{
    agent::{Orchestrator, FALLBACK_ANSWER},
    config::Secrets,
    groq::GroqClient,
    memory::SessionRegistry,
    sectors::SectorsClient,
    tools::create_default_registry,
};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{info, warn};

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

    // Create components
    let model = Arc::new(GroqClient::new(secrets.groq_api_key.clone()));
    let registry = create_default_registry(SectorsClient::new(secrets.sectors_api_key.clone()));
    let sessions = Arc::new(SessionRegistry::new());

    let orchestrator = Orchestrator::new(model, registry, sessions);

    info!("Dividend assistant ready");
    println!("Ask your question here! (ctrl-d to exit)");

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        match orchestrator.run_turn("default-chat", question).await {
            Ok(answer) => println!("{}\n", answer),
            Err(e) => {
                warn!("Turn failed: {}", e);
                println!("{}\n", FALLBACK_ANSWER);
            }
        }
    }

    Ok(())
}
