use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dream_journal::{
    analyze, create_router, AppState, Config, DreamAnalyzer, DreamStore, InMemoryRepository,
    NatsSpeechCapture, ScriptedCapture, SessionConfig, SessionController, SpeechEvent,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "dream-journal", version, about = "Voice dream journal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the analysis of a transcript as JSON
    Analyze {
        /// Transcript text
        text: String,
    },
    /// Record a scripted dream and save it to an in-memory journal
    Demo,
    /// Run the HTTP API against the NATS speech service
    Serve {
        /// Config file, without extension
        #[arg(long, default_value = "config/dream-journal")]
        config: String,
    },
}

const DEMO_TRANSCRIPT: &str = "I was flying over my childhood home and the colors were vivid. \
    Then I realized I was dreaming and decided to float toward the strange doors.";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { text } => {
            println!("{}", serde_json::to_string_pretty(&analyze(&text))?);
        }
        Command::Demo => run_demo().await?,
        Command::Serve { config } => serve(&config).await?,
    }

    Ok(())
}

async fn run_demo() -> Result<()> {
    let (capture, script) = ScriptedCapture::new();
    let session = SessionController::new(SessionConfig::default(), Box::new(capture));
    let store = DreamStore::new(Arc::new(InMemoryRepository::new()), DreamAnalyzer::default());

    session.start_recording().await?;

    script
        .emit(SpeechEvent::PartialResult("I was flying".to_string()))
        .await;
    script.final_on_stop(DEMO_TRANSCRIPT, Some(0.92));
    session.stop_recording().await;

    let outcome = session.wait_for_outcome().await;
    info!("Session finished: {:?}", outcome.status);

    let transcript = session
        .take_committed()
        .await
        .context("Demo session produced no transcript")?;
    let entry = store.save_session(&transcript).await?;

    println!("{}", serde_json::to_string_pretty(&entry)?);
    println!("{}", serde_json::to_string_pretty(&store.insights().await?)?);

    Ok(())
}

async fn serve(config_path: &str) -> Result<()> {
    let cfg = Config::load(config_path)?;

    info!("Dream Journal v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Speech service: {}", cfg.speech.nats_url);

    let capture = NatsSpeechCapture::new(cfg.speech.nats_url.clone());
    let session = SessionController::new(cfg.session_config(), Box::new(capture));
    let store = DreamStore::new(Arc::new(InMemoryRepository::new()), cfg.analyzer()?);

    let app = create_router(AppState::new(store, session));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
