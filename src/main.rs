use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use voiceaid::{create_router, AppState, Config, MemorySessionStore, SessionPipeline};

#[derive(Debug, Parser)]
#[command(name = "voiceaid", about = "Voice note-taking service: transcribe recordings into structured notes")]
struct Args {
    /// Configuration file (TOML, extension optional); VOICEAID_* env vars override
    #[arg(short, long, default_value = "voiceaid")]
    config: String,

    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(port) = args.port {
        cfg.service.port = port;
    }

    info!("VoiceAid v{}", env!("CARGO_PKG_VERSION"));
    if cfg.pipeline.mock_mode {
        info!("Mock mode enabled: uploads get the fixed demo transcript");
    }

    let store = Arc::new(MemorySessionStore::new());
    let pipeline = Arc::new(SessionPipeline::new(cfg.pipeline.clone(), store)?);
    let app = create_router(AppState::new(pipeline));

    let addr = format!("{}:{}", cfg.service.bind, cfg.service.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
