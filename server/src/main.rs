use anyhow::Result;
use axum::Router;
use clap::Parser;
use kbcore::{build_index, CorpusSource, JsonFileSource, SharedIndex};
use server::generate::OpenRouterClient;
use server::{build_app, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Knowledge base JSON path
    #[arg(long, default_value = "./data/knowledge.json")]
    knowledge: String,
    /// Directory of static assets served at the root
    #[arg(long, default_value = "./public")]
    public: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 3000)]
    port: u16,
    /// Generation model identifier
    #[arg(long, default_value = "deepseek/deepseek-chat")]
    model: String,
    /// OpenAI-compatible API base URL
    #[arg(long, default_value = "https://openrouter.ai/api/v1")]
    api_base: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let api_key = std::env::var("OPENROUTER_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("OPENROUTER_API_KEY is not set; /api/chat will fail until it is");
    }

    let source = JsonFileSource::new(&args.knowledge);
    let index = build_index(&source.load()?);
    tracing::info!(documents = index.len(), terms = index.idf.len(), "knowledge index built");

    let state = AppState {
        index: Arc::new(SharedIndex::new(index)),
        source: Arc::new(source),
        generator: Arc::new(OpenRouterClient::new(args.api_base, api_key, args.model)),
    };
    let app: Router = build_app(state, &args.public);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
