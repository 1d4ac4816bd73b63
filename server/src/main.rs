use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use tokio::net::TcpListener;
use vsm_core::{EngineConfig, IdfVariant};

#[derive(Parser)]
struct Args {
    /// Collection file (.I/.T/.A/.B/.W records)
    #[arg(long, default_value = "cran.all.1400")]
    collection: String,
    /// Query file (.I/.W records)
    #[arg(long)]
    queries: Option<String>,
    /// JSON engine configuration file
    #[arg(long)]
    config: Option<String>,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if args.smoothed_idf {
        config.idf = IdfVariant::Smoothed;
    }
    let app: Router = build_app(&args.collection, args.queries.as_deref(), config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
