use clap::Parser;
use jsonrpc_echo_server::{
    build_app,
    config::{Config, Overrides},
    logging, AppState,
};
use tracing::info;

/// JSON-RPC 2.0 echo server over HTTP.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TCP port to listen on (overrides BIND_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Interface address to bind (overrides BIND_ADDR)
    #[arg(long)]
    bind_addr: Option<String>,

    /// Return request ids with their original JSON type instead of as strings
    /// (overrides ECHO_PRESERVE_ID_TYPE; pass `=false` to turn it off)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    preserve_id_type: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging();

    let config = Config::from_env()?.with_overrides(Overrides {
        bind_addr: cli.bind_addr,
        bind_port: cli.port,
        preserve_id_type: cli.preserve_id_type,
    })?;

    let bind_socket = config.bind_socket()?;
    let state = AppState::from_config(&config);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        preserve_id_type = config.preserve_id_type,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
