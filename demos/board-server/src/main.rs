//! Boardwalk game server.
//!
//! Run with:
//! ```not_rust
//! cargo run -p board-server
//! cargo run -p board-server -- --host 0.0.0.0 --port 3000 --log-level debug
//! ```

use boardwalk::prelude::*;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "board-server")]
#[command(about = "WebSocket server for Boardwalk game rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Default log level when RUST_LOG is unset
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Drop connections silent for this many seconds (0 never drops them)
    #[arg(long, default_value = "60")]
    idle_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    boardwalk::logging::init_tracing(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        idle_timeout_secs: args.idle_timeout_secs,
        ..ServerConfig::default()
    };

    let server = match BoardwalkServer::builder().config(config).build().await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    };
    if let Ok(addr) = server.local_addr() {
        tracing::info!("Listening on ws://{addr}");
    }

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
