use std::path::PathBuf;

use clap::Parser;
use setlang_lsp::Backend;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

/// Language server for the set/setr scripting DSL.
#[derive(Debug, Parser)]
#[command(name = "setlang_lsp", version, about)]
struct Cli {
    /// Communicate over stdin/stdout (the only transport; accepted for
    /// editors that always pass it).
    #[arg(long)]
    stdio: bool,

    /// Log filter used when `RUST_LOG` is not set, e.g. `info` or
    /// `setlang_lsp=debug`.  Logs go to stderr.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Read configuration from this TOML file instead of discovering
    /// `.setlang.toml` in the workspace.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the LSP stream, so logs must stay on stderr.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), stdio = cli.stdio, "starting");

    let config_path = cli.config;
    let (service, socket) =
        LspService::new(move |client| Backend::new(client).with_config_path(config_path));
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
}
