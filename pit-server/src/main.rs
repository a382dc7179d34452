//! Runs one agent behind the invocation protocol.

use std::path::PathBuf;

use clap::Parser;
use pit_server::AppState;
use pit_server::config::{AgentKind, Overrides, load_config};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pit-server", version)]
#[command(about = "Serve a game-playing agent to a tournament orchestrator")]
struct Args {
    /// TOML config file (missing file means defaults)
    #[arg(long, default_value = "pit.toml")]
    config: PathBuf,

    /// Address to bind the server to
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Which reference bot to run
    #[arg(long, value_enum)]
    agent: Option<AgentKind>,

    /// Seed for reproducible play
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a UCI engine binary (engine agent only)
    #[arg(long)]
    engine_path: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pit_server::logging::init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    cfg.apply(Overrides {
        bind: args.bind,
        port: args.port,
        agent: args.agent,
        seed: args.seed,
        engine_path: args.engine_path,
    });
    cfg.validate()?;

    let state = AppState::new(cfg.build_agent());
    let addr = cfg.listen_addr()?;
    let agent = state.info();
    info!(
        name = %agent.name,
        game = %agent.game_type,
        kind = ?cfg.agent.kind,
        "starting agent server"
    );
    info!("endpoints: GET /health, GET /info, POST /move, POST /game-start, POST /game-end");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    pit_server::serve(listener, state, shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(err = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(err = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, no longer accepting connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let args = Args::parse_from(["pit-server"]);
        assert_eq!(args.config, PathBuf::from("pit.toml"));
        assert!(args.port.is_none());
        assert!(args.agent.is_none());
    }

    #[test]
    fn parse_agent_and_port() {
        let args = Args::parse_from(["pit-server", "--agent", "first-legal", "--port", "9001"]);
        assert_eq!(args.agent, Some(AgentKind::FirstLegal));
        assert_eq!(args.port, Some(9001));
    }
}
