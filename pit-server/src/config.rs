//! Server configuration: an optional TOML file plus command-line overrides.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use pit_agent::{Agent, AgentError, GameType};
use pit_agent::bots::{ChessAgent, engine_bot, first_move_bot, simple_bot};
use pit_agent::io::engine::EngineSettings;
use pit_agent::policy::MovePolicy;
use serde::{Deserialize, Serialize};

/// Server configuration (TOML).
///
/// Every table is optional; missing fields take the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ListenConfig,
    pub agent: AgentConfig,
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListenConfig {
    /// Address to bind; all interfaces by default.
    pub bind: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Which reference bot to run and how to present it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentConfig {
    pub kind: AgentKind,
    /// Game the orchestrator will send (`chess`, `trivia`, `debate`); checked
    /// against what the bot plays.
    pub game: Option<String>,
    /// Overrides the bot's built-in display name.
    pub name: Option<String>,
    pub description: Option<String>,
    /// Fixed RNG seed for reproducible tie-breaks and commentary.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    /// Always the first legal move.
    FirstLegal,
    /// Captures, checks, then central squares.
    #[default]
    Heuristic,
    /// External UCI engine with random fallback.
    Engine,
}

impl AgentKind {
    /// Every reference bot plays chess.
    pub fn game_type(self) -> GameType {
        match self {
            AgentKind::FirstLegal | AgentKind::Heuristic | AgentKind::Engine => GameType::Chess,
        }
    }
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub agent: Option<AgentKind>,
    pub seed: Option<u64>,
    pub engine_path: Option<String>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("server.port must be > 0"));
        }
        self.listen_addr()?;
        if let Some(name) = &self.agent.name
            && name.trim().is_empty()
        {
            return Err(anyhow!("agent.name must not be blank"));
        }
        if let Some(game) = &self.agent.game {
            let game: GameType = game.parse().context("agent.game")?;
            let plays = self.agent.kind.game_type();
            if game != plays {
                return Err(AgentError::Unsupported(format!(
                    "{:?} bot plays {plays}, not {game}",
                    self.agent.kind
                )))
                .context("agent.game");
            }
        }
        if self.engine.command.is_empty() || self.engine.command[0].trim().is_empty() {
            return Err(anyhow!("engine.command must be a non-empty array"));
        }
        if self.engine.depth == 0 {
            return Err(anyhow!("engine.depth must be > 0"));
        }
        if self.engine.timeout_ms == 0 {
            return Err(anyhow!("engine.timeout_ms must be > 0"));
        }
        if self.engine.output_limit_bytes == 0 {
            return Err(anyhow!("engine.output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(kind) = overrides.agent {
            self.agent.kind = kind;
        }
        if let Some(seed) = overrides.seed {
            self.agent.seed = Some(seed);
        }
        if let Some(path) = overrides.engine_path {
            self.engine.command = vec![path];
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .bind
            .parse()
            .with_context(|| format!("server.bind is not an IP address: {}", self.server.bind))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Construct the configured bot.
    pub fn build_agent(&self) -> Box<dyn Agent> {
        let seed = self.agent.seed;
        match self.agent.kind {
            AgentKind::FirstLegal => self.present(first_move_bot(seed)),
            AgentKind::Heuristic => self.present(simple_bot(seed)),
            AgentKind::Engine => self.present(engine_bot(self.engine.clone(), seed)),
        }
    }

    fn present<P: MovePolicy + 'static>(&self, mut bot: ChessAgent<P>) -> Box<dyn Agent> {
        if let Some(name) = &self.agent.name {
            bot = bot.with_name(name.clone());
        }
        if let Some(description) = &self.agent.description {
            bot = bot.with_description(description.clone());
        }
        Box::new(bot)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ServerConfig::default()`.
pub fn load_config(path: &Path) -> Result<ServerConfig> {
    if !path.exists() {
        return Ok(ServerConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ServerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
