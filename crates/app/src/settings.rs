//! Handles settings for the application.
//!
//! Sources are layered, later ones win: the optional `settings` file (TOML),
//! `ARBOR_*` environment variables (`__` separates sections, e.g.
//! `ARBOR_SERVER__PORT=4000`), then command-line flags.
use clap::Parser;
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use engine::SumStrategy;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "settings";
const ENV_PREFIX: &str = "ARBOR";

/// `ARBOR_SECTION__KEY` variables.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    InvalidStrategy(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Store {
    pub strategy: SumStrategy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub store: Store,
}

/// In-memory store of parent-linked transactions served over HTTP.
#[derive(Debug, Parser)]
#[command(name = "arbor", version)]
struct Args {
    /// Settings file path (TOML), defaults to `settings`.
    #[arg(long)]
    config: Option<String>,
    /// Override the address to bind.
    #[arg(long)]
    bind: Option<String>,
    /// Override the port to listen on.
    #[arg(long)]
    port: Option<u16>,
    /// Override how sums are kept: `running_total` or `descendant_edges`.
    #[arg(long)]
    strategy: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, SettingsError> {
        let args = Args::parse();

        let builder = Config::builder()
            .add_source(
                File::with_name(args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH))
                    .required(args.config.is_some()),
            )
            .add_source(environment());

        Self::from_builder(builder)?.with_args(args)
    }

    fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    fn with_args(mut self, args: Args) -> Result<Self, SettingsError> {
        if let Some(bind) = args.bind {
            self.server.bind = bind;
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(strategy) = args.strategy {
            self.store.strategy =
                SumStrategy::try_from(strategy.as_str()).map_err(SettingsError::InvalidStrategy)?;
        }
        if let Some(level) = args.level {
            self.app.level = level;
        }
        Ok(self)
    }
}
