//! CLI command definitions

use clap::{Parser, ValueEnum};
use mindcare_domain::RelayMode;
use std::path::PathBuf;

/// Relay mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Replay the session history on every call
    Conversational,
    /// Wrap each message in a fixed template, no memory
    Stateless,
}

impl From<ModeArg> for RelayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Conversational => RelayMode::Conversational,
            ModeArg::Stateless => RelayMode::Stateless,
        }
    }
}

/// CLI arguments for mindcare
#[derive(Parser, Debug)]
#[command(name = "mindcare")]
#[command(author, version, about = "MindCare - supportive chat relay to the Gemini API")]
#[command(long_about = r#"
MindCare serves a single-page chat widget and relays each message to the
Gemini API, answering with the model's reply or a fixed fallback text.

The API key is read from the environment variable named by gemini.api_key_env
(GEMINI_API_KEY by default).

Configuration files are loaded from (in priority order):
1. MINDCARE_* environment variables (e.g. MINDCARE_GEMINI__MODEL)
2. --config <path>     Explicit config file
3. ./mindcare.toml     Project-level config
4. ~/.config/mindcare/config.toml   Global config

Example:
  mindcare
  mindcare --port 8080 --mode stateless
  mindcare --config /etc/mindcare.toml -vv
"#)]
pub struct Cli {
    /// Address to bind (overrides server.bind)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Relay mode (overrides relay.mode)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to daily rolling files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
