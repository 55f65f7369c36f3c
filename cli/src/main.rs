//! CLI entrypoint for MindCare
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use mindcare_application::{ConversationLogger, RelayMessageUseCase};
use mindcare_domain::{ConfigIssue, DomainError, RelayMode, Severity};
use mindcare_infrastructure::{
    ConfigLoader, FileConfig, GeminiGateway, InMemorySessionStore, JsonlConversationLogger,
};
use mindcare_presentation::{AppState, Cli, router, serve};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => error!("{}", issue.message),
            Severity::Warning => warn!("{}", issue.message),
        }
    }
    if ConfigIssue::has_errors(&issues) {
        bail!("invalid configuration, refusing to start");
    }

    let Some(api_key) = config.gemini.resolve_api_key() else {
        return Err(DomainError::MissingCredential(config.gemini.api_key_env.clone()).into());
    };
    let mode = config.relay.parse_mode().0;
    let policy = config.sessions.to_policy().0;

    info!("Starting MindCare ({} mode)", mode);

    // === Dependency Injection ===
    let gateway = Arc::new(
        GeminiGateway::new(config.gemini_config(api_key))
            .context("failed to create Gemini client")?,
    );
    let sessions = Arc::new(InMemorySessionStore::with_policy(policy));

    let mut relay = RelayMessageUseCase::new(gateway, sessions.clone())
        .with_mode(mode)
        .with_behavior(config.behavior());

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                relay = relay.with_conversation_logger(logger);
            }
            None => warn!("Conversation log disabled"),
        }
    }

    let shutdown = CancellationToken::new();

    let sweeper = (mode == RelayMode::Conversational && policy.idle_ttl.is_some()).then(|| {
        sessions
            .clone()
            .spawn_sweeper(config.sessions.sweep_interval(), shutdown.clone())
    });

    let state = Arc::new(AppState::new(relay).with_issue_cookies(config.sessions.issue_cookies));

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down");
        }
        signal.cancel();
    });

    let result = serve(&config.server.address(), router(state), shutdown.clone()).await;
    shutdown.cancel();

    if let Some(sweeper) = sweeper {
        let _ = sweeper.await;
    }

    result.context("server failed")
}

/// Apply `--bind`, `--port` and `--mode` on top of the merged configuration.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(bind) = &cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(mode) = cli.mode {
        config.relay.mode = RelayMode::from(mode).as_str().to_string();
    }
}

/// Console logging by verbosity (`RUST_LOG` wins), plus optional daily files.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer().with_target(false);

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "mindcare.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();

    guard
}
