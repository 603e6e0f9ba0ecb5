//! CLI command handlers

use anyhow::{Context, Result};
use std::path::PathBuf;
use vnyanctl_core::dispatcher::{DispatchOutcome, Dispatcher};
use vnyanctl_core::gate::jsonl::JsonlRedemptionSource;
use vnyanctl_core::gate::{run_poll_gate, run_push_gate, run_startup};
use vnyanctl_core::models::{Configuration, LogLevel, PayloadFormat, ScriptManifest};
use vnyanctl_core::services::init_logging;
use vnyanctl_core::twitch::HelixRewardsClient;

/// Flag overrides applied on top of the configuration file
#[derive(Default)]
pub struct Overrides {
    pub message: Option<String>,
    pub port: Option<u16>,
    pub reward_id: Option<String>,
    pub raw: bool,
    pub log_level: Option<String>,
}

/// Load the configuration file (explicit path or XDG default) and apply
/// CLI flag overrides, then validate.
pub fn resolve_config(config_file: Option<PathBuf>, overrides: Overrides) -> Result<Configuration> {
    let path = match config_file {
        Some(path) => path,
        None => Configuration::default_config_path()
            .map_err(|e| anyhow::anyhow!("Failed to resolve config path: {}", e))?,
    };

    let mut config = Configuration::load_from_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load config from {:?}: {}", path, e))?;

    if let Some(message) = overrides.message {
        config.message = message;
    }
    if let Some(port) = overrides.port {
        config.ws_port = port;
    }
    if let Some(reward_id) = overrides.reward_id {
        config.reward_id = reward_id;
    }
    if overrides.raw {
        config.payload = PayloadFormat::Raw;
    }
    if let Some(level) = overrides.log_level {
        config.log_level = parse_log_level(&level)?;
    }

    config
        .validate()
        .map_err(|errors| anyhow::anyhow!("Invalid configuration: {}", errors.join("; ")))?;

    Ok(config)
}

fn parse_log_level(level: &str) -> Result<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" => Ok(LogLevel::Error),
        "warn" => Ok(LogLevel::Warn),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "trace" => Ok(LogLevel::Trace),
        other => Err(anyhow::anyhow!(
            "Unknown log level '{}', expected error|warn|info|debug|trace",
            other
        )),
    }
}

fn setup(config: &Configuration) {
    if let Err(e) = init_logging(config.log_level.clone()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
}

/// Handle the 'send' command: dispatch once and exit
pub async fn handle_send(
    message: Option<String>,
    port: Option<u16>,
    raw: bool,
    config_file: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<()> {
    let config = resolve_config(
        config_file,
        Overrides {
            message,
            port,
            raw,
            log_level,
            ..Overrides::default()
        },
    )?;
    setup(&config);

    let mut dispatcher = Dispatcher::new(&config);
    let outcome = run_startup(&mut dispatcher).await;
    report_outcome(outcome);

    dispatcher.shutdown().await;
    Ok(())
}

/// Handle the 'listen' command: push-gate over a JSONL event stream
pub async fn handle_listen(
    reward_id: Option<String>,
    message: Option<String>,
    port: Option<u16>,
    raw: bool,
    input: Option<PathBuf>,
    config_file: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<()> {
    let config = resolve_config(
        config_file,
        Overrides {
            message,
            port,
            reward_id,
            raw,
            log_level,
        },
    )?;
    setup(&config);

    let mut dispatcher = Dispatcher::new(&config);

    // Empty reward ID: no gate, one dispatch at startup
    if !config.has_reward_gate() {
        let outcome = run_startup(&mut dispatcher).await;
        report_outcome(outcome);
        dispatcher.shutdown().await;
        return Ok(());
    }

    let attempts = match input {
        Some(path) => {
            let mut source = JsonlRedemptionSource::open(&path).await?;
            run_push_gate(&mut dispatcher, &mut source, &config.reward_id).await?
        }
        None => {
            let mut source = JsonlRedemptionSource::stdin();
            run_push_gate(&mut dispatcher, &mut source, &config.reward_id).await?
        }
    };

    tracing::info!(attempts = attempts, "Event stream ended");
    dispatcher.shutdown().await;
    Ok(())
}

/// Handle the 'poll' command: poll-gate over the Helix rewards listing
#[allow(clippy::too_many_arguments)]
pub async fn handle_poll(
    reward_id: Option<String>,
    message: Option<String>,
    port: Option<u16>,
    raw: bool,
    broadcaster_id: String,
    client_id: String,
    token: String,
    api_url: String,
    config_file: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<()> {
    let config = resolve_config(
        config_file,
        Overrides {
            message,
            port,
            reward_id,
            raw,
            log_level,
        },
    )?;
    setup(&config);

    if !config.has_reward_gate() {
        anyhow::bail!("The poll command requires a reward ID (--reward-id or config file)");
    }

    let api = HelixRewardsClient::with_base_url(api_url, client_id, token, broadcaster_id);
    let mut dispatcher = Dispatcher::new(&config);

    let attempts = run_poll_gate(&mut dispatcher, &api, &config.reward_id)
        .await
        .context("Failed to list channel rewards")?;

    if attempts == 0 {
        tracing::info!(reward_id = %config.reward_id, "Configured reward not found on channel");
    }

    dispatcher.shutdown().await;
    Ok(())
}

/// Handle the 'manifest' command
pub fn handle_manifest() -> Result<()> {
    let manifest = ScriptManifest::current();
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

/// Handle 'config --init': write a default configuration file
pub async fn handle_config_init(config_file: Option<PathBuf>) -> Result<()> {
    let path = match config_file {
        Some(path) => path,
        None => Configuration::default_config_path()
            .map_err(|e| anyhow::anyhow!("Failed to resolve config path: {}", e))?,
    };

    let config = Configuration::default();
    config
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write config to {:?}: {}", path, e))?;

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn report_outcome(outcome: DispatchOutcome) {
    match outcome {
        DispatchOutcome::Sent | DispatchOutcome::SentAndClosed => {
            tracing::info!("Command dispatched");
        }
        DispatchOutcome::Skipped => {
            tracing::debug!("Dispatch skipped, connection already open");
        }
        // Failure details were already logged by the dispatcher
        DispatchOutcome::Failed => {}
    }
}
