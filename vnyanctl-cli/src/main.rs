mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::handlers;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vnyanctl")]
#[command(version)]
#[command(about = "Send commands to VNyan over WebSocket, gated on Twitch channel-point rewards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send the configured command once and exit (startup trigger)
    ///
    /// Examples:
    ///   vnyanctl send MMD_Stay
    ///   vnyanctl send MMD_Stay --port 8001
    ///   vnyanctl send MMD_Stay --raw
    Send {
        /// VNyan command to send (e.g. MMD_Stay); overrides the config file
        message: Option<String>,

        /// VNyan WebSocket port
        #[arg(short, long)]
        port: Option<u16>,

        /// Send the bare string and close right after (instead of the
        /// JSON {"command":...,"data":{}} frame with the connection kept open)
        #[arg(long)]
        raw: bool,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Logging verbosity (error, warn, info, debug, trace)
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Watch redemption events (JSON lines on stdin or a file) and send on match
    ///
    /// Each line is one event, e.g. {"reward_id":"abc-123","user_name":"viewer"}.
    /// With an empty reward ID this behaves like `send`: one dispatch at startup.
    Listen {
        /// Twitch channel reward ID that triggers the send
        #[arg(short, long)]
        reward_id: Option<String>,

        /// VNyan command to send
        #[arg(short, long)]
        message: Option<String>,

        /// VNyan WebSocket port
        #[arg(short, long)]
        port: Option<u16>,

        /// Send the bare string and close after each send
        #[arg(long)]
        raw: bool,

        /// Read events from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Logging verbosity (error, warn, info, debug, trace)
        #[arg(long)]
        log_level: Option<String>,
    },

    /// List manageable channel rewards via Twitch Helix and send per match
    ///
    /// Note: this dispatches whenever the configured reward exists on the
    /// channel, independent of any redemption.
    Poll {
        /// Twitch channel reward ID that triggers the send
        #[arg(short, long)]
        reward_id: Option<String>,

        /// VNyan command to send
        #[arg(short, long)]
        message: Option<String>,

        /// VNyan WebSocket port
        #[arg(short, long)]
        port: Option<u16>,

        /// Send the bare string and close after each send
        #[arg(long)]
        raw: bool,

        /// Twitch broadcaster (channel) ID
        #[arg(long)]
        broadcaster_id: String,

        /// Twitch application client ID
        #[arg(long)]
        client_id: String,

        /// OAuth token with the channel:manage:redemptions scope
        #[arg(long)]
        token: String,

        /// Helix API base URL
        #[arg(long, default_value = "https://api.twitch.tv/helix")]
        api_url: String,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,

        /// Logging verbosity (error, warn, info, debug, trace)
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Print the script manifest as JSON
    Manifest,

    /// Configure vnyanctl settings
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Path to configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            message,
            port,
            raw,
            config_file,
            log_level,
        } => {
            handlers::handle_send(message, port, raw, config_file, log_level).await?;
        }
        Commands::Listen {
            reward_id,
            message,
            port,
            raw,
            input,
            config_file,
            log_level,
        } => {
            handlers::handle_listen(reward_id, message, port, raw, input, config_file, log_level)
                .await?;
        }
        Commands::Poll {
            reward_id,
            message,
            port,
            raw,
            broadcaster_id,
            client_id,
            token,
            api_url,
            config_file,
            log_level,
        } => {
            handlers::handle_poll(
                reward_id,
                message,
                port,
                raw,
                broadcaster_id,
                client_id,
                token,
                api_url,
                config_file,
                log_level,
            )
            .await?;
        }
        Commands::Manifest => {
            handlers::handle_manifest()?;
        }
        Commands::Config { init, config_file } => {
            if init {
                handlers::handle_config_init(config_file).await?;
            } else {
                println!("Config command requires --init flag");
                println!("Usage: vnyanctl config --init [--config-file PATH]");
            }
        }
    }

    Ok(())
}
