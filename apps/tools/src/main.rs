use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use device_client::{DeviceEndpoint, UfoClient};
use shared::{
    domain::{Color, Command, Ring},
    protocol::KeptnEnvelope,
};
use tracing_subscriber::EnvFilter;
use translator::{RingPolicy, Translator};

#[derive(Parser, Debug)]
#[command(name = "ufoctl", about = "Drive the UFO by hand or replay captured Keptn events")]
struct Cli {
    #[arg(long, env = "UFO_ADDRESS")]
    ufo_address: String,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Reset both rings.
    Init,
    /// Light one ring.
    Set {
        ring: Ring,
        color: Color,
        #[arg(long)]
        morph: bool,
        #[arg(long)]
        whirl: bool,
    },
    /// Translate events from a JSON file (one envelope or an array) and send them in order.
    Replay {
        path: PathBuf,
        #[arg(long)]
        dry_run: bool,
        /// Use the historical hard-coded rings instead of the stage.
        #[arg(long)]
        legacy_rings: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let endpoint = DeviceEndpoint::parse(&cli.ufo_address)?;
    let client = UfoClient::new(endpoint.clone(), Duration::from_secs(cli.timeout_secs))?;

    match cli.action {
        Action::Init => {
            let status = client.init().await?;
            println!("{} -> {status}", endpoint.init_url());
        }
        Action::Set {
            ring,
            color,
            morph,
            whirl,
        } => {
            let command = Command::from_flags(ring, color, morph, whirl)?;
            let status = client.send(&command).await?;
            println!("{} -> {status}", endpoint.command_url(&command));
        }
        Action::Replay {
            path,
            dry_run,
            legacy_rings,
        } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let policy = if legacy_rings {
                RingPolicy::Legacy
            } else {
                RingPolicy::StageDerived
            };
            for step in plan(&raw, Translator::new(policy), &endpoint)? {
                match step {
                    ReplayStep::Send { command, url } if !dry_run => {
                        let status = client.send(&command).await?;
                        println!("{url} -> {status}");
                    }
                    ReplayStep::Send { url, .. } => println!("{url}"),
                    ReplayStep::Skip { kind } => println!("skipped {kind}"),
                    ReplayStep::Malformed { index, reason } => {
                        eprintln!("entry {index}: {reason}")
                    }
                }
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum ReplayStep {
    Send { command: Command, url: String },
    Skip { kind: String },
    Malformed { index: usize, reason: String },
}

fn plan(raw: &str, translator: Translator, endpoint: &DeviceEndpoint) -> Result<Vec<ReplayStep>> {
    let value: serde_json::Value = serde_json::from_str(raw).context("replay file is not JSON")?;
    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        single => vec![single],
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            match serde_json::from_value::<KeptnEnvelope>(entry) {
                Ok(envelope) => match translator.translate(&envelope.to_event()) {
                    Some(command) => ReplayStep::Send {
                        url: endpoint.command_url(&command),
                        command,
                    },
                    None => ReplayStep::Skip {
                        kind: envelope.kind,
                    },
                },
                Err(err) => ReplayStep::Malformed {
                    index,
                    reason: err.to_string(),
                },
            }
        })
        .collect())
}
