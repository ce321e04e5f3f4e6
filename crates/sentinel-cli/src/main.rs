// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]

mod format;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sentinel_decode::{DecodeRequest, Decoder, DecoderConfig, FourByteClient};
use sentinel_profile::{load_file, ProfileLoadOutcome, TrustProfileDocument};
use sentinel_types::Operation;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for runtime errors.
const EXIT_RUNTIME_ERROR: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "sentinel", version, about = "Offline calldata decoder and trust-policy engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode calldata and print the analysis.
    Decode {
        /// Hex calldata, `0x` prefix optional.
        calldata: String,

        /// Target contract address.
        #[arg(long)]
        to: Option<String>,

        /// Call operation.
        #[arg(long, value_enum, default_value_t = OperationArg::Call)]
        operation: OperationArg,

        /// Path to a trust profile JSON file.
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Root directory of the local ABI registry.
        #[arg(long)]
        abi_root: Option<PathBuf>,

        /// Chain directory name for ABI resolution.
        #[arg(long, default_value = "ethereum")]
        chain: String,

        /// Disable the external signature lookup.
        #[arg(long)]
        offline: bool,

        /// Print the raw analysis JSON instead of the human rendering.
        #[arg(long)]
        json: bool,
    },

    /// Trust profile utilities.
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommands {
    /// Validate a trust profile file, listing every violation.
    Validate {
        /// Path to the profile JSON file.
        file: PathBuf,
    },

    /// Print the JSON schema of the trust profile document.
    Schema,
}

/// Operation argument for the `decode` subcommand.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OperationArg {
    Call,
    Delegatecall,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Call => Operation::Call,
            OperationArg::Delegatecall => Operation::DelegateCall,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Decode {
            calldata,
            to,
            operation,
            profile,
            abi_root,
            chain,
            offline,
            json,
        } => {
            let to: Option<Address> = match to {
                Some(raw) => Some(
                    raw.parse()
                        .with_context(|| format!("`{raw}` is not a valid address"))?,
                ),
                None => None,
            };

            let (loaded_profile, profile_error) = match profile {
                Some(path) => match load_file(&path) {
                    ProfileLoadOutcome::Loaded(p) => (Some(*p), None),
                    outcome => {
                        eprintln!(
                            "warning: continuing without profile: {}",
                            outcome.error_summary().unwrap_or_default()
                        );
                        (None, outcome.error_summary())
                    }
                },
                None => (None, None),
            };

            let decoder = Decoder::new(DecoderConfig {
                chain: Some(chain),
                abi_root,
                fourbyte: if offline {
                    None
                } else {
                    Some(FourByteClient::public())
                },
            });

            let request = DecodeRequest {
                calldata: &calldata,
                to: to.as_ref(),
                operation: operation.into(),
                profile: loaded_profile.as_ref(),
                profile_error: profile_error.as_deref(),
            };
            let analysis = decoder
                .decode(request)
                .await
                .context("invalid calldata")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!("{}", format::render(&analysis));
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Profile { command } => match command {
            ProfileCommands::Validate { file } => match load_file(&file) {
                ProfileLoadOutcome::Loaded(profile) => {
                    println!(
                        "profile ok: {} trusted contract(s), {} asset(s), {} delegatecall target(s)",
                        profile.trusted_contracts.len(),
                        profile.trusted_assets.len(),
                        profile.trusted_delegate_calls.len()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                ProfileLoadOutcome::Unreadable { error } => {
                    eprintln!("{error}");
                    Ok(ExitCode::from(EXIT_RUNTIME_ERROR))
                }
                ProfileLoadOutcome::Invalid { errors } => {
                    eprintln!("profile failed validation:");
                    for e in errors {
                        eprintln!("  - {e}");
                    }
                    Ok(ExitCode::from(EXIT_RUNTIME_ERROR))
                }
            },
            ProfileCommands::Schema => {
                let schema = schemars::schema_for!(TrustProfileDocument);
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}
