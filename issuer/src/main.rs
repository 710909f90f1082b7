//! LeKey offline license issuer
//!
//! Run by the vendor on a trusted machine to turn a customer's machine
//! identifier into a license key. Never shipped to customers.
//!
//! Usage:
//!   LEKEY_ISSUANCE_SECRET=... LEKEY_VERIFICATION_SALT=... generate-license LE-XXXXXXXX
//!
//! The issuance secret is read from the environment only, never from a flag,
//! so it stays out of shell history and process listings.
//!
//! Prints the machine identifier and the hyphenated key on stdout. Logs go
//! to stderr.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use lekey_issuer::{IssuerConfig, SALT_ENV_VAR, SECRET_ENV_VAR};
use lekey_license::MachineId;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "generate-license")]
#[command(about = "Generate an offline LeKey license key for a machine identifier")]
#[command(after_help = "The issuance secret is read from LEKEY_ISSUANCE_SECRET.")]
struct Args {
    /// Machine identifier reported by the customer (starts with LE-)
    machine_identifier: Option<String>,

    /// Verification salt embedded in the shipped application
    #[arg(long, env = SALT_ENV_VAR, hide_env_values = true)]
    salt: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let Some(machine_identifier) = args.machine_identifier.as_deref() else {
        // Bare invocation is a request for help, not an error.
        if let Err(e) = Args::command().print_help() {
            error!("could not print usage: {e}");
            return ExitCode::FAILURE;
        }
        println!();
        return ExitCode::SUCCESS;
    };

    let secret = std::env::var(SECRET_ENV_VAR).ok();
    match run(machine_identifier, secret, args.salt) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(machine_identifier: &str, secret: Option<String>, salt: Option<String>) -> Result<String> {
    let machine = MachineId::parse(machine_identifier).context("could not issue license")?;
    let config = IssuerConfig::resolve(secret, salt).context("issuer is not configured")?;

    info!("Issuing license for {machine}");
    let issued = config
        .issuer()
        .generate_license_key(machine.as_str())
        .context("could not issue license")?;

    Ok(issued.to_string())
}
