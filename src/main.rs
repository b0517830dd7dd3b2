//! certchain CLI.
//!
//! Thin shell around [`certchain::create_chain`]: parses flags, fills in
//! defaults from a single per-invocation time base, and maps the result to
//! the process exit status. All chain logic lives in the library.

use anyhow::{Context, Result};
use certchain::{create_chain, CertificateSpec, ChainConfig, ChainPosition};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "certchain")]
#[command(
    about = "Create a full certificate chain for debug purposes (root CA, middle CA, server leaf, client leaf)",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a certificate chain
    CreateChain(CreateChainArgs),
}

#[derive(Args)]
struct CreateChainArgs {
    /// Output directory
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Bit size of private key, one of 1024, 2048, 4096 for RSA
    #[arg(long, default_value_t = 2048)]
    bits: u32,

    #[command(flatten)]
    rootca: RootCaArgs,

    #[command(flatten)]
    middle: MiddleArgs,

    #[command(flatten)]
    server: ServerArgs,

    #[command(flatten)]
    client: ClientArgs,
}

/// Raw per-position flag values before defaults are applied.
struct PositionArgs {
    common_name: String,
    serial: Option<u64>,
    not_before: Option<DateTime<Utc>>,
    not_after: Option<DateTime<Utc>>,
    dns_names: Vec<String>,
    ip_addresses: Vec<String>,
}

macro_rules! position_args {
    ($name:ident, $prefix:literal, $display:literal) => {
        #[derive(Args)]
        struct $name {
            /// Common name
            #[arg(
                id = concat!($prefix, "-common-name"),
                long = concat!($prefix, "-common-name"),
                default_value = concat!("Certchain - ", $display)
            )]
            common_name: String,

            /// Serial number (default: invocation time as Unix seconds)
            #[arg(id = concat!($prefix, "-serial"), long = concat!($prefix, "-serial"))]
            serial: Option<u64>,

            /// Not-before timestamp, "YYYY-MM-DD HH:MM:SS" in UTC (default: now)
            #[arg(
                id = concat!($prefix, "-not-before"),
                long = concat!($prefix, "-not-before"),
                value_parser = parse_timestamp
            )]
            not_before: Option<DateTime<Utc>>,

            /// Not-after timestamp, "YYYY-MM-DD HH:MM:SS" in UTC (default: one year later)
            #[arg(
                id = concat!($prefix, "-not-after"),
                long = concat!($prefix, "-not-after"),
                value_parser = parse_timestamp
            )]
            not_after: Option<DateTime<Utc>>,

            /// DNS name for the subject alternative names (repeatable)
            #[arg(id = concat!($prefix, "-dns-name"), long = concat!($prefix, "-dns-name"))]
            dns_names: Vec<String>,

            /// IP address for the subject alternative names (repeatable)
            #[arg(id = concat!($prefix, "-ip-address"), long = concat!($prefix, "-ip-address"))]
            ip_addresses: Vec<String>,
        }

        impl From<$name> for PositionArgs {
            fn from(args: $name) -> Self {
                PositionArgs {
                    common_name: args.common_name,
                    serial: args.serial,
                    not_before: args.not_before,
                    not_after: args.not_after,
                    dns_names: args.dns_names,
                    ip_addresses: args.ip_addresses,
                }
            }
        }
    };
}

position_args!(RootCaArgs, "rootca", "Root Certificate Authority");
position_args!(MiddleArgs, "middle", "Middle Certificate Authority");
position_args!(ServerArgs, "server", "Server Certificate");
position_args!(ClientArgs, "client", "Client Certificate");

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| format!("invalid timestamp {value:?}: {e}"))
}

/// Apply the shared defaults: one time base per invocation keeps the
/// defaulted serials and validity windows consistent across positions.
fn resolve_spec(args: PositionArgs, base: DateTime<Utc>) -> CertificateSpec {
    CertificateSpec {
        common_name: args.common_name,
        serial: args.serial.unwrap_or(base.timestamp() as u64),
        not_before: args.not_before.unwrap_or(base),
        not_after: args.not_after.unwrap_or(base + Duration::days(365)),
        dns_names: args.dns_names,
        ip_addresses: args.ip_addresses,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::CreateChain(args) => create(args),
    }
}

fn create(args: CreateChainArgs) -> Result<()> {
    let base = Utc::now();

    let config = ChainConfig {
        directory: args.dir,
        key_bits: args.bits,
        rootca: resolve_spec(args.rootca.into(), base),
        middle: resolve_spec(args.middle.into(), base),
        server: resolve_spec(args.server.into(), base),
        client: resolve_spec(args.client.into(), base),
    };

    create_chain(&config).context("Failed to create certificate chain")?;

    for position in ChainPosition::ALL {
        println!("✓ {0}.key.pem / {0}.crt.pem", position.file_stem());
    }
    println!("✓ server.full-crt.pem / client.full-crt.pem");
    println!(
        "✓ certificate chain written to {}",
        config.directory.display()
    );

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("exited with error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let parsed = parse_timestamp("2024-06-01 12:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap());
        assert!(parse_timestamp("June 1st").is_err());
    }

    #[test]
    fn test_defaults_share_the_invocation_base() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let args = PositionArgs {
            common_name: "defaults".to_string(),
            serial: None,
            not_before: None,
            not_after: None,
            dns_names: Vec::new(),
            ip_addresses: Vec::new(),
        };

        let spec = resolve_spec(args, base);
        assert_eq!(spec.serial, base.timestamp() as u64);
        assert_eq!(spec.not_before, base);
        assert_eq!(spec.not_after, base + Duration::days(365));
    }
}
