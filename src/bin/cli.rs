//! RouterOS API debug CLI
//!
//! Thin wrapper over the library for poking at a router from a shell:
//! connects, runs each given command in order, prints the reply
//! records.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use ros_api::{ApiConfig, Message, Reply, ReplyRecord, Session, Verbosity};
use tracing_subscriber::{fmt, EnvFilter};

/// RouterOS API client
#[derive(Parser, Debug)]
#[command(name = "ros-api-cli")]
#[command(about = "Run commands against a RouterOS device over the binary API")]
#[command(version)]
struct Args {
    /// Router address (hostname or IP)
    address: String,

    /// Commands to run, e.g. "/system/identity/print"
    #[arg(required = true)]
    commands: Vec<String>,

    /// API user name
    #[arg(short, long, default_value = "admin")]
    user: String,

    /// API password
    #[arg(short, long, default_value = "")]
    password: String,

    /// Wrap the connection in TLS
    #[arg(long)]
    ssl: bool,

    /// Port override (default 8728, or 8729 with --ssl)
    #[arg(long)]
    port: Option<u16>,

    /// Socket timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Print the raw API conversation
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ros_api=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let mut builder = ApiConfig::builder(&args.address)
        .user(&args.user)
        .password(&args.password)
        .use_ssl(args.ssl);
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    if let Some(secs) = args.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if args.verbose {
        builder = builder.verbosity(Verbosity::Console);
    }

    let session = match Session::connect(builder.build()) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let commands = args.commands.iter().map(|c| c.as_str().into()).collect();
    match session.talk(Message::Batch(commands)) {
        Ok(Reply::Batch(replies)) => {
            for (command, records) in args.commands.iter().zip(&replies) {
                println!("# {command}");
                print_records(records);
            }
            ExitCode::SUCCESS
        }
        Ok(Reply::Single(records)) => {
            print_records(&records);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_records(records: &[ReplyRecord]) {
    for record in records {
        let mut pairs: Vec<_> = record.iter().collect();
        pairs.sort();
        let line: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!("{}", line.join(" "));
    }
}
