//! cloudgenie-mcp: MCP server for the CloudGenie internal developer platform
//!
//! Exposes CloudGenie blueprints and resources as MCP tools, resources and
//! prompts over stdio or HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use cloudgenie_mcp::cloudgenie::{self, CloudGenieClient};
use cloudgenie_mcp::config::{self, Config, Transport};
use cloudgenie_mcp::error::ConfigError;
use cloudgenie_mcp::mcp::http;
use cloudgenie_mcp::mcp::server::McpServer;

/// MCP server for the CloudGenie internal developer platform.
///
/// Serves stdio by default; set a port (flag, config or `MCP_HTTP_PORT`) to
/// serve HTTP POST on `/mcp` instead.
#[derive(Parser, Debug)]
#[command(name = "cloudgenie-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,

    /// Serve HTTP on this port instead of stdio
    #[arg(short, long)]
    port: Option<u16>,

    /// CloudGenie API base URL
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Logs go to stderr: stdout carries protocol messages in stdio mode.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// The GPL license notice shown at startup (GPLv3 Section 5d).
fn license_notice() -> String {
    format!(
        "cloudgenie-mcp {}  Copyright (C) 2026  The CloudGenie Developers\n\
         This program comes with ABSOLUTELY NO WARRANTY.\n\
         This is free software, licensed under GPL-3.0-or-later.\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Loads the configuration and layers CLI flags on top.
fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut cfg = config::load_config(args.config.as_deref())?;

    if let Some(url) = &args.backend_url {
        cfg.backend.url.clone_from(url);
    }
    if let Some(port) = args.port {
        cfg.http.port = Some(port);
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Entry point for the cloudgenie-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if args.config.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nConfig file location: {}", default_path.display());
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    eprintln!("{}", license_notice());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %cfg.backend.url,
        "Starting cloudgenie-mcp server"
    );

    let transport = match cfg.transport() {
        Ok(transport) => transport,
        Err(e) => {
            error!(error = %e, "Invalid transport configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match CloudGenieClient::new(&cfg.backend.url, cfg.backend.timeout()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "Failed to create CloudGenie client");
            return ExitCode::FAILURE;
        }
    };

    let server = McpServer::new(cloudgenie::registries(&client));

    let result = match transport {
        Transport::Stdio => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create Tokio runtime");
            runtime.block_on(server.run())
        }
        Transport::Http(addr) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to create Tokio runtime");
            runtime.block_on(http::serve(Arc::new(server), addr))
        }
    };

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
