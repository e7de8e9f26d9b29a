//! Command line entry point: bind, serve until Ctrl+C, shut down.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, LevelFilter};

use dualhttp_rs::{AccepterCounts, HttpServer, ServerConfig, ServerError};

/// Dual-stack HTTP request intake server
#[derive(Debug, Parser)]
#[command(name = "dualhttp", version)]
struct Cli {
    /// Turn on verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Bind sockets to this port [default: 13650]
    #[arg(short, long)]
    port: Option<u16>,

    /// Run <n4> IPv4 and <n6> IPv6 accepters; 0 disables a family [default: 1,1]
    #[arg(short, long, value_name = "N4,N6")]
    accepters: Option<AccepterCounts>,

    /// Host name or address to resolve for each family [default: this machine's host name]
    #[arg(long)]
    host: Option<String>,

    /// JSON configuration file; flags given here override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)?,
            None => ServerConfig::default(),
        };

        config.verbose |= self.verbose;
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(accepters) = self.accepters {
            config.listener.accepters = accepters;
        }
        if let Some(host) = self.host {
            config.listener.host = host;
        }
        Ok(config)
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let server = HttpServer::start(config).await?;
    server.run_until_ctrl_c().await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let config = cli.into_config();
    init_logger(verbose || config.as_ref().is_ok_and(|config| config.verbose));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
