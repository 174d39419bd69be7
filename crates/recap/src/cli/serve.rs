//! The `recap serve` command: run the captcha gateway.

use crate::server::{self, AppState};
use anyhow::Context;
use clap::Args;
use recap_core::{Config, CredentialPool, Dispatcher, RecognitionClient};
use std::net::SocketAddr;
use std::sync::Arc;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the configured bind address
    #[arg(long)]
    pub host: Option<String>,
}

/// Execute the serve command.
///
/// An empty or missing credential pool aborts here, before the listener is
/// bound: a misconfigured gateway must not serve traffic.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let pool = Arc::new(
        CredentialPool::from_env().context("cannot start without API credentials")?,
    );
    tracing::info!(credentials = pool.len(), "loaded API credential pool");

    let client = RecognitionClient::new(&config.recognition);
    let dispatcher = Dispatcher::new(client, pool, &config.dispatch);
    let state = AppState {
        solver: Arc::new(dispatcher),
    };

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    server::serve(addr, state).await
}
