//! KPN governance API entry point
//!
//! Run with:
//! ```bash
//! cargo run -p kpn-api
//! ```
//!
//! Mint a bearer token for a member (or whoever holds the President seat):
//! ```bash
//! cargo run -p kpn-api -- issue-token <member-id|president>
//! ```
//!
//! Configuration is read from the environment (and `.env` when present).

use kpn_api::TokenSubject;
use kpn_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let command = args.next();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    if let Some(command) = command {
        if command != "issue-token" {
            anyhow::bail!("unknown command {command:?}; expected issue-token");
        }
        let subject: TokenSubject = args
            .next()
            .ok_or_else(|| anyhow::anyhow!("usage: kpn-api issue-token <member-id|president>"))?
            .parse()
            .map_err(anyhow::Error::msg)?;
        if config.storage.backend == kpn_common::StorageBackend::Memory {
            tracing::warn!("In-memory storage: the token only names members of this process");
        }

        let state = kpn_api::create_app_state(config).await?;
        let (member_id, token) = kpn_api::issue_token(&state, subject).await?;
        info!(member_id = %member_id, "Token ready");
        println!("{token}");
        return Ok(());
    }

    info!("Starting KPN governance API...");
    info!(
        env = ?config.app.env,
        port = config.api.port,
        storage = ?config.storage.backend,
        "Configuration loaded"
    );

    kpn_api::run(config).await?;

    Ok(())
}
