//! VeilForge Entitlement API Server
//!
//! Serves the plan/trial entitlement endpoints for the VeilForge demo
//! platform: premium status, watch-to-unlock trial grants, race-safe trial
//! consumption, the gated multi-layer processing entry point, and the demo
//! upgrade operation.
//!
//! Usage:
//!   veilforge-server --port 5050
//!
//! Tokens are verified against the embedded demo issuer key unless
//! `--token-key-hex` supplies another Ed25519 public key.

use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use veilforge_entitlement::{
    EntitlementService, MemoryStore, SystemClock, ThrottleGuard, TracingSink,
};
use veilforge_server::{build_router, AppState, SignedTokenVerifier};

#[derive(Parser, Debug)]
#[command(name = "veilforge-server")]
#[command(about = "VeilForge entitlement API server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5050")]
    port: u16,

    /// Ed25519 token-issuer public key (64 hex chars), overriding the
    /// embedded demo key
    #[arg(long)]
    token_key_hex: Option<String>,

    /// Key required in the x-admin-key header for admin routes; admin routes
    /// are disabled when unset
    #[arg(long, env = "VEILFORGE_ADMIN_KEY")]
    admin_key: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("VeilForge entitlement server starting...");

    let verifier = match &args.token_key_hex {
        Some(hex_key) => {
            let bytes = hex::decode(hex_key).context("token key is not valid hex")?;
            let key: [u8; 32] = bytes
                .as_slice()
                .try_into()
                .context("token key must be 32 bytes")?;
            SignedTokenVerifier::with_key(&key)
                .context("token key is not a valid Ed25519 public key")?
        }
        None => SignedTokenVerifier::new().context("embedded token key rejected")?,
    };

    let service = Arc::new(EntitlementService::new(
        Arc::new(MemoryStore::new()),
        ThrottleGuard::default(),
        Arc::new(TracingSink),
        Arc::new(SystemClock),
    ));

    if args.admin_key.is_none() {
        info!("no admin key configured; admin routes disabled");
    }

    let state = AppState {
        service,
        verifier: Arc::new(verifier),
        admin_key: args.admin_key,
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port))
        .await
        .context("failed to bind port")?;
    info!("entitlement API listening on port {}", args.port);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
