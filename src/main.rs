use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use punchcard_assets::api::{self, AppState, StaticTokenDirectory};
use punchcard_assets::storage::LocalStore;
use punchcard_assets::synchronizer::{Synchronizer, DEFAULT_FAN_OUT};

#[derive(Debug, Parser)]
#[clap(
    name = "punchcard-assets",
    about = "PWA branding asset service: generates organization icon/splash catalogs and keeps object storage in sync"
)]
struct Args {
    /// Address to listen on.
    #[clap(long, default_value = "127.0.0.1:8087")]
    listen: SocketAddr,

    /// Root directory of the local object store.
    #[clap(long, value_name = "DIR", default_value = "./asset-store")]
    storage_root: PathBuf,

    /// Public base URL under which stored objects are served.
    #[clap(long, default_value = "http://127.0.0.1:8087/assets")]
    public_base: String,

    /// Bearer token for the admin generator endpoint. When unset, the
    /// endpoint rejects every caller.
    #[clap(long, env = "PUNCHCARD_ADMIN_TOKEN", default_value = "")]
    admin_token: String,

    /// Width of the synthesis/upload worker pool.
    #[clap(long, default_value_t = DEFAULT_FAN_OUT)]
    fan_out: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "punchcard_assets=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let store = Arc::new(LocalStore::new(args.storage_root.clone()));
    let synchronizer =
        Synchronizer::new(store, args.public_base.clone()).with_fan_out(args.fan_out);

    let state = Arc::new(AppState {
        synchronizer,
        admins: Arc::new(StaticTokenDirectory::new(args.admin_token)),
    });

    let app = api::router(state);

    tracing::info!(listen = %args.listen, storage_root = ?args.storage_root, "starting asset service");
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
