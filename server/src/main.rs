use tasklist_core::TaskStore;
use tasklist_server::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tasklist_server=debug,tasklist_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, pin_order = %config.store.pin_order, "listening");

    tasklist_server::run(listener, TaskStore::with_config(config.store)).await?;
    Ok(())
}
