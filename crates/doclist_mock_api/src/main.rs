use anyhow::Context;
use doclist_logging::{doclist_info, LogDestination};
use doclist_mock_api::{serve, DocumentStore, ADDR_ENV, DEFAULT_ADDR};
use log::LevelFilter;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    doclist_logging::initialize(
        LogDestination::Terminal,
        doclist_logging::level_from_env(LevelFilter::Info),
    );

    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let store = DocumentStore::seeded().context("Bundled document fixture is invalid")?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    doclist_info!("Mock document API listening on http://{}", listener.local_addr()?);

    serve(listener, store, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
    .context("Mock document API stopped with an error")?;

    doclist_info!("Mock document API shut down");
    Ok(())
}
