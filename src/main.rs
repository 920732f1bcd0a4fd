use std::time::Duration;

use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod credentials;
mod error;
mod extractor;
mod metadata;
mod selector;

pub use error::{Error, Result};

use api::AppState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let config = Config::from_env()?;
  let state = AppState::new(config);

  Toplevel::new(move |s| async move {
    s.start(SubsystemBuilder::new("http", move |subsys| serve(subsys, state)));
  })
  .catch_signals()
  .handle_shutdown_requests(Duration::from_secs(10))
  .await?;

  Ok(())
}

async fn serve(subsys: SubsystemHandle, state: AppState) -> anyhow::Result<()> {
  let addr = state.config.bind_addr;
  let app = api::router(state);

  info!("Listening on {}", addr);

  axum::Server::try_bind(&addr)?
    .serve(app.into_make_service())
    .with_graceful_shutdown(subsys.on_shutdown_requested())
    .await?;

  info!("server stopped");
  Ok(())
}
