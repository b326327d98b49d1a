use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod error;
mod event;
mod os;
mod page;
mod session;

#[tokio::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = config::Config::from_env()?;

  let listener = TcpListener::bind(config.bind_address()).await?;
  tracing::info!("install helper listening on http://{}", listener.local_addr()?);

  axum::serve(listener, api::router()).await
}
