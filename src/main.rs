use tokio::signal;

use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use notification_emails::app::create_app;
use notification_emails::config::AppConfig;
use notification_emails::db::pool::create_pool;
use notification_emails::domains::notification_email::repository::SqlxNotificationEmailRepository;
use notification_emails::state::{AuthSettings, SharedAppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let config = AppConfig::from_env()?;

  let pool = create_pool(&config.database_url).await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  SqlxNotificationEmailRepository::new(pool.clone(), config.schema.clone())
    .ensure_table()
    .await?;

  tracing::info!(
    table = config.schema.table_name(),
    service = %config.service_name,
    "Notification email table ready"
  );

  let app_state = SharedAppState::new(
    pool,
    config.schema,
    AuthSettings {
      service_name: config.service_name,
      jwt_secret: config.jwt_secret,
    },
  );
  let app = create_app(app_state);

  let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

  tracing::info!("Server running on http://{}", config.bind_addr);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("Failed to install signal handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
