use std::net::SocketAddr;
use tokio::{fs, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use warbler::{feed, load_data, persist_data, router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::load()?;
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut data = load_data(&config.data_path).await;
    let (user, created) =
        feed::ensure_user(&mut data, &config.default_user).map_err(|err| err.message)?;
    if created {
        persist_data(&config.data_path, &data)
            .await
            .map_err(|err| err.message)?;
        info!(user_id = user.id, username = %user.username, "created default user");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(stat_mode = %config.stat_mode, "listening on http://{addr}");

    let app = router(AppState::new(config, data));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
