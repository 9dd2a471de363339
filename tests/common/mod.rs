use warbler::models::AppData;
use warbler::{feed, router, AppState, Config};

/// Serves a fresh router on a random local port and returns its base url.
pub async fn serve() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut data_path = std::env::temp_dir();
    data_path.push(format!("warbler_test_{}_{}.json", std::process::id(), nanos));

    let config = Config::from_lookup(|key| match key {
        "APP_DATA_PATH" => Some(data_path.to_string_lossy().to_string()),
        "WARBLER_USER" => Some("guest".to_string()),
        _ => None,
    })
    .unwrap();

    let mut data = AppData::default();
    feed::ensure_user(&mut data, &config.default_user).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(config, data));
    tokio::spawn(async move { axum::serve(listener, app).await });

    format!("http://{addr}")
}
