use impostor_core::{load_categories, WordBank};
use impostor_server::{app, config::Config, AppState};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // A missing .env is fine; anything else is worth mentioning
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "impostor_server=debug,impostor_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(?config, "starting impostor server");

    let bank = match load_categories(&config.categories_dir) {
        Ok(bank) => bank,
        Err(e) => {
            tracing::error!(
                dir = %config.categories_dir.display(),
                "failed to read category directory: {}; starting with no categories",
                e
            );
            WordBank::new()
        }
    };
    if bank.is_empty() {
        tracing::warn!(
            dir = %config.categories_dir.display(),
            "no categories loaded, add JSON category files and restart to play"
        );
    }

    let state = AppState::new(&config, bank);
    let app = app(state).layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("bind");
    axum::serve(listener, app).await.expect("server error");
}
