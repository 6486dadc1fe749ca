use rand::rngs::StdRng;
use rand::SeedableRng;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardbox::config::Settings;
use cardbox::content::DirectoryDecks;
use cardbox::db::SqliteStore;
use cardbox::handlers;
use cardbox::state::AppState;
use cardbox::study::StudyEngine;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cardbox=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let store = SqliteStore::open(&settings.database_path).expect("Failed to open database");
  let decks = DirectoryDecks::new(settings.decks_dir.clone());
  let engine = StudyEngine::new(store, decks, StdRng::from_os_rng());

  let app = handlers::router(AppState::new(engine)).layer(TraceLayer::new_for_http());

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", settings.port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
