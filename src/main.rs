use events::EventPublisher;
use log::{error, info};
use service::{config::Config, logging::Logger};
use sse::domain_event_handler::BroadcastEventHandler;
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if it exists, ignore otherwise
    dotenvy::dotenv().ok();

    let config = Config::new();
    Logger::init_logger(&config as &Config);

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let service_state = service::AppState::new(config, &db);

    // Every acknowledged write is fanned out to all open SSE connections
    // through this manager.
    let sse_manager = Arc::new(sse::Manager::new());
    let event_publisher =
        EventPublisher::new().with_handler(Arc::new(BroadcastEventHandler::new(sse_manager.clone())));

    let app_state = web::AppState::new(service_state, sse_manager, event_publisher);

    info!("Starting noticeboard server");

    web::init_server(app_state).await
}
