use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use flextea_core::Relay;
use flextea_gateway::{Dispatcher, TelegramClient, Update};

#[derive(Clone)]
struct ServerState {
    relay: Relay,
    dispatcher: Dispatcher,
    bot_token: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flextea=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let bot_token = std::env::var("FLEXTEA_BOT_TOKEN")
        .map_err(|_| anyhow::anyhow!("FLEXTEA_BOT_TOKEN is not set"))?;
    let host = std::env::var("FLEXTEA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("FLEXTEA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    let client = TelegramClient::new(&bot_token);

    // Register the webhook with Telegram when a public base URL is
    // configured; without one, updates are expected from elsewhere.
    if let Ok(base) = std::env::var("FLEXTEA_WEBHOOK_BASE") {
        let url = format!("{}/webhook/{}", base.trim_end_matches('/'), bot_token);
        client.set_webhook(&url).await?;
        info!("webhook registered with Telegram");
    }

    let state = ServerState {
        relay: Relay::new(),
        dispatcher: Dispatcher::new(client),
        bot_token,
    };

    // Routes
    let app = Router::new()
        .route("/", get(index))
        .route("/webhook/{token}", post(webhook))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("FlexTea relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> &'static str {
    "FlexTea is live ☕️"
}

async fn webhook(
    State(state): State<ServerState>,
    Path(token): Path<String>,
    Json(update): Json<Update>,
) -> Result<impl IntoResponse, StatusCode> {
    if token != state.bot_token {
        return Err(StatusCode::NOT_FOUND);
    }

    let Some(event) = update.text_event() else {
        // Stickers, joins, edits — nothing the relay reacts to.
        debug!("update {} carries no text, ignored", update.update_id);
        return Ok(Json(serde_json::json!({ "ok": true })));
    };

    debug!("update {} from {}", update.update_id, event.sender);
    let batch = state.relay.handle(event.sender, &event.text).await;
    state.dispatcher.deliver(batch);

    Ok(Json(serde_json::json!({ "ok": true })))
}
