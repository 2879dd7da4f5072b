use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::Deserialize;
use tokio::sync::RwLock;

use listsync::remote::{
    Ack, ListPageResponse, StateResponse, UpdateOrderRequest, UpdateSelectionRequest,
};

#[path = "listsync_server/collection.rs"]
mod collection;
use self::collection::Collection;

#[derive(Parser)]
#[command(name = "listsync-server")]
#[command(about = "Reference remote service for the listsync engine (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Number of records in the collection
    #[arg(long, default_value_t = 1_000_000)]
    count: u64,
}

#[derive(Clone)]
struct AppState {
    collection: Arc<RwLock<Collection>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let state = AppState {
        collection: Arc::new(RwLock::new(Collection::new(args.count))),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/items", get(list_items))
        .route("/state", get(get_state))
        .route("/update-selection", post(update_selection))
        .route("/update-order", post(update_order))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(%local_addr, records = args.count, "listsync-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn healthz() -> &'static str {
    "ok"
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> usize {
    20
}

const MAX_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(default = "default_page")]
    page: u32,

    #[serde(default = "default_limit")]
    limit: usize,

    #[serde(default)]
    search: String,
}

async fn list_items(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    if query.page == 0 {
        return bad_request("page is 1-based");
    }
    let limit = query.limit.clamp(1, MAX_LIMIT);
    let collection = state.collection.read().await;
    let (items, has_more, total) = collection.page(query.page, limit, &query.search);
    Json(ListPageResponse {
        items,
        has_more,
        total: Some(total),
        page: Some(query.page),
    })
    .into_response()
}

async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let collection = state.collection.read().await;
    Json(StateResponse {
        selected_count: Some(collection.selected_count()),
        has_persisted_order: Some(collection.has_persisted_order()),
        order: None,
        selected: None,
    })
}

async fn update_selection(
    State(state): State<AppState>,
    Json(req): Json<UpdateSelectionRequest>,
) -> Response {
    let mut collection = state.collection.write().await;
    match (req.id, req.ids) {
        (Some(id), None) => {
            if !collection.contains(id.as_u64()) {
                return bad_request(&format!("unknown id {id}"));
            }
            collection.set_selection(id.as_u64(), req.selected);
        }
        (None, Some(ids)) => {
            // All-or-nothing: validate every id before applying any.
            if let Some(bad) = ids.iter().find(|id| !collection.contains(id.as_u64())) {
                return bad_request(&format!("unknown id {bad}"));
            }
            for id in &ids {
                collection.set_selection(id.as_u64(), req.selected);
            }
        }
        _ => return bad_request("provide exactly one of `id` or `ids`"),
    }
    Json(Ack { ok: true }).into_response()
}

async fn update_order(
    State(state): State<AppState>,
    Json(req): Json<UpdateOrderRequest>,
) -> Response {
    let mut collection = state.collection.write().await;
    if let Some(bad) = req.order.iter().find(|id| !collection.contains(id.as_u64())) {
        return bad_request(&format!("unknown id {bad}"));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = req.order.iter().find(|id| !seen.insert(id.as_u64())) {
        return bad_request(&format!("duplicate id {dup}"));
    }
    let ids: Vec<u64> = req.order.iter().map(|id| id.as_u64()).collect();
    collection.apply_order(&ids);
    Json(Ack { ok: true }).into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}
