//! HTTP server for the B-tree.
//!
//! Provides REST API endpoints for:
//! - Insert, find and remove on integer keys
//! - Tree visualization export
//! - Configuration management

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use btree_core::{BTree, InsertOutcome, RemoveOutcome, TreeConfig, TreeNode, TreeStats};
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across handlers
struct AppState {
    tree: RwLock<BTree<i64>>,
}

impl AppState {
    fn new(config: TreeConfig) -> btree_core::Result<Self> {
        Ok(Self {
            tree: RwLock::new(BTree::with_config(config)?),
        })
    }
}

type SharedState = Arc<AppState>;

/// Request to insert a key
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertRequest {
    key: i64,
}

/// Request to insert many keys
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkInsertRequest {
    keys: Vec<i64>,
}

/// Response for find operations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FindResponse {
    key: i64,
    found: bool,
}

/// Response for operations that return success/failure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
    success: bool,
    message: String,
}

/// Tree visualization response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeResponse {
    tree: Option<TreeNode>,
    stats: TreeStats,
    rendered: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let state = match AppState::new(TreeConfig::default()) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/config", get(get_config).post(set_config))
        .route("/api/keys", get(list_keys).post(insert_key))
        .route("/api/keys/:key", get(find_key).delete(remove_key))
        .route("/api/tree", get(get_tree))
        .route("/api/stats", get(get_stats))
        .route("/api/clear", post(clear_tree))
        .route("/api/bulk", post(bulk_insert))
        .layer(cors)
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind("0.0.0.0:3001").await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("ERROR: Failed to bind: {}", e);
            std::process::exit(1);
        }
    };
    println!("B-tree server running on http://localhost:3001");
    println!("API Endpoints:");
    println!("  GET    /api/config    - Get tree config");
    println!("  POST   /api/config    - Rebuild the tree with a new order");
    println!("  GET    /api/keys      - List all keys");
    println!("  POST   /api/keys      - Insert a key");
    println!("  GET    /api/keys/:key - Find a key");
    println!("  DELETE /api/keys/:key - Remove a key");
    println!("  GET    /api/tree      - Get tree structure for visualization");
    println!("  GET    /api/stats     - Get tree stats");
    println!("  POST   /api/clear     - Remove all keys");
    println!("  POST   /api/bulk      - Insert many keys");
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("ERROR: Server failed: {}", e);
        std::process::exit(1);
    }
}

async fn get_config(State(state): State<SharedState>) -> Json<TreeConfig> {
    Json(state.tree.read().config())
}

async fn set_config(
    State(state): State<SharedState>,
    Json(config): Json<TreeConfig>,
) -> Result<Json<OperationResponse>, (StatusCode, Json<OperationResponse>)> {
    match BTree::with_config(config) {
        Ok(tree) => {
            *state.tree.write() = tree;
            info!("tree rebuilt with order {}", config.order);
            Ok(Json(OperationResponse {
                success: true,
                message: format!("Tree rebuilt with order {}", config.order),
            }))
        }
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(OperationResponse {
                success: false,
                message: e.to_string(),
            }),
        )),
    }
}

async fn list_keys(State(state): State<SharedState>) -> Json<Vec<i64>> {
    Json(state.tree.read().keys().into_iter().copied().collect())
}

async fn insert_key(
    State(state): State<SharedState>,
    Json(req): Json<InsertRequest>,
) -> Json<OperationResponse> {
    let outcome = state.tree.write().insert(req.key);
    Json(match outcome {
        InsertOutcome::Inserted => OperationResponse {
            success: true,
            message: format!("Inserted key {}", req.key),
        },
        InsertOutcome::Duplicate => OperationResponse {
            success: false,
            message: format!("Key {} is already present", req.key),
        },
    })
}

async fn find_key(State(state): State<SharedState>, Path(key): Path<i64>) -> Json<FindResponse> {
    let found = state.tree.read().contains(&key);
    Json(FindResponse { key, found })
}

async fn remove_key(
    State(state): State<SharedState>,
    Path(key): Path<i64>,
) -> Json<OperationResponse> {
    let outcome = state.tree.write().remove(&key);
    Json(match outcome {
        RemoveOutcome::Removed => OperationResponse {
            success: true,
            message: format!("Removed key {}", key),
        },
        RemoveOutcome::NotPresent => OperationResponse {
            success: false,
            message: format!("Key {} not found", key),
        },
    })
}

async fn get_tree(State(state): State<SharedState>) -> Json<TreeResponse> {
    let tree = state.tree.read();
    Json(TreeResponse {
        tree: tree.export(),
        stats: tree.stats(),
        rendered: tree.render(),
    })
}

async fn get_stats(State(state): State<SharedState>) -> Json<TreeStats> {
    Json(state.tree.read().stats())
}

async fn clear_tree(State(state): State<SharedState>) -> Json<OperationResponse> {
    state.tree.write().clear();
    Json(OperationResponse {
        success: true,
        message: "Tree cleared".to_string(),
    })
}

async fn bulk_insert(
    State(state): State<SharedState>,
    Json(req): Json<BulkInsertRequest>,
) -> Json<OperationResponse> {
    let mut tree = state.tree.write();
    let total = req.keys.len();
    let inserted = req
        .keys
        .into_iter()
        .filter(|&key| tree.insert(key).is_inserted())
        .count();
    Json(OperationResponse {
        success: true,
        message: format!(
            "Inserted {} keys ({} duplicates ignored)",
            inserted,
            total - inserted
        ),
    })
}
