//! HTTP API over a loaded model: batch prediction and neighbor lookup.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::{model::ItemItemModel, persistence, predict::Predictor, types::Prediction};

type StringModel = ItemItemModel<String, String>;

/// Shared state for the server.
#[derive(Clone)]
struct AppState {
    model: Arc<StringModel>,
    predictor: Arc<Predictor>,
}

/// Request payload for the predict endpoint.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// User key.
    pub user: String,
    /// Candidate items, in the order results should be returned.
    pub items: Vec<String>,
    /// Ratings to use instead of the user's stored ones.
    #[serde(default)]
    pub ratings: Option<HashMap<String, f64>>,
}

/// Response payload for the predict endpoint.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// One entry per requested item; `score` is null when no prediction.
    pub predictions: Vec<Prediction<String>>,
}

/// A stored neighbor of an item.
#[derive(Debug, Serialize)]
pub struct NeighborEntry {
    /// Neighbor item key.
    pub item: String,
    /// Similarity to the requested item.
    pub similarity: f64,
}

/// Build the router over a loaded model.
pub fn router(model: Arc<StringModel>, predictor: Arc<Predictor>) -> Router {
    let state = AppState { model, predictor };

    Router::new()
        .route("/predict", post(post_predict))
        .route("/items/:item/neighbors", get(get_neighbors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start_server(model_dir: PathBuf, port: u16) -> anyhow::Result<()> {
    // 1. Load model
    tracing::info!("Loading model from {}...", model_dir.display());
    let (metadata, model) = persistence::load_model::<String, String>(&model_dir)?;
    let stats = model.stats();
    tracing::info!(
        "Model loaded. {} users, {} items, {} neighbor pairs.",
        stats.num_users,
        stats.num_items,
        stats.num_edges
    );

    // 2. Scoring parameters come from the training config
    let predictor = Arc::new(Predictor::new(&metadata.config));
    let app = router(Arc::new(model), predictor);

    // 3. Bind and Serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Handler for POST /predict
async fn post_predict(
    State(state): State<AppState>,
    Json(payload): Json<PredictRequest>,
) -> (StatusCode, Json<PredictResponse>) {
    let predictions = state.predictor.predict(
        &*state.model,
        payload.user.as_str(),
        &payload.items,
        payload.ratings.as_ref(),
    );

    (StatusCode::OK, Json(PredictResponse { predictions }))
}

/// Handler for GET /items/:item/neighbors
async fn get_neighbors(
    State(state): State<AppState>,
    Path(item): Path<String>,
) -> Result<Json<Vec<NeighborEntry>>, StatusCode> {
    let neighbors = state.model.neighbors(item.as_str()).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(
        neighbors
            .into_iter()
            .map(|(key, similarity)| NeighborEntry {
                item: key.clone(),
                similarity,
            })
            .collect(),
    ))
}
