use axum::{extract::State, routing::get, Json, Router};

use crate::error::AppError;
use crate::pipeline::process;
use crate::state::AppState;
use crate::types::activity::Activity;

pub fn router() -> Router<AppState> {
    Router::new().route("/activities", get(suspicious_activities))
}

/// Runs the pipeline over the most recent upload and returns the flagged
/// records.
async fn suspicious_activities(
    State(state): State<AppState>,
) -> Result<Json<Vec<Activity>>, AppError> {
    let (path, bytes) = state.store().read_latest().await?;
    tracing::info!("Analyzing {} ({} bytes)", path.display(), bytes.len());

    let options = state.pipeline_options();
    // Dropping this handler (client went away) stops parse workers that have
    // not started yet.
    let guard = options.cancel.cancel_on_drop();

    let flagged = tokio::task::spawn_blocking(move || process::process_bytes(&bytes, &options))
        .await
        .map_err(|e| AppError::Internal(format!("Pipeline task failed: {}", e)))??;

    guard.disarm();

    Ok(Json(flagged))
}
