//! HTTP surface: report trigger and health check.

use super::generate::ReportJob;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub job: Arc<dyn ReportJob>,

    /// Held for a whole run; runs for the same day share one output file
    pub run_lock: Arc<Mutex<()>>,
}

pub fn build_router(job: Arc<dyn ReportJob>) -> Router {
    let state = AppState {
        job,
        run_lock: Arc::new(Mutex::new(())),
    };
    Router::new()
        .route("/health", get(health_handler))
        .route("/generate-report", get(generate_report_handler))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, job: Arc<dyn ReportJob>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, build_router(job)).await
}

async fn health_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Runs the blocking pipeline off the async workers
async fn generate_report_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let _running = state.run_lock.lock().await;
    info!("Report generation started...");
    let job = Arc::clone(&state.job);

    match tokio::task::spawn_blocking(move || job.run()).await {
        Ok(Ok(outcome)) => {
            info!("Report generation completed successfully.");
            let message = if outcome.emailed {
                "Report generated and sent via email."
            } else {
                "Report generated; email delivery is disabled."
            };
            (
                StatusCode::OK,
                Json(json!({
                    "status": "success",
                    "message": message,
                    "report_file": outcome.report_file.display().to_string(),
                })),
            )
        }
        Ok(Err(err)) => {
            error!("Error during report generation: {:#}", err);
            error_response(format!("{:#}", err))
        }
        Err(join_err) => {
            error!("Report generation task failed: {}", join_err);
            error_response(join_err.to_string())
        }
    }
}

fn error_response(message: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": message })),
    )
}
