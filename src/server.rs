use crate::config::ServerConfig;
use crate::data::{FindAllOutput, FindOneOutput, SchedulingInput};
use crate::error::ScheduleError;
use crate::solver;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("search task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Schedule(e) if e.is_contract_violation() => StatusCode::BAD_REQUEST,
            ServerError::Schedule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Io(_) | ServerError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn find_handler(
    Json(input): Json<SchedulingInput>,
) -> Result<Json<FindOneOutput>, ServerError> {
    // The search is CPU-bound and can run long; keep it off the async workers.
    match tokio::task::spawn_blocking(move || solver::solve(&input)).await? {
        Ok(output) => Ok(Json(output)),
        Err(e) => {
            warn!("find request failed: {e}");
            Err(e.into())
        }
    }
}

async fn find_all_handler(
    Json(input): Json<SchedulingInput>,
) -> Result<Json<FindAllOutput>, ServerError> {
    // The search is CPU-bound and can run long; keep it off the async workers.
    match tokio::task::spawn_blocking(move || solver::solve_all(&input)).await? {
        Ok(output) => Ok(Json(output)),
        Err(e) => {
            warn!("find-all request failed: {e}");
            Err(e.into())
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/schedule/find", post(find_handler))
        .route("/v1/schedule/find-all", post(find_all_handler))
}

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const FEASIBLE: &str = r#"{
        "rooms": [
            {"location": "Room1", "capacity": 100},
            {"location": "Room2", "capacity": 150},
            {"location": "Room3", "capacity": 75}
        ],
        "courses": [
            {"name": "CS200", "enrollment": 50},
            {"name": "CS300", "enrollment": 110},
            {"name": "CS400", "enrollment": 75}
        ]
    }"#;

    #[test]
    fn test_error_status_mapping() {
        let status = |e: ScheduleError| ServerError::from(e).into_response().status();
        assert_eq!(status(ScheduleError::Infeasible), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status(ScheduleError::InvalidCapacity { capacity: -1 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(ScheduleError::room_index(3, 1)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ScheduleError::CapacityExceeded {
                course: 0,
                room: 0,
                enrollment: 2,
                capacity: 1,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_find_returns_first_schedule() {
        let (status, body) = post_json("/v1/schedule/find", FEASIBLE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["schedule"]["summary"],
            "CS200: Room1, CS300: Room2, CS400: Room3"
        );
        assert_eq!(body["schedule"]["rooms"][0]["remainingCapacity"], 50);
    }

    #[tokio::test]
    async fn test_find_all_returns_every_schedule() {
        let (status, body) = post_json("/v1/schedule/find-all", FEASIBLE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(
            body["schedules"][1]["summary"],
            "CS200: Room3, CS300: Room2, CS400: Room1"
        );
    }

    #[tokio::test]
    async fn test_find_infeasible_is_unprocessable() {
        let body = r#"{
            "rooms": [{"location": "AG 140", "capacity": 50}],
            "courses": [{"name": "Math 340", "enrollment": 150}]
        }"#;
        let (status, body) = post_json("/v1/schedule/find", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("no schedule"));
    }

    #[tokio::test]
    async fn test_find_all_infeasible_is_empty() {
        let body = r#"{
            "rooms": [{"location": "AG 140", "capacity": 50}],
            "courses": [{"name": "Math 340", "enrollment": 150}]
        }"#;
        let (status, body) = post_json("/v1/schedule/find-all", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let body = r#"{
            "rooms": [{"location": "Brogden 105", "capacity": -25}],
            "courses": []
        }"#;
        let (status, body) = post_json("/v1/schedule/find", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("negative"));
    }
}
