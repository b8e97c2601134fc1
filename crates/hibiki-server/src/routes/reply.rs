//! Reply Routes - Persona replies to human messages
//!
//! `POST /hibiki/replies` queues a background job and returns at once;
//! `POST /hibiki/replies/run` runs the orchestration inline.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::application::ReplyError;
use crate::models::{ReplyJobRequest, ReplyJobResponse, ReplyRunResponse};
use crate::AppState;

/// Queue a reply job
#[utoipa::path(
    post,
    path = "/hibiki/replies",
    request_body = ReplyJobRequest,
    responses(
        (status = 202, description = "Reply job accepted", body = ReplyJobResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Reply"
)]
pub async fn enqueue_reply(
    State(state): State<AppState>,
    Json(payload): Json<ReplyJobRequest>,
) -> (StatusCode, Json<ReplyJobResponse>) {
    let job_id = state.dispatcher.enqueue(payload.into());
    (StatusCode::ACCEPTED, Json(ReplyJobResponse { job_id }))
}

/// Run one reply orchestration and return its outcome
#[utoipa::path(
    post,
    path = "/hibiki/replies/run",
    request_body = ReplyJobRequest,
    responses(
        (status = 200, description = "Replied or skipped", body = ReplyRunResponse),
        (status = 500, description = "Deployment misconfigured"),
        (status = 502, description = "Completion service failed"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Reply"
)]
pub async fn run_reply(
    State(state): State<AppState>,
    Json(payload): Json<ReplyJobRequest>,
) -> Result<Json<ReplyRunResponse>, (StatusCode, String)> {
    let outcome = state
        .orchestrator
        .handle(payload.into())
        .await
        .map_err(|e| (status_for(&e), e.to_string()))?;

    Ok(Json(outcome.into()))
}

fn status_for(err: &ReplyError) -> StatusCode {
    match err {
        ReplyError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ReplyError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        ReplyError::Generation(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hibiki/replies", post(enqueue_reply))
        .route("/hibiki/replies/run", post(run_reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::Fixture;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn body_for(fx: &Fixture, trigger_id: uuid::Uuid) -> Body {
        Body::from(
            serde_json::json!({
                "organization_id": fx.organization_id,
                "room_id": fx.room_id,
                "trigger_message_id": trigger_id,
                "sender_id": fx.sender_id,
            })
            .to_string(),
        )
    }

    fn post_json(uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap()
    }

    #[tokio::test]
    async fn test_enqueue_returns_accepted_with_job_id() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "hello");
        let app = router().with_state(AppState::for_tests(&fx));

        let response = app
            .oneshot(post_json("/hibiki/replies", body_for(&fx, trigger.id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ReplyJobResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.job_id.is_nil());
    }

    #[tokio::test]
    async fn test_run_reports_skip_reason() {
        let fx = Fixture::new();
        fx.store.set_enabled(fx.organization_id, false);
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "hello");
        let app = router().with_state(AppState::for_tests(&fx));

        let response = app
            .oneshot(post_json("/hibiki/replies/run", body_for(&fx, trigger.id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ReplyRunResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "skipped");
        assert_eq!(body.reason.as_deref(), Some("bot_disabled"));
    }

    #[tokio::test]
    async fn test_run_replies_inline() {
        let fx = Fixture::new();
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "hello");
        let app = router().with_state(AppState::for_tests(&fx));

        let response = app
            .oneshot(post_json("/hibiki/replies/run", body_for(&fx, trigger.id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ReplyRunResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "replied");
        assert!(body.message.is_some());
        assert_eq!(fx.store.messages_in(fx.room_id).len(), 2);
    }

    #[tokio::test]
    async fn test_run_maps_configuration_error() {
        let fx = Fixture::new();
        for kind in hibiki::PersonaKind::ALL {
            fx.store.unbind_persona(fx.organization_id, kind);
        }
        let trigger = fx.store.post(fx.room_id, fx.sender_id, "hello");
        let app = router().with_state(AppState::for_tests(&fx));

        let response = app
            .oneshot(post_json("/hibiki/replies/run", body_for(&fx, trigger.id)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let fx = Fixture::new();
        let app = router().with_state(AppState::for_tests(&fx));

        let response = app
            .oneshot(post_json("/hibiki/replies", Body::from("{\"room_id\": 1}")))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
