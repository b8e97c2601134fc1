//! Persona Routes - Read-only persona catalog

use axum::{extract::State, routing::get, Json, Router};

use crate::models::PersonaResponse;
use crate::AppState;

/// List the persona catalog
#[utoipa::path(
    get,
    path = "/hibiki/personas",
    responses(
        (status = 200, description = "Persona catalog", body = Vec<PersonaResponse>)
    ),
    tag = "Persona"
)]
pub async fn list_personas(State(state): State<AppState>) -> Json<Vec<PersonaResponse>> {
    Json(state.personas.all().iter().map(PersonaResponse::from).collect())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/hibiki/personas", get(list_personas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::Fixture;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_lists_catalog() {
        let fx = Fixture::new();
        let app = router().with_state(crate::AppState::for_tests(&fx));

        let response = app
            .oneshot(Request::builder().uri("/hibiki/personas").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let personas: Vec<PersonaResponse> = serde_json::from_slice(&bytes).unwrap();
        let kinds: Vec<&str> = personas.iter().map(|p| p.kind.as_str()).collect();
        assert_eq!(kinds, vec!["default_chat", "system", "wild"]);
    }
}
