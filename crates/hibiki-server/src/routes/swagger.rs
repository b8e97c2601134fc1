//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    PersonaResponse, ReplyJobRequest, ReplyJobResponse, ReplyMessage, ReplyRunResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reply endpoints
        super::reply::enqueue_reply,
        super::reply::run_reply,
        // Persona endpoints
        super::persona::list_personas,
    ),
    info(
        title = "Hibiki API",
        version = "0.1.0",
        description = "響 (Hibiki) - Persona reply engine API\n\nDecides whether and how an automated persona answers a chat message.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Reply", description = "Reply - Persona replies to human messages"),
        (name = "Persona", description = "Persona - Read-only persona catalog"),
    ),
    components(
        schemas(
            // Reply
            ReplyJobRequest,
            ReplyJobResponse,
            ReplyRunResponse,
            ReplyMessage,
            // Persona
            PersonaResponse,
        )
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_reply_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/hibiki/replies"));
        assert!(doc.paths.paths.contains_key("/hibiki/replies/run"));
        assert!(doc.paths.paths.contains_key("/hibiki/personas"));
    }
}
