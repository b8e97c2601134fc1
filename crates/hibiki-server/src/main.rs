use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hibiki::{
    CompletionClient, HeuristicInputQuality, HistoryPersonaClassifier, KeywordContentClassifier,
    KeywordSentimentAnalyzer, NotificationPublisher, PersonaCatalog, RecencyHistoryClassifier,
    RoleCatalog, ToolRegistry,
};

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;

use adapters::{
    HttpCompletionFactory, HttpNotificationPublisher, LlmHistoryClassifier, PgMessageStore,
    TracingPublisher,
};
use application::{ReplyDispatcher, ReplyOrchestrator};
use config::ServerConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ReplyOrchestrator>,
    pub dispatcher: ReplyDispatcher,
    pub personas: Arc<PersonaCatalog>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(fx: &application::testing::Fixture) -> Self {
        let orchestrator = Arc::new(fx.orchestrator());
        Self {
            dispatcher: ReplyDispatcher::new(Arc::clone(&orchestrator), config::DispatchConfig::default()),
            orchestrator,
            personas: Arc::clone(&fx.personas),
        }
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Hibiki API is running - personas are listening".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::reply::router())
        .merge(routes::persona::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🔔 Hibiki API initializing...");

    let config = ServerConfig::from_lookup(|key| secrets.get(key));

    // Initialize API key from secrets
    if let Some(api_key) = config.api_key.clone() {
        auth::init_api_key(api_key);
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No HIBIKI_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("✅ Database migrations completed");

    let personas = Arc::new(config::load_persona_catalog(config.persona_catalog_path.as_deref())?);
    tracing::info!("🎭 Persona catalog loaded ({} personas)", personas.all().len());

    let roles = Arc::new(RoleCatalog::builtin());
    let store = Arc::new(PgMessageStore::new(pool));
    let completions = Arc::new(HttpCompletionFactory::new().context("Completion client setup failed")?);

    // Realtime gateway
    let publisher: Arc<dyn NotificationPublisher> = match &config.realtime_gateway_url {
        Some(url) => {
            tracing::info!("📡 Realtime gateway: {}", url);
            Arc::new(
                HttpNotificationPublisher::new(url.clone(), config.realtime_signing_secret.clone())
                    .context("Realtime gateway setup failed")?,
            )
        }
        None => {
            tracing::warn!("⚠️  No REALTIME_GATEWAY_URL set - events are only logged");
            Arc::new(TracingPublisher)
        }
    };

    // History classifier: LLM when platform credentials exist, recency heuristic otherwise
    let history_classifier: Arc<dyn HistoryPersonaClassifier> = match config
        .classifier
        .as_ref()
        .and_then(|c| completions.client(c.vendor, &c.api_key, &c.model))
    {
        Some(client) => {
            tracing::info!("🧭 LLM history classifier enabled ({} / {})", client.vendor(), client.model_id());
            Arc::new(LlmHistoryClassifier::new(Arc::new(client)))
        }
        None => {
            tracing::warn!("⚠️  No CLASSIFIER_API_KEY set - using recency history classifier");
            Arc::new(RecencyHistoryClassifier::new())
        }
    };

    let input_quality = match config.wild_keywords.clone() {
        Some(keywords) => HeuristicInputQuality::new(keywords),
        None => HeuristicInputQuality::default(),
    };

    let orchestrator = Arc::new(
        ReplyOrchestrator::new(
            store.clone(),
            store,
            completions,
            publisher,
            Arc::clone(&personas),
            Arc::clone(&roles),
            config.orchestrator.clone(),
        )
        .with_input_quality(Arc::new(input_quality))
        .with_sentiment(Arc::new(KeywordSentimentAnalyzer::new()))
        .with_tools(Arc::new(ToolRegistry::with_builtin_tools(&roles)))
        .with_history_classifier(history_classifier)
        .with_content_classifier(Arc::new(KeywordContentClassifier::new())),
    );

    let dispatcher = ReplyDispatcher::new(Arc::clone(&orchestrator), config.dispatch.clone());
    tracing::info!(
        "🔁 Reply dispatcher ready (max {} attempts)",
        config.dispatch.max_attempts
    );

    let state = AppState {
        orchestrator,
        dispatcher,
        personas,
    };

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Hibiki API ready");

    Ok(router.into())
}
