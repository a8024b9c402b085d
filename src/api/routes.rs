use crate::AppState;
use crate::api::handlers::{chat, conversations, health};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

/// Build the application router with its middleware stack.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route(
            "/conversation/{id}",
            get(conversations::get_conversation).delete(conversations::delete_conversation),
        );

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", crate::api::ApiDoc::openapi()),
        )
    };

    router
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
