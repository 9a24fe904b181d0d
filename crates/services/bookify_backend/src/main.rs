// File: services/bookify_backend/src/main.rs
use axum::{routing::get, Router};
use bookify_common::logging;
use bookify_config::{load_config, AppConfig};
#[cfg(feature = "gcal")]
use bookify_gcal::routes as gcal_routes;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

mod session;
mod views;

const DEFAULT_STATIC_DIR: &str = "static";

/// Routes mounted under `/api`, one router per enabled feature.
fn api_routes(#[allow(unused_variables)] config: Arc<AppConfig>) -> Result<Router, Box<dyn Error>> {
    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut router = Router::new().route("/", get(|| async { "Welcome to Bookify API!" }));
    #[cfg(feature = "gcal")]
    {
        router = router.merge(gcal_routes::routes(config)?);
    }
    Ok(router)
}

fn build_app(config: &AppConfig, api_router: Router) -> Router {
    let sign_in = Router::new()
        .route("/auth/sign-in", get(session::sign_in_handler))
        .with_state(config.server.sign_in_url.clone());

    let mut app = Router::new()
        .nest("/api", api_router)
        .route("/confirmation", get(views::confirmation_handler))
        .merge(sign_in);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "gcal")]
        use bookify_gcal::doc::GcalApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookify API",
                version = "0.1.0",
                description = "Bookify scheduling API",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Bookify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "gcal")]
        openapi_doc.merge(GcalApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    let static_dir = config
        .server
        .static_dir
        .clone()
        .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());
    info!("Serving the booking page from {}", static_dir);
    app = app.fallback_service(ServeDir::new(static_dir));

    app.layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let config = Arc::new(load_config()?);

    let app = build_app(&config, api_routes(config.clone())?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
