use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use anyhow::Context;
use crypto_core::jwt;
use std::io;
use std::sync::Arc;
use story_service::auth::{AuthVerifier, DenyAllVerifier, JwtVerifier};
use story_service::config::StoreBackend;
use story_service::handlers::health::{
    health_summary, liveness_check, readiness_summary, HealthState,
};
use story_service::openapi::ApiDoc;
use story_service::services::{ChapterService, StoryService};
use story_service::store::{postgres, MemoryStore, PgResourceStore, ResourceStore};
use story_service::{metrics, routes, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
        }
    }
}

fn build_verifier() -> anyhow::Result<Arc<dyn AuthVerifier>> {
    match jwt::load_validation_key() {
        Ok(public_key) => {
            let verifier = JwtVerifier::from_public_key_pem(&public_key)
                .context("Failed to initialize JWT validation")?;
            tracing::info!("JWT validation enabled (RS256)");
            Ok(Arc::new(verifier))
        }
        Err(err) => {
            tracing::warn!(
                "JWT public key not configured ({err}); protected routes will reject every request"
            );
            Ok(Arc::new(DenyAllVerifier))
        }
    }
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn ResourceStore>> {
    match config.store {
        StoreBackend::Postgres => {
            let pool = postgres::create_pool(&config.database)
                .await
                .context("Database pool creation failed")?;

            postgres::run_migrations(&pool)
                .await
                .context("Migrations failed")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgResourceStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory resource store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

fn startup_error(err: anyhow::Error) -> io::Error {
    tracing::error!("Startup failed: {:#}", err);
    io::Error::new(io::ErrorKind::Other, format!("{:#}", err))
}

/// Story Service
///
/// Serves stories and chapters from the resource store, counts story votes
/// and manages the comments embedded in each chapter.
///
/// # Routes
///
/// - `GET /story/{storyId}` and `PUT /story/{storyId}/vote`
/// - `GET /story/{storyId}/chapter/{chapterId}`
/// - `PUT /story/{storyId}/chapter/{chapterId}/comment`
/// - `DELETE /story/{storyId}/chapter/{chapterId}/comment/{commentId}`
/// - `PUT /edit/story/...` (reserved)
///
/// Vote and comment mutations require an RS256 bearer token.
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Container healthcheck: `story-service healthcheck`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" {
                let port = std::env::var("STORY_SERVICE_PORT").unwrap_or_else(|_| "8080".into());
                let url = format!("http://127.0.0.1:{}/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting story-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let verifier = build_verifier().map_err(startup_error)?;
    let store = build_store(&config).await.map_err(startup_error)?;
    tracing::info!(backend = store.backend(), "Resource store ready");

    let story_data = web::Data::new(StoryService::new(store.clone()));
    let chapter_data = web::Data::new(ChapterService::new(store.clone()));
    let health_state = web::Data::new(HealthState::new(store));
    let verifier_data: web::Data<dyn AuthVerifier> = web::Data::from(verifier);

    let bind_address = config.app.bind_address();
    let workers = config.app.workers;
    let allowed_origins = config.cors.allowed_origins.clone();
    tracing::info!("Binding HTTP server to {}", bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        let openapi_doc = ApiDoc::openapi();

        App::new()
            .app_data(web::Data::new(openapi_doc.clone()))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), openapi_doc.clone()),
            )
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .app_data(story_data.clone())
            .app_data(chapter_data.clone())
            .app_data(health_state.clone())
            .app_data(verifier_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .route("/health", web::get().to(health_summary))
            .route("/health/ready", web::get().to(readiness_summary))
            .route("/health/live", web::get().to(liveness_check))
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .workers(workers)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let joined = tokio::select! {
        joined = &mut server_task => joined,
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    let result = match joined {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("HTTP server task join error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, e.to_string()))
        }
    };

    tracing::info!("Story-service shutting down");
    result
}
