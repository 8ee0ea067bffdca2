use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use std::io;
use std::sync::Arc;
use story_service::handlers;
use story_service::jobs::story_cleaner::start_story_cleaner;
use story_service::services::{DigiLockerProvider, LocalDiskStorage, StorageBackend};
use story_service::store::{StoryStore, UserStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    stories: Arc<StoryStore>,
    users: Arc<UserStore>,
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "story-service",
        "version": env!("CARGO_PKG_VERSION"),
        "stories": state.stories.len(),
        "users": state.users.len(),
    }))
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

/// Story Service
///
/// A service that handles the ephemeral-story lifecycle: creation, media
/// upload, listing, token-gated downloads, and DigiLocker identity
/// verification.
///
/// # Routes
///
/// - `/api/stories` - Create and list 24-hour stories
/// - `/api/stories/create` - Multipart create (files + author)
/// - `/api/stories/upload` - Single-file media upload
/// - `/api/stories/download` - Token-gated paid download
/// - `/api/auth/digilocker` - Identity verification flow
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Support container healthchecks via CLI subcommand: `healthcheck-http`
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" || cmd == "healthcheck-http" {
                let port = std::env::var("STORY_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse::<u16>().ok())
                    .unwrap_or(8082);
                let url = format!("http://127.0.0.1:{}/api/health", port);
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

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match story_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting story-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize in-memory stores
    let stories = Arc::new(StoryStore::new());
    let users = Arc::new(UserStore::new());
    if !config.app.env.eq_ignore_ascii_case("production") {
        users.seed_demo_users();
        tracing::info!("Seeded demo users for {} environment", config.app.env);
    }

    // Media storage backend
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalDiskStorage::new(
        &config.storage.root,
        &config.storage.public_base_url,
    ));

    // DigiLocker identity provider
    let digilocker = match DigiLockerProvider::from_config(&config.digilocker) {
        Ok(provider) => {
            if provider.is_mock() {
                tracing::warn!("DigiLocker running in mock mode; identity verification is canned");
            }
            provider
        }
        Err(e) => {
            tracing::error!("DigiLocker configuration failed: {:#}", e);
            eprintln!("ERROR: Failed to configure DigiLocker: {}", e);
            std::process::exit(1);
        }
    };

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let stories_data = web::Data::new(stories.clone());
    let users_data = web::Data::new(users.clone());
    let storage_data = web::Data::new(storage);
    let digilocker_data = web::Data::new(digilocker);
    let access_data = web::Data::new(config.access.clone());
    let health_state = web::Data::new(HealthState {
        stories: stories.clone(),
        users: users.clone(),
    });

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(stories_data.clone())
            .app_data(users_data.clone())
            .app_data(storage_data.clone())
            .app_data(digilocker_data.clone())
            .app_data(access_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(story_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/health", web::get().to(health_summary))
            .route("/api/health/live", web::get().to(liveness_check))
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .workers(4)
    .run();

    let server_handle = server.handle();

    // Expired-story cleanup job
    let cleaner = tokio::spawn(start_story_cleaner(stories));

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut server_task = tokio::spawn(server);
    let result = tokio::select! {
        result = &mut server_task => match result {
            Ok(res) => res,
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        },
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            match server_task.await {
                Ok(res) => res,
                Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
            }
        }
    };

    cleaner.abort();
    tracing::info!("Story-service shutting down");

    result
}
