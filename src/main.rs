mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::admin::{routes as admin_routes, AdminService, SeedService};
use crate::features::catalog::engine::GraphProjector;
use crate::features::catalog::{CatalogService, PgCatalogSource};
use crate::features::files::{routes as files_routes, FileService};
use crate::features::products::{routes as products_routes, ProductService, SubmissionService};
use crate::features::skill_map::{routes as skill_map_routes, SkillMapService};
use crate::features::views::{routes as views_routes, SessionSweeper, ViewService, ViewStore};
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize MinIO client for image storage
    let minio_client = Arc::new(
        modules::storage::MinIOClient::new(config.minio.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );
    minio_client
        .ensure_bucket_exists()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to ensure MinIO bucket exists: {}", e))?;
    tracing::info!(
        "MinIO client initialized for bucket: {}",
        minio_client.bucket_name()
    );

    let file_service = Arc::new(FileService::new(
        pool.clone(),
        Arc::clone(&minio_client),
        config.app.public_base_url.clone(),
    ));
    tracing::info!("File service initialized");

    // Catalog read side shared by the skill map, products and views
    let catalog_service = Arc::new(CatalogService::new(
        Arc::new(PgCatalogSource::new(pool.clone())),
        GraphProjector::new(config.catalog.graph_coloring),
    ));
    tracing::info!(
        "Catalog service initialized (graph coloring: {:?})",
        config.catalog.graph_coloring
    );

    let skill_map_service = Arc::new(SkillMapService::new(Arc::clone(&catalog_service)));
    let product_service = Arc::new(ProductService::new(Arc::clone(&catalog_service)));
    let submission_service = Arc::new(SubmissionService::new(pool.clone()));
    tracing::info!("Skill map and product services initialized");

    let view_store = Arc::new(ViewStore::new(
        config.catalog.view_idle_ttl,
        config.catalog.view_max_sessions,
    ));
    let view_service = Arc::new(ViewService::new(
        Arc::clone(&catalog_service),
        Arc::clone(&view_store),
    ));
    let session_sweeper = SessionSweeper::new(Arc::clone(&view_store));
    tokio::spawn(async move {
        session_sweeper.run().await;
    });
    tracing::info!(
        "View sessions enabled (idle ttl: {}s, max sessions: {})",
        config.catalog.view_idle_ttl.as_secs(),
        config.catalog.view_max_sessions
    );

    let admin_service = Arc::new(AdminService::new(pool.clone()));
    let seed_service = Arc::new(
        SeedService::new(pool.clone())
            .map_err(|e| anyhow::anyhow!("Failed to load seed catalog: {}", e))?,
    );
    tracing::info!("Admin services initialized");

    if config.catalog.seed_on_empty {
        match seed_service.seed_if_empty().await {
            Ok(Some(summary)) => tracing::info!(
                "Seeded empty catalog: {} categories, {} subcategories, {} concepts",
                summary.categories,
                summary.subcategories,
                summary.concepts
            ),
            Ok(None) => tracing::info!("Catalog already populated, startup seed skipped"),
            Err(e) => return Err(anyhow::anyhow!("Startup seed failed: {}", e)),
        }
    }

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(
                Arc::new(credentials),
                "Swagger UI",
            )))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Admin routes, mounted at the configured admin path
    let admin_router = admin_routes::routes(admin_service, seed_service)
        .merge(files_routes::admin_routes(Arc::clone(&file_service)));
    let admin_router = if let Some(credentials) = config.admin.credentials() {
        tracing::info!("Admin API mounted at {} (basic auth)", config.admin.path);
        admin_router.layer(from_fn(middleware::basic_auth_middleware(
            Arc::new(credentials),
            "Admin",
        )))
    } else {
        tracing::warn!(
            "Admin API mounted at {} WITHOUT authentication: set ADMIN_USERNAME and ADMIN_PASSWORD",
            config.admin.path
        );
        admin_router
    };

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let public_routes = Router::new()
        .merge(skill_map_routes::routes(skill_map_service))
        .merge(products_routes::routes(product_service, submission_service))
        .merge(views_routes::routes(view_service))
        .merge(files_routes::routes(file_service));

    let app = Router::new()
        .merge(swagger)
        .merge(public_routes)
        .nest(&config.admin.path, admin_router)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::cors_layer(
                    config.app.cors_allowed_origins.clone(),
                )),
        );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("Public base URL: {}", config.app.public_base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
