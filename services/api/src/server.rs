use crate::cli::ServeArgs;
use crate::infra::{build_services, seed_demo_content, AppState};
use crate::routes::with_site_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use strategix::admin::RefreshCoordinator;
use strategix::config::{AppConfig, AppEnvironment};
use strategix::error::AppError;
use strategix::store::{ChangeFeed, InMemoryStore};
use strategix::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryStore::new());
    if config.environment == AppEnvironment::Development {
        seed_demo_content(&store)?;
        info!("seeded demo jobs and articles");
    }

    let services = build_services(&config, store);
    let refresh = RefreshCoordinator::spawn(
        services.admin.clone(),
        Some(services.store.subscribe_changes()),
        config.refresh,
    );

    let app = with_site_routes(&services, refresh)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        admin_configured = config.admin.username.is_some() && config.admin.password.is_some(),
        "strategix site backend ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
