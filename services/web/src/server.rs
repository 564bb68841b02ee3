use crate::cli::ServeArgs;
use crate::infra::{AppState, SampleUnitSource, SiteState};
use crate::routes::site_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cheongyak::api::{HttpUnitSource, UnitSource};
use cheongyak::config::AppConfig;
use cheongyak::error::AppError;
use cheongyak::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(api_base) = args.api_base.take() {
        config.api = config.api.with_base(&api_base)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let units: Arc<dyn UnitSource> = if args.sample_data {
        info!("serving bundled sample listings instead of the units API");
        Arc::new(SampleUnitSource::seeded())
    } else {
        Arc::new(HttpUnitSource::new(&config.api)?)
    };
    let site_state = SiteState {
        units,
        page_size: config.api.page_size,
        site: config.site.clone(),
    };

    let app = site_routes(site_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        api_base = %config.api.base_url,
        sample_data = args.sample_data,
        "listing site ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
