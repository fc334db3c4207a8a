use crate::cli::ServeArgs;
use crate::infra::{AppState, PipelineState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tenant_note::config::AppConfig;
use tenant_note::error::AppError;
use tenant_note::listings::ListingCatalog;
use tenant_note::regions::fetch_regions;
use tenant_note::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed) = args.seed.take() {
        config.pipeline.listing_seed = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let seed = config
        .pipeline
        .listing_seed
        .unwrap_or_else(|| Utc::now().timestamp_micros().unsigned_abs());
    let catalog = ListingCatalog::generate(
        config.pipeline.listing_count,
        seed,
        Local::now().date_naive(),
    );
    let pipeline = PipelineState::new(catalog, config.pipeline.region_hash);

    let region_slot = pipeline.clone();
    let region_path = config.pipeline.region_data_path.clone();
    tokio::spawn(async move {
        match fetch_regions(&region_path).await {
            Ok(regions) => {
                region_slot.install_regions(regions);
            }
            Err(err) => {
                warn!(error = %err, "region geometry unavailable, choropleth disabled");
            }
        }
    });

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = router(pipeline)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        listings = config.pipeline.listing_count,
        seed,
        "tenant note map service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
