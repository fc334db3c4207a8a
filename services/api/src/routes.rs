use crate::infra::{AppState, PipelineState};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tenant_note::error::AppError;
use tenant_note::listings::{
    format_price, write_grid, AreaUnit, FilterCommand, FilterState, Grade, Listing, ListingId,
    MarkerView, ScoreCard, DEFAULT_VISIBLE_COUNT,
};
use tenant_note::regions::{AdminCode, ChoroplethLayer, ViewMode};

pub(crate) fn router(pipeline: PipelineState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/listings", get(listings_endpoint))
        .route("/api/v1/listings/export", get(export_endpoint))
        .route("/api/v1/listings/:id", get(listing_detail_endpoint))
        .route("/api/v1/markers", get(markers_endpoint))
        .route(
            "/api/v1/filters",
            get(filters_endpoint).post(filter_command_endpoint),
        )
        .route("/api/v1/regions/choropleth", get(choropleth_endpoint))
        .route(
            "/api/v1/regions/:admin_code/grade",
            get(region_grade_endpoint),
        )
        .with_state(pipeline)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingQuery {
    #[serde(default)]
    pub(crate) visible_count: Option<usize>,
}

pub(crate) async fn listings_endpoint(
    State(state): State<PipelineState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let filters = state.filter_snapshot();
    let run = state.pipeline.run(&state.catalog, &filters);
    let page = run.page(query.visible_count.unwrap_or(DEFAULT_VISIBLE_COUNT));
    Json(page).into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingDetail<'a> {
    listing: &'a Listing,
    price_label: String,
    area_label: String,
    score_card: ScoreCard,
}

pub(crate) async fn listing_detail_endpoint(
    State(state): State<PipelineState>,
    Path(id): Path<u32>,
) -> Result<Response, AppError> {
    let listing = state
        .catalog
        .get(ListingId(id))
        .ok_or_else(|| AppError::NotFound(format!("listing {id}")))?;

    let detail = ListingDetail {
        listing,
        price_label: format_price(listing.price()),
        area_label: AreaUnit::default().format(listing.size()),
        score_card: listing.score_card(&state.engine),
    };
    Ok(Json(detail).into_response())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    pub(crate) unit: Option<AreaUnit>,
}

pub(crate) async fn export_endpoint(
    State(state): State<PipelineState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let filters = state.filter_snapshot();
    let run = state.pipeline.run(&state.catalog, &filters);

    let mut body = Vec::new();
    write_grid(
        &mut body,
        run.filtered().iter().copied(),
        query.unit.unwrap_or_default(),
    )?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response())
}

pub(crate) async fn markers_endpoint(State(state): State<PipelineState>) -> Json<Vec<MarkerView>> {
    let filters = state.filter_snapshot();
    let run = state.pipeline.run(&state.catalog, &filters);
    Json(run.markers().views())
}

pub(crate) async fn filters_endpoint(State(state): State<PipelineState>) -> Json<FilterState> {
    Json(state.filter_snapshot())
}

pub(crate) async fn filter_command_endpoint(
    State(state): State<PipelineState>,
    Json(command): Json<FilterCommand>,
) -> Json<FilterState> {
    Json(state.apply_filter(command))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ViewModeQuery {
    #[serde(default)]
    pub(crate) view_mode: Option<String>,
    #[serde(default)]
    pub(crate) base_grade: Option<String>,
}

impl ViewModeQuery {
    fn view_mode(&self) -> Result<ViewMode, AppError> {
        match self.view_mode.as_deref() {
            Some(raw) => Ok(raw.parse::<ViewMode>()?),
            None => Ok(ViewMode::Total),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChoroplethResponse {
    pub(crate) loaded: bool,
    #[serde(flatten)]
    pub(crate) layer: ChoroplethLayer,
}

pub(crate) async fn choropleth_endpoint(
    State(state): State<PipelineState>,
    Query(query): Query<ViewModeQuery>,
) -> Result<Json<ChoroplethResponse>, AppError> {
    let view_mode = query.view_mode()?;
    let filters = state.filter_snapshot();
    let regions = state.regions();

    let layer = ChoroplethLayer::build(
        regions.unwrap_or_default(),
        &state.simulator,
        view_mode,
        &filters.grades,
    );
    Ok(Json(ChoroplethResponse {
        loaded: regions.is_some(),
        layer,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegionGradeResponse {
    pub(crate) admin_code: AdminCode,
    pub(crate) view_mode: ViewMode,
    pub(crate) grade: Grade,
    pub(crate) fill_color: &'static str,
}

/// Grade one region. The base grade comes from the query, else from the
/// loaded geometry; it is only required for the `total` view.
pub(crate) async fn region_grade_endpoint(
    State(state): State<PipelineState>,
    Path(admin_code): Path<String>,
    Query(query): Query<ViewModeQuery>,
) -> Result<Json<RegionGradeResponse>, AppError> {
    let view_mode = query.view_mode()?;
    let admin_code = AdminCode::new(admin_code);

    let base_grade = match query.base_grade.as_deref() {
        Some(raw) => Some(Grade::from_letter(raw).ok_or_else(|| {
            AppError::InvalidInput(format!("base_grade '{raw}' must be one of A, B, C, D"))
        })?),
        None => state.regions().and_then(|regions| {
            regions
                .iter()
                .find(|region| region.admin_code() == &admin_code)
                .map(|region| region.base_grade())
        }),
    };

    let grade = match (view_mode, base_grade) {
        (ViewMode::Total, None) => {
            return Err(AppError::NotFound(format!("base grade for region {admin_code}")))
        }
        (mode, base) => state
            .simulator
            .simulate(&admin_code, base.unwrap_or(Grade::C), mode),
    };

    Ok(Json(RegionGradeResponse {
        admin_code,
        view_mode,
        grade,
        fill_color: grade.fill_color(),
    }))
}
