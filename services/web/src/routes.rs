use crate::infra::{AppState, SiteState};
use crate::pages::{self, CalculatorState, UNSEARCHABLE_REGION};
use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use cheongyak::api::FetchError;
use cheongyak::error::AppError;
use cheongyak::listings::catalog::{is_known_region, suggest_regions};
use cheongyak::listings::{decode, encode_submission, FilterSelection};
use cheongyak::money::format_manwon;
use cheongyak::rent::{ContractBand, DepositSlider, RentQuote};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    pub(crate) q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailParams {
    #[serde(default)]
    pub(crate) group: Option<String>,
    #[serde(default)]
    pub(crate) slider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RentQuoteRequest {
    pub(crate) band: ContractBand,
    #[serde(default)]
    pub(crate) deposit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RentQuoteResponse {
    pub(crate) quote: RentQuote,
    pub(crate) slider: DepositSlider,
    pub(crate) deposit_label: String,
    pub(crate) rent_label: String,
}

pub(crate) fn site_routes(state: SiteState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/search", get(region_search))
        .route("/listings", get(listings))
        .route("/listings/search", get(submit_filters))
        .route("/listings/:unit_id", get(unit_detail))
        .route("/api/v1/regions/suggest", get(region_suggestions))
        .route("/api/v1/rent/quote", post(rent_quote_endpoint))
        .with_state(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn home() -> impl IntoResponse {
    pages::home_page("", None)
}

/// Known regions jump straight to their listings; anything else re-renders
/// the home page with a notice.
pub(crate) async fn region_search(Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default();
    let region = query.trim();

    if !is_known_region(region) {
        return pages::home_page(&query, Some(UNSEARCHABLE_REGION)).into_response();
    }

    let mut selection = FilterSelection::default();
    selection.toggle_region(region);
    Redirect::to(&format!("/listings?{}", encode_submission(&selection))).into_response()
}

pub(crate) async fn listings(
    State(state): State<SiteState>,
    RawQuery(query): RawQuery,
) -> Response {
    let selection = decode(query.as_deref().unwrap_or_default());

    match state.units.fetch_units(&selection, state.page_size).await {
        Ok(page) => pages::listings_page(
            &selection,
            &page,
            state.page_size,
            Local::now().date_naive(),
        )
        .into_response(),
        Err(err) => failure_response(err),
    }
}

/// Target of the filter form: canonicalises whatever was submitted and starts
/// over on page 1.
pub(crate) async fn submit_filters(RawQuery(query): RawQuery) -> Redirect {
    let selection = decode(query.as_deref().unwrap_or_default());
    Redirect::to(&format!("/listings?{}", encode_submission(&selection)))
}

pub(crate) async fn unit_detail(
    State(state): State<SiteState>,
    Path(unit_id): Path<u64>,
    Query(params): Query<DetailParams>,
) -> Response {
    let calculator = CalculatorState {
        group: params.group.filter(|group| !group.is_empty()),
        slider: params
            .slider
            .and_then(|raw| raw.trim().parse::<i64>().ok()),
    };

    match state.units.fetch_unit(unit_id).await {
        Ok(detail) => pages::detail_page(
            unit_id,
            &detail,
            &calculator,
            &state.site.share_url(unit_id),
            Local::now().date_naive(),
        )
        .into_response(),
        Err(err) => failure_response(err),
    }
}

fn failure_response(err: FetchError) -> Response {
    let err = AppError::from(err);
    let status = err.status_code();
    warn!(error = %err, %status, "rendering failure page");
    (status, pages::failure_page(status)).into_response()
}

pub(crate) async fn region_suggestions(
    Query(params): Query<SearchParams>,
) -> Json<serde_json::Value> {
    let query = params.q.unwrap_or_default();
    let regions = suggest_regions(&query);
    Json(json!({ "query": query, "regions": regions }))
}

pub(crate) async fn rent_quote_endpoint(
    Json(payload): Json<RentQuoteRequest>,
) -> Json<RentQuoteResponse> {
    let RentQuoteRequest { band, deposit } = payload;

    let slider = band.slider();
    let deposit = deposit.unwrap_or_else(|| slider.deposit_at(slider.initial()));
    let quote = band.quote(deposit);

    Json(RentQuoteResponse {
        deposit_label: format_manwon(quote.deposit()),
        rent_label: format_manwon(quote.rent()),
        quote,
        slider,
    })
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
