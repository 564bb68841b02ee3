use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cheongyak::api::{FetchError, HttpUnitSource, UnitSource};
use cheongyak::config::ApiConfig;
use cheongyak::listings::{decode, FilterSelection};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Clone, Default)]
struct Upstream {
    queries: Arc<Mutex<Vec<String>>>,
}

async fn units(State(upstream): State<Upstream>, RawQuery(query): RawQuery) -> Json<serde_json::Value> {
    upstream
        .queries
        .lock()
        .expect("query log poisoned")
        .push(query.unwrap_or_default());

    Json(json!({
        "count": 17,
        "results": [{
            "id": 11,
            "complex_name": "강남 행복주택",
            "region": "서울",
            "house_types": "행복주택",
            "eligible_residents": ["청년"],
            "exclusive_area_pyeong": "8.2",
            "deposit_min": 25000000,
            "deposit_max": 60000000,
            "rent_min": 90000,
            "rent_max": 210000
        }]
    }))
}

async fn unit(Path(unit_id): Path<u64>) -> Response {
    if unit_id != 11 {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response();
    }

    Json(json!({
        "id": 11,
        "complex_name": "강남 행복주택",
        "region": "서울",
        "cotrancts": [{
            "group": "청년",
            "deposit_min": 2500,
            "deposit_max": 6000,
            "monthly_rent_min": 9,
            "monthly_rent_max": 21,
            "down_payment": 250
        }],
        "schedule": { "announcement_date": "2025-01-10" }
    }))
    .into_response()
}

async fn spawn(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port binds");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream serves");
    });
    Url::parse(&format!("http://{addr}")).expect("valid url")
}

fn source_for(base_url: Url) -> HttpUnitSource {
    HttpUnitSource::new(&ApiConfig {
        base_url,
        page_size: 8,
        timeout: Duration::from_secs(5),
    })
    .expect("client builds")
}

#[tokio::test]
async fn fetch_units_forwards_filters_and_reads_envelope() {
    let upstream = Upstream::default();
    let router = Router::new()
        .route("/api/units/", get(units))
        .route("/api/units/:unit_id/", get(unit))
        .with_state(upstream.clone());
    let source = source_for(spawn(router).await);

    let selection = decode("region=서울&region=경기&houseTypes=행복주택&deposit_max=30000000&page=2");
    let page = source
        .fetch_units(&selection, 8)
        .await
        .expect("units fetched");

    assert_eq!(page.total_count, 17);
    assert_eq!(page.total_pages(8), 3);
    assert_eq!(page.units[0].complex_name, "강남 행복주택");

    let queries = upstream.queries.lock().expect("query log poisoned").clone();
    assert_eq!(queries.len(), 1);
    let forwarded = decode(&queries[0]);
    assert_eq!(forwarded.regions, vec!["서울", "경기"]);
    assert_eq!(forwarded.house_types, vec!["행복주택"]);
    assert_eq!(forwarded.deposit_range.max, Some(3000));
    assert_eq!(forwarded.page, 2);
    assert!(queries[0].contains("page_size=8"));
}

#[tokio::test]
async fn fetch_unit_reads_contract_bands() {
    let router = Router::new()
        .route("/api/units/:unit_id/", get(unit))
        .with_state(Upstream::default());
    let source = source_for(spawn(router).await);

    let detail = source.fetch_unit(11).await.expect("detail fetched");
    assert_eq!(detail.contracts.len(), 1);
    assert_eq!(detail.contracts[0].quote(6000.0).rent(), 9.0);

    let err = source.fetch_unit(12).await.expect_err("missing unit");
    assert!(err.is_not_found());
    assert_eq!(err.resource(), "unit 12");
}

#[tokio::test]
async fn bare_array_payload_counts_results() {
    let router = Router::new().route(
        "/api/units/",
        get(|| async { Json(json!([{ "id": 1 }, { "id": 2 }, { "id": 3 }])) }),
    );
    let source = source_for(spawn(router).await);

    let page = source
        .fetch_units(&FilterSelection::default(), 8)
        .await
        .expect("units fetched");
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages(8), 1);
}

#[tokio::test]
async fn unreachable_upstream_is_a_fetch_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("port binds");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let source = source_for(Url::parse(&format!("http://{addr}")).expect("valid url"));
    let err = source
        .fetch_units(&FilterSelection::default(), 8)
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[test]
fn units_url_carries_api_query() {
    let source = source_for(Url::parse("http://127.0.0.1:8000").expect("valid url"));
    let url = source
        .units_url(&decode("sizes=0.0,10.0|25.0,&ordering=-deposit"), 8)
        .expect("url builds");
    assert_eq!(url.path(), "/api/units/");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("size".to_string(), "0.0,10.0,25.0,".to_string())));
    assert!(pairs.contains(&("ordering".to_string(), "-deposit".to_string())));
}
