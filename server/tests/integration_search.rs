use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;
use vsm_core::EngineConfig;

const COLLECTION: &str = "\
.I 1
.T
the gas turbine engine
.A
whittle,f.
.B
j. ae. scs. 1, 1950
.W
compressor blades for a gas turbine
.I 2
.T
aircraft wing design
.A
smith,j.
.B
aero quarterly 3, 1952
.W
the lift distribution of a swept wing
.I 3
.T
turbine blade cooling
.A
jones,k.
.B
naca tn 1234
.W
heat transfer in cooled turbine blades
";

const QUERIES: &str = ".I 001\n.W\nturbine engine\n.I 002\n.W\nswept wing lift\n";

fn build_tiny_app() -> Router {
    let dir = tempdir().unwrap();
    let collection = dir.path().join("cran.all");
    let queries = dir.path().join("cran.qry");
    fs::write(&collection, COLLECTION).unwrap();
    fs::write(&queries, QUERIES).unwrap();
    server::build_app(
        &collection.to_string_lossy(),
        Some(&queries.to_string_lossy()),
        EngineConfig::default(),
    )
    .unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let app = build_tiny_app();
    let (status, json) = call(app, "/search?q=turbine%20engine&boost_title=1&boost_abstract=0&k=5").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(json["total_hits"].as_u64().unwrap(), 2);
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"].as_u64().unwrap(), 1);
    assert_eq!(arr[0]["title"].as_str().unwrap(), "the gas turbine engine");
    assert_eq!(arr[1]["doc_id"].as_u64().unwrap(), 3);
    assert!(arr[0]["score"].as_f64().unwrap() > arr[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn invalid_boosts_are_bad_requests() {
    let app = build_tiny_app();
    let (status, _) = call(app, "/search?q=turbine&boost_title=0.6&boost_abstract=0.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stored_queries_can_be_fetched_and_run() {
    let app = build_tiny_app();
    let (status, json) = call(app.clone(), "/query/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"].as_str().unwrap(), "002");
    assert_eq!(json["text"].as_str().unwrap(), "swept wing lift");

    let (status, json) = call(app.clone(), "/query/002/search?k=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["results"][0]["doc_id"].as_u64().unwrap(), 2);

    let (status, _) = call(app, "/query/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn documents_are_looked_up_by_id() {
    let app = build_tiny_app();
    let (status, json) = call(app.clone(), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"].as_str().unwrap(), "aircraft wing design");
    let (status, _) = call(app, "/doc/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
