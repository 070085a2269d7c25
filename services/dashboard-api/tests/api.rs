// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dashboard_api::config::{
    FilterStoreSettings, LogFormat, LoggingSettings, ResultsSettings, ServerSettings, StoreBackend,
};
use dashboard_api::{router, state::build_store, AppState, Settings};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use vdbbench_dashboard_core::MemoryFilterStore;
use vdbbench_dashboard_results::LoadPolicy;

fn settings(results: &Path) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        results: ResultsSettings {
            path: results.to_path_buf(),
            policy: LoadPolicy::SkipInvalid,
        },
        logging: LoggingSettings {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        },
        filters: FilterStoreSettings {
            backend: StoreBackend::Memory,
            dir: results.join("filters"),
        },
    }
}

fn case(db: &str, case_id: u32, qps: f64, conc: Option<&str>) -> Value {
    let mut metrics = json!({
        "qps": qps,
        "serial_latency_p99": 0.004,
        "recall": 0.95,
        "load_duration": 0,
        "max_load_count": 0,
    });
    if let Some(conc) = conc {
        metrics["conc_num_list"] = serde_json::from_str(conc).unwrap();
    }
    json!({
        "metrics": metrics,
        "task_config": {
            "db": db,
            "db_config": {},
            "db_case_config": {"index": "HNSW"},
            "case_config": {"case_id": case_id}
        },
        "label": ""
    })
}

fn write_result(dir: &Path, name: &str, cases: Vec<Value>) {
    let body = json!({"run_id": "run", "task_label": "nightly", "results": cases});
    fs::write(dir.join(name), body.to_string()).unwrap();
}

async fn app(dir: &TempDir) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::load(&settings(dir.path()), Arc::new(MemoryFilterStore::new())).await);
    (router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_result(
        dir.path(),
        "result_20240512_run.json",
        vec![
            case("Milvus", 5, 1234.6, Some("[10, 50]")),
            case("PgVector", 5, 310.2, Some("[10, 50]")),
            case("Milvus", 10, 800.0, None),
        ],
    );
    write_result(
        dir.path(),
        "result_20221201_old.json",
        vec![case("Redis", 5, 5000.0, None)],
    );
    dir
}

#[tokio::test]
async fn test_health() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["files"], 2);
    assert_eq!(body["records"], 4);
}

#[tokio::test]
async fn test_results_endpoint() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let (status, body) = send(&app, get("/api/v1/results")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chart_data"].as_array().unwrap().len(), 4);
    assert_eq!(body["file_count"], 2);

    let milvus = body["chart_data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["db_label"] == "Milvus (HNSW, 10, 50T)")
        .expect("milvus performance record");
    assert_eq!(milvus["qps"], 1235.0);
    assert_eq!(milvus["serial_latency_p99"], 4.0);
    assert_eq!(milvus["file_date"], "2024-05-12");
    assert_eq!(milvus["filename"], "result_20240512_run.json");
}

#[tokio::test]
async fn test_options_endpoint() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let (status, body) = send(&app, get("/api/v1/options")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["min_start_date"], "2023-01-01");

    let titles: Vec<_> = body["case_groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["768D Performance Tests", "1536D Performance Tests"]);
}

#[tokio::test]
async fn test_charts_with_query() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let (status, body) = send(
        &app,
        get("/api/v1/charts?dbs=Milvus,PgVector,Redis&cases=5&since=2023-01-01"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let panels = body["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0]["case_id"], 5);
    assert_eq!(panels[0]["label"], "Performance (1M, 768D)");

    let qps = &panels[0]["charts"][0];
    assert_eq!(qps["metric"], "qps");
    let dbs: Vec<_> = qps["bars"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["db_name"].as_str().unwrap().to_string())
        .collect();
    // Redis is dated before the start date
    assert_eq!(dbs, vec!["Milvus", "PgVector"]);

    assert_eq!(body["files"]["count"], 1);
}

#[tokio::test]
async fn test_charts_rejects_bad_date() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let (status, body) = send(&app, get("/api/v1/charts?since=yesterday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATE");
}

#[tokio::test]
async fn test_filter_profile_round_trip() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let (status, defaults) = send(&app, get("/api/v1/filters/team")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(defaults["selected_cases"], json!([5]));
    assert_eq!(defaults["start_date"], "2023-01-01");

    let saved = json!({
        "selected_dbs": ["Milvus"],
        "selected_cases": [10],
        "start_date": "2024-01-01"
    });
    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/filters/team")
        .header("content-type", "application/json")
        .header("x-request-id", "req-42")
        .body(Body::from(saved.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let (_, loaded) = send(&app, get("/api/v1/filters/team")).await;
    assert_eq!(loaded, saved);

    let (_, body) = send(&app, get("/api/v1/charts?profile=team")).await;
    let panels = body["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0]["case_id"], 10);
}

#[tokio::test]
async fn test_invalid_profile_name() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let (status, body) = send(&app, get("/api/v1/filters/bad.name")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PROFILE");
}

#[tokio::test]
async fn test_reload_picks_up_new_files() {
    let dir = fixture();
    let (app, state) = app(&dir).await;
    assert_eq!(state.results().await.file_count(), 2);

    write_result(
        dir.path(),
        "result_20240601_new.json",
        vec![case("Qdrant", 1, 0.0, None)],
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/reload")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["files"], 3);
    assert_eq!(body["records"], 5);
    assert!(!body["request_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_results_dir_serves_empty_data() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let state = AppState::load(&settings(&missing), Arc::new(MemoryFilterStore::new())).await;
    let app = router(Arc::new(state));

    let (status, body) = send(&app, get("/api/v1/charts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["panels"], json!([]));
    assert_eq!(body["files"]["count"], 0);
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let dir = fixture();
    let (app, _) = app(&dir).await;

    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reloads_publish_latest_scan() {
    let dir = fixture();
    let (_, state) = app(&dir).await;

    write_result(
        dir.path(),
        "result_20240601_new.json",
        vec![case("Qdrant", 5, 700.0, None)],
    );

    let reloads: Vec<_> = (0..8)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move { state.reload().await.file_count() })
        })
        .collect();
    for reload in reloads {
        assert_eq!(reload.await.unwrap(), 3);
    }

    let results = state.results().await;
    assert_eq!(results.file_count(), 3);
    assert!(results.db_names.contains(&"Qdrant".to_string()));
}

#[tokio::test]
async fn test_file_backed_profiles_survive_restart() {
    let dir = fixture();
    let mut settings = settings(dir.path());
    settings.filters.backend = StoreBackend::File;

    let store = build_store(&settings.filters).unwrap();
    let app = router(Arc::new(AppState::load(&settings, store).await));

    let saved = json!({
        "selected_dbs": ["PgVector"],
        "selected_cases": [5],
        "start_date": "2024-01-01"
    });
    let request = Request::builder()
        .method("PUT")
        .uri("/api/v1/filters/nightly")
        .header("content-type", "application/json")
        .body(Body::from(saved.to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join("filters").join("nightly.json").exists());

    let store = build_store(&settings.filters).unwrap();
    let restarted = router(Arc::new(AppState::load(&settings, store).await));
    let (status, loaded) = send(&restarted, get("/api/v1/filters/nightly")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, saved);

    let (_, body) = send(&restarted, get("/api/v1/charts?profile=nightly")).await;
    let bars = body["panels"][0]["charts"][0]["bars"].as_array().unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0]["db_name"], "PgVector");
}
