mod common;

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use common::fixture;
use zenin_client::data_source::resolve_folder;
use zenin_client::model::{Band, RunConfig};
use zenin_client::workflow::RunSubmission;
use zenin_client::{ApiBase, Backend, HttpBackend, SelectedFile};

/// A multipart field as the server saw it.
#[derive(Debug, Clone, PartialEq)]
struct Field {
    name: String,
    file_name: Option<String>,
    body: Vec<u8>,
}

#[derive(Debug, Clone)]
struct Received {
    path: String,
    fields: Vec<Field>,
    json: Option<Value>,
}

type Log = Arc<Mutex<Vec<Received>>>;

fn run_json() -> Value {
    serde_json::from_str(&fixture("run_result.json")).unwrap()
}

async fn read_fields(mut multipart: Multipart) -> Vec<Field> {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let body = field.bytes().await.unwrap().to_vec();
        fields.push(Field { name, file_name, body });
    }
    fields
}

async fn upload(State(log): State<Log>, multipart: Multipart) -> Json<Value> {
    let fields = read_fields(multipart).await;
    log.lock().unwrap().push(Received {
        path: "/run/upload".to_string(),
        fields,
        json: None,
    });
    Json(run_json())
}

async fn upload_batch(State(log): State<Log>, multipart: Multipart) -> Json<Value> {
    let fields = read_fields(multipart).await;
    log.lock().unwrap().push(Received {
        path: "/run/upload-batch".to_string(),
        fields,
        json: None,
    });
    Json(run_json())
}

async fn batch(State(log): State<Log>, Json(body): Json<Value>) -> Response {
    log.lock().unwrap().push(Received {
        path: "/run/batch".to_string(),
        fields: Vec::new(),
        json: Some(body.clone()),
    });
    if body["window_secs"] == 0 {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "bad window_secs"}))).into_response();
    }
    Json(run_json()).into_response()
}

async fn single(State(log): State<Log>, Json(body): Json<Value>) -> Json<Value> {
    log.lock().unwrap().push(Received {
        path: "/run/single".to_string(),
        fields: Vec::new(),
        json: Some(body),
    });
    Json(run_json())
}

async fn plots(Path(run_id): Path<String>) -> Response {
    if run_id == "empty" {
        return Json(json!({"plots": []})).into_response();
    }
    Json(json!({"plots": ["band_stats/alpha.png", "profiles/YARATICI_LIDER.png"]})).into_response()
}

async fn plot_image(Path((_run_id, name)): Path<(String, String)>) -> Vec<u8> {
    name.into_bytes()
}

async fn summary(Path(run_id): Path<String>) -> Response {
    if run_id == "nosummary" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": format!("Summary file for run {} not found", run_id)})),
        )
            .into_response();
    }
    fixture("summary.json").into_response()
}

async fn run_log(Path(run_id): Path<String>) -> String {
    format!("run,{}\n", run_id)
}

async fn profile(Path(id): Path<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": format!("Profile set {} not found", id)})),
    )
        .into_response()
}

async fn start_server() -> (HttpBackend, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/run/upload", post(upload))
        .route("/run/upload-batch", post(upload_batch))
        .route("/run/batch", post(batch))
        .route("/run/single", post(single))
        .route("/runs/:run_id/plots", get(plots))
        .route("/runs/:run_id/plots/*name", get(plot_image))
        .route("/runs/:run_id/summary", get(summary))
        .route("/runs/:run_id/log", get(run_log))
        .route("/profiles/:id", get(profile))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = ApiBase::parse(&format!("http://{}", addr)).unwrap();
    (HttpBackend::new(base), log)
}

fn csv(name: &str, body: &str) -> SelectedFile {
    SelectedFile::new(name, body.as_bytes().to_vec())
}

#[tokio::test]
async fn test_folder_upload_sends_every_file_and_config() {
    let (backend, log) = start_server().await;
    let payload = resolve_folder(
        vec![csv("s1.csv", "1"), csv("notes.txt", "x"), csv("s2.csv", "22"), csv("s3.csv", "333")],
        "csv",
    );

    let mut config = RunConfig::default();
    config.band_thresholds.remove(&Band::Beta);
    let mut submission = RunSubmission::new();
    submission.submit(&backend, Some(&config), payload.as_ref()).await.unwrap();
    assert_eq!(submission.result().unwrap().run_id, "20250314_101500");

    let received = log.lock().unwrap().clone();
    let upload = received.iter().find(|r| r.path.starts_with("/run/upload")).unwrap();
    assert_eq!(upload.path, "/run/upload-batch");

    let files: Vec<&Field> = upload.fields.iter().filter(|f| f.name == "files").collect();
    assert_eq!(files.len(), 3);
    assert_eq!(files[2].file_name.as_deref(), Some("s3.csv"));
    assert_eq!(files[2].body, b"333");

    let config_fields: Vec<&Field> = upload.fields.iter().filter(|f| f.name == "config").collect();
    assert_eq!(config_fields.len(), 1);
    let sent: Value = serde_json::from_slice(&config_fields[0].body).unwrap();
    assert_eq!(sent["band_thresholds"].as_object().unwrap().len(), 5);
    assert_eq!(sent["band_thresholds"]["Beta"]["dusuk_orta"], 22.0);
}

#[tokio::test]
async fn test_single_upload_sends_one_file() {
    let (backend, log) = start_server().await;
    let file = csv("session.csv", "a,b\n1,2\n");
    backend.run_upload(&RunConfig::default(), &file).await.unwrap();

    let received = log.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "/run/upload");
    let names: Vec<&str> = received[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["file", "config"]);
    assert_eq!(received[0].fields[0].file_name.as_deref(), Some("session.csv"));
}

#[tokio::test]
async fn test_validation_error_detail_reaches_the_page() {
    let (backend, _log) = start_server().await;
    let mut config = RunConfig::default();
    config.window_secs = 0;
    config.data_root = Some("/srv/recordings".to_string());

    let mut submission = RunSubmission::new();
    let request = submission.begin_server_batch(Some(&config)).unwrap();
    submission.run(&backend, request).await;
    assert_eq!(submission.error(), Some("[422] bad window_secs"));
}

#[tokio::test]
async fn test_server_single_embeds_config_and_path() {
    let (backend, log) = start_server().await;
    backend
        .run_single(&RunConfig::default(), "/srv/recordings/s1.csv")
        .await
        .unwrap();

    let received = log.lock().unwrap().clone();
    let body = received[0].json.as_ref().unwrap();
    assert_eq!(body["csv_path"], "/srv/recordings/s1.csv");
    assert_eq!(body["config"]["profile_set_id"], "meditasyon");
    assert_eq!(body["config"]["denge_mean_threshold"], 46.0);
}

#[tokio::test]
async fn test_artifacts() {
    let (backend, _log) = start_server().await;

    let plots = backend.list_plots("r1").await.unwrap();
    assert_eq!(plots, vec!["band_stats/alpha.png", "profiles/YARATICI_LIDER.png"]);
    assert!(backend.list_plots("empty").await.unwrap().is_empty());

    let image = backend.plot_image("r1", "band_stats/alpha.png").await.unwrap();
    assert_eq!(image, b"band_stats/alpha.png");

    assert_eq!(backend.run_log("r1").await.unwrap(), "run,r1\n");

    let data = backend.summary_data("r1").await.unwrap();
    let names: Vec<&str> = data.sheet_names().collect();
    assert_eq!(names, vec!["Profile Summary", "Per File", "Empty"]);

    let err = backend.summary_data("nosummary").await.unwrap_err();
    assert_eq!(err.status, Some(404));
    assert_eq!(err.detail_or("Failed to load summary"), "Summary file for run nosummary not found");
}

#[tokio::test]
async fn test_not_found_detail() {
    let (backend, _log) = start_server().await;
    let err = backend.get_profile_set("ghost").await.unwrap_err();
    assert_eq!(err.user_message("x"), "[404] Profile set ghost not found");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(ApiBase::parse(&format!("http://{}", addr)).unwrap());
    let err = backend.list_runs().await.unwrap_err();
    assert_eq!(err.status, None);
    assert!(err.transport.is_some());
}
