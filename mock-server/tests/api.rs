use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, CheckList, ErrorBody, Status, INVALID_REQUEST};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const BUILDING_A: &str =
    r#"{"building":"Building A","status":"Pass","date":"2023-04-08","inspector":"John Doe"}"#;
const BUILDING_B: &str = r#"{"building":"Building B","status":"Fail","date":"2023-04-09"}"#;

// --- list ---

#[tokio::test]
async fn list_checklists_empty() {
    let resp = app().oneshot(get_request("/checklists")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let checklists: Vec<CheckList> = body_json(resp).await;
    assert!(checklists.is_empty());
}

#[tokio::test]
async fn list_rejects_unknown_status() {
    let resp = app()
        .oneshot(get_request("/checklists?status=Maybe"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, INVALID_REQUEST);
    assert!(body.details.unwrap().contains_key("status"));
}

// --- create ---

#[tokio::test]
async fn create_checklist_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/checklists", BUILDING_A))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let checklist: CheckList = body_json(resp).await;
    assert_eq!(checklist.id, 1);
    assert_eq!(checklist.building, "Building A");
    assert_eq!(checklist.status, Status::Pass);
    assert_eq!(checklist.inspector.as_deref(), Some("John Doe"));
    assert!(checklist.notes.is_none());
}

#[tokio::test]
async fn create_checklist_reports_each_invalid_field() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/checklists",
            r#"{"building":"","status":"Maybe","date":"2023-02-30"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, INVALID_REQUEST);
    let details = body.details.unwrap();
    assert_eq!(details["building"], vec!["building must not be empty"]);
    assert_eq!(details["status"], vec!["status must be Pass or Fail"]);
    assert_eq!(details["date"], vec!["date must be a valid YYYY-MM-DD date"]);
}

#[tokio::test]
async fn create_checklist_malformed_json_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/checklists", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, INVALID_REQUEST);
    assert!(body.details.is_none());
}

// --- get ---

#[tokio::test]
async fn get_checklist_not_found() {
    let resp = app().oneshot(get_request("/checklists/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.message, "Checklist not found");
}

#[tokio::test]
async fn get_checklist_bad_id_returns_400() {
    let resp = app()
        .oneshot(get_request("/checklists/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(
        body.details.unwrap()["id"],
        vec!["id must be an integer number"]
    );
}

// --- full lifecycle ---

#[tokio::test]
async fn create_list_filter_get_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    for payload in [BUILDING_A, BUILDING_B] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/checklists", payload))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // list: insertion order, ids assigned sequentially
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/checklists"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let checklists: Vec<CheckList> = body_json(resp).await;
    let ids: Vec<u64> = checklists.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2]);

    // list filtered by status
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/checklists?status=Fail"))
        .await
        .unwrap();
    let failed: Vec<CheckList> = body_json(resp).await;
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].building, "Building B");

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/checklists/2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: CheckList = body_json(resp).await;
    assert_eq!(fetched.id, 2);
    assert_eq!(fetched.status, Status::Fail);
}
