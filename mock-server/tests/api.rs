use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_keys, ApiKeys, PAGE_ID, PROJECT_ID};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const KEYS: &str = "publickey=public&secretkey=secret";

// --- projects ---

#[tokio::test]
async fn projects_list_found() {
    let resp = app()
        .oneshot(get(&format!("/v1/getprojectslist/?{KEYS}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "FOUND");
    assert_eq!(body["result"][0]["id"], PROJECT_ID);
}

#[tokio::test]
async fn wrong_secret_is_error_inside_200() {
    let resp = app()
        .oneshot(get("/v1/getprojectslist/?publickey=public&secretkey=wrong"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["message"], "Wrong Secret key");
}

#[tokio::test]
async fn custom_keys_are_enforced() {
    let app = app_with_keys(ApiKeys::new("pk", "sk"));
    let resp = app
        .clone()
        .oneshot(get(&format!("/v1/getprojectslist/?{KEYS}")))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["status"], "ERROR");

    let resp = app
        .oneshot(get("/v1/getprojectslist/?publickey=pk&secretkey=sk"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["status"], "FOUND");
}

#[tokio::test]
async fn project_info_by_id() {
    let resp = app()
        .oneshot(get(&format!("/v1/getprojectinfo/?{KEYS}&projectid={PROJECT_ID}")))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["status"], "FOUND");
    assert_eq!(body["result"]["alias"], "company");
}

#[tokio::test]
async fn pages_list_unknown_project() {
    let resp = app()
        .oneshot(get(&format!("/v1/getpageslist/?{KEYS}&projectid=999")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ERROR");
}

// --- pages ---

#[tokio::test]
async fn every_page_endpoint_finds_the_page() {
    for path in [
        "/v1/getpage/",
        "/v1/getpagefull/",
        "/v1/getpageexport/",
        "/v1/getpagefullexport/",
    ] {
        let resp = app()
            .oneshot(get(&format!("{path}?{KEYS}&pageid={PAGE_ID}")))
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["status"], "FOUND", "{path}");
        assert_eq!(body["result"]["id"], PAGE_ID, "{path}");
    }
}

#[tokio::test]
async fn page_without_id_is_error() {
    let resp = app()
        .oneshot(get(&format!("/v1/getpage/?{KEYS}")))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["message"], "Parameter pageid is required");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app()
        .oneshot(get(&format!("/v1/getnothing/?{KEYS}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
