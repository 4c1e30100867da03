//! In-process stand-in for the Tilda read API.
//!
//! Serves the seven `/v1/...` endpoints from a small fixed dataset. Like the
//! real service it answers logical errors (bad keys, unknown ids) with HTTP 200
//! and `{"status":"ERROR"}`, which is exactly what clients have to cope with.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

mod fixtures;

pub use fixtures::{PAGE_ID, PROJECT_ID};

/// Key pair the server accepts.
#[derive(Clone, Debug)]
pub struct ApiKeys {
    pub public_key: String,
    pub secret_key: String,
}

impl ApiKeys {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// `TILDA_PUBLIC_KEY` / `TILDA_SECRET_KEY`, falling back to `public` / `secret`.
    pub fn from_env() -> Self {
        let public_key = std::env::var("TILDA_PUBLIC_KEY").unwrap_or_else(|_| "public".to_string());
        let secret_key = std::env::var("TILDA_SECRET_KEY").unwrap_or_else(|_| "secret".to_string());
        Self::new(public_key, secret_key)
    }
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self::new("public", "secret")
    }
}

/// Query string accepted by every endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ApiQuery {
    pub publickey: Option<String>,
    pub secretkey: Option<String>,
    pub projectid: Option<String>,
    pub pageid: Option<String>,
}

pub type Keys = Arc<ApiKeys>;

pub fn app() -> Router {
    app_with_keys(ApiKeys::default())
}

pub fn app_with_keys(keys: ApiKeys) -> Router {
    Router::new()
        .route("/v1/getprojectslist/", get(projects_list))
        .route("/v1/getprojectinfo/", get(project_info))
        .route("/v1/getpageslist/", get(pages_list))
        .route("/v1/getpage/", get(page))
        .route("/v1/getpagefull/", get(page_full))
        .route("/v1/getpageexport/", get(page_export))
        .route("/v1/getpagefullexport/", get(page_full_export))
        .with_state(Arc::new(keys))
}

pub async fn run(listener: TcpListener, keys: ApiKeys) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Tilda API listening");
    }
    axum::serve(listener, app_with_keys(keys)).await
}

fn found(result: Value) -> Json<Value> {
    Json(json!({ "status": "FOUND", "result": result }))
}

fn error(message: &str) -> Json<Value> {
    Json(json!({ "status": "ERROR", "message": message }))
}

fn authorize(keys: &ApiKeys, query: &ApiQuery) -> Result<(), Json<Value>> {
    if query.publickey.as_deref() != Some(keys.public_key.as_str()) {
        return Err(error("Wrong Public key"));
    }
    if query.secretkey.as_deref() != Some(keys.secret_key.as_str()) {
        return Err(error("Wrong Secret key"));
    }
    Ok(())
}

/// Check keys, then look `id` up with `lookup`.
fn respond(
    keys: &ApiKeys,
    query: &ApiQuery,
    id: Option<&str>,
    id_name: &str,
    lookup: fn(&str) -> Option<Value>,
) -> Json<Value> {
    if let Err(denied) = authorize(keys, query) {
        debug!("rejected request with wrong keys");
        return denied;
    }
    let Some(id) = id else {
        return error(&format!("Parameter {id_name} is required"));
    };
    match lookup(id) {
        Some(result) => found(result),
        None => error(&format!("Not found {id_name} {id}")),
    }
}

async fn projects_list(State(keys): State<Keys>, Query(query): Query<ApiQuery>) -> Json<Value> {
    match authorize(&keys, &query) {
        Ok(()) => found(fixtures::projects_list()),
        Err(denied) => denied,
    }
}

async fn project_info(State(keys): State<Keys>, Query(query): Query<ApiQuery>) -> Json<Value> {
    respond(&keys, &query, query.projectid.as_deref(), "projectid", fixtures::project_info)
}

async fn pages_list(State(keys): State<Keys>, Query(query): Query<ApiQuery>) -> Json<Value> {
    respond(&keys, &query, query.projectid.as_deref(), "projectid", fixtures::pages_list)
}

async fn page(State(keys): State<Keys>, Query(query): Query<ApiQuery>) -> Json<Value> {
    respond(&keys, &query, query.pageid.as_deref(), "pageid", fixtures::page)
}

async fn page_full(State(keys): State<Keys>, Query(query): Query<ApiQuery>) -> Json<Value> {
    respond(&keys, &query, query.pageid.as_deref(), "pageid", fixtures::page_full)
}

async fn page_export(State(keys): State<Keys>, Query(query): Query<ApiQuery>) -> Json<Value> {
    respond(&keys, &query, query.pageid.as_deref(), "pageid", fixtures::page_export)
}

async fn page_full_export(State(keys): State<Keys>, Query(query): Query<ApiQuery>) -> Json<Value> {
    respond(&keys, &query, query.pageid.as_deref(), "pageid", fixtures::page_full_export)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(public: &str, secret: &str) -> ApiQuery {
        ApiQuery {
            publickey: Some(public.to_string()),
            secretkey: Some(secret.to_string()),
            ..ApiQuery::default()
        }
    }

    #[test]
    fn authorize_accepts_matching_keys() {
        assert!(authorize(&ApiKeys::default(), &query("public", "secret")).is_ok());
    }

    #[test]
    fn authorize_names_the_wrong_key() {
        let Json(body) = authorize(&ApiKeys::default(), &query("public", "nope")).unwrap_err();
        assert_eq!(body["status"], "ERROR");
        assert_eq!(body["message"], "Wrong Secret key");

        let Json(body) = authorize(&ApiKeys::default(), &ApiQuery::default()).unwrap_err();
        assert_eq!(body["message"], "Wrong Public key");
    }

    #[test]
    fn respond_requires_the_id_parameter() {
        let Json(body) = respond(
            &ApiKeys::default(),
            &query("public", "secret"),
            None,
            "pageid",
            fixtures::page,
        );
        assert_eq!(body["status"], "ERROR");
        assert_eq!(body["message"], "Parameter pageid is required");
    }

    #[test]
    fn respond_wraps_found_result() {
        let Json(body) = respond(
            &ApiKeys::default(),
            &query("public", "secret"),
            Some(PAGE_ID),
            "pageid",
            fixtures::page,
        );
        assert_eq!(body["status"], "FOUND");
        assert_eq!(body["result"]["id"], PAGE_ID);
    }

    #[test]
    fn api_keys_default_to_public_secret() {
        let keys = ApiKeys::default();
        assert_eq!(keys.public_key, "public");
        assert_eq!(keys.secret_key, "secret");
    }
}
