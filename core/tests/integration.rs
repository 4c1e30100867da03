//! End-to-end run of every resource operation against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the client over real
//! HTTP with the default `UreqTransport`. Catches schema drift between the
//! client models and the JSON the server emits.

use std::net::SocketAddr;

use tilda_core::{Credentials, TildaClient, TildaError};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, mock_server::ApiKeys::default()).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr, secret: &str) -> TildaClient {
    TildaClient::builder(Credentials::new("public", secret))
        .base_url(format!("http://{addr}"))
        .build()
}

#[test]
fn read_api_round_trip() {
    let addr = start_server();
    let client = client(addr, "secret");

    // Step 1: list projects.
    let projects = client.get_projects_list().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, mock_server::PROJECT_ID);
    assert_eq!(projects[0].description, "Landing pages");

    // Step 2: project settings.
    let info = client.get_project_info(mock_server::PROJECT_ID).unwrap();
    assert_eq!(info.alias, "company");
    assert_eq!(info.index_page_id, mock_server::PAGE_ID);
    assert_eq!(info.date.to_string(), "2021-09-01 15:04:05");
    assert_eq!(info.images.len(), 1);

    // Step 3: pages of the project, including an unpublished draft.
    let pages = client.get_project_pages(mock_server::PROJECT_ID).unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].sort, 10);
    assert!(pages[1].date.is_zero());
    assert_eq!(pages[1].published, 0);

    // Step 4: page body.
    let page = client.get_page(mock_server::PAGE_ID).unwrap();
    assert!(page.html.contains("t-records"));
    assert_eq!(page.js.len(), 1);
    assert_eq!(page.published, 1_630_508_645);

    // Step 5: full page document.
    let full = client.get_page_full(mock_server::PAGE_ID).unwrap();
    assert!(full.html.starts_with("<!DOCTYPE html>"));

    // Step 6: export bundle without markup.
    let export = client.get_page_export(mock_server::PAGE_ID).unwrap();
    assert_eq!(export.project_alias, "company");
    assert_eq!(export.images[0].to, "tild1__hero.jpg");
    assert_eq!(export.js[0].attrs, vec!["async".to_string()]);
    assert_eq!(export.css.len(), 1);

    // Step 7: export bundle with markup.
    let full_export = client.get_page_full_export(mock_server::PAGE_ID).unwrap();
    assert_eq!(full_export.export, export);
    assert!(full_export.html.starts_with("<!DOCTYPE html>"));

    // Step 8: same call twice yields the same value.
    assert_eq!(client.get_page(mock_server::PAGE_ID).unwrap(), page);
}

#[test]
fn logical_errors_arrive_as_invalid_status() {
    let addr = start_server();

    // Wrong key: HTTP 200, status ERROR.
    let err = client(addr, "wrong").get_projects_list().unwrap_err();
    match &err {
        TildaError::InvalidStatus { code, status, body, .. } => {
            assert_eq!(*code, 200);
            assert_eq!(status.as_deref(), Some("ERROR"));
            assert!(body.contains("Wrong Secret key"));
        }
        other => panic!("expected InvalidStatus, got {other:?}"),
    }

    // Unknown page id.
    let err = client(addr, "secret").get_page("0").unwrap_err();
    assert!(matches!(err, TildaError::InvalidStatus { .. }));
}

#[test]
fn unknown_endpoint_is_unexpected_status() {
    let addr = start_server();
    let err = client(addr, "secret")
        .execute::<serde_json::Value>("/v1/getnothing/", &[])
        .unwrap_err();
    assert!(matches!(err, TildaError::UnexpectedStatus { code: 404, .. }));
}
