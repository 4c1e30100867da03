//! Dataset served by the mock: one project with one page.
//!
//! Field names and encodings follow the live service, including counters sent
//! as strings and the `"null"` date of an unpublished page.

use serde_json::{json, Value};

pub const PROJECT_ID: &str = "1234";
pub const PAGE_ID: &str = "12345";
pub const DRAFT_PAGE_ID: &str = "12346";

const DATE: &str = "2021-09-01 15:04:05";
const BODY_HTML: &str = "<div class=\"t-records\"><h1>Hello</h1></div>";
const FULL_HTML: &str =
    "<!DOCTYPE html><html><head><title>Home</title></head><body><div class=\"t-records\"><h1>Hello</h1></div></body></html>";

pub fn projects_list() -> Value {
    json!([
        { "id": PROJECT_ID, "title": "Company site", "descr": "Landing pages" },
        { "id": "1235", "title": "Blog", "descr": "" }
    ])
}

pub fn project_info(project_id: &str) -> Option<Value> {
    (project_id == PROJECT_ID).then(|| {
        json!({
            "id": PROJECT_ID,
            "userid": "42",
            "date": DATE,
            "title": "Company site",
            "descr": "Landing pages",
            "img": "",
            "sort": "10",
            "alias": "company",
            "indexpageid": PAGE_ID,
            "headerpageid": "0",
            "footerpageid": "0",
            "headlinefont": "TildaSans",
            "textfont": "TildaSans",
            "headlinecolor": "#000000",
            "textcolor": "#000000",
            "linkcolor": "#ff8562",
            "customdomain": "example.com",
            "url": "http://project1234.tilda.ws",
            "export_imgpath": "/images",
            "export_csspath": "/css",
            "export_jspath": "/js",
            "export_basepath": "",
            "images": [
                { "from": "https://static.tildacdn.info/img/favicon.ico", "to": "favicon.ico" }
            ]
        })
    })
}

fn page_record(page_id: &str) -> Option<Value> {
    match page_id {
        PAGE_ID => Some(json!({
            "id": PAGE_ID,
            "projectid": PROJECT_ID,
            "title": "Home",
            "descr": "Front page",
            "img": "",
            "featureimg": "",
            "alias": "home",
            "date": DATE,
            "sort": "10",
            "published": "1630508645",
            "filename": "page12345.html"
        })),
        DRAFT_PAGE_ID => Some(json!({
            "id": DRAFT_PAGE_ID,
            "projectid": PROJECT_ID,
            "title": "Draft",
            "descr": "",
            "img": "",
            "featureimg": "",
            "alias": "",
            "date": "null",
            "sort": "20",
            "published": "",
            "filename": "page12346.html"
        })),
        _ => None,
    }
}

fn with(mut record: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), extra) {
        target.extend(fields);
    }
    record
}

fn export_fields() -> Value {
    json!({
        "export_jspath": "/js",
        "export_csspath": "/css",
        "export_imgpath": "/images",
        "export_basepath": "",
        "project_alias": "company",
        "page_alias": "home",
        "project_domain": "example.com",
        "images": [
            { "from": "https://static.tildacdn.info/tild1/hero.jpg", "to": "tild1__hero.jpg" }
        ],
        "js": [
            { "from": "https://static.tildacdn.info/js/tilda-scripts.min.js", "to": "tilda-scripts.min.js", "attrs": ["async"] }
        ],
        "css": [
            { "from": "https://static.tildacdn.info/css/tilda-grid.min.css", "to": "tilda-grid.min.css" }
        ]
    })
}

pub fn pages_list(project_id: &str) -> Option<Value> {
    (project_id == PROJECT_ID).then(|| {
        let pages = [PAGE_ID, DRAFT_PAGE_ID]
            .into_iter()
            .filter_map(page_record)
            .collect();
        Value::Array(pages)
    })
}

pub fn page(page_id: &str) -> Option<Value> {
    page_record(page_id).map(|record| {
        with(
            record,
            json!({
                "html": BODY_HTML,
                "js": ["https://static.tildacdn.info/js/tilda-scripts.min.js"],
                "css": ["https://static.tildacdn.info/css/tilda-grid.min.css"]
            }),
        )
    })
}

pub fn page_full(page_id: &str) -> Option<Value> {
    page_record(page_id).map(|record| with(record, json!({ "html": FULL_HTML })))
}

pub fn page_export(page_id: &str) -> Option<Value> {
    page_record(page_id).map(|record| with(record, export_fields()))
}

pub fn page_full_export(page_id: &str) -> Option<Value> {
    page_export(page_id).map(|record| with(record, json!({ "html": FULL_HTML })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_are_not_found() {
        assert!(project_info("0").is_none());
        assert!(pages_list("0").is_none());
        assert!(page("0").is_none());
        assert!(page_full_export("0").is_none());
    }

    #[test]
    fn export_adds_assets_without_markup() {
        let export = page_export(PAGE_ID).unwrap();
        assert_eq!(export["images"].as_array().unwrap().len(), 1);
        assert!(export.get("html").is_none());

        let full = page_full_export(PAGE_ID).unwrap();
        assert_eq!(full["html"], FULL_HTML);
        assert_eq!(full["js"][0]["attrs"][0], "async");
    }

    #[test]
    fn pages_list_includes_draft() {
        let pages = pages_list(PROJECT_ID).unwrap();
        assert_eq!(pages.as_array().unwrap().len(), 2);
        assert_eq!(pages[1]["date"], "null");
    }
}
