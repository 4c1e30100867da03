//! Resource shapes returned by the Tilda API.
//!
//! # Design
//! These are plain records mirroring the service's JSON field names. Every
//! struct tolerates missing fields (they fall back to defaults) because the
//! service omits keys freely between endpoints. Counters such as `sort` and
//! `published` arrive as strings and are decoded into integers.

use serde::{Deserialize, Serialize};

use crate::datetime::DateTime;

/// Outer object of every response: `{"status": ..., "result": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub status: String,
    pub result: T,
}

/// Summary entry from the projects list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(rename = "descr")]
    pub description: String,
}

/// Full project settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectInfo {
    pub id: String,
    #[serde(rename = "userid")]
    pub user_id: String,
    pub date: DateTime,
    pub title: String,
    #[serde(rename = "descr")]
    pub description: String,
    pub img: String,
    pub sort: String,
    pub alias: String,
    #[serde(rename = "indexpageid")]
    pub index_page_id: String,
    #[serde(rename = "headerpageid")]
    pub header_page_id: String,
    #[serde(rename = "footerpageid")]
    pub footer_page_id: String,
    #[serde(rename = "headlinefont")]
    pub headline_font: String,
    #[serde(rename = "textfont")]
    pub text_font: String,
    #[serde(rename = "headlinecolor")]
    pub headline_color: String,
    #[serde(rename = "textcolor")]
    pub text_color: String,
    #[serde(rename = "linkcolor")]
    pub link_color: String,
    #[serde(rename = "linkfontweight")]
    pub link_font_weight: String,
    #[serde(rename = "linklinecolor")]
    pub link_line_color: String,
    #[serde(rename = "linklineheight")]
    pub link_line_height: String,
    #[serde(rename = "linecolor")]
    pub line_color: String,
    #[serde(rename = "bgcolor")]
    pub bg_color: String,
    #[serde(rename = "googleanalyticsid")]
    pub google_analytics_id: String,
    #[serde(rename = "googletmid")]
    pub google_tm_id: String,
    #[serde(rename = "customdomain")]
    pub custom_domain: String,
    pub url: String,
    #[serde(rename = "isexample")]
    pub is_example: String,
    #[serde(rename = "textfontsize")]
    pub text_font_size: String,
    #[serde(rename = "textfontweight")]
    pub text_font_weight: String,
    #[serde(rename = "headlinefontweight")]
    pub headline_font_weight: String,
    #[serde(rename = "nosearch")]
    pub no_search: String,
    #[serde(rename = "yandexmetrikaid")]
    pub yandex_metrika_id: String,
    #[serde(rename = "export_imgpath")]
    pub export_img_path: String,
    #[serde(rename = "export_csspath")]
    pub export_css_path: String,
    #[serde(rename = "export_jspath")]
    pub export_js_path: String,
    #[serde(rename = "export_basepath")]
    pub export_base_path: String,
    #[serde(rename = "viewlogin")]
    pub view_login: String,
    #[serde(rename = "viewpassword")]
    pub view_password: String,
    #[serde(rename = "viewips")]
    pub view_ips: String,
    pub copyright: String,
    #[serde(rename = "headcode")]
    pub head_code: String,
    #[serde(rename = "userpayment")]
    pub user_payment: String,
    #[serde(rename = "formskey")]
    pub forms_key: String,
    pub info_type: String,
    pub info_tags: String,
    #[serde(rename = "page404id")]
    pub page_404_id: String,
    #[serde(rename = "myfonts_json")]
    pub my_fonts_json: String,
    pub is_email: String,
    pub kind: String,
    pub blocked: String,
    pub trash: String,
    pub cnt_folders: String,
    pub cnt_collabs: String,
    pub collabs: String,
    #[serde(rename = "designeridn")]
    pub designer_idn: String,
    pub changed: String,
    pub images: Vec<Image>,
}

/// Page record from `getpage` and the project pages list.
///
/// `html` holds the body markup only; `js`/`css` are plain URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Page {
    pub id: String,
    #[serde(rename = "projectid")]
    pub project_id: String,
    pub title: String,
    #[serde(rename = "descr")]
    pub description: String,
    pub img: String,
    #[serde(rename = "featureimg")]
    pub feature_img: String,
    pub alias: String,
    pub date: DateTime,
    #[serde(with = "string_int")]
    pub sort: i64,
    #[serde(with = "string_int")]
    pub published: i64,
    pub html: String,
    pub filename: String,
    pub js: Vec<String>,
    pub css: Vec<String>,
}

/// Page record from `getpagefull`: complete HTML document, no asset lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageFull {
    pub id: String,
    #[serde(rename = "projectid")]
    pub project_id: String,
    pub title: String,
    #[serde(rename = "descr")]
    pub description: String,
    pub img: String,
    #[serde(rename = "featureimg")]
    pub feature_img: String,
    pub alias: String,
    pub date: DateTime,
    #[serde(with = "string_int")]
    pub sort: i64,
    #[serde(with = "string_int")]
    pub published: i64,
    pub html: String,
    pub filename: String,
}

/// Page record from `getpageexport`: export paths and the assets to copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageExport {
    pub id: String,
    #[serde(rename = "projectid")]
    pub project_id: String,
    pub date: DateTime,
    pub title: String,
    #[serde(rename = "descr")]
    pub description: String,
    pub img: String,
    #[serde(with = "string_int")]
    pub sort: i64,
    #[serde(with = "string_int")]
    pub published: i64,
    #[serde(rename = "featureimg")]
    pub feature_img: String,
    pub alias: String,
    pub filename: String,
    #[serde(rename = "export_jspath")]
    pub export_js_path: String,
    #[serde(rename = "export_csspath")]
    pub export_css_path: String,
    #[serde(rename = "export_imgpath")]
    pub export_img_path: String,
    #[serde(rename = "export_basepath")]
    pub export_base_path: String,
    pub project_alias: String,
    pub page_alias: String,
    pub project_domain: String,
    pub images: Vec<Image>,
    pub js: Vec<Js>,
    pub css: Vec<Css>,
}

/// Page record from `getpagefullexport`: the export bundle plus the full HTML.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageFullExport {
    #[serde(flatten)]
    pub export: PageExport,
    #[serde(default)]
    pub html: String,
}

/// Image to copy from the CDN (`from`) to the export location (`to`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Image {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Js {
    pub from: String,
    pub to: String,
    pub attrs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Css {
    pub from: String,
    pub to: String,
}

/// Integers the service encodes as JSON strings (`"sort": "10"`).
///
/// Plain numbers and `null` are accepted too; an empty string reads as 0.
mod string_int {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(StringIntVisitor)
    }

    struct StringIntVisitor;

    impl<'de> Visitor<'de> for StringIntVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value).map_err(|_| E::custom(format!("integer {value} out of range")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }
}
