//! Typed wrappers for the read endpoints of the Tilda API.
//!
//! Each operation fixes a path and its id parameter, runs the shared pipeline
//! and unwraps `result` from the envelope. Errors pass through unchanged.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::TildaClient;
use crate::error::TildaError;
use crate::types::{Envelope, Page, PageExport, PageFull, PageFullExport, Project, ProjectInfo};

pub const PROJECTS_LIST_PATH: &str = "/v1/getprojectslist/";
pub const PROJECT_INFO_PATH: &str = "/v1/getprojectinfo/";
pub const PAGES_LIST_PATH: &str = "/v1/getpageslist/";
pub const PAGE_PATH: &str = "/v1/getpage/";
pub const PAGE_FULL_PATH: &str = "/v1/getpagefull/";
pub const PAGE_EXPORT_PATH: &str = "/v1/getpageexport/";
pub const PAGE_FULL_EXPORT_PATH: &str = "/v1/getpagefullexport/";

const PROJECT_ID_PARAM: &str = "projectid";
const PAGE_ID_PARAM: &str = "pageid";

impl TildaClient {
    /// All projects of the account.
    pub fn get_projects_list(&self) -> Result<Vec<Project>, TildaError> {
        debug!("get_projects_list");
        self.fetch_result(PROJECTS_LIST_PATH, &[])
    }

    /// Settings of a single project.
    pub fn get_project_info(&self, project_id: &str) -> Result<ProjectInfo, TildaError> {
        debug!(project_id, "get_project_info");
        self.fetch_result(PROJECT_INFO_PATH, &[(PROJECT_ID_PARAM, project_id.to_string())])
    }

    /// Pages belonging to a project.
    pub fn get_project_pages(&self, project_id: &str) -> Result<Vec<Page>, TildaError> {
        debug!(project_id, "get_project_pages");
        self.fetch_result(PAGES_LIST_PATH, &[(PROJECT_ID_PARAM, project_id.to_string())])
    }

    /// Page metadata with body markup.
    pub fn get_page(&self, page_id: &str) -> Result<Page, TildaError> {
        debug!(page_id, "get_page");
        self.fetch_result(PAGE_PATH, &[(PAGE_ID_PARAM, page_id.to_string())])
    }

    /// Page metadata with the complete HTML document.
    pub fn get_page_full(&self, page_id: &str) -> Result<PageFull, TildaError> {
        debug!(page_id, "get_page_full");
        self.fetch_result(PAGE_FULL_PATH, &[(PAGE_ID_PARAM, page_id.to_string())])
    }

    /// Export bundle for a page: export paths and the assets to copy.
    pub fn get_page_export(&self, page_id: &str) -> Result<PageExport, TildaError> {
        debug!(page_id, "get_page_export");
        self.fetch_result(PAGE_EXPORT_PATH, &[(PAGE_ID_PARAM, page_id.to_string())])
    }

    /// Export bundle for a page together with its complete HTML document.
    pub fn get_page_full_export(&self, page_id: &str) -> Result<PageFullExport, TildaError> {
        debug!(page_id, "get_page_full_export");
        self.fetch_result(PAGE_FULL_EXPORT_PATH, &[(PAGE_ID_PARAM, page_id.to_string())])
    }

    fn fetch_result<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TildaError> {
        let envelope: Envelope<T> = self.execute(path, params)?;
        Ok(envelope.result)
    }
}
