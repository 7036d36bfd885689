// SPDX-License-Identifier: MIT

//! Study draft endpoints: initiate, per-section get/save, attachment, submit

use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::Path;

use super::client::{ApiClient, Body};
use super::models::{
    GeneralResponse, PaginationRequest, PaginationResponse, Section, StudyInitialData,
    StudySummary,
};
use crate::error::{PortalError, Result};
use crate::forms::validation::ValidationErrors;
use reqwest::Method;

pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;
const PDF_MIME: &str = "application/pdf";

/// A file ready for multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read a PDF of at most 5 MB from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        check_pdf(path).map_err(PortalError::Validation)?;

        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment.pdf".to_string());

        Ok(Self {
            file_name,
            mime: PDF_MIME.to_string(),
            bytes,
        })
    }
}

/// File rules for the ethical approval attachment, reported on `attachment`
pub fn check_pdf(path: &Path) -> std::result::Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    match fs::metadata(path) {
        Err(_) => errors.add("attachment", "File not found"),
        Ok(meta) if meta.len() > MAX_ATTACHMENT_BYTES => {
            errors.add("attachment", "Max file size is 5 MB")
        }
        Ok(_) if !is_pdf => errors.add("attachment", "Only PDF files are allowed"),
        Ok(_) => {}
    }
    errors.into_result()
}

/// Study endpoints used by the creation and review wizards
#[async_trait]
pub trait StudyApi: Send + Sync {
    async fn initiate(&self) -> Result<GeneralResponse<StudyInitialData>>;

    async fn get_section(&self, section: Section, study_id: &str) -> Result<GeneralResponse<Value>>;

    /// Save one section; `payload` already carries `studyId` and `isDraft`
    async fn save_section(&self, section: Section, payload: Value) -> Result<GeneralResponse<Value>>;

    async fn upload_ethical_attachment(
        &self,
        study_id: &str,
        attachment: &Attachment,
    ) -> Result<GeneralResponse<Value>>;

    async fn submit(&self, study_id: &str) -> Result<GeneralResponse<Value>>;

    async fn list_studies(&self, query: &PaginationRequest) -> Result<PaginationResponse<StudySummary>>;

    async fn delete_study(&self, study_id: &str) -> Result<GeneralResponse<Value>>;
}

#[async_trait]
impl StudyApi for ApiClient {
    async fn initiate(&self) -> Result<GeneralResponse<StudyInitialData>> {
        self.post_empty("Study/Initiate").await
    }

    async fn get_section(&self, section: Section, study_id: &str) -> Result<GeneralResponse<Value>> {
        self.get(&section.get_path(study_id), None).await
    }

    async fn save_section(&self, section: Section, payload: Value) -> Result<GeneralResponse<Value>> {
        self.request(Method::POST, &section.save_path(), None, Body::Json(payload))
            .await
    }

    async fn upload_ethical_attachment(
        &self,
        study_id: &str,
        attachment: &Attachment,
    ) -> Result<GeneralResponse<Value>> {
        let path = format!("Study/SaveEthicalApproval/Attachment/{}", study_id);
        self.request(Method::POST, &path, None, Body::File("model", attachment))
            .await
    }

    async fn submit(&self, study_id: &str) -> Result<GeneralResponse<Value>> {
        self.post_empty(&format!("Study/Submit/{}", study_id)).await
    }

    async fn list_studies(&self, query: &PaginationRequest) -> Result<PaginationResponse<StudySummary>> {
        self.get("Study", Some(query)).await
    }

    async fn delete_study(&self, study_id: &str) -> Result<GeneralResponse<Value>> {
        let path = format!("Study?StudyId={}", study_id);
        self.delete(&path).await
    }
}
