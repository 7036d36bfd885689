// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Row of the review requests list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestSummary {
    pub study_id: String,
    pub study_name: String,
    pub record_number: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reviewer {
    pub id: i64,
    pub name_en: String,
    pub name_ar: String,
    pub assigned_studies_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequestReviewer {
    pub study_id: String,
    pub reviewer_user_id: String,
}

/// Body of the approve/reject endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub study_id: String,
    pub is_approved: bool,
    pub comment: String,
}
