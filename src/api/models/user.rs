// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub user_type_text: String,
    pub user_type: i64,
    pub creation_date: String,
    pub is_approved: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignReviewerRequest {
    pub user_id: String,
    pub assigned_user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessApprovalRequest {
    pub approval_request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub is_approved: bool,
}
