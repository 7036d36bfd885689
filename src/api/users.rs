// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::client::ApiClient;
use super::models::user::{AssignReviewerRequest, ProcessApprovalRequest};
use super::models::{GeneralResponse, PaginationRequest, PaginationResponse, UserSummary};
use crate::error::Result;

impl ApiClient {
    pub async fn list_users(
        &self,
        query: &PaginationRequest,
    ) -> Result<PaginationResponse<UserSummary>> {
        self.get("User", Some(query)).await
    }

    pub async fn assign_user_reviewer(
        &self,
        body: &AssignReviewerRequest,
    ) -> Result<GeneralResponse<Value>> {
        self.post("User/assign-reviewer", body).await
    }

    pub async fn process_approval(
        &self,
        body: &ProcessApprovalRequest,
    ) -> Result<GeneralResponse<Value>> {
        self.post("User/process-approval-request", body).await
    }
}
