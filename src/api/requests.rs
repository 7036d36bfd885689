// SPDX-License-Identifier: MIT

//! Review requests: listings, reviewer assignment and decisions

use async_trait::async_trait;
use serde_json::Value;

use super::client::ApiClient;
use super::models::review::AssignRequestReviewer;
use super::models::{
    DecisionRequest, GeneralResponse, PaginationRequest, PaginationResponse, RequestSummary,
    Reviewer, UserRole,
};
use crate::error::Result;

/// Which decision endpoint a signed-in user may call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionMaker {
    OrganizationAdmin,
    Reviewer,
    Manager,
}

impl DecisionMaker {
    /// First match in the order organization admin, reviewer, manager
    pub fn for_roles(roles: &[UserRole]) -> Option<Self> {
        if roles.contains(&UserRole::OrganizationAdmin) {
            Some(DecisionMaker::OrganizationAdmin)
        } else if roles.contains(&UserRole::Reviewer) {
            Some(DecisionMaker::Reviewer)
        } else if roles.contains(&UserRole::Manager) {
            Some(DecisionMaker::Manager)
        } else {
            None
        }
    }

    pub fn path(&self, study_id: &str) -> String {
        let endpoint = match self {
            DecisionMaker::OrganizationAdmin => "OrgManagerDecision",
            DecisionMaker::Reviewer => "ReviewerDecision",
            DecisionMaker::Manager => "ManagerDecision",
        };
        format!("Request/{}/{}", endpoint, study_id)
    }
}

#[async_trait]
pub trait ReviewApi: Send + Sync {
    async fn list_requests(
        &self,
        query: &PaginationRequest,
    ) -> Result<PaginationResponse<RequestSummary>>;

    async fn list_reviewers(&self, query: &PaginationRequest)
        -> Result<PaginationResponse<Reviewer>>;

    async fn assign_reviewer(&self, body: &AssignRequestReviewer) -> Result<GeneralResponse<Value>>;

    async fn decide(
        &self,
        maker: DecisionMaker,
        decision: &DecisionRequest,
    ) -> Result<GeneralResponse<Value>>;
}

#[async_trait]
impl ReviewApi for ApiClient {
    async fn list_requests(
        &self,
        query: &PaginationRequest,
    ) -> Result<PaginationResponse<RequestSummary>> {
        self.get("Request", Some(query)).await
    }

    async fn list_reviewers(
        &self,
        query: &PaginationRequest,
    ) -> Result<PaginationResponse<Reviewer>> {
        self.get("Request/Reviewers", Some(query)).await
    }

    async fn assign_reviewer(&self, body: &AssignRequestReviewer) -> Result<GeneralResponse<Value>> {
        self.post("Request/AssignReviewer", body).await
    }

    async fn decide(
        &self,
        maker: DecisionMaker,
        decision: &DecisionRequest,
    ) -> Result<GeneralResponse<Value>> {
        log::info!(
            "Sending {:?} decision for study {} (approved={})",
            maker,
            decision.study_id,
            decision.is_approved
        );
        self.post(&maker.path(&decision.study_id), decision).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_precedence() {
        let all = [UserRole::Manager, UserRole::Reviewer, UserRole::OrganizationAdmin];
        assert_eq!(
            DecisionMaker::for_roles(&all),
            Some(DecisionMaker::OrganizationAdmin)
        );
        assert_eq!(
            DecisionMaker::for_roles(&[UserRole::Manager, UserRole::Reviewer]),
            Some(DecisionMaker::Reviewer)
        );
        assert_eq!(
            DecisionMaker::for_roles(&[UserRole::Manager]),
            Some(DecisionMaker::Manager)
        );
        assert_eq!(DecisionMaker::for_roles(&[UserRole::Individual]), None);
    }

    #[test]
    fn test_decision_paths() {
        assert_eq!(
            DecisionMaker::OrganizationAdmin.path("S1"),
            "Request/OrgManagerDecision/S1"
        );
        assert_eq!(DecisionMaker::Reviewer.path("S1"), "Request/ReviewerDecision/S1");
        assert_eq!(DecisionMaker::Manager.path("S1"), "Request/ManagerDecision/S1");
    }
}
