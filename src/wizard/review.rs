// SPDX-License-Identifier: MIT

//! Review flow: read-only section views ending in approve or reject

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::flow::Flow;
use super::notify::Notifier;
use super::orchestrator::Wizard;
use super::step::{StepFactory, StepResult, WizardStep};
use super::terminal::Terminal;
use crate::api::models::{DecisionRequest, Section, UserRole};
use crate::api::{DecisionMaker, ReviewApi, StudyApi};
use crate::error::{NavigationError, PortalError, Result};
use crate::forms::strip_nulls;
use crate::forms::validation::{ValidationErrors, REQUIRED};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve { comment: Option<String> },
    Reject { comment: String },
}

impl Decision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approve { .. })
    }

    pub fn comment(&self) -> &str {
        match self {
            Decision::Approve { comment } => comment.as_deref().unwrap_or(""),
            Decision::Reject { comment } => comment,
        }
    }
}

pub struct ReviewStep {
    studies: Arc<dyn StudyApi>,
    reviews: Arc<dyn ReviewApi>,
    section: Section,
    study_id: String,
    roles: Vec<UserRole>,
    is_last: bool,
    exit_route: String,
    data: Value,
}

impl ReviewStep {
    fn study_id(&self) -> Result<&str> {
        if self.study_id.trim().is_empty() {
            return Err(PortalError::MissingStudyId);
        }
        Ok(&self.study_id)
    }

    fn read_only(&self) -> PortalError {
        NavigationError::ReadOnly(self.section.key().to_string()).into()
    }
}

#[async_trait]
impl WizardStep<Section> for ReviewStep {
    fn stage(&self) -> Section {
        self.section
    }

    async fn load(&mut self) -> Result<()> {
        let study_id = self.study_id()?.to_string();
        let resp = self.studies.get_section(self.section, &study_id).await?;
        self.data = strip_nulls(resp.data);
        Ok(())
    }

    fn values(&self) -> Result<Value> {
        Ok(self.data.clone())
    }

    fn set_value(&mut self, _field: &str, _value: Value) -> Result<bool> {
        Err(self.read_only())
    }

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Ok(())
    }

    async fn save_draft(&mut self) -> Result<String> {
        Err(self.read_only())
    }

    /// Next on a view; the last view needs a decision instead
    async fn submit(&mut self) -> Result<StepResult> {
        if self.is_last {
            return Err(NavigationError::DecisionRequired.into());
        }
        Ok(StepResult::Saved(String::new()))
    }

    async fn decide(&mut self, decision: Decision) -> Result<StepResult> {
        if !self.is_last {
            return Err(NavigationError::DecisionUnavailable.into());
        }
        let maker = DecisionMaker::for_roles(&self.roles).ok_or(PortalError::UnsupportedRole)?;
        if !decision.is_approved() && decision.comment().trim().is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("comment", REQUIRED);
            return Err(errors.into());
        }

        let body = DecisionRequest {
            study_id: self.study_id()?.to_string(),
            is_approved: decision.is_approved(),
            comment: decision.comment().to_string(),
        };
        let resp = self.reviews.decide(maker, &body).await?;
        let terminal = if body.is_approved {
            Terminal::approved(&self.exit_route)
        } else {
            Terminal::rejected(&self.exit_route)
        };
        Ok(StepResult::Finished {
            message: resp.message,
            terminal,
        })
    }
}

pub struct ReviewStepFactory {
    studies: Arc<dyn StudyApi>,
    reviews: Arc<dyn ReviewApi>,
    study_id: String,
    roles: Vec<UserRole>,
    exit_route: String,
}

impl ReviewStepFactory {
    /// `roles` is the reviewer's role snapshot taken when the review opens
    pub fn new(
        studies: Arc<dyn StudyApi>,
        reviews: Arc<dyn ReviewApi>,
        study_id: &str,
        roles: Vec<UserRole>,
        exit_route: &str,
    ) -> Self {
        Self {
            studies,
            reviews,
            study_id: study_id.to_string(),
            roles,
            exit_route: exit_route.to_string(),
        }
    }
}

impl StepFactory<Section> for ReviewStepFactory {
    fn build(&self, stage: Section, is_last: bool) -> Box<dyn WizardStep<Section>> {
        Box::new(ReviewStep {
            studies: self.studies.clone(),
            reviews: self.reviews.clone(),
            section: stage,
            study_id: self.study_id.clone(),
            roles: self.roles.clone(),
            is_last,
            exit_route: self.exit_route.clone(),
            data: Value::Null,
        })
    }
}

pub fn review_wizard(
    studies: Arc<dyn StudyApi>,
    reviews: Arc<dyn ReviewApi>,
    study_id: &str,
    roles: Vec<UserRole>,
    notifier: Arc<dyn Notifier>,
) -> Wizard<Section> {
    let flow = Flow::study_review();
    let factory = ReviewStepFactory::new(studies, reviews, study_id, roles, flow.exit_route());
    Wizard::new(flow, factory, notifier)
}
