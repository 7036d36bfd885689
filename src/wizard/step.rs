// SPDX-License-Identifier: MIT

//! The unit a wizard drives: one form (or read-only view) per stage

use async_trait::async_trait;
use serde_json::Value;

use super::flow::Stage;
use super::notify::Notifier;
use super::review::Decision;
use super::terminal::Terminal;
use super::transition::{RefetchPolicy, Transition};
use crate::error::{NavigationError, PortalError, Result};
use crate::forms::validation::ValidationErrors;

/// What a successful submit asks the wizard to do next
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// Persisted; advance to the next stage. Carries the server message.
    Saved(String),
    /// Stay on this stage (an inner sub-step moved on)
    Continued,
    /// The flow is over
    Finished { message: String, terminal: Terminal },
}

#[async_trait]
pub trait WizardStep<S: Stage>: Send + Sync {
    fn stage(&self) -> S;

    /// Runs on every entry, before any server load
    async fn enter(&mut self, _transition: &Transition<S>) -> Result<()> {
        Ok(())
    }

    /// Replace local values with the persisted ones; on error values are kept
    async fn load(&mut self) -> Result<()>;

    fn values(&self) -> Result<Value>;

    fn set_value(&mut self, field: &str, value: Value) -> Result<bool>;

    fn validate(&self) -> std::result::Result<(), ValidationErrors>;

    /// Persist without validation; returns the message to show
    async fn save_draft(&mut self) -> Result<String>;

    /// Validate, then persist for good
    async fn submit(&mut self) -> Result<StepResult>;

    async fn decide(&mut self, _decision: Decision) -> Result<StepResult> {
        Err(NavigationError::DecisionUnavailable.into())
    }
}

/// Builds the step unit for a stage when the wizard enters it
pub trait StepFactory<S: Stage>: Send + Sync {
    fn build(&self, stage: S, is_last: bool) -> Box<dyn WizardStep<S>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The transition does not require resynchronization
    Skipped,
    Loaded,
    /// Load failed; the user was notified and values were kept
    Failed(String),
}

/// Errors that mean the caller misused the wizard or must log in again;
/// everything else is reported to the user and the wizard stays put.
pub(crate) fn is_fatal(err: &PortalError) -> bool {
    matches!(
        err,
        PortalError::Navigation(_) | PortalError::SessionExpired | PortalError::MissingStudyId
    )
}

/// Entry hook: prepare the step, then load when the policy asks for it
pub async fn on_enter<S: Stage>(
    step: &mut dyn WizardStep<S>,
    policy: RefetchPolicy,
    transition: &Transition<S>,
    notifier: &dyn Notifier,
) -> Result<LoadOutcome> {
    step.enter(transition).await?;
    if !policy.should_load(transition) {
        return Ok(LoadOutcome::Skipped);
    }

    log::debug!("Loading {} ({})", transition.to, transition.direction);
    match step.load().await {
        Ok(()) => Ok(LoadOutcome::Loaded),
        Err(e) if is_fatal(&e) => Err(e),
        Err(e) => {
            let message = e.user_message();
            log::warn!("Failed to load {}: {}", transition.to, e);
            notifier.error(&message);
            Ok(LoadOutcome::Failed(message))
        }
    }
}
