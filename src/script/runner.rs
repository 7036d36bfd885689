// SPDX-License-Identifier: MIT

//! Drives a started wizard from answer files

use serde_json::Value;

use super::loader::StageAnswers;
use crate::api::models::Section;
use crate::error::{NavigationError, PortalError, Result};
use crate::forms::validation::ValidationErrors;
use crate::wizard::{Decision, Stage, SubmitOutcome, Terminal, Wizard};

/// Submits allowed before a run is considered stuck
pub const DEFAULT_MAX_SUBMITS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Finished(Terminal),
    /// Validation stopped the run on `stage`
    Rejected {
        stage: String,
        errors: ValidationErrors,
    },
    /// The server refused a save or decision on `stage`
    Failed { stage: String, message: String },
}

pub struct WizardRunner {
    max_submits: usize,
}

impl Default for WizardRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardRunner {
    pub fn new() -> Self {
        Self {
            max_submits: DEFAULT_MAX_SUBMITS,
        }
    }

    pub fn with_max_submits(mut self, max_submits: usize) -> Self {
        self.max_submits = max_submits.max(1);
        self
    }

    /// Fill each stage from `answers` on first entry, then submit until the
    /// flow finishes or a submit is refused
    pub async fn run<S: Stage>(
        &self,
        wizard: &mut Wizard<S>,
        answers: &[StageAnswers<S>],
    ) -> Result<RunOutcome> {
        let mut filled: Option<S> = None;

        for _ in 0..self.max_submits {
            let stage = wizard
                .current_stage()
                .ok_or(NavigationError::NotStarted)?;

            if filled != Some(stage) {
                let fields = answers
                    .iter()
                    .filter(|a| a.stage == stage)
                    .flat_map(|a| a.fields.iter());
                if let Some(outcome) = apply_fields(wizard, stage, fields)? {
                    return Ok(outcome);
                }
                filled = Some(stage);
            }

            let outcome = wizard.submit().await?;
            if let Some(done) = settle(stage, outcome) {
                return Ok(done);
            }
        }
        Err(PortalError::other(format!(
            "{} did not finish after {} submits",
            wizard.flow().name(),
            self.max_submits
        )))
    }

    /// Page through a review to its last section, then decide
    pub async fn run_review(
        &self,
        wizard: &mut Wizard<Section>,
        decision: Decision,
    ) -> Result<RunOutcome> {
        for _ in 0..self.max_submits {
            let stage = wizard
                .current_stage()
                .ok_or(NavigationError::NotStarted)?;

            let outcome = if wizard.is_last_step() {
                wizard.decide(decision.clone()).await?
            } else {
                wizard.submit().await?
            };
            if let Some(done) = settle(stage, outcome) {
                return Ok(done);
            }
        }
        Err(PortalError::other(format!(
            "{} did not finish after {} submits",
            wizard.flow().name(),
            self.max_submits
        )))
    }
}

fn apply_fields<'a, S, I>(wizard: &mut Wizard<S>, stage: S, fields: I) -> Result<Option<RunOutcome>>
where
    S: Stage,
    I: Iterator<Item = &'a (String, Value)>,
{
    for (field, value) in fields {
        match wizard.set_value(field, value.clone()) {
            Ok(_) => {}
            Err(PortalError::Validation(errors)) => {
                return Ok(Some(RunOutcome::Rejected {
                    stage: stage.key().to_string(),
                    errors,
                }))
            }
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

fn settle<S: Stage>(stage: S, outcome: SubmitOutcome) -> Option<RunOutcome> {
    match outcome {
        SubmitOutcome::Advanced { .. } | SubmitOutcome::Continued => None,
        SubmitOutcome::Finished(terminal) => Some(RunOutcome::Finished(terminal)),
        SubmitOutcome::Rejected(errors) => Some(RunOutcome::Rejected {
            stage: stage.key().to_string(),
            errors,
        }),
        SubmitOutcome::Failed(message) => Some(RunOutcome::Failed {
            stage: stage.key().to_string(),
            message,
        }),
    }
}
