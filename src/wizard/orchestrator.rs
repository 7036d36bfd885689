// SPDX-License-Identifier: MIT

//! Wizard orchestrator
//!
//! Owns the step counter, the direction of the last move and the active
//! step unit. Every operation takes `&mut self`, so a wizard is driven by a
//! single caller and a submit can never overlap another one.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::counter::StepCounter;
use super::flow::{Flow, Stage};
use super::notify::Notifier;
use super::review::Decision;
use super::step::{is_fatal, on_enter, LoadOutcome, StepFactory, StepResult, WizardStep};
use super::terminal::Terminal;
use super::transition::{NavigationDirection, Transition};
use crate::error::{NavigationError, PortalError, Result};
use crate::forms::validation::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutcome {
    Saved(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Moved to `step`; `load` tells whether the entered step resynchronized
    Advanced { step: usize, load: LoadOutcome },
    /// Still on the same stage
    Continued,
    /// Client-side validation failed; nothing was sent
    Rejected(ValidationErrors),
    /// The server refused or could not be reached; the user was notified
    Failed(String),
    Finished(Terminal),
}

pub struct Wizard<S: Stage> {
    flow: Flow<S>,
    factory: Box<dyn StepFactory<S>>,
    notifier: Arc<dyn Notifier>,
    counter: StepCounter,
    direction: NavigationDirection,
    active: Option<Box<dyn WizardStep<S>>>,
    terminal: Option<Terminal>,
}

impl<S: Stage> Wizard<S> {
    pub fn new<F>(flow: Flow<S>, factory: F, notifier: Arc<dyn Notifier>) -> Self
    where
        F: StepFactory<S> + 'static,
    {
        Self {
            flow,
            factory: Box::new(factory),
            notifier,
            counter: StepCounter::new(),
            direction: NavigationDirection::Initial,
            active: None,
            terminal: None,
        }
    }

    /// Mount the first step
    pub async fn start(&mut self) -> Result<LoadOutcome> {
        self.start_at(1).await
    }

    /// Mount `step` as the initial step (resuming an existing draft)
    pub async fn start_at(&mut self, step: usize) -> Result<LoadOutcome> {
        if self.flow.stage_at(step).is_none() {
            return Err(NavigationError::StepOutOfRange(step).into());
        }
        log::info!("Starting {} at step {}", self.flow.name(), step);
        self.terminal = None;
        self.direction = NavigationDirection::Initial;
        self.counter.set(step);
        self.enter(None).await
    }

    pub fn flow(&self) -> &Flow<S> {
        &self.flow
    }

    pub fn current_step(&self) -> usize {
        self.counter.current()
    }

    /// Active stage; `None` before start and after the terminal state
    pub fn current_stage(&self) -> Option<S> {
        self.active.as_ref().map(|step| step.stage())
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: self.counter.current(),
            total: self.flow.total_steps(),
        }
    }

    pub fn direction(&self) -> NavigationDirection {
        self.direction
    }

    pub fn is_last_step(&self) -> bool {
        self.flow.is_last(self.counter.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.active.is_some() && self.counter.current() > 1
    }

    pub fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn values(&self) -> Result<Value> {
        self.active()?.values()
    }

    pub fn set_value(&mut self, field: &str, value: Value) -> Result<bool> {
        self.active_mut()?.set_value(field, value)
    }

    pub fn validate(&self) -> Result<()> {
        self.active()?.validate().map_err(PortalError::Validation)
    }

    pub async fn save_draft(&mut self) -> Result<DraftOutcome> {
        let result = self.active_mut()?.save_draft().await;
        match result {
            Ok(message) => {
                self.notifier.success(&message);
                Ok(DraftOutcome::Saved(message))
            }
            Err(e) if is_fatal(&e) => Err(e),
            Err(e) => {
                let message = e.user_message();
                log::warn!("Draft save failed: {}", e);
                self.notifier.error(&message);
                Ok(DraftOutcome::Failed(message))
            }
        }
    }

    /// Validate and persist the active step, then advance or finish
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let result = self.active_mut()?.submit().await;
        self.settle(result).await
    }

    /// Approve or reject on the last step of a review flow
    pub async fn decide(&mut self, decision: Decision) -> Result<SubmitOutcome> {
        if !self.is_last_step() {
            self.active()?;
            return Err(NavigationError::DecisionUnavailable.into());
        }
        let result = self.active_mut()?.decide(decision).await;
        self.settle(result).await
    }

    pub async fn back(&mut self) -> Result<LoadOutcome> {
        let from = self.active()?.stage();
        if self.counter.current() <= 1 {
            return Err(NavigationError::AtFirstStep.into());
        }
        self.direction = NavigationDirection::Back;
        self.counter.retreat();
        self.enter(Some(from)).await
    }

    /// Drop the active step and terminal; `start` mounts step 1 again
    pub fn reset(&mut self) {
        self.counter.reset();
        self.direction = NavigationDirection::Initial;
        self.active = None;
        self.terminal = None;
    }

    async fn settle(&mut self, result: Result<StepResult>) -> Result<SubmitOutcome> {
        match result {
            Ok(StepResult::Saved(message)) => {
                if !message.is_empty() {
                    self.notifier.success(&message);
                }
                let from = self.active()?.stage();
                self.direction = NavigationDirection::Forward;
                let step = self.counter.advance();
                let load = self.enter(Some(from)).await?;
                Ok(SubmitOutcome::Advanced { step, load })
            }
            Ok(StepResult::Continued) => Ok(SubmitOutcome::Continued),
            Ok(StepResult::Finished { message, terminal }) => {
                if !message.is_empty() {
                    self.notifier.success(&message);
                }
                log::info!("{} finished: {:?}", self.flow.name(), terminal.outcome);
                self.active = None;
                self.terminal = Some(terminal.clone());
                Ok(SubmitOutcome::Finished(terminal))
            }
            Err(PortalError::Validation(errors)) => {
                log::debug!("Validation failed: {}", errors);
                Ok(SubmitOutcome::Rejected(errors))
            }
            Err(e) if is_fatal(&e) => Err(e),
            Err(e) => {
                let message = e.user_message();
                log::warn!("Submit failed: {}", e);
                self.notifier.error(&message);
                Ok(SubmitOutcome::Failed(message))
            }
        }
    }

    async fn enter(&mut self, from: Option<S>) -> Result<LoadOutcome> {
        let step = self.counter.current();
        let to = self
            .flow
            .stage_at(step)
            .ok_or(NavigationError::StepOutOfRange(step))?;
        let transition = Transition {
            from,
            to,
            step,
            direction: self.direction,
        };
        log::info!(
            "{}: entering step {}/{} ({}) [{}]",
            self.flow.name(),
            step,
            self.flow.total_steps(),
            to,
            self.direction
        );

        self.active = None;
        let mut unit = self.factory.build(to, self.flow.is_last(step));
        let outcome = on_enter(
            unit.as_mut(),
            self.flow.policy(),
            &transition,
            self.notifier.as_ref(),
        )
        .await;
        self.active = Some(unit);
        outcome
    }

    fn active(&self) -> Result<&dyn WizardStep<S>> {
        if self.terminal.is_some() {
            return Err(NavigationError::FlowFinished.into());
        }
        self.active
            .as_deref()
            .ok_or_else(|| NavigationError::NotStarted.into())
    }

    fn active_mut(&mut self) -> Result<&mut Box<dyn WizardStep<S>>> {
        if self.terminal.is_some() {
            return Err(NavigationError::FlowFinished.into());
        }
        self.active
            .as_mut()
            .ok_or_else(|| NavigationError::NotStarted.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::notify::MemoryNotifier;
    use crate::wizard::transition::RefetchPolicy;
    use async_trait::async_trait;
    use serde_json::json;
    use std::fmt;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Toy {
        One,
        Two,
        Three,
    }

    impl fmt::Display for Toy {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Stage for Toy {
        fn key(&self) -> &'static str {
            match self {
                Toy::One => "one",
                Toy::Two => "two",
                Toy::Three => "three",
            }
        }
    }

    #[derive(Default)]
    struct Log {
        loads: Vec<Toy>,
        fail_submit: bool,
    }

    struct ToyStep {
        stage: Toy,
        is_last: bool,
        log: Arc<Mutex<Log>>,
        value: Value,
    }

    #[async_trait]
    impl WizardStep<Toy> for ToyStep {
        fn stage(&self) -> Toy {
            self.stage
        }

        async fn load(&mut self) -> Result<()> {
            self.log.lock().unwrap().loads.push(self.stage);
            Ok(())
        }

        fn values(&self) -> Result<Value> {
            Ok(self.value.clone())
        }

        fn set_value(&mut self, _field: &str, value: Value) -> Result<bool> {
            self.value = value;
            Ok(true)
        }

        fn validate(&self) -> std::result::Result<(), ValidationErrors> {
            if self.value.is_null() {
                let mut errors = ValidationErrors::new();
                errors.add("value", "Required");
                return Err(errors);
            }
            Ok(())
        }

        async fn save_draft(&mut self) -> Result<String> {
            Ok("Draft saved".to_string())
        }

        async fn submit(&mut self) -> Result<StepResult> {
            self.validate()?;
            if self.log.lock().unwrap().fail_submit {
                return Err(PortalError::api(500, ""));
            }
            if self.is_last {
                Ok(StepResult::Finished {
                    message: "Done".to_string(),
                    terminal: Terminal::submitted("/toys"),
                })
            } else {
                Ok(StepResult::Saved("Saved".to_string()))
            }
        }
    }

    struct ToyFactory {
        log: Arc<Mutex<Log>>,
    }

    impl StepFactory<Toy> for ToyFactory {
        fn build(&self, stage: Toy, is_last: bool) -> Box<dyn WizardStep<Toy>> {
            Box::new(ToyStep {
                stage,
                is_last,
                log: self.log.clone(),
                value: json!(1),
            })
        }
    }

    fn wizard(policy: RefetchPolicy) -> (Wizard<Toy>, Arc<Mutex<Log>>, MemoryNotifier) {
        let log = Arc::new(Mutex::new(Log::default()));
        let notifier = MemoryNotifier::new();
        let flow = Flow::new("toy", vec![Toy::One, Toy::Two, Toy::Three], policy, "/toys");
        let wizard = Wizard::new(
            flow,
            ToyFactory { log: log.clone() },
            Arc::new(notifier.clone()),
        );
        (wizard, log, notifier)
    }

    #[tokio::test]
    async fn test_not_started() {
        let (mut wizard, _, _) = wizard(RefetchPolicy::OnReturn);
        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(
            err,
            PortalError::Navigation(NavigationError::NotStarted)
        ));
        assert_eq!(wizard.current_stage(), None);
    }

    #[tokio::test]
    async fn test_forward_and_back_loading() {
        let (mut wizard, log, _) = wizard(RefetchPolicy::OnReturn);
        assert_eq!(wizard.start().await.unwrap(), LoadOutcome::Loaded);

        let outcome = wizard.submit().await.unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Advanced {
                step: 2,
                load: LoadOutcome::Skipped
            }
        );
        assert_eq!(wizard.direction(), NavigationDirection::Forward);

        assert_eq!(wizard.back().await.unwrap(), LoadOutcome::Loaded);
        assert_eq!(wizard.direction(), NavigationDirection::Back);
        assert_eq!(wizard.current_stage(), Some(Toy::One));
        assert_eq!(log.lock().unwrap().loads, vec![Toy::One, Toy::One]);
    }

    #[tokio::test]
    async fn test_back_at_first_step() {
        let (mut wizard, _, _) = wizard(RefetchPolicy::Never);
        wizard.start().await.unwrap();
        assert!(!wizard.can_go_back());
        let err = wizard.back().await.unwrap_err();
        assert!(matches!(
            err,
            PortalError::Navigation(NavigationError::AtFirstStep)
        ));
        assert_eq!(wizard.current_step(), 1);
    }

    #[tokio::test]
    async fn test_validation_keeps_step() {
        let (mut wizard, _, notifier) = wizard(RefetchPolicy::Never);
        wizard.start().await.unwrap();
        wizard.set_value("value", Value::Null).unwrap();
        match wizard.submit().await.unwrap() {
            SubmitOutcome::Rejected(errors) => assert!(errors.has("value")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(wizard.current_step(), 1);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_server_failure_notifies_and_stays() {
        let (mut wizard, log, notifier) = wizard(RefetchPolicy::Never);
        wizard.start().await.unwrap();
        log.lock().unwrap().fail_submit = true;
        assert_eq!(
            wizard.submit().await.unwrap(),
            SubmitOutcome::Failed("Something went wrong".to_string())
        );
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(notifier.errors(), vec!["Something went wrong".to_string()]);
    }

    #[tokio::test]
    async fn test_finish_blocks_further_moves() {
        let (mut wizard, _, notifier) = wizard(RefetchPolicy::Never);
        wizard.start_at(3).await.unwrap();
        match wizard.submit().await.unwrap() {
            SubmitOutcome::Finished(terminal) => assert_eq!(terminal.exit_route, "/toys"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(wizard.is_finished());
        assert_eq!(wizard.current_stage(), None);
        assert!(matches!(
            wizard.back().await.unwrap_err(),
            PortalError::Navigation(NavigationError::FlowFinished)
        ));
        assert_eq!(notifier.successes(), vec!["Done".to_string()]);
    }

    #[tokio::test]
    async fn test_start_at_out_of_range() {
        let (mut wizard, _, _) = wizard(RefetchPolicy::Never);
        assert!(matches!(
            wizard.start_at(4).await.unwrap_err(),
            PortalError::Navigation(NavigationError::StepOutOfRange(4))
        ));
    }

    #[tokio::test]
    async fn test_draft_does_not_advance() {
        let (mut wizard, _, notifier) = wizard(RefetchPolicy::Never);
        wizard.start().await.unwrap();
        assert_eq!(
            wizard.save_draft().await.unwrap(),
            DraftOutcome::Saved("Draft saved".to_string())
        );
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(notifier.successes(), vec!["Draft saved".to_string()]);
    }

    #[tokio::test]
    async fn test_decide_only_on_last_step() {
        let (mut wizard, _, _) = wizard(RefetchPolicy::Never);
        wizard.start().await.unwrap();
        let err = wizard
            .decide(Decision::Approve { comment: None })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PortalError::Navigation(NavigationError::DecisionUnavailable)
        ));
    }
}
