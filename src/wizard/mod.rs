// SPDX-License-Identifier: MIT

//! Multi-step wizards
//!
//! A [`Wizard`] walks an ordered [`Flow`] of stages, building one
//! [`WizardStep`] per stage as it is entered. Study creation edits and saves
//! one section per step, review shows each section read-only and ends with
//! a decision, and registration collects account data across three or four
//! stages depending on the chosen user type.

pub mod counter;
pub mod flow;
pub mod notify;
pub mod orchestrator;
pub mod registration;
pub mod review;
pub mod section;
pub mod step;
pub mod terminal;
pub mod transition;

pub use counter::StepCounter;
pub use flow::{Flow, Stage};
pub use notify::{LogNotifier, MemoryNotifier, Notice, NoticeLevel, Notifier};
pub use orchestrator::{DraftOutcome, Progress, SubmitOutcome, Wizard};
pub use registration::{RegistrationStage, RegistrationUserType, RegistrationWizard};
pub use review::{review_wizard, Decision};
pub use section::{initiate_study, study_wizard, StudyContext};
pub use step::{LoadOutcome, StepFactory, StepResult, WizardStep};
pub use terminal::{Terminal, TerminalOutcome};
pub use transition::{NavigationDirection, RefetchPolicy, Transition};
