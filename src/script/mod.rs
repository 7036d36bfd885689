// SPDX-License-Identifier: MIT

//! Scripted wizard runs for the command line

pub mod loader;
pub mod runner;

pub use loader::{AnswerLoader, RegistrationAnswers, StageAnswers, StudyAnswers};
pub use runner::{RunOutcome, WizardRunner};
