// SPDX-License-Identifier: MIT

//! Ordered stage lists for each wizard

use std::fmt;

use super::transition::RefetchPolicy;
use crate::api::models::Section;

/// Stable identifier of a wizard position, independent of its index
pub trait Stage: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn key(&self) -> &'static str;
}

impl Stage for Section {
    fn key(&self) -> &'static str {
        Section::key(self)
    }
}

/// A flow resolved once at start: ordered stages plus entry policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow<S: Stage> {
    name: String,
    stages: Vec<S>,
    policy: RefetchPolicy,
    exit_route: String,
}

impl<S: Stage> Flow<S> {
    pub fn new(
        name: impl Into<String>,
        stages: Vec<S>,
        policy: RefetchPolicy,
        exit_route: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            stages,
            policy,
            exit_route: exit_route.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[S] {
        &self.stages
    }

    pub fn policy(&self) -> RefetchPolicy {
        self.policy
    }

    /// Where the terminal screen sends the user
    pub fn exit_route(&self) -> &str {
        &self.exit_route
    }

    pub fn total_steps(&self) -> usize {
        self.stages.len()
    }

    /// Stage at a one-based step
    pub fn stage_at(&self, step: usize) -> Option<S> {
        step.checked_sub(1).and_then(|i| self.stages.get(i)).copied()
    }

    /// One-based step of a stage
    pub fn step_of(&self, stage: S) -> Option<usize> {
        self.stages.iter().position(|s| *s == stage).map(|i| i + 1)
    }

    pub fn is_last(&self, step: usize) -> bool {
        step == self.total_steps()
    }
}

impl Flow<Section> {
    pub fn study_creation() -> Self {
        Flow::new(
            "study-creation",
            Section::ALL.to_vec(),
            RefetchPolicy::OnReturn,
            "/studies",
        )
    }

    pub fn study_review() -> Self {
        Flow::new(
            "study-review",
            Section::ALL.to_vec(),
            RefetchPolicy::OnEveryEntry,
            "/requests",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_flow_order() {
        let flow = Flow::study_creation();
        assert_eq!(flow.total_steps(), 11);
        assert_eq!(flow.stage_at(1), Some(Section::StudyBrief));
        assert_eq!(flow.stage_at(11), Some(Section::SharingStatement));
        assert_eq!(flow.stage_at(0), None);
        assert_eq!(flow.stage_at(12), None);
        assert_eq!(flow.step_of(Section::Cro), Some(8));
        assert!(flow.is_last(11));
        assert_eq!(flow.policy(), RefetchPolicy::OnReturn);
    }

    #[test]
    fn test_review_flow_loads_every_entry() {
        let flow = Flow::study_review();
        assert_eq!(flow.stages(), Flow::study_creation().stages());
        assert_eq!(flow.policy(), RefetchPolicy::OnEveryEntry);
        assert_eq!(flow.exit_route(), "/requests");
    }
}
