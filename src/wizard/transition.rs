// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the wizard arrived at the active step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDirection {
    /// First step mounted after start
    #[default]
    Initial,
    Back,
    Forward,
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NavigationDirection::Initial => "initial",
            NavigationDirection::Back => "back",
            NavigationDirection::Forward => "forward",
        };
        f.write_str(s)
    }
}

/// A single move between steps, handed to the entered step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: Option<S>,
    pub to: S,
    pub step: usize,
    pub direction: NavigationDirection,
}

impl<S> Transition<S> {
    pub fn initial(to: S, step: usize) -> Self {
        Self {
            from: None,
            to,
            step,
            direction: NavigationDirection::Initial,
        }
    }

    pub fn forward(from: S, to: S, step: usize) -> Self {
        Self {
            from: Some(from),
            to,
            step,
            direction: NavigationDirection::Forward,
        }
    }

    pub fn back(from: S, to: S, step: usize) -> Self {
        Self {
            from: Some(from),
            to,
            step,
            direction: NavigationDirection::Back,
        }
    }
}

/// When an entered step pulls its persisted data from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefetchPolicy {
    /// Load when returning with Back, and for the first mounted step
    OnReturn,
    /// Load on every entry
    OnEveryEntry,
    /// Steps keep no server state
    Never,
}

impl RefetchPolicy {
    pub fn should_load<S>(&self, transition: &Transition<S>) -> bool {
        match self {
            RefetchPolicy::OnReturn => matches!(
                transition.direction,
                NavigationDirection::Back | NavigationDirection::Initial
            ),
            RefetchPolicy::OnEveryEntry => true,
            RefetchPolicy::Never => false,
        }
    }
}
