// SPDX-License-Identifier: MIT

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminalOutcome {
    Submitted,
    Approved,
    Rejected,
    /// Account created; the email still has to be confirmed
    Registered { email: String },
}

/// Screen shown once a flow is over; no step is active afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Terminal {
    pub outcome: TerminalOutcome,
    pub title: String,
    pub description: String,
    pub exit_route: String,
}

impl Terminal {
    pub fn submitted(exit_route: &str) -> Self {
        Self {
            outcome: TerminalOutcome::Submitted,
            title: "Study has been submitted successfully".to_string(),
            description: "Our team will be reviewing your study shortly.".to_string(),
            exit_route: exit_route.to_string(),
        }
    }

    pub fn approved(exit_route: &str) -> Self {
        Self {
            outcome: TerminalOutcome::Approved,
            title: "Review submitted successfully".to_string(),
            description: "Study has been approved. It will proceed to the next step.".to_string(),
            exit_route: exit_route.to_string(),
        }
    }

    pub fn rejected(exit_route: &str) -> Self {
        Self {
            outcome: TerminalOutcome::Rejected,
            title: "Review submitted successfully".to_string(),
            description: "Study has been rejected. It will be returned to the requester."
                .to_string(),
            exit_route: exit_route.to_string(),
        }
    }

    pub fn registered(email: &str) -> Self {
        Self {
            outcome: TerminalOutcome::Registered {
                email: email.to_string(),
            },
            title: "Your account has been created successfully!".to_string(),
            description: format!("Enter the verification code sent to {}", email),
            exit_route: format!("/otp?email={}", email),
        }
    }
}
