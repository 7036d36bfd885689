// SPDX-License-Identifier: MIT

//! trial-portal: client library for a clinical-trial registration and
//! review portal
//!
//! - [`api`]: typed REST client, session handling and endpoint traits
//! - [`forms`]: per-section form state and validation
//! - [`wizard`]: the multi-step study creation, review and registration flows
//! - [`script`]: YAML answer files driving a wizard end to end

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod script;
pub mod wizard;

pub use config::PortalConfig;
pub use error::{NavigationError, PortalError, Result};
