// SPDX-License-Identifier: MIT

//! Typed client for the portal REST backend

pub mod auth;
pub mod client;
pub mod lookups;
pub mod models;
pub mod requests;
pub mod session;
pub mod studies;
pub mod users;

pub use auth::RegistrationApi;
pub use client::ApiClient;
pub use lookups::{LookupApi, LookupLoader};
pub use requests::{DecisionMaker, ReviewApi};
pub use session::Session;
pub use studies::{Attachment, StudyApi};
