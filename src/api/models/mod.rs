// SPDX-License-Identifier: MIT

//! Wire types of the portal REST API

pub mod auth;
pub mod lookup;
pub mod response;
pub mod review;
pub mod study;
pub mod user;

pub use auth::{LoginResponse, UserRole, UserType};
pub use lookup::{Lookup, LookupKind};
pub use response::{GeneralResponse, PaginationRequest, PaginationResponse};
pub use review::{DecisionRequest, RequestSummary, Reviewer};
pub use study::{Section, StudyInitialData, StudySummary};
pub use user::UserSummary;
