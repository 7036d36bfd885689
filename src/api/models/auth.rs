// SPDX-License-Identifier: MIT

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::forms::wire_date;

/// Portal roles carried in the login response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Individual,
    SubUser,
    OrganizationAdmin,
    Manager,
    Reviewer,
    #[serde(other)]
    Unknown,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Individual => "Individual",
            UserRole::SubUser => "SubUser",
            UserRole::OrganizationAdmin => "OrganizationAdmin",
            UserRole::Manager => "Manager",
            UserRole::Reviewer => "Reviewer",
            UserRole::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric account type used by registration and the users list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Individual = 1,
    OrgAdmin = 2,
    SubUser = 3,
    Reviewer = 4,
    Manager = 5,
}

impl UserType {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(UserType::Individual),
            2 => Some(UserType::OrgAdmin),
            3 => Some(UserType::SubUser),
            4 => Some(UserType::Reviewer),
            5 => Some(UserType::Manager),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponse {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub national_id: String,
    pub first_name_en: String,
    pub second_name_en: String,
    pub family_name_en: String,
    pub first_name_ar: String,
    pub second_name_ar: String,
    pub family_name_ar: String,
    pub user_type: i64,
    pub is_approved: bool,
    pub roles: Vec<UserRole>,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreRegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: i64,
}

/// Identifier returned by pre-registration and organization info
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedId {
    pub id: String,
}

/// Names held by the national identity service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityValidationResponse {
    pub first_name_ar: String,
    pub second_name_ar: String,
    pub family_name_ar: String,
    pub first_name_en: String,
    pub second_name_en: String,
    pub family_name_en: String,
    pub id_number: String,
    #[serde(default, with = "wire_date")]
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityValidationRequest {
    pub id_number: String,
    #[serde(default, with = "wire_date")]
    pub dateofbirth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgInfoRequest {
    pub organization_type: String,
    pub region: i64,
    pub city: i64,
    pub name_ar: String,
    pub name_en: String,
    pub website: String,
}

/// Account creation body for both registration flows and sub-users
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub id_number: String,
    pub dob: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub organization_id: Option<String>,
    pub user_type: i64,
    pub first_name_ar: String,
    pub second_name_ar: String,
    pub family_name_ar: String,
    pub first_name_en: String,
    pub second_name_en: String,
    pub family_name_en: String,
    pub address1: String,
    pub address2: String,
    pub postal_code: String,
    pub region: i64,
    pub city: i64,
    pub mobile_number: String,
    pub job_title: Option<i64>,
    pub job_title_text: String,
    pub department: String,
    pub current_site: String,
    pub term_approved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmEmailRequest {
    pub email: String,
    pub code: String,
}
