// SPDX-License-Identifier: MIT

//! Self-service registration forms

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::cascade::Cascade;
use super::validation::{self, ValidationErrors, REQUIRED};
use super::{wire_date, Form};
use crate::api::models::auth::{
    IdentityValidationRequest, IdentityValidationResponse, OrgInfoRequest, RegisterRequest,
};

pub const MIN_AGE: u32 = 18;
pub const MIN_PASSWORD_LEN: usize = 8;

static NATIONAL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[12]\d{9}$").expect("valid regex"));
static POSTAL_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}$").expect("valid regex"));
static MOBILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^05\d{8}$").expect("valid regex"));

static REGION_CITY: [Cascade; 1] = [Cascade::new(&["region", "city"])];

fn required_with(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

fn number_with(errors: &mut ValidationErrors, field: &str, value: Option<i64>, message: &str) {
    if !matches!(value, Some(v) if v >= 1) {
        errors.add(field, message);
    }
}

// --- Organization details ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationDetailsForm {
    pub organization_type: String,
    pub region: Option<i64>,
    pub city: Option<i64>,
    pub name_ar: String,
    pub name_en: String,
    pub website: String,
}

impl OrganizationDetailsForm {
    pub fn to_request(&self) -> OrgInfoRequest {
        OrgInfoRequest {
            organization_type: self.organization_type.clone(),
            region: self.region.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            name_ar: self.name_ar.clone(),
            name_en: self.name_en.clone(),
            website: self.website.clone(),
        }
    }
}

impl Form for OrganizationDetailsForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        required_with(
            &mut errors,
            "organizationType",
            &self.organization_type,
            "Missing or invalid organization type",
        );
        number_with(&mut errors, "region", self.region, "Missing or invalid region");
        number_with(&mut errors, "city", self.city, "Missing or invalid city");
        validation::required_str(&mut errors, "nameAr", &self.name_ar);
        validation::required_str(&mut errors, "nameEn", &self.name_en);
        validation::website(&mut errors, "website", &self.website);
        errors.into_result()
    }

    fn cascades() -> &'static [Cascade] {
        &REGION_CITY
    }
}

// --- Identity verification ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityForm {
    pub id_number: String,
    #[serde(with = "wire_date")]
    pub dateofbirth: Option<NaiveDate>,
}

impl IdentityForm {
    pub fn to_request(&self) -> IdentityValidationRequest {
        IdentityValidationRequest {
            id_number: self.id_number.clone(),
            dateofbirth: self.dateofbirth,
        }
    }
}

impl Form for IdentityForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::matches(
            &mut errors,
            "idNumber",
            &self.id_number,
            &NATIONAL_ID,
            "ID number must start with 1 or 2 and contain exactly 10 digits",
        );

        let today = Local::now().date_naive();
        match self.dateofbirth {
            None => errors.add("dateofbirth", REQUIRED),
            Some(d) if d < validation::min_date() => errors.add("dateofbirth", "Date is too early"),
            Some(d) if d > today => errors.add("dateofbirth", "Date of birth must be in the past"),
            Some(d) if today.years_since(d).unwrap_or(0) < MIN_AGE => errors.add(
                "dateofbirth",
                format!("You must be at least {} years old", MIN_AGE),
            ),
            Some(_) => {}
        }
        errors.into_result()
    }
}

// --- Account (personal details and credentials) ---

/// Everything `Registration/Register` needs; filled across several steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountForm {
    pub id_number: String,
    #[serde(with = "wire_date")]
    pub dob: Option<NaiveDate>,
    pub organization_id: Option<String>,
    pub user_type: Option<i64>,
    pub first_name_ar: String,
    pub second_name_ar: String,
    pub family_name_ar: String,
    pub first_name_en: String,
    pub second_name_en: String,
    pub family_name_en: String,
    pub current_site: String,
    pub job_title: Option<i64>,
    pub job_title_text: String,
    pub department: String,
    pub address1: String,
    pub address2: String,
    pub region: Option<i64>,
    pub city: Option<i64>,
    pub postal_code: String,
    pub mobile_number: String,
    pub term_approved: bool,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AccountForm {
    /// Copy the names and identity returned by identity validation
    pub fn prefill_identity(&mut self, identity: &IdentityValidationResponse) {
        self.first_name_ar = identity.first_name_ar.clone();
        self.second_name_ar = identity.second_name_ar.clone();
        self.family_name_ar = identity.family_name_ar.clone();
        self.first_name_en = identity.first_name_en.clone();
        self.second_name_en = identity.second_name_en.clone();
        self.family_name_en = identity.family_name_en.clone();
        if !identity.id_number.is_empty() {
            self.id_number = identity.id_number.clone();
        }
        if identity.dob.is_some() {
            self.dob = identity.dob;
        }
    }

    pub fn validate_names(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for (field, value, label) in [
            ("firstNameAr", &self.first_name_ar, "First name (Arabic)"),
            ("secondNameAr", &self.second_name_ar, "Second name (Arabic)"),
            ("familyNameAr", &self.family_name_ar, "Family name (Arabic)"),
            ("firstNameEn", &self.first_name_en, "First name (English)"),
            ("secondNameEn", &self.second_name_en, "Second name (English)"),
            ("familyNameEn", &self.family_name_en, "Family name (English)"),
        ] {
            required_with(&mut errors, field, value, &format!("{} is required", label));
        }
        errors
    }

    pub fn validate_details(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        required_with(&mut errors, "currentSite", &self.current_site, "Current Site is required");
        required_with(&mut errors, "jobTitleText", &self.job_title_text, "Job title is required");
        required_with(&mut errors, "department", &self.department, "Department is required");
        required_with(&mut errors, "address1", &self.address1, "Address is required");
        number_with(&mut errors, "region", self.region, "Region is required");
        number_with(&mut errors, "city", self.city, "City is required");

        if self.postal_code.trim().is_empty() {
            errors.add("postalCode", "Postal code is required");
        } else if !POSTAL_CODE.is_match(&self.postal_code) {
            errors.add("postalCode", "Postal code must contain exactly 5 digits");
        }
        if !MOBILE.is_match(&self.mobile_number) {
            errors.add(
                "mobileNumber",
                "Mobile number must start with 05 and be 10 digits",
            );
        }
        if !self.term_approved {
            errors.add("termApproved", "You must accept the terms & conditions.");
        }
        errors
    }

    pub fn validate_credentials(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.email.trim().is_empty() {
            errors.add("email", REQUIRED);
        } else if !validation::email(&mut ValidationErrors::new(), "email", &self.email) {
            errors.add("email", "Invalid email address");
        }
        password_rules(&mut errors, "password", &self.password, false);
        password_rules(&mut errors, "confirmPassword", &self.confirm_password, true);
        if !errors.has("confirmPassword") && self.password != self.confirm_password {
            errors.add("confirmPassword", "Passwords do not match");
        }
        errors
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            id_number: self.id_number.clone(),
            dob: self.dob.map(wire_date::format).unwrap_or_default(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            organization_id: self.organization_id.clone(),
            user_type: self.user_type.unwrap_or_default(),
            first_name_ar: self.first_name_ar.clone(),
            second_name_ar: self.second_name_ar.clone(),
            family_name_ar: self.family_name_ar.clone(),
            first_name_en: self.first_name_en.clone(),
            second_name_en: self.second_name_en.clone(),
            family_name_en: self.family_name_en.clone(),
            address1: self.address1.clone(),
            address2: self.address2.clone(),
            postal_code: self.postal_code.clone(),
            region: self.region.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            mobile_number: self.mobile_number.clone(),
            job_title: self.job_title,
            job_title_text: self.job_title_text.clone(),
            department: self.department.clone(),
            current_site: self.current_site.clone(),
            term_approved: self.term_approved,
        }
    }
}

fn password_rules(errors: &mut ValidationErrors, field: &str, value: &str, strict: bool) {
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return;
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        errors.add(field, "Password must be at least 8 characters");
        return;
    }
    if strict {
        if !value.chars().any(|c| c.is_ascii_uppercase()) {
            errors.add(field, "Password must contain at least one uppercase letter");
        } else if !value.chars().any(|c| c.is_ascii_lowercase()) {
            errors.add(field, "Password must contain at least one lowercase letter");
        } else if !value.chars().any(|c| c.is_ascii_digit()) {
            errors.add(field, "Password must contain at least one number");
        }
    }
}

impl Form for AccountForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        number_with(
            &mut errors,
            "userType",
            self.user_type,
            "Missing or invalid user type",
        );
        for group in [
            self.validate_names(),
            self.validate_details(),
            self.validate_credentials(),
        ] {
            for (field, message) in group.iter() {
                errors.add(field.as_str(), message.as_str());
            }
        }
        errors.into_result()
    }

    fn cascades() -> &'static [Cascade] {
        &REGION_CITY
    }
}
