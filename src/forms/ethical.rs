// SPDX-License-Identifier: MIT

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use super::validation::{self, ValidationErrors};
use super::{wire_date, Form, SectionForm};
use crate::api::models::Section;
use crate::api::studies::check_pdf;
use crate::error::Result;

/// `ethicalApprovalStatus` value that requires the approval file
pub const STATUS_APPROVED: i64 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EthicsCommittee {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EthicalApprovalForm {
    pub ethical_approval_status: Option<i64>,
    #[serde(with = "wire_date")]
    pub date_of_submission: Option<NaiveDate>,
    #[serde(with = "wire_date")]
    pub date_of_approval: Option<NaiveDate>,
    pub ethics_commettees: Vec<EthicsCommittee>,
    /// Local path of the approval PDF; uploaded separately, never saved with the section
    pub attachment: Option<String>,
}

impl Default for EthicalApprovalForm {
    fn default() -> Self {
        Self {
            ethical_approval_status: None,
            date_of_submission: None,
            date_of_approval: None,
            ethics_commettees: vec![EthicsCommittee::default()],
            attachment: None,
        }
    }
}

impl EthicalApprovalForm {
    pub fn is_approved(&self) -> bool {
        self.ethical_approval_status == Some(STATUS_APPROVED)
    }
}

impl Form for EthicalApprovalForm {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::required_number(
            &mut errors,
            "ethicalApprovalStatus",
            self.ethical_approval_status,
        );
        validation::valid_date(&mut errors, "dateOfSubmission", self.date_of_submission);
        validation::valid_date(&mut errors, "dateOfApproval", self.date_of_approval);

        if self.ethics_commettees.is_empty() {
            errors.add("ethicsCommettees", "At least one committee");
        }
        for (i, committee) in self.ethics_commettees.iter().enumerate() {
            let mut nested = ValidationErrors::new();
            validation::required_str(&mut nested, "name", &committee.name);
            validation::email(&mut nested, "email", &committee.email);
            validation::phone(&mut nested, "phone", &committee.phone);
            errors.merge_prefixed(&format!("ethicsCommettees.{}", i), nested);
        }

        if let Some(path) = &self.attachment {
            if let Err(file_errors) = check_pdf(Path::new(path)) {
                for (field, message) in file_errors.iter() {
                    errors.add(field.as_str(), message.as_str());
                }
            }
        }
        if self.is_approved() && self.attachment.is_none() {
            errors.add("attachment", "Upload the approval file when status is Approved");
        }

        if let (Some(submitted), Some(approved)) = (self.date_of_submission, self.date_of_approval)
        {
            if submitted > approved {
                errors.add(
                    "dateOfApproval",
                    "Date of Approval must be on or after Date of Submission",
                );
            }
        }
        errors.into_result()
    }

    fn on_change(&mut self, field: &str) {
        if field == "ethicalApprovalStatus" && !self.is_approved() {
            self.attachment = None;
        }
    }
}

impl SectionForm for EthicalApprovalForm {
    const SECTION: Section = Section::EthicalApproval;

    fn payload(&self) -> Result<Value> {
        let mut payload = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut payload {
            map.remove("attachment");
        }
        Ok(payload)
    }

    fn pending_upload(&self) -> Option<&str> {
        if self.is_approved() {
            self.attachment.as_deref()
        } else {
            None
        }
    }

    fn after_load(&mut self) {
        if self.ethics_commettees.is_empty() {
            self.ethics_commettees.push(EthicsCommittee::default());
        }
        self.attachment = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::apply_change;
    use serde_json::json;

    fn committee() -> EthicsCommittee {
        EthicsCommittee {
            name: "KFSH IRB".to_string(),
            email: "irb@example.com".to_string(),
            phone: "966501234567".to_string(),
        }
    }

    fn submitted() -> EthicalApprovalForm {
        EthicalApprovalForm {
            ethical_approval_status: Some(3),
            date_of_submission: NaiveDate::from_ymd_opt(2024, 1, 10),
            date_of_approval: NaiveDate::from_ymd_opt(2024, 2, 10),
            ethics_commettees: vec![committee()],
            attachment: None,
        }
    }

    #[test]
    fn test_default_has_one_blank_committee() {
        let form = EthicalApprovalForm::default();
        assert_eq!(form.ethics_commettees.len(), 1);
        let errors = form.validate().unwrap_err();
        assert!(errors.has("ethicsCommettees.0.name"));
    }

    #[test]
    fn test_approved_requires_attachment() {
        let form = EthicalApprovalForm {
            ethical_approval_status: Some(STATUS_APPROVED),
            ..submitted()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("attachment"),
            Some("Upload the approval file when status is Approved")
        );
    }

    #[test]
    fn test_approval_before_submission_rejected() {
        let form = EthicalApprovalForm {
            date_of_approval: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..submitted()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("dateOfApproval"),
            Some("Date of Approval must be on or after Date of Submission")
        );
    }

    #[test]
    fn test_leaving_approved_clears_attachment() {
        let mut form = EthicalApprovalForm {
            ethical_approval_status: Some(STATUS_APPROVED),
            attachment: Some("/tmp/approval.pdf".to_string()),
            ..submitted()
        };
        apply_change(&mut form, "ethicalApprovalStatus", json!(2)).unwrap();
        assert!(form.attachment.is_none());
        assert!(form.pending_upload().is_none());
    }

    #[test]
    fn test_payload_omits_attachment() {
        let form = EthicalApprovalForm {
            attachment: Some("/tmp/a.pdf".to_string()),
            ..submitted()
        };
        let payload = form.payload().unwrap();
        assert!(payload.get("attachment").is_none());
        assert_eq!(payload["dateOfSubmission"], json!("2024-01-10T00:00:00"));
        assert_eq!(payload["ethicsCommettees"][0]["name"], json!("KFSH IRB"));
    }
}
