// SPDX-License-Identifier: MIT

//! Answer files: YAML documents holding the field values for each stage
//!
//! Field order inside a stage is kept, since setting a selector can reset
//! fields that follow it.

use serde::Deserialize;
use serde_json::Value;
use serde_yaml::Mapping;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::api::models::auth::{RegisterRequest, UserType};
use crate::api::models::Section;
use crate::error::{PortalError, Result};
use crate::wizard::registration::{RegistrationStage, RegistrationUserType};

/// Ordered `field -> value` pairs for one stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageAnswers<S> {
    pub stage: S,
    pub fields: Vec<(String, Value)>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StudyAnswers {
    pub sections: Vec<StageAnswers<Section>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationAnswers {
    pub user_type: RegistrationUserType,
    pub stages: Vec<StageAnswers<RegistrationStage>>,
}

#[derive(Debug, Deserialize)]
struct StudyFile {
    #[serde(default)]
    sections: Mapping,
}

#[derive(Debug, Deserialize)]
struct RegistrationFile {
    user_type: String,
    #[serde(default)]
    stages: Mapping,
}

pub struct AnswerLoader;

impl AnswerLoader {
    pub fn load_study<P: AsRef<Path>>(path: P) -> Result<StudyAnswers> {
        let content = fs::read_to_string(path)?;
        Self::parse_study(&content)
    }

    /// Sections are keyed by `study_brief`, `sharing_statement`, ...
    /// (endpoint names such as `IPD` are accepted too)
    pub fn parse_study(content: &str) -> Result<StudyAnswers> {
        let file: StudyFile = serde_yaml::from_str(content)?;
        let sections = stage_answers(&file.sections, |key| {
            Section::from_str(key).map_err(PortalError::Other)
        })?;
        Ok(StudyAnswers { sections })
    }

    pub fn load_registration<P: AsRef<Path>>(path: P) -> Result<RegistrationAnswers> {
        let content = fs::read_to_string(path)?;
        Self::parse_registration(&content)
    }

    pub fn parse_registration(content: &str) -> Result<RegistrationAnswers> {
        let file: RegistrationFile = serde_yaml::from_str(content)?;
        let user_type = file.user_type.parse()?;
        let stages = stage_answers(&file.stages, RegistrationStage::from_str)?;
        Ok(RegistrationAnswers { user_type, stages })
    }

    pub fn load_subuser<P: AsRef<Path>>(path: P) -> Result<RegisterRequest> {
        let content = fs::read_to_string(path)?;
        Self::parse_subuser(&content)
    }

    /// Sub-user body in wire field names; the account type is always `SubUser`
    pub fn parse_subuser(content: &str) -> Result<RegisterRequest> {
        let mut body: RegisterRequest = serde_yaml::from_str(content)?;
        if body.email.trim().is_empty() {
            return Err(PortalError::other("Sub-user email is required"));
        }
        if body.password != body.confirm_password {
            return Err(PortalError::other("Passwords do not match"));
        }
        body.user_type = UserType::SubUser.code();
        Ok(body)
    }
}

fn stage_answers<S, F>(mapping: &Mapping, parse_stage: F) -> Result<Vec<StageAnswers<S>>>
where
    F: Fn(&str) -> Result<S>,
{
    let mut out = Vec::with_capacity(mapping.len());
    for (key, fields) in mapping {
        let key = key
            .as_str()
            .ok_or_else(|| PortalError::other("Stage keys must be strings"))?;
        let stage = parse_stage(key)?;
        out.push(StageAnswers {
            stage,
            fields: field_values(key, fields)?,
        });
    }
    Ok(out)
}

fn field_values(stage: &str, fields: &serde_yaml::Value) -> Result<Vec<(String, Value)>> {
    let mapping = match fields {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        serde_yaml::Value::Mapping(m) => m,
        _ => {
            return Err(PortalError::other(format!(
                "Answers for '{}' must be a mapping of field names to values",
                stage
            )))
        }
    };

    let mut values = Vec::with_capacity(mapping.len());
    for (field, value) in mapping {
        let field = field.as_str().ok_or_else(|| {
            PortalError::other(format!("Field names in '{}' must be strings", stage))
        })?;
        values.push((field.to_string(), serde_json::to_value(value)?));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_study_answers_keeps_order() {
        let yaml = r#"
sections:
  sponsors:
    isThereAnySponsors: true
    sponsorCountry: 1
    sponsorRegion: 4
  IPD:
    isIndividualParticipantsDataShared: 2
  study_brief:
"#;
        let answers = AnswerLoader::parse_study(yaml).unwrap();
        assert_eq!(answers.sections.len(), 3);

        let sponsors = &answers.sections[0];
        assert_eq!(sponsors.stage, Section::Sponsors);
        let names: Vec<&str> = sponsors.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["isThereAnySponsors", "sponsorCountry", "sponsorRegion"]
        );
        assert_eq!(sponsors.fields[0].1, json!(true));

        assert_eq!(answers.sections[1].stage, Section::SharingStatement);
        assert!(answers.sections[2].fields.is_empty());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = AnswerLoader::parse_study("sections:\n  budget: {}\n").unwrap_err();
        assert!(err.to_string().contains("Unknown section"));
    }

    #[test]
    fn test_parse_registration_answers() {
        let yaml = r#"
user_type: organization
stages:
  organization_details:
    organizationType: "3"
    region: 1
    city: 10
  verify_identity:
    idNumber: "1012345678"
    dateofbirth: "1990-05-01"
"#;
        let answers = AnswerLoader::parse_registration(yaml).unwrap();
        assert_eq!(answers.user_type, RegistrationUserType::Organization);
        assert_eq!(answers.stages[0].stage, RegistrationStage::OrganizationDetails);
        assert_eq!(answers.stages[1].fields[1], ("dateofbirth".to_string(), json!("1990-05-01")));
    }

    #[test]
    fn test_parse_subuser_forces_account_type() {
        let yaml = r#"
email: lab@example.com
password: Secret123!
confirmPassword: Secret123!
firstNameEn: Nora
userType: 2
region: 1
city: 10
"#;
        let body = AnswerLoader::parse_subuser(yaml).unwrap();
        assert_eq!(body.email, "lab@example.com");
        assert_eq!(body.first_name_en, "Nora");
        assert_eq!(body.user_type, UserType::SubUser.code());
        assert!(body.organization_id.is_none());
    }

    #[test]
    fn test_subuser_passwords_must_match() {
        let yaml = "email: lab@example.com\npassword: a\nconfirmPassword: b\n";
        let err = AnswerLoader::parse_subuser(yaml).unwrap_err();
        assert!(err.to_string().contains("Passwords do not match"));
    }

    #[test]
    fn test_fields_must_be_mapping() {
        let err = AnswerLoader::parse_study("sections:\n  funders: [1, 2]\n").unwrap_err();
        assert!(err.to_string().contains("must be a mapping"));
    }
}
