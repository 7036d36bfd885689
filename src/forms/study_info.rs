// SPDX-License-Identifier: MIT

//! Study information: protocol, timeline, outcomes and the design block
//! matching the study type.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationErrors};
use super::{wire_date, Form, SectionForm};
use crate::api::models::Section;

pub const STUDY_TYPE_OBSERVATIONAL: i64 = 1;
pub const STUDY_TYPE_INTERVENTIONAL: i64 = 5;

static PROTOCOL_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{7}$").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutcomeMeasure {
    pub name: String,
    pub methodof_the_measurement: String,
    pub time: String,
}

impl OutcomeMeasure {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required_str(&mut errors, "name", &self.name);
        validation::required_str(
            &mut errors,
            "methodofTheMeasurement",
            &self.methodof_the_measurement,
        );
        validation::required_str(&mut errors, "time", &self.time);
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObservationalGroup {
    pub group_id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyObservational {
    pub observational_study_model: Option<i64>,
    pub observational_study_model_text: String,
    pub study_purpose: Option<i64>,
    pub study_purpose_text: String,
    pub time_prospective: Option<i64>,
    pub time_prospective_text: String,
    pub patient_registry_information: String,
    pub groups: Vec<ObservationalGroup>,
    pub group_cross_reference: String,
}

impl StudyObservational {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required_number(
            &mut errors,
            "observationalStudyModel",
            self.observational_study_model,
        );
        validation::required_str(
            &mut errors,
            "observationalStudyModelText",
            &self.observational_study_model_text,
        );
        validation::required_number(&mut errors, "studyPurpose", self.study_purpose);
        validation::required_str(&mut errors, "studyPurposeText", &self.study_purpose_text);
        validation::required_number(&mut errors, "timeProspective", self.time_prospective);
        validation::required_str(
            &mut errors,
            "timeProspectiveText",
            &self.time_prospective_text,
        );
        validation::required_str(
            &mut errors,
            "patientRegistryInformation",
            &self.patient_registry_information,
        );
        validation::required_str(
            &mut errors,
            "groupCrossReference",
            &self.group_cross_reference,
        );
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterventionalArm {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub arm_type: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Intervention {
    pub name: String,
    pub description: String,
    pub intervention_type: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyInterventional {
    pub primary_purpose: Option<i64>,
    pub primary_purpose_text: String,
    pub study_phase: Option<i64>,
    pub type_of_endpoint: Option<i64>,
    pub study_model: Option<i64>,
    pub study_model_text: String,
    pub randomization: Option<i64>,
    pub method_of_randomization: String,
    pub blinding: Option<i64>,
    pub blinding_text: String,
    pub arm_or_interventional_cross_reference: String,
    pub arms: Vec<InterventionalArm>,
    pub interventions: Vec<Intervention>,
}

impl StudyInterventional {
    fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        validation::required_number(&mut errors, "primaryPurpose", self.primary_purpose);
        validation::required_str(&mut errors, "primaryPurposeText", &self.primary_purpose_text);
        validation::required_number(&mut errors, "studyPhase", self.study_phase);
        validation::required_number(&mut errors, "typeOfEndpoint", self.type_of_endpoint);
        validation::required_number(&mut errors, "studyModel", self.study_model);
        validation::required_str(&mut errors, "studyModelText", &self.study_model_text);
        validation::required_number(&mut errors, "randomization", self.randomization);
        validation::required_str(
            &mut errors,
            "methodOfRandomization",
            &self.method_of_randomization,
        );
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyInformationForm {
    #[serde(with = "wire_date")]
    pub protocol_date: Option<NaiveDate>,
    pub protocol_number: String,
    pub version: String,
    #[serde(with = "wire_date")]
    pub study_start_date: Option<NaiveDate>,
    #[serde(with = "wire_date")]
    pub study_end_date: Option<NaiveDate>,
    pub follow_up_duration: String,
    pub overall_recruitment_status: Option<i64>,
    pub why_study_stopped: Option<i64>,
    pub why_study_stopped_text: String,
    pub therapeutic_area: Option<i64>,
    pub primary_disease_or_condition: Option<i64>,
    pub study_objective: String,
    pub primary_outcome_measure: OutcomeMeasure,
    pub secondary_outcome_measure: OutcomeMeasure,
    pub fda_regulated_product: Option<i64>,
    pub type_of_sponsorship: Option<i64>,
    pub is_independent_data_safety_monitoring: Option<bool>,
    pub study_type: Option<i64>,
    pub study_type_text: String,
    pub study_observational: Option<StudyObservational>,
    pub study_interventional: Option<StudyInterventional>,
}

impl Form for StudyInformationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::valid_date(&mut errors, "protocolDate", self.protocol_date);
        validation::matches(
            &mut errors,
            "protocolNumber",
            &self.protocol_number,
            &PROTOCOL_NUMBER,
            "Must be exactly 7 digits",
        );
        validation::required_str(&mut errors, "version", &self.version);
        validation::valid_date(&mut errors, "studyStartDate", self.study_start_date);
        validation::valid_date(&mut errors, "studyEndDate", self.study_end_date);
        validation::required_str(&mut errors, "followUpDuration", &self.follow_up_duration);
        validation::required_number(
            &mut errors,
            "overallRecruitmentStatus",
            self.overall_recruitment_status,
        );
        validation::required_number(&mut errors, "whyStudyStopped", self.why_study_stopped);
        validation::required_str(
            &mut errors,
            "whyStudyStoppedText",
            &self.why_study_stopped_text,
        );
        validation::required_number(&mut errors, "therapeuticArea", self.therapeutic_area);
        validation::required_number(
            &mut errors,
            "primaryDiseaseOrCondition",
            self.primary_disease_or_condition,
        );
        validation::required_str(&mut errors, "studyObjective", &self.study_objective);
        errors.merge_prefixed("primaryOutcomeMeasure", self.primary_outcome_measure.validate());
        errors.merge_prefixed(
            "secondaryOutcomeMeasure",
            self.secondary_outcome_measure.validate(),
        );
        validation::required_number(&mut errors, "fdaRegulatedProduct", self.fda_regulated_product);
        validation::required_number(&mut errors, "typeOfSponsorship", self.type_of_sponsorship);
        validation::required_number(&mut errors, "studyType", self.study_type);
        validation::required_str(&mut errors, "studyTypeText", &self.study_type_text);

        if let Some(block) = &self.study_observational {
            errors.merge_prefixed("studyObservational", block.validate());
        }
        if let Some(block) = &self.study_interventional {
            errors.merge_prefixed("studyInterventional", block.validate());
        }

        if let (Some(start), Some(end)) = (self.study_start_date, self.study_end_date) {
            if start > end {
                errors.add(
                    "studyEndDate",
                    "Study end date must be on or after study start date",
                );
            }
        }
        if let (Some(protocol), Some(start)) = (self.protocol_date, self.study_start_date) {
            if protocol > start {
                errors.add(
                    "protocolDate",
                    "Protocol date should be on or before study start date",
                );
            }
        }

        match self.study_type {
            Some(STUDY_TYPE_INTERVENTIONAL) if self.study_interventional.is_none() => errors.add(
                "studyInterventional",
                "Interventional details are required for an interventional study",
            ),
            Some(STUDY_TYPE_OBSERVATIONAL) if self.study_observational.is_none() => errors.add(
                "studyObservational",
                "Observational details are required for an observational study",
            ),
            _ => {}
        }
        errors.into_result()
    }
}

impl SectionForm for StudyInformationForm {
    const SECTION: Section = Section::StudyInformation;
}
