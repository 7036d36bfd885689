// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationErrors};
use super::{Form, SectionForm};
use crate::api::models::Section;

/// `isIndividualParticipantsDataShared` value meaning "yes"
pub const SHARED_YES: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SharingStatementForm {
    pub is_individual_participants_data_shared: Option<i64>,
    pub share_type: Vec<i64>,
    pub ipd_sharing_plan_description: String,
    pub trial_website: String,
}

impl SharingStatementForm {
    pub fn is_shared(&self) -> bool {
        self.is_individual_participants_data_shared == Some(SHARED_YES)
    }
}

impl Form for SharingStatementForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::required_number(
            &mut errors,
            "isIndividualParticipantsDataShared",
            self.is_individual_participants_data_shared,
        );

        if self.is_shared() {
            if self.ipd_sharing_plan_description.trim().is_empty() {
                errors.add(
                    "ipdSharingPlanDescription",
                    "Please provide a description for the sharing plan",
                );
            }
            if self.share_type.is_empty() {
                errors.add(
                    "shareType",
                    "Select at least one supporting information type",
                );
            }
            if self.trial_website.trim().is_empty() {
                errors.add("trialWebsite", "Trial website is required");
            } else if !validation::is_http_url(&self.trial_website) {
                errors.add(
                    "trialWebsite",
                    "Enter a valid URL (e.g., https://example.com)",
                );
            }
        }
        errors.into_result()
    }

    fn on_change(&mut self, field: &str) {
        if field == "isIndividualParticipantsDataShared" && !self.is_shared() {
            *self = Self {
                is_individual_participants_data_shared: self.is_individual_participants_data_shared,
                ..Self::default()
            };
        }
    }
}

impl SectionForm for SharingStatementForm {
    const SECTION: Section = Section::SharingStatement;
}
