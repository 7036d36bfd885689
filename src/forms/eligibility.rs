// SPDX-License-Identifier: MIT

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationErrors};
use super::{wire_date, Form, SectionForm};
use crate::api::models::Section;

static AGE_LIMIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}$").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EligibilityForm {
    pub participant_type: Option<i64>,
    pub age_limit: String,
    pub participant_gender: Option<i64>,
    pub inclusion_exclusion: String,
    pub location_of_study: Option<i64>,
    pub target_in_saudi: Option<i64>,
    pub target_global: Option<i64>,
    pub actual_enrolled_saudi: Option<i64>,
    #[serde(with = "wire_date")]
    pub recruitment_start_saudi: Option<NaiveDate>,
    #[serde(with = "wire_date")]
    pub recruitment_end_saudi: Option<NaiveDate>,
    #[serde(with = "wire_date")]
    pub recruitment_start_global: Option<NaiveDate>,
    #[serde(with = "wire_date")]
    pub recruitment_end_global: Option<NaiveDate>,
}

impl Form for EligibilityForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::required_number(&mut errors, "participantType", self.participant_type);
        validation::matches(
            &mut errors,
            "ageLimit",
            &self.age_limit,
            &AGE_LIMIT,
            "Must be exactly 2 digits",
        );
        validation::required_number(&mut errors, "participantGender", self.participant_gender);
        validation::required_str(&mut errors, "inclusionExclusion", &self.inclusion_exclusion);
        validation::required_number(&mut errors, "locationOfStudy", self.location_of_study);
        validation::required_number(&mut errors, "targetInSaudi", self.target_in_saudi);
        validation::required_number(&mut errors, "targetGlobal", self.target_global);
        validation::required_number(&mut errors, "actualEnrolledSaudi", self.actual_enrolled_saudi);
        validation::valid_date(
            &mut errors,
            "recruitmentStartSaudi",
            self.recruitment_start_saudi,
        );
        validation::valid_date(&mut errors, "recruitmentEndSaudi", self.recruitment_end_saudi);
        validation::valid_date(
            &mut errors,
            "recruitmentStartGlobal",
            self.recruitment_start_global,
        );
        validation::valid_date(
            &mut errors,
            "recruitmentEndGlobal",
            self.recruitment_end_global,
        );
        errors.into_result()
    }
}

impl SectionForm for EligibilityForm {
    const SECTION: Section = Section::Eligibility;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_limit_two_digits() {
        for (age, ok) in [("18", true), ("8", false), ("180", false), ("1a", false)] {
            let form = EligibilityForm {
                age_limit: age.to_string(),
                ..Default::default()
            };
            let errors = form.validate().unwrap_err();
            assert_eq!(!errors.has("ageLimit"), ok, "age {}", age);
        }
    }
}
