// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationErrors};
use super::{Form, SectionForm};
use crate::api::models::Section;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyBriefForm {
    pub public_title_ar: String,
    pub public_title_en: String,
    pub scientific_title: String,
    pub acronym: String,
    pub secondary_identifying_numbers: String,
}

impl Form for StudyBriefForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::arabic_text(&mut errors, "publicTitleAr", &self.public_title_ar);
        validation::english_text(&mut errors, "publicTitleEn", &self.public_title_en);
        validation::required_str(&mut errors, "scientificTitle", &self.scientific_title);
        validation::required_str(&mut errors, "acronym", &self.acronym);
        validation::numbers_only(
            &mut errors,
            "secondaryIdentifyingNumbers",
            &self.secondary_identifying_numbers,
        );
        errors.into_result()
    }
}

impl SectionForm for StudyBriefForm {
    const SECTION: Section = Section::StudyBrief;
}
