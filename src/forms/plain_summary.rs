// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationErrors};
use super::{Form, SectionForm};
use crate::api::models::Section;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlainSummaryForm {
    pub plain_summary_ar: String,
    pub plain_summary_en: String,
    pub keywords: String,
}

impl Form for PlainSummaryForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::arabic_text(&mut errors, "plainSummaryAr", &self.plain_summary_ar);
        validation::english_text(&mut errors, "plainSummaryEn", &self.plain_summary_en);
        validation::required_str(&mut errors, "keywords", &self.keywords);
        errors.into_result()
    }
}

impl SectionForm for PlainSummaryForm {
    const SECTION: Section = Section::PlainSummary;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_summary_rejects_arabic() {
        let form = PlainSummaryForm {
            plain_summary_ar: "ملخص".to_string(),
            plain_summary_en: "ملخص".to_string(),
            keywords: "hypertension".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("plainSummaryEn"),
            Some("English letters/numbers only")
        );
        assert!(!errors.has("plainSummaryAr"));
    }
}
