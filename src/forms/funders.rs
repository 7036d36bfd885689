// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::validation::ValidationErrors;
use super::{Form, SectionForm};
use crate::api::models::Section;

pub const SOURCE_OTHER: i64 = 6;
pub const TYPE_OTHER: i64 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundersForm {
    pub sources: Vec<i64>,
    pub source_text: String,
    #[serde(rename = "type")]
    pub types: Vec<i64>,
    pub type_text: String,
}

fn positive_list(errors: &mut ValidationErrors, field: &str, values: &[i64], empty: &str, bad: &str) {
    if values.is_empty() {
        errors.add(field, empty);
    } else if values.iter().any(|v| *v <= 0) {
        errors.add(field, bad);
    }
}

impl Form for FundersForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        positive_list(
            &mut errors,
            "sources",
            &self.sources,
            "At least one source is required",
            "Source must be a positive number",
        );
        positive_list(
            &mut errors,
            "type",
            &self.types,
            "At least one type is required",
            "Type must be a positive number",
        );
        if self.sources.contains(&SOURCE_OTHER) && self.source_text.trim().is_empty() {
            errors.add(
                "sourceText",
                "Source text is required when 'Other' (6) is selected in sources",
            );
        }
        if self.types.contains(&TYPE_OTHER) && self.type_text.trim().is_empty() {
            errors.add(
                "typeText",
                "Type text is required when 'Other' (3) is selected in type",
            );
        }
        errors.into_result()
    }
}

impl SectionForm for FundersForm {
    const SECTION: Section = Section::Funders;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_selections_need_text() {
        let form = FundersForm {
            sources: vec![1, SOURCE_OTHER],
            types: vec![TYPE_OTHER],
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("sourceText"));
        assert!(errors.has("typeText"));
    }

    #[test]
    fn test_lists_required() {
        let errors = FundersForm::default().validate().unwrap_err();
        assert_eq!(errors.get("sources"), Some("At least one source is required"));
        assert_eq!(errors.get("type"), Some("At least one type is required"));
    }

    #[test]
    fn test_valid_funders() {
        let form = FundersForm {
            sources: vec![2],
            types: vec![1],
            ..Default::default()
        };
        assert!(form.validate().is_ok());
    }
}
