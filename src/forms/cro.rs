// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::cascade::Cascade;
use super::validation::{self, ValidationErrors, REQUIRED};
use super::{Form, SectionForm};
use crate::api::models::Section;

/// `roleOrServices` value that asks for a free-text description
pub const ROLE_OTHER: i64 = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CroForm {
    #[serde(rename = "isThereAnyCRO")]
    pub is_there_any_cro: Option<bool>,
    pub name: String,
    pub country: Option<i64>,
    pub region: Option<i64>,
    pub city: Option<i64>,
    pub postcode: Option<i64>,
    pub tel: String,
    pub cro_website: String,
    pub role_or_services: Option<i64>,
    pub other_role_or_services: String,
}

static CRO_CASCADES: [Cascade; 1] = [Cascade::new(&["country", "region", "city"])];

impl Form for CroForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match self.is_there_any_cro {
            None => errors.add("isThereAnyCRO", REQUIRED),
            Some(false) => {}
            Some(true) => {
                validation::required_str(&mut errors, "name", &self.name);
                validation::positive_integer(&mut errors, "country", self.country);
                validation::positive_integer(&mut errors, "region", self.region);
                validation::positive_integer(&mut errors, "city", self.city);
                validation::positive_integer(&mut errors, "postcode", self.postcode);
                validation::phone(&mut errors, "tel", &self.tel);
                validation::website(&mut errors, "croWebsite", &self.cro_website);
                validation::positive_integer(&mut errors, "roleOrServices", self.role_or_services);
                if self.role_or_services == Some(ROLE_OTHER)
                    && self.other_role_or_services.trim().is_empty()
                {
                    errors.add(
                        "otherRoleOrServices",
                        "Other role or service is required when role is 'Other'",
                    );
                }
            }
        }
        errors.into_result()
    }

    fn cascades() -> &'static [Cascade] {
        &CRO_CASCADES
    }

    fn on_change(&mut self, field: &str) {
        if field == "isThereAnyCRO" && self.is_there_any_cro != Some(true) {
            *self = Self {
                is_there_any_cro: self.is_there_any_cro,
                ..Self::default()
            };
        }
    }
}

impl SectionForm for CroForm {
    const SECTION: Section = Section::Cro;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> CroForm {
        CroForm {
            is_there_any_cro: Some(true),
            name: "Clinical Partners".to_string(),
            country: Some(1),
            region: Some(2),
            city: Some(3),
            postcode: Some(12345),
            tel: "966112223333".to_string(),
            cro_website: "https://cro.example.com".to_string(),
            role_or_services: Some(2),
            other_role_or_services: String::new(),
        }
    }

    #[test]
    fn test_other_role_needs_text() {
        assert!(valid().validate().is_ok());
        let form = CroForm {
            role_or_services: Some(ROLE_OTHER),
            ..valid()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("otherRoleOrServices"));
    }

    #[test]
    fn test_selector_wire_name() {
        let value = serde_json::to_value(valid()).unwrap();
        assert_eq!(value["isThereAnyCRO"], json!(true));
        assert_eq!(value["croWebsite"], json!("https://cro.example.com"));
    }
}
