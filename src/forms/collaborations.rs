// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::cascade::Cascade;
use super::validation::{self, ValidationErrors, REQUIRED};
use super::{ContactInfo, Form, SectionForm};
use crate::api::models::Section;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollaborationsForm {
    pub is_there_any_collaboration: Option<bool>,
    pub name: String,
    pub country: Option<i64>,
    pub region: Option<i64>,
    pub city: Option<i64>,
    pub postcode: Option<i64>,
    pub tel: String,
    pub website: String,
    pub designation: String,
    pub public_contact: ContactInfo,
    pub scientific_contact: ContactInfo,
}

static COLLABORATION_CASCADES: [Cascade; 1] = [Cascade::new(&["country", "region", "city"])];

impl Form for CollaborationsForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match self.is_there_any_collaboration {
            None => errors.add("isThereAnyCollaboration", REQUIRED),
            Some(false) => {}
            Some(true) => {
                validation::required_str(&mut errors, "name", &self.name);
                validation::positive_integer(&mut errors, "country", self.country);
                validation::positive_integer(&mut errors, "region", self.region);
                validation::positive_integer(&mut errors, "city", self.city);
                validation::required_number(&mut errors, "postcode", self.postcode);
                validation::phone(&mut errors, "tel", &self.tel);
                validation::website(&mut errors, "website", &self.website);
                validation::required_str(&mut errors, "designation", &self.designation);
                validation::contact_info(&mut errors, "publicContact", &self.public_contact);
                validation::contact_info(&mut errors, "scientificContact", &self.scientific_contact);
            }
        }
        errors.into_result()
    }

    fn cascades() -> &'static [Cascade] {
        &COLLABORATION_CASCADES
    }

    fn on_change(&mut self, field: &str) {
        if field == "isThereAnyCollaboration" && self.is_there_any_collaboration != Some(true) {
            *self = Self {
                is_there_any_collaboration: self.is_there_any_collaboration,
                ..Self::default()
            };
        }
    }
}

impl SectionForm for CollaborationsForm {
    const SECTION: Section = Section::Collaborations;
}
