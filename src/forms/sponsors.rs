// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::cascade::Cascade;
use super::validation::{self, ValidationErrors, REQUIRED};
use super::{Form, SectionForm};
use crate::api::models::Section;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SponsorsForm {
    pub is_there_any_sponsors: Option<bool>,
    pub sponsor_name: String,
    pub sponsor_country: Option<i64>,
    pub sponsor_region: Option<i64>,
    pub sponsor_city: Option<i64>,
    pub sponsor_postcode: Option<i64>,
    pub sponsor_phone: String,
    pub sponsor_website: String,
    pub sponsor_designation: String,
    pub public_phone: String,
    pub public_email: String,
    pub scientific_phone: String,
    pub scientific_email: String,
}

static SPONSOR_CASCADES: [Cascade; 1] =
    [Cascade::new(&["sponsorCountry", "sponsorRegion", "sponsorCity"])];

impl SponsorsForm {
    fn validate_sponsor(&self, errors: &mut ValidationErrors) {
        validation::required_str(errors, "sponsorName", &self.sponsor_name);
        validation::positive_integer(errors, "sponsorCountry", self.sponsor_country);
        validation::positive_integer(errors, "sponsorRegion", self.sponsor_region);
        validation::positive_integer(errors, "sponsorCity", self.sponsor_city);
        validation::positive_integer(errors, "sponsorPostcode", self.sponsor_postcode);
        validation::phone(errors, "sponsorPhone", &self.sponsor_phone);
        validation::website(errors, "sponsorWebsite", &self.sponsor_website);
        validation::required_str(errors, "sponsorDesignation", &self.sponsor_designation);
        validation::phone(errors, "publicPhone", &self.public_phone);
        validation::email(errors, "publicEmail", &self.public_email);
        validation::phone(errors, "scientificPhone", &self.scientific_phone);
        validation::email(errors, "scientificEmail", &self.scientific_email);
    }
}

impl Form for SponsorsForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match self.is_there_any_sponsors {
            None => errors.add("isThereAnySponsors", REQUIRED),
            Some(false) => {}
            Some(true) => self.validate_sponsor(&mut errors),
        }
        errors.into_result()
    }

    fn cascades() -> &'static [Cascade] {
        &SPONSOR_CASCADES
    }

    fn on_change(&mut self, field: &str) {
        if field == "isThereAnySponsors" && self.is_there_any_sponsors != Some(true) {
            *self = Self {
                is_there_any_sponsors: self.is_there_any_sponsors,
                ..Self::default()
            };
        }
    }
}

impl SectionForm for SponsorsForm {
    const SECTION: Section = Section::Sponsors;
}
