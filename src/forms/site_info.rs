// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::cascade::Cascade;
use super::validation::{self, ValidationErrors};
use super::{ContactInfo, Form, SectionForm};
use crate::api::models::Section;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteInformationForm {
    pub regions: Option<i64>,
    pub cities: Option<i64>,
    pub site_name_ar: String,
    pub site_name_en: String,
    pub pi_title: String,
    pub pi_first_nme: String,
    pub pi_family_nme: String,
    pub pi_region: Option<i64>,
    pub pi_city: Option<i64>,
    pub pi_contact_for_scientific: ContactInfo,
    pub pi_contact_for_public: ContactInfo,
    pub public_contact: ContactInfo,
    pub scientific_contact: ContactInfo,
    pub site_requirements_status: Option<i64>,
}

static SITE_CASCADES: [Cascade; 2] = [
    Cascade::new(&["regions", "cities"]),
    Cascade::new(&["piRegion", "piCity"]),
];

impl Form for SiteInformationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::positive_integer(&mut errors, "regions", self.regions);
        validation::positive_integer(&mut errors, "cities", self.cities);
        validation::arabic_text(&mut errors, "siteNameAr", &self.site_name_ar);
        validation::english_text(&mut errors, "siteNameEn", &self.site_name_en);
        validation::required_str(&mut errors, "piTitle", &self.pi_title);
        validation::required_str(&mut errors, "piFirstNme", &self.pi_first_nme);
        validation::required_str(&mut errors, "piFamilyNme", &self.pi_family_nme);
        validation::positive_integer(&mut errors, "piRegion", self.pi_region);
        validation::positive_integer(&mut errors, "piCity", self.pi_city);
        validation::contact_info(
            &mut errors,
            "piContactForScientific",
            &self.pi_contact_for_scientific,
        );
        validation::contact_info(&mut errors, "piContactForPublic", &self.pi_contact_for_public);
        validation::contact_info(&mut errors, "publicContact", &self.public_contact);
        validation::contact_info(&mut errors, "scientificContact", &self.scientific_contact);
        validation::required_number(
            &mut errors,
            "siteRequirementsStatus",
            self.site_requirements_status,
        );
        errors.into_result()
    }

    fn cascades() -> &'static [Cascade] {
        &SITE_CASCADES
    }
}

impl SectionForm for SiteInformationForm {
    const SECTION: Section = Section::SiteInformation;
}
