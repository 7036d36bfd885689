// SPDX-License-Identifier: MIT

//! Study records and the wizard's section identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One persisted part of a study record, in wizard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    StudyBrief,
    PlainSummary,
    SiteInformation,
    EthicalApproval,
    StudyInformation,
    Eligibility,
    Sponsors,
    Cro,
    Collaborations,
    Funders,
    SharingStatement,
}

impl Section {
    pub const ALL: [Section; 11] = [
        Section::StudyBrief,
        Section::PlainSummary,
        Section::SiteInformation,
        Section::EthicalApproval,
        Section::StudyInformation,
        Section::Eligibility,
        Section::Sponsors,
        Section::Cro,
        Section::Collaborations,
        Section::Funders,
        Section::SharingStatement,
    ];

    /// Name used in `Study/Get{name}` and `Study/Save{name}`
    pub fn endpoint_name(&self) -> &'static str {
        match self {
            Section::StudyBrief => "StudyBrief",
            Section::PlainSummary => "PlainSummary",
            Section::SiteInformation => "SiteInformation",
            Section::EthicalApproval => "EthicalApproval",
            Section::StudyInformation => "StudyInformation",
            Section::Eligibility => "Eligibility",
            Section::Sponsors => "Sponsors",
            Section::Cro => "Cro",
            Section::Collaborations => "Collaborations",
            Section::Funders => "Funders",
            Section::SharingStatement => "IPD",
        }
    }

    /// Stable key used in answer files and logs
    pub fn key(&self) -> &'static str {
        match self {
            Section::StudyBrief => "study_brief",
            Section::PlainSummary => "plain_summary",
            Section::SiteInformation => "site_information",
            Section::EthicalApproval => "ethical_approval",
            Section::StudyInformation => "study_information",
            Section::Eligibility => "eligibility",
            Section::Sponsors => "sponsors",
            Section::Cro => "cro",
            Section::Collaborations => "collaborations",
            Section::Funders => "funders",
            Section::SharingStatement => "sharing_statement",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::StudyBrief => "Study Brief",
            Section::PlainSummary => "Plain Language Summary",
            Section::SiteInformation => "Site Information",
            Section::EthicalApproval => "Ethical Approval",
            Section::StudyInformation => "Study Information",
            Section::Eligibility => "Eligibility",
            Section::Sponsors => "Sponsors",
            Section::Cro => "Contract Research Organization",
            Section::Collaborations => "Collaborations",
            Section::Funders => "Funders",
            Section::SharingStatement => "Sharing Statement",
        }
    }

    pub fn get_path(&self, study_id: &str) -> String {
        format!("Study/Get{}/{}", self.endpoint_name(), study_id)
    }

    pub fn save_path(&self) -> String {
        format!("Study/Save{}", self.endpoint_name())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .find(|section| section.key() == s || section.endpoint_name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}

/// Response of `Study/Initiate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyInitialData {
    pub study_id: String,
    pub record_number: String,
    #[serde(rename = "sctR_RegistrationNumber")]
    pub registration_number: String,
    #[serde(rename = "sctR_RegistrationDate")]
    pub registration_date: String,
}

/// Row of the paginated studies list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudySummary {
    pub study_id: String,
    #[serde(rename = "sctR_RegistrationNumber")]
    pub registration_number: String,
    pub prospective: String,
    pub scientific_title: String,
    pub registrant_name: String,
    pub study_type: String,
    pub reviewer_name: String,
    pub last_modification: String,
    pub status: String,
    pub director: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_paths() {
        assert_eq!(Section::StudyBrief.get_path("abc"), "Study/GetStudyBrief/abc");
        assert_eq!(Section::SharingStatement.save_path(), "Study/SaveIPD");
        assert_eq!(Section::Cro.save_path(), "Study/SaveCro");
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("sponsors".parse::<Section>().unwrap(), Section::Sponsors);
        assert_eq!("IPD".parse::<Section>().unwrap(), Section::SharingStatement);
        assert!("nope".parse::<Section>().is_err());
    }

    #[test]
    fn test_initial_data_wire_names() {
        let data: StudyInitialData = serde_json::from_value(json!({
            "studyId": "S-1",
            "recordNumber": "R-9",
            "sctR_RegistrationNumber": "SCTR-22",
            "sctR_RegistrationDate": "2024-01-02T00:00:00"
        }))
        .unwrap();
        assert_eq!(data.study_id, "S-1");
        assert_eq!(data.registration_number, "SCTR-22");
    }
}
