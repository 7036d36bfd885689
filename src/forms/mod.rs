// SPDX-License-Identifier: MIT

//! Per-section form state
//!
//! Each form is a plain serde struct whose wire names match the backend.
//! Fields are edited by name through [`apply_change`], which keeps
//! dependent selections consistent (cascades and branch resets) before the
//! form is validated and saved.

pub mod brief;
pub mod cascade;
pub mod collaborations;
pub mod cro;
pub mod eligibility;
pub mod ethical;
pub mod funders;
pub mod plain_summary;
pub mod registration;
pub mod sharing;
pub mod site_info;
pub mod sponsors;
pub mod study_info;
pub mod validation;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::models::Section;
use crate::error::{NavigationError, PortalError, Result};
use cascade::Cascade;
use validation::ValidationErrors;

pub use brief::StudyBriefForm;
pub use collaborations::CollaborationsForm;
pub use cro::CroForm;
pub use eligibility::EligibilityForm;
pub use ethical::EthicalApprovalForm;
pub use funders::FundersForm;
pub use plain_summary::PlainSummaryForm;
pub use sharing::SharingStatementForm;
pub use site_info::SiteInformationForm;
pub use sponsors::SponsorsForm;
pub use study_info::StudyInformationForm;

/// Name, phone and email block used by several sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
}

/// Editable form state
pub trait Form: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    fn validate(&self) -> std::result::Result<(), ValidationErrors>;

    /// Parent/child selection chains of this form
    fn cascades() -> &'static [Cascade] {
        &[]
    }

    /// Hook run after `field` changed value
    fn on_change(&mut self, _field: &str) {}
}

/// Form persisted through `Study/Get{Section}` and `Study/Save{Section}`
pub trait SectionForm: Form {
    const SECTION: Section;

    /// Body fields, without `studyId` and `isDraft`
    fn payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Local file to upload after a successful final save
    fn pending_upload(&self) -> Option<&str> {
        None
    }

    /// Fix-ups applied to freshly loaded server data
    fn after_load(&mut self) {}
}

/// Set one field by wire name; dotted paths reach nested values
/// (`publicContact.email`, `ethicsCommettees.0.name`).
///
/// Returns `false` when the value did not change. A change resets every
/// field downstream of it in the form's cascades, then runs `on_change`.
pub fn apply_change<F: Form>(form: &mut F, field: &str, value: Value) -> Result<bool> {
    let mut doc = serde_json::to_value(&*form)?;
    let pointer = to_pointer(field);

    let slot = doc
        .pointer_mut(&pointer)
        .ok_or_else(|| NavigationError::UnknownField(field.to_string()))?;
    if *slot == value {
        return Ok(false);
    }
    *slot = value;

    let dependents: Vec<&str> = F::cascades()
        .iter()
        .flat_map(|c| c.dependents_of(field).iter().copied())
        .collect();
    if !dependents.is_empty() {
        let defaults = serde_json::to_value(F::default())?;
        for dep in dependents {
            if let (Some(target), Some(default)) = (doc.get_mut(dep), defaults.get(dep)) {
                *target = default.clone();
            }
        }
    }

    let updated: F = serde_json::from_value(doc).map_err(|e| {
        log::debug!("Rejected value for {}: {}", field, e);
        let mut errors = ValidationErrors::new();
        errors.add(field, "Invalid value");
        PortalError::Validation(errors)
    })?;
    *form = updated;
    form.on_change(field);
    Ok(true)
}

fn to_pointer(field: &str) -> String {
    field
        .split('.')
        .map(|segment| format!("/{}", segment.replace('~', "~0").replace('/', "~1")))
        .collect()
}

/// Build a form from a section's `data`, treating `null` as unset
pub fn form_from_draft<F: Form>(data: Value) -> Result<F> {
    match strip_nulls(data) {
        obj @ Value::Object(_) => Ok(serde_json::from_value(obj)?),
        _ => Ok(F::default()),
    }
}

/// Section form from a `Study/Get{Section}` response
pub fn section_from_draft<F: SectionForm>(data: Value) -> Result<F> {
    let mut form: F = form_from_draft(data)?;
    form.after_load();
    Ok(form)
}

/// Section body with `studyId` and `isDraft` added
pub fn section_payload<F: SectionForm>(form: &F, study_id: &str, is_draft: bool) -> Result<Value> {
    let mut payload = form.payload()?;
    if let Value::Object(map) = &mut payload {
        map.insert("studyId".to_string(), Value::String(study_id.to_string()));
        map.insert("isDraft".to_string(), Value::Bool(is_draft));
    }
    Ok(payload)
}

/// Drop `null` object members at every depth
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// Dates on the wire: `YYYY-MM-DDT00:00:00`, read back from either a plain
/// date or a full timestamp.
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn format(date: NaiveDate) -> String {
        date.format("%Y-%m-%dT00:00:00").to_string()
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
    }

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&format(*d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Probe {
        name: String,
        region: Option<i64>,
        city: Option<i64>,
        contact: ContactInfo,
        #[serde(with = "wire_date")]
        start: Option<NaiveDate>,
    }

    static PROBE_CASCADES: [Cascade; 1] = [Cascade::new(&["region", "city"])];

    impl Form for Probe {
        fn validate(&self) -> std::result::Result<(), ValidationErrors> {
            Ok(())
        }

        fn cascades() -> &'static [Cascade] {
            &PROBE_CASCADES
        }
    }

    #[test]
    fn test_apply_change_sets_nested_field() {
        let mut probe = Probe::default();
        let changed = apply_change(&mut probe, "contact.email", json!("a@b.co")).unwrap();
        assert!(changed);
        assert_eq!(probe.contact.email, "a@b.co");
    }

    #[test]
    fn test_apply_change_unknown_field() {
        let mut probe = Probe::default();
        let err = apply_change(&mut probe, "nope", json!(1)).unwrap_err();
        assert!(matches!(
            err,
            PortalError::Navigation(NavigationError::UnknownField(ref f)) if f == "nope"
        ));
    }

    #[test]
    fn test_apply_change_resets_dependents() {
        let mut probe = Probe::default();
        apply_change(&mut probe, "region", json!(1)).unwrap();
        apply_change(&mut probe, "city", json!(5)).unwrap();
        apply_change(&mut probe, "region", json!(2)).unwrap();
        assert_eq!(probe.region, Some(2));
        assert_eq!(probe.city, None);
    }

    #[test]
    fn test_same_value_keeps_dependents() {
        let mut probe = Probe::default();
        apply_change(&mut probe, "region", json!(1)).unwrap();
        apply_change(&mut probe, "city", json!(5)).unwrap();
        let changed = apply_change(&mut probe, "region", json!(1)).unwrap();
        assert!(!changed);
        assert_eq!(probe.city, Some(5));
    }

    #[test]
    fn test_type_mismatch_is_field_error() {
        let mut probe = Probe::default();
        let err = apply_change(&mut probe, "region", json!("north")).unwrap_err();
        match err {
            PortalError::Validation(errors) => assert_eq!(errors.get("region"), Some("Invalid value")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(probe.region, None);
    }

    #[test]
    fn test_form_from_draft_treats_null_as_default() {
        let probe: Probe = form_from_draft(json!({
            "name": null,
            "region": 3,
            "contact": {"fullName": "Sara", "email": null},
            "start": "2024-03-01T00:00:00",
            "studyId": "S-1"
        }))
        .unwrap();
        assert_eq!(probe.name, "");
        assert_eq!(probe.region, Some(3));
        assert_eq!(probe.contact.full_name, "Sara");
        assert_eq!(probe.start, NaiveDate::from_ymd_opt(2024, 3, 1));

        let empty: Probe = form_from_draft(Value::Null).unwrap();
        assert_eq!(empty, Probe::default());
    }

    #[test]
    fn test_wire_date_format() {
        let d = NaiveDate::from_ymd_opt(2024, 7, 9).unwrap();
        assert_eq!(wire_date::format(d), "2024-07-09T00:00:00");
        assert_eq!(wire_date::parse("2024-07-09"), Some(d));
        assert_eq!(wire_date::parse("2024-07-09T13:45:00.000Z"), Some(d));
        assert_eq!(wire_date::parse("07/09/2024"), None);
    }
}
