// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One entry of a lookup list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lookup {
    pub id: i64,
    pub label: String,
}

/// Paginated lookup endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Country,
    Region,
    City,
    OrganizationType,
    Organization,
}

impl LookupKind {
    pub fn path(&self) -> &'static str {
        match self {
            LookupKind::Country => "Lookup/country",
            LookupKind::Region => "Lookup/Region",
            LookupKind::City => "Lookup/City",
            LookupKind::OrganizationType => "Lookup/OrganizationType",
            LookupKind::Organization => "Lookup/Organization",
        }
    }

    /// Lists filtered by a parent selection (`parentId`)
    pub fn requires_parent(&self) -> bool {
        matches!(self, LookupKind::Region | LookupKind::City)
    }

    /// Message of the empty page served while a dependent list has no parent
    pub fn missing_parent_message(&self) -> &'static str {
        match self {
            LookupKind::City => "No region selected",
            LookupKind::Region => "No country selected",
            _ => "No parent selected",
        }
    }
}

impl FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "country" | "countries" => Ok(LookupKind::Country),
            "region" | "regions" => Ok(LookupKind::Region),
            "city" | "cities" => Ok(LookupKind::City),
            "organization-type" | "organizationtype" => Ok(LookupKind::OrganizationType),
            "organization" | "organizations" => Ok(LookupKind::Organization),
            other => Err(format!("Unknown lookup kind: {}", other)),
        }
    }
}
