//! Domain DTOs for the checklist API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! `CheckList` is a `CheckListBase` plus the server-assigned `id`. The base is
//! flattened on the wire so both shapes share one JSON object layout.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of a building inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "Pass",
            Status::Fail => "Fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pass" => Ok(Status::Pass),
            "Fail" => Ok(Status::Fail),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Request payload for creating a new checklist. Carries no `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckListBase {
    pub building: String,
    pub status: Status,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CheckListBase {
    pub fn new(building: impl Into<String>, status: Status, date: NaiveDate) -> Self {
        Self {
            building: building.into(),
            status,
            date,
            inspector: None,
            notes: None,
        }
    }

    pub fn with_inspector(mut self, inspector: impl Into<String>) -> Self {
        self.inspector = Some(inspector.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A checklist as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckList {
    pub id: u64,
    #[serde(flatten)]
    pub base: CheckListBase,
}

impl CheckList {
    pub fn new(id: u64, base: CheckListBase) -> Self {
        Self { id, base }
    }

    pub fn status(&self) -> Status {
        self.base.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 8).unwrap()
    }

    #[test]
    fn checklist_serializes_flat() {
        let checklist = CheckList::new(
            1,
            CheckListBase::new("Building A", Status::Pass, date())
                .with_inspector("John Doe")
                .with_notes("All good"),
        );
        let json = serde_json::to_value(&checklist).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "building": "Building A",
                "status": "Pass",
                "date": "2023-04-08",
                "inspector": "John Doe",
                "notes": "All good"
            })
        );
    }

    #[test]
    fn optional_fields_are_omitted() {
        let base = CheckListBase::new("Building B", Status::Fail, date());
        let json = serde_json::to_value(&base).unwrap();
        assert!(json.get("inspector").is_none());
        assert!(json.get("notes").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn checklist_deserializes_without_optional_fields() {
        let checklist: CheckList = serde_json::from_str(
            r#"{"id":7,"building":"C","status":"Fail","date":"2024-01-31"}"#,
        )
        .unwrap();
        assert_eq!(checklist.id, 7);
        assert_eq!(checklist.status(), Status::Fail);
        assert!(checklist.base.inspector.is_none());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<CheckListBase, _> =
            serde_json::from_str(r#"{"building":"C","status":"Maybe","date":"2024-01-31"}"#);
        assert!(result.is_err());
        assert!("Maybe".parse::<Status>().is_err());
        assert_eq!("Pass".parse::<Status>().unwrap(), Status::Pass);
    }
}
