use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const INVALID_REQUEST: &str = "The request could not be processed.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "Pass" => Some(Status::Pass),
            "Fail" => Some(Status::Fail),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckList {
    pub id: u64,
    pub building: String,
    pub status: Status,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Create payload as received; every field is checked by hand so problems
/// are reported per field instead of as one parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct NewCheckList {
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub inspector: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Error envelope: `{message, details?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                message: "Checklist not found".to_string(),
                details: None,
            },
        }
    }

    fn invalid(details: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: INVALID_REQUEST.to_string(),
                details: if details.is_empty() { None } else { Some(details) },
            },
        }
    }

    fn invalid_field(field: &str, message: &str) -> Self {
        Self::invalid(BTreeMap::from([(
            field.to_string(),
            vec![message.to_string()],
        )]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Default)]
pub struct Db {
    next_id: u64,
    checklists: Vec<CheckList>,
}

pub type SharedDb = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let db: SharedDb = Arc::new(RwLock::new(Db::default()));
    Router::new()
        .route("/checklists", get(list_checklists).post(create_checklist))
        .route("/checklists/{id}", get(get_checklist))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_checklists(
    State(db): State<SharedDb>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<CheckList>>, ApiError> {
    let status = match params.get("status") {
        None => None,
        Some(value) => Some(
            Status::parse(value)
                .ok_or_else(|| ApiError::invalid_field("status", "status must be Pass or Fail"))?,
        ),
    };
    let db = db.read().await;
    let checklists = db
        .checklists
        .iter()
        .filter(|c| status.map_or(true, |s| c.status == s))
        .cloned()
        .collect();
    Ok(Json(checklists))
}

async fn get_checklist(
    State(db): State<SharedDb>,
    Path(id): Path<String>,
) -> Result<Json<CheckList>, ApiError> {
    let id: u64 = id
        .parse()
        .map_err(|_| ApiError::invalid_field("id", "id must be an integer number"))?;
    let db = db.read().await;
    db.checklists
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

async fn create_checklist(
    State(db): State<SharedDb>,
    payload: Result<Json<NewCheckList>, JsonRejection>,
) -> Result<(StatusCode, Json<CheckList>), ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected create payload");
        ApiError::invalid(BTreeMap::new())
    })?;

    let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut problem = |field: &str, message: &str| {
        details
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    };

    let building = input.building.unwrap_or_default();
    if building.trim().is_empty() {
        problem("building", "building must not be empty");
    }
    let status = input.status.as_deref().and_then(Status::parse);
    if status.is_none() {
        problem("status", "status must be Pass or Fail");
    }
    let date = input
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
    if date.is_none() {
        problem("date", "date must be a valid YYYY-MM-DD date");
    }

    let (Some(status), Some(date), true) = (status, date, details.is_empty()) else {
        return Err(ApiError::invalid(details));
    };

    let mut db = db.write().await;
    db.next_id += 1;
    let checklist = CheckList {
        id: db.next_id,
        building,
        status,
        date,
        inspector: input.inspector.filter(|s| !s.is_empty()),
        notes: input.notes.filter(|s| !s.is_empty()),
    };
    db.checklists.push(checklist.clone());
    tracing::debug!(id = checklist.id, "created checklist");
    Ok((StatusCode::CREATED, Json(checklist)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checklist_serializes_to_json() {
        let checklist = CheckList {
            id: 1,
            building: "Building A".to_string(),
            status: Status::Pass,
            date: NaiveDate::from_ymd_opt(2023, 4, 8).unwrap(),
            inspector: None,
            notes: Some("All good".to_string()),
        };
        let json = serde_json::to_value(&checklist).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], "Pass");
        assert_eq!(json["date"], "2023-04-08");
        assert_eq!(json["notes"], "All good");
        assert!(json.get("inspector").is_none());
    }

    #[test]
    fn new_checklist_accepts_partial_payload() {
        let input: NewCheckList = serde_json::from_str(r#"{"building":"A"}"#).unwrap();
        assert_eq!(input.building.as_deref(), Some("A"));
        assert!(input.status.is_none());
        assert!(input.date.is_none());
    }

    #[test]
    fn error_body_omits_missing_details() {
        let json = serde_json::to_value(ApiError::not_found().body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Checklist not found" }));
    }

    #[test]
    fn invalid_without_details_has_no_details() {
        let err = ApiError::invalid(BTreeMap::new());
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.body.details.is_none());
    }
}
