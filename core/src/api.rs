//! Checklist endpoints on top of `HttpClient`.
//!
//! Each function maps one logical operation to one HTTP call:
//!
//! | operation | request                                   |
//! |-----------|-------------------------------------------|
//! | list      | `GET /checklists[?status=Pass]`           |
//! | get       | `GET /checklists/{id}`                    |
//! | create    | `POST /checklists` with a `CheckListBase` |

use std::collections::BTreeMap;
use std::future::Future;

use crate::client::HttpClient;
use crate::error::FetchError;
use crate::http::RequestOptions;
use crate::transport::Transport;
use crate::types::{CheckList, CheckListBase, Status};

const CHECKLISTS: &str = "/checklists";

/// Equality filters for the list endpoint, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, status: Status) -> Self {
        self.with("status", status.as_str())
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// `?key=value&...`, or an empty string when there are no filters.
    pub fn query_string(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish();
        format!("?{query}")
    }
}

pub fn list_endpoint(filters: &Filters) -> String {
    format!("{CHECKLISTS}{}", filters.query_string())
}

pub fn item_endpoint(id: u64) -> String {
    format!("{CHECKLISTS}/{id}")
}

/// The three checklist operations the store depends on.
pub trait CheckListSource: Send + Sync {
    fn list(&self, filters: &Filters)
        -> impl Future<Output = Result<Vec<CheckList>, FetchError>> + Send;

    fn get(&self, id: u64) -> impl Future<Output = Result<CheckList, FetchError>> + Send;

    fn create(
        &self,
        checklist: &CheckListBase,
    ) -> impl Future<Output = Result<CheckList, FetchError>> + Send;
}

/// `CheckListSource` backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct CheckListApi<T> {
    http: HttpClient<T>,
    options: RequestOptions,
}

impl<T: Transport> CheckListApi<T> {
    pub fn new(http: HttpClient<T>) -> Self {
        Self {
            http,
            options: RequestOptions::default(),
        }
    }

    /// Options applied to every request, e.g. extra headers.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

impl<T: Transport> CheckListSource for CheckListApi<T> {
    async fn list(&self, filters: &Filters) -> Result<Vec<CheckList>, FetchError> {
        self.http
            .fetch_json(&list_endpoint(filters), &self.options)
            .await
    }

    async fn get(&self, id: u64) -> Result<CheckList, FetchError> {
        self.http.fetch_json(&item_endpoint(id), &self.options).await
    }

    async fn create(&self, checklist: &CheckListBase) -> Result<CheckList, FetchError> {
        self.http
            .post_json(CHECKLISTS, checklist, &self.options)
            .await
    }
}
