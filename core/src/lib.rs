//! Data layer for the building-inspection checklist app.
//!
//! # Overview
//! A JSON HTTP client that classifies failures into a typed error model, the
//! three checklist endpoints built on it, and an observable store that views
//! drive and render from.
//!
//! # Design
//! - `FetchClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_json` consumes an `HttpResponse`. `HttpClient` runs the two
//!   around a `Transport`, the only place that performs I/O.
//! - `CheckListStore` depends on `CheckListSource`, implemented by
//!   `CheckListApi` and by scripted sources in tests.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;

pub use api::{CheckListApi, CheckListSource, Filters};
pub use client::{FetchClient, HttpClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{FetchError, FieldErrors, GENERIC_ERROR_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use store::{CheckListStore, StoreError, StoreState};
pub use transport::{Transport, UreqTransport};
pub use types::{CheckList, CheckListBase, Status};
