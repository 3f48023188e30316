//! Tabula API Library
//!
//! HTTP handlers, bearer authentication and application setup for the CSV
//! ingestion service.

mod api_doc;
mod handlers;
mod telemetry;

pub mod auth;
pub mod constants;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
