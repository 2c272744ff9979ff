//! # Gateway Core
//!
//! Business logic for the Health Gateway patient portal backend.
//!
//! The crate is layered:
//! - **delegates** talk to exactly one upstream system (Client Registry, PHSA, BC Mail Plus) or
//!   to the local JSON store
//! - **services** validate input, apply business rules and reshape delegate payloads
//! - every service call returns a [`RequestResult`] envelope
//!
//! **No API concerns**: authentication, HTTP routing and OpenAPI belong in `api-rest` and
//! `api-shared`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod delegates;
pub mod error;
pub mod models;
pub mod request_result;
pub mod services;
pub mod store;
pub mod xml;

pub use config::GatewayConfig;
pub use error::{DbError, DbResult, GatewayError, GatewayResult};
pub use request_result::{
    ActionType, ErrorCode, ErrorType, RequestResult, RequestResultError, ResultType, ServiceType,
};
