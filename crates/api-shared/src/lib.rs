//! # API Shared
//!
//! Definitions shared by the Health Gateway HTTP surface.
//!
//! Contains:
//! - Bearer token validation (`auth`)
//! - The health check service (`health`)
//! - Request bodies and problem details documented for OpenAPI (`dto`)

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{AuthError, AuthenticatedUser, TokenValidator};
pub use health::{HealthRes, HealthService};
