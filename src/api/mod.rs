//! REST API client module for the UserHub backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! authentication and user-profile API.
//!
//! The API uses JWT bearer token authentication; expired access tokens are
//! exchanged once per request through the refresh endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
