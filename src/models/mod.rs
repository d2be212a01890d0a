//! Data models for UserHub entities.
//!
//! This module contains the data structures exchanged with the
//! user-profile API:
//!
//! - `User`: a full user profile as returned by the backend
//! - `ProfileUpdate`: a partial profile payload for update/signup requests

pub mod user;

pub use user::{ProfileUpdate, User};
