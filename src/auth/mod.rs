//! Authentication module for managing the token session lifecycle.
//!
//! This module provides:
//! - `Session`: the persisted access/refresh token pair with its lifecycle
//! - `Claims`: identity claims decoded from the access token payload
//!
//! Sessions are persisted to disk as a single document; claims are derived
//! from the access token on demand and never stored.

pub mod claims;
pub mod session;

pub use claims::{decode_claims, extract_claim, Claims, ClaimsError};
pub use session::{Session, SessionData};
