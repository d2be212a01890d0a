//! UserHub client - session management and API access for the UserHub backend.
//!
//! This library is the non-UI core of a UserHub client application: it owns
//! the access/refresh token pair, decorates outgoing requests with the bearer
//! header, performs a single refresh-and-retry cycle when the backend answers
//! 401, and exposes decoded-identity helpers for the login and signup flows.
//!
//! The shell application owns the session lifecycle explicitly: it creates a
//! [`Session`] from [`Config::session_dir`], passes it to every [`ApiClient`]
//! call, and maps [`ApiError::AuthenticationRequired`] to its login screen.
//!
//! ```no_run
//! use userhub_client::{ApiClient, Config, Session};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let mut session = Session::new(config.session_dir()?);
//! session.load()?;
//!
//! let client = ApiClient::new(&config)?;
//! let me = client.fetch_me(&mut session).await?;
//! println!("signed in as {:?}", me.nickname);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod validate;

pub use api::{ApiClient, ApiError};
pub use auth::{decode_claims, extract_claim, Claims, ClaimsError, Session, SessionData};
pub use config::Config;
pub use models::{ProfileUpdate, User};
