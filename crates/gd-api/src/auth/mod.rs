//! Authentication for the API.
//!
//! Every `/api/*` resource except login and the status banner requires a
//! bearer access token issued by `POST /api/login`.

pub mod extractors;

pub use extractors::{bearer_token, AuthenticatedUser};
