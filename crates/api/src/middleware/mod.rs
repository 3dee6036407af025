//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireContractor`] -- requires the `contractor` role.
//! - [`rbac::RequireClient`] -- requires the `client` role.

pub mod auth;
pub mod rbac;
