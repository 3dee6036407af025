//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create/update DTOs, with `validator` field limits where
//!   the request shape alone can be checked

pub mod availability;
pub mod badge;
pub mod booking;
pub mod event;
pub mod governance;
pub mod mastery;
pub mod message;
pub mod points;
pub mod profile;
pub mod review;
pub mod reward;
pub mod service_package;
pub mod verification;
pub mod warranty_claim;
