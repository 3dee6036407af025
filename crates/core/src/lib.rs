//! Domain types, constants and pure business rules for the FAIT marketplace.
//!
//! This crate has no internal dependencies so it can be shared by the
//! database, events and API layers alike.

pub mod availability;
pub mod badge;
pub mod booking;
pub mod error;
pub mod event_types;
pub mod governance;
pub mod mastery;
pub mod messaging;
pub mod points;
pub mod profile;
pub mod review;
pub mod reward;
pub mod roles;
pub mod search;
pub mod service_package;
pub mod types;
pub mod verification;
pub mod warranty;
