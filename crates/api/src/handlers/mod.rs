//! Request handlers, one module per resource.
//!
//! Handlers validate input with `fait_core` rules, delegate persistence to
//! the `fait_db` repositories, publish domain events on the bus, and map
//! errors via [`AppError`](crate::error::AppError).

pub mod availability;
pub mod badges;
pub mod bookings;
pub mod events;
pub mod governance;
pub mod mastery;
pub mod messages;
pub mod points;
pub mod profiles;
pub mod reviews;
pub mod rewards;
pub mod service_packages;
pub mod verification;
pub mod warranty_claims;
