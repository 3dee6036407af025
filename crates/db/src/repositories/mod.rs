//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Steps shared between
//! transactions are crate-private `*_on` helpers over `&mut PgConnection`.

pub mod availability_repo;
pub mod badge_repo;
pub mod booking_repo;
pub mod event_repo;
pub mod governance_repo;
pub mod mastery_repo;
pub mod message_repo;
pub mod points_repo;
pub mod profile_repo;
pub mod review_repo;
pub mod reward_repo;
pub mod service_package_repo;
pub mod verification_repo;
pub mod warranty_claim_repo;

pub use availability_repo::{AvailabilityRepo, SlotWrite};
pub use badge_repo::BadgeRepo;
pub use booking_repo::BookingRepo;
pub use event_repo::EventRepo;
pub use governance_repo::{CastVoteResult, GovernanceRepo};
pub use mastery_repo::MasteryRepo;
pub use message_repo::MessageRepo;
pub use points_repo::{PointsRepo, SpendResult};
pub use profile_repo::ProfileRepo;
pub use review_repo::{ExternalReviewRepo, ReviewRepo};
pub use reward_repo::{RedeemResult, RewardRepo};
pub use service_package_repo::ServicePackageRepo;
pub use verification_repo::{RecordedDecision, VerificationRepo};
pub use warranty_claim_repo::WarrantyClaimRepo;
