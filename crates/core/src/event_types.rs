//! Dot-separated names of the domain events published on the bus.
//!
//! Kept in `core` so the API, the persistence task and the realtime relay
//! agree on the strings.

pub const PROFILE_CREATED: &str = "profile.created";

pub const BOOKING_CREATED: &str = "booking.created";
pub const BOOKING_STATUS_CHANGED: &str = "booking.status_changed";

pub const MESSAGE_CREATED: &str = "message.created";

pub const REVIEW_CREATED: &str = "review.created";

pub const WARRANTY_CLAIM_CREATED: &str = "warranty_claim.created";
pub const WARRANTY_CLAIM_STATUS_CHANGED: &str = "warranty_claim.status_changed";

pub const VERIFICATION_SUBMITTED: &str = "verification.submitted";
pub const VERIFICATION_DECIDED: &str = "verification.decided";
pub const BACKGROUND_CHECK_STARTED: &str = "verification.background_check_started";

pub const POINTS_AWARDED: &str = "points.awarded";
pub const BADGE_AWARDED: &str = "badge.awarded";
pub const REWARD_REDEEMED: &str = "reward.redeemed";

pub const PROPOSAL_CREATED: &str = "governance.proposal_created";
pub const PROPOSAL_CLOSED: &str = "governance.proposal_closed";
pub const VOTE_CAST: &str = "governance.vote_cast";

/// Payload key listing the profile ids a realtime frame should reach.
pub const PAYLOAD_NOTIFY_USER_IDS: &str = "notify_user_ids";
/// Payload key holding the record pushed to realtime subscribers.
pub const PAYLOAD_RECORD: &str = "record";
