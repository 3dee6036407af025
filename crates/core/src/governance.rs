//! Governance proposals: categories, statuses, eligibility gates, and the
//! vote tally reducer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PASSED: &str = "passed";
pub const STATUS_FAILED: &str = "failed";

pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_ACTIVE, STATUS_PASSED, STATUS_FAILED];

pub const VALID_CATEGORIES: &[&str] = &["policy", "feature", "community", "other"];

/// Balance needed to open a new proposal.
pub const MIN_POINTS_TO_PROPOSE: i64 = 500;

/// Default voting threshold when a proposal does not set one.
pub const DEFAULT_MIN_POINTS_TO_VOTE: i32 = 100;

/// Default voting window.
pub const DEFAULT_DURATION_DAYS: i64 = 7;

pub const MAX_DURATION_DAYS: i64 = 90;

pub const MAX_TITLE_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

/// A single member's position on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    For,
    Against,
}

impl VoteChoice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::For => "for",
            Self::Against => "against",
        }
    }

    /// Parse the stored string form.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "for" => Ok(Self::For),
            "against" => Ok(Self::Against),
            other => Err(CoreError::Validation(format!(
                "Invalid vote '{other}'. Must be 'for' or 'against'"
            ))),
        }
    }
}

/// Running for/against counters of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VoteTally {
    pub votes_for: i32,
    pub votes_against: i32,
}

impl VoteTally {
    pub fn new(votes_for: i32, votes_against: i32) -> Self {
        Self {
            votes_for,
            votes_against,
        }
    }

    fn bump(&mut self, choice: VoteChoice, delta: i32) {
        let side = match choice {
            VoteChoice::For => &mut self.votes_for,
            VoteChoice::Against => &mut self.votes_against,
        };
        *side = side.saturating_add(delta).max(0);
    }
}

/// Apply a (possibly changed) vote to the tally.
///
/// A fresh vote adds one to its side; switching moves one unit from the old
/// side to the new one; repeating the same vote leaves the tally unchanged.
pub fn apply_vote(tally: VoteTally, previous: Option<VoteChoice>, new: VoteChoice) -> VoteTally {
    let mut next = tally;
    match previous {
        Some(old) if old == new => {}
        Some(old) => {
            next.bump(old, -1);
            next.bump(new, 1);
        }
        None => next.bump(new, 1),
    }
    next
}

/// Outcome of a closed proposal: strictly more votes for than against passes.
pub fn decide_outcome(tally: VoteTally) -> &'static str {
    if tally.votes_for > tally.votes_against {
        STATUS_PASSED
    } else {
        STATUS_FAILED
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid proposal status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid proposal category '{category}'. Must be one of: {}",
            VALID_CATEGORIES.join(", ")
        )))
    }
}

pub fn validate_duration_days(days: i64) -> Result<(), CoreError> {
    if (1..=MAX_DURATION_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Proposal duration must be between 1 and {MAX_DURATION_DAYS} days (got {days})"
        )))
    }
}

/// Gate for opening a proposal.
pub fn check_can_propose(balance: i64) -> Result<(), CoreError> {
    if balance < MIN_POINTS_TO_PROPOSE {
        return Err(CoreError::InsufficientPoints {
            required: MIN_POINTS_TO_PROPOSE,
            balance,
        });
    }
    Ok(())
}

/// Gate for voting on a specific proposal.
pub fn check_can_vote(balance: i64, min_points_required: i32) -> Result<(), CoreError> {
    let required = i64::from(min_points_required);
    if balance < required {
        return Err(CoreError::InsufficientPoints { required, balance });
    }
    Ok(())
}

/// A proposal accepts votes while active and before its end time.
pub fn check_open_for_voting(
    status: &str,
    ends_at: crate::types::Timestamp,
    now: crate::types::Timestamp,
) -> Result<(), CoreError> {
    if status != STATUS_ACTIVE {
        return Err(CoreError::Conflict(format!(
            "Proposal is '{status}' and no longer accepts votes"
        )));
    }
    if now >= ends_at {
        return Err(CoreError::Conflict("Voting period has ended".into()));
    }
    Ok(())
}
