//! Contractor verification: background check states and admin decisions.

use crate::error::CoreError;

pub const CHECK_NOT_STARTED: &str = "not_started";
pub const CHECK_PENDING: &str = "pending";
pub const CHECK_PASSED: &str = "passed";
pub const CHECK_FAILED: &str = "failed";

pub const VALID_CHECK_STATUSES: &[&str] =
    &[CHECK_NOT_STARTED, CHECK_PENDING, CHECK_PASSED, CHECK_FAILED];

/// Admin decision on a verification record.
pub const DECISION_APPROVE: &str = "approve";
pub const DECISION_REJECT: &str = "reject";

/// Background check transitions. A failed check may be retried.
///
/// - `not_started` -> `pending`
/// - `pending`     -> `passed`, `failed`
/// - `failed`      -> `pending`
pub fn valid_check_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        CHECK_NOT_STARTED => &[CHECK_PENDING],
        CHECK_PENDING => &[CHECK_PASSED, CHECK_FAILED],
        CHECK_FAILED => &[CHECK_PENDING],
        _ => &[],
    }
}

pub fn validate_check_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_check_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "background check",
            from: current.to_string(),
            to: next.to_string(),
        })
    }
}

pub fn validate_check_status(status: &str) -> Result<(), CoreError> {
    if VALID_CHECK_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid background check status '{status}'. Must be one of: {}",
            VALID_CHECK_STATUSES.join(", ")
        )))
    }
}

/// Outcome of an admin review, ready to be written to the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDecision {
    pub is_verified: bool,
    pub rejection_reason: Option<String>,
}

/// Validate an admin decision. Rejections must carry a reason.
pub fn decide(decision: &str, reason: Option<&str>) -> Result<AdminDecision, CoreError> {
    match decision {
        DECISION_APPROVE => Ok(AdminDecision {
            is_verified: true,
            rejection_reason: None,
        }),
        DECISION_REJECT => {
            let reason = reason.map(str::trim).filter(|r| !r.is_empty()).ok_or_else(|| {
                CoreError::Validation("A rejection reason is required".into())
            })?;
            Ok(AdminDecision {
                is_verified: false,
                rejection_reason: Some(reason.to_string()),
            })
        }
        other => Err(CoreError::Validation(format!(
            "Invalid decision '{other}'. Must be 'approve' or 'reject'"
        ))),
    }
}
