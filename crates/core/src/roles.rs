//! Well-known role names and the permission set derived from each role.
//!
//! Role strings must match the `chk_profiles_role` CHECK constraint in
//! `20260301000002_create_profiles.sql`.

use serde::Serialize;

use crate::error::CoreError;

pub const ROLE_CLIENT: &str = "client";
/// Provider side of the marketplace (a.k.a. service agent).
pub const ROLE_CONTRACTOR: &str = "contractor";
pub const ROLE_ADMIN: &str = "admin";
/// Partner organisations with access to partner resources.
pub const ROLE_ALLY: &str = "ally";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_CLIENT, ROLE_CONTRACTOR, ROLE_ADMIN, ROLE_ALLY];

/// Validate that a role string is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Feature flags a role grants. Points-based gates (voting thresholds,
/// proposal creation) are checked separately against the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Permissions {
    pub can_book_services: bool,
    pub can_manage_packages: bool,
    pub can_manage_availability: bool,
    pub can_resolve_warranty_claims: bool,
    pub can_verify_contractors: bool,
    pub can_manage_users: bool,
    pub can_create_proposals: bool,
    pub can_vote: bool,
    pub can_view_partner_resources: bool,
}

impl Permissions {
    /// Permission set for a role. Unknown roles get no permissions.
    pub fn for_role(role: &str) -> Self {
        match role {
            ROLE_CLIENT => Self {
                can_book_services: true,
                can_create_proposals: true,
                can_vote: true,
                ..Self::default()
            },
            ROLE_CONTRACTOR => Self {
                can_manage_packages: true,
                can_manage_availability: true,
                can_resolve_warranty_claims: true,
                can_create_proposals: true,
                can_vote: true,
                ..Self::default()
            },
            ROLE_ALLY => Self {
                can_vote: true,
                can_view_partner_resources: true,
                ..Self::default()
            },
            ROLE_ADMIN => Self {
                can_book_services: false,
                can_manage_packages: false,
                can_manage_availability: false,
                can_resolve_warranty_claims: true,
                can_verify_contractors: true,
                can_manage_users: true,
                can_create_proposals: true,
                can_vote: true,
                can_view_partner_resources: true,
            },
            _ => Self::default(),
        }
    }
}
