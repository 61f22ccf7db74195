//! Capability bundles for the Conclave API.
//!
//! Capabilities are a pure function of [`Role`]; nothing here is persisted.
//! Downstream handlers ask the bundle instead of comparing roles directly.
//!
//! # Example
//!
//! ```ignore
//! use conclave_models::{Role, permissions_for};
//!
//! let permissions = permissions_for(Role::Board);
//! if permissions.can_process_votes {
//!     // tally the ballot
//! }
//! ```

use serde::Serialize;
use utoipa::ToSchema;

use crate::roles::Role;

// =============================================================================
// Capability names
// =============================================================================

/// Read budgets, sponsorship and funding figures
pub const ACCESS_FINANCIALS: &str = "financials:access";
/// Add or remove portal users
pub const MANAGE_USERS: &str = "users:manage";
/// Edit conference schedules, committees and meetings
pub const MANAGE_CONFERENCE: &str = "conference:manage";
/// Open, close and tally votes
pub const PROCESS_VOTES: &str = "votes:process";
/// Send email campaigns
pub const SEND_EMAILS: &str = "emails:send";
/// Use the generative-AI assistants
pub const USE_AI: &str = "ai:use";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    pub can_access_financials: bool,
    pub can_manage_users: bool,
    pub can_manage_conference: bool,
    pub can_process_votes: bool,
    pub can_send_emails: bool,
    #[serde(rename = "canUseAI")]
    pub can_use_ai: bool,
}

impl PermissionSet {
    pub const NONE: PermissionSet = PermissionSet {
        can_access_financials: false,
        can_manage_users: false,
        can_manage_conference: false,
        can_process_votes: false,
        can_send_emails: false,
        can_use_ai: false,
    };

    pub const ALL: PermissionSet = PermissionSet {
        can_access_financials: true,
        can_manage_users: true,
        can_manage_conference: true,
        can_process_votes: true,
        can_send_emails: true,
        can_use_ai: true,
    };

    /// Names of the capabilities this bundle grants.
    pub fn granted(&self) -> Vec<&'static str> {
        [
            (self.can_access_financials, ACCESS_FINANCIALS),
            (self.can_manage_users, MANAGE_USERS),
            (self.can_manage_conference, MANAGE_CONFERENCE),
            (self.can_process_votes, PROCESS_VOTES),
            (self.can_send_emails, SEND_EMAILS),
            (self.can_use_ai, USE_AI),
        ]
        .into_iter()
        .filter_map(|(granted, name)| granted.then_some(name))
        .collect()
    }
}

/// Fixed role to capability table.
pub const fn permissions_for(role: Role) -> PermissionSet {
    match role {
        Role::Admin => PermissionSet::ALL,
        Role::Board => PermissionSet {
            can_access_financials: true,
            can_manage_users: false,
            can_manage_conference: true,
            can_process_votes: true,
            can_send_emails: true,
            can_use_ai: true,
        },
        Role::Advisory => PermissionSet {
            can_access_financials: false,
            can_manage_users: false,
            can_manage_conference: false,
            can_process_votes: false,
            can_send_emails: false,
            can_use_ai: true,
        },
        Role::Viewer => PermissionSet::NONE,
    }
}
