//! Request context carrying the authenticated user and role.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use helpdesk_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Authentication happens upstream at the gateway; the extractor in the
/// API crate builds this from the forwarded identity headers and passes
/// it into service methods so every operation knows *who* is acting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role as asserted by the gateway.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
