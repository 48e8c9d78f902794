use super::{AuthError, Role};
use crate::common::UserId;

/// Entry point for role checks on an authenticated caller
///
/// Usage:
/// ```
/// use rescue_core::common::{Actor, Role, UserId};
///
/// let actor = Actor::new(UserId::new(), Role::Ngo);
/// assert!(actor.require(Role::Ngo).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    user_id: UserId,
    role: Role,
}

impl Actor {
    /// `role` comes from the verified token; it is not re-read from storage.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Fail with `InsufficientRole` unless the actor holds `role`.
    pub fn require(self, role: Role) -> Result<Self, AuthError> {
        if self.role != role {
            return Err(AuthError::InsufficientRole);
        }
        Ok(self)
    }
}
