mod middleware;
mod policy;
mod token;

pub use middleware::{authorize, Denied, Gate, DENIED_MESSAGE};
pub use policy::{
    Access, AuthorizationPolicy, Decision, DenyReason, PathPattern, PatternError, Rule,
};
pub use token::{Claims, TokenError, TokenVerifier, TOKEN_PREFIX};

use crate::models::UserRole;

/// An authenticated identity, taken from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    user_id: i64,
    role: UserRole,
}

impl Caller {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }
}
