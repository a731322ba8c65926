use serde::{Deserialize, Serialize};

use super::user::UserRole;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Seconds left before expiry, zero when already expired.
    pub fn remaining_secs(&self, now: usize) -> u64 {
        self.exp.saturating_sub(now) as u64
    }
}

/// Why a presented token was not accepted. Stored in request extensions by
/// the auth middleware so extractors can report the precise 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Invalid,
    Expired,
    Revoked,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: UserRole, exp: usize) -> Claims {
        Claims {
            sub: "id".into(),
            email: "a@b.test".into(),
            name: "A".into(),
            role,
            iat: 0,
            exp,
        }
    }

    #[test]
    fn remaining_secs_saturates_at_zero() {
        assert_eq!(claims(UserRole::User, 100).remaining_secs(40), 60);
        assert_eq!(claims(UserRole::User, 100).remaining_secs(400), 0);
    }

    #[test]
    fn only_admin_role_is_admin() {
        assert!(claims(UserRole::Admin, 1).is_admin());
        assert!(!claims(UserRole::User, 1).is_admin());
    }
}
