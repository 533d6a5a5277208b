//! Role membership checks.
//!
//! Every scoped operation states the roles allowed to call it as an
//! explicit parameter, checked before any business logic runs. Ownership
//! and enrollment scoping are separate and live inside the queries
//! themselves.

use model::entities::user::{self, Role};

use crate::error::{QueryError, Result};

/// Rejects the caller unless their role is in `allowed`.
pub fn require_role(user: &user::Model, allowed: &[Role]) -> Result<()> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(QueryError::Forbidden(format!(
            "role '{}' may not perform this operation",
            user.role.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_role(role: Role) -> user::Model {
        user::Model {
            id: 1,
            name: "Grace Hopper".to_string(),
            email: "grace@example.edu".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role,
            department: None,
            phone: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn member_role_passes() {
        let user = user_with_role(Role::Coordinator);
        assert!(require_role(&user, &[Role::Coordinator, Role::Admin]).is_ok());
    }

    #[test]
    fn non_member_role_is_forbidden() {
        let user = user_with_role(Role::Student);
        let err = require_role(&user, &[Role::Teacher]).unwrap_err();
        assert!(matches!(err, QueryError::Forbidden(_)));
    }
}
