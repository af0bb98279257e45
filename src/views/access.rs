use serde::Serialize;

use crate::database::models::User;
use crate::types::Role;

/// Who may reach a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Access {
    pub authenticated: bool,
    pub minimum_role: Option<Role>,
}

impl Access {
    pub const PUBLIC: Access = Access { authenticated: false, minimum_role: None };

    pub const SIGNED_IN: Access = Access { authenticated: true, minimum_role: None };

    pub const fn role(minimum: Role) -> Access {
        Access { authenticated: true, minimum_role: Some(minimum) }
    }

    /// Requiring a role implies requiring a user.
    pub fn is_allowed(&self, user: Option<&User>) -> bool {
        let user = match user {
            Some(user) => user,
            None => return !self.authenticated && self.minimum_role.is_none(),
        };

        match self.minimum_role {
            Some(required) => user.role >= required,
            None => true,
        }
    }
}

impl Default for Access {
    fn default() -> Self {
        Access::PUBLIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: Some(1),
            username: "someone".into(),
            email: "someone@example.com".into(),
            password_hash: String::new(),
            role,
        }
    }

    #[test]
    fn public_admits_everyone() {
        assert!(Access::PUBLIC.is_allowed(None));
        assert!(Access::PUBLIC.is_allowed(Some(&user(Role::User))));
    }

    #[test]
    fn signed_in_requires_a_user() {
        assert!(!Access::SIGNED_IN.is_allowed(None));
        assert!(Access::SIGNED_IN.is_allowed(Some(&user(Role::User))));
    }

    #[test]
    fn minimum_role_admits_equal_and_higher() {
        let access = Access::role(Role::Editor);
        assert!(!access.is_allowed(None));
        assert!(!access.is_allowed(Some(&user(Role::User))));
        assert!(access.is_allowed(Some(&user(Role::Editor))));
        assert!(access.is_allowed(Some(&user(Role::Admin))));
    }

    #[test]
    fn minimum_role_without_authenticated_flag_still_requires_a_user() {
        let access = Access { authenticated: false, minimum_role: Some(Role::User) };
        assert!(!access.is_allowed(None));
        assert!(access.is_allowed(Some(&user(Role::User))));
    }

    #[test]
    fn every_role_pair_follows_rank() {
        let roles = [Role::User, Role::Editor, Role::Admin];
        for required in roles {
            for held in roles {
                assert_eq!(Access::role(required).is_allowed(Some(&user(held))), held >= required);
            }
        }
    }
}
