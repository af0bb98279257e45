use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;

use crate::auth::{self, AuthError};
use crate::database::entity::Entity;
use crate::database::manager::DatabaseError;
use crate::database::store::Store;
use crate::filter::{Filter, SqlValue};
use crate::types::Role;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("That password is invalid, it must be {MIN_PASSWORD_LENGTH} or more characters")]
    TooShort,

    #[error(transparent)]
    Hashing(#[from] AuthError),
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

impl User {
    /// New account with a hashed password. The email is stored lowercased.
    pub fn new(email: &str, username: &str, password: &str, role: Role) -> Result<Self, PasswordError> {
        let mut user = Self {
            id: None,
            username: username.to_string(),
            email: email.to_lowercase(),
            password_hash: String::new(),
            role,
        };
        user.set_password(password)?;
        Ok(user)
    }

    pub fn validate_password(password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LENGTH
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), PasswordError> {
        if !Self::validate_password(password) {
            return Err(PasswordError::TooShort);
        }
        self.password_hash = auth::hash_password(password)?;
        Ok(())
    }

    pub fn check_password(&self, password: &str) -> bool {
        auth::verify_password(password, &self.password_hash)
    }

    pub fn is(&self, other: &User) -> bool {
        self.id.is_some() && self.id == other.id
    }

    pub async fn get_by_username(
        store: &dyn Store<User>,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        store.find_one(Filter::new().eq_ignore_case("username", username)).await
    }

    pub async fn get_by_email(store: &dyn Store<User>, email: &str) -> Result<Option<User>, DatabaseError> {
        store.find_one(Filter::new().eq_ignore_case("email", email)).await
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn columns(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("username", SqlValue::Text(self.username.clone())),
            ("email", SqlValue::Text(self.email.clone())),
            ("password_hash", SqlValue::Text(self.password_hash.clone())),
            ("role", SqlValue::Text(self.role.as_str().to_string())),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(
            User::new("a@b.com", "alice", "short", Role::User),
            Err(PasswordError::TooShort)
        ));
        assert!(User::validate_password("eightchr"));
    }

    #[test]
    fn password_round_trip_and_lowercased_email() {
        let user = User::new("Alice@Example.COM", "Alice", "correct horse", Role::User).unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(user.check_password("correct horse"));
        assert!(!user.check_password("wrong horse"));
    }

    #[test]
    fn hash_is_never_serialized() {
        let user = User::new("a@b.com", "alice", "correct horse", Role::Editor).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], "Editor");
    }

    #[tokio::test]
    async fn lookups_ignore_case() {
        let store = MemoryStore::<User>::new();
        store.save(User::new("a@b.com", "Alice", "correct horse", Role::User).unwrap()).await.unwrap();
        assert!(User::get_by_username(&store, "alice").await.unwrap().is_some());
        assert!(User::get_by_email(&store, "A@B.COM").await.unwrap().is_some());
        assert!(User::get_by_username(&store, "bob").await.unwrap().is_none());
    }
}
