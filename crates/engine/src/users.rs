//! Users table and credential helpers.
//!
//! Every other entity is scoped by `user_id`. The engine never creates
//! users; they are provisioned by the admin CLI, and the only path that
//! removes one is the explicit account-deletion flow.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::entity::prelude::*;

use api_types::backup;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub api_token: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for backup::BackupUser {
    fn from(value: &Model) -> Self {
        Self {
            id: value.id,
            username: value.username.clone(),
            email: value.email.clone(),
            created_at: Some(value.created_at),
            updated_at: Some(value.updated_at),
        }
    }
}

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| EngineError::PasswordHash(err.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash.
///
/// A mismatch is `InvalidPassword`; an unparsable stored hash is a
/// `PasswordHash` error (the row is damaged, not the caller's input).
pub fn verify_password(password: &str, stored_hash: &str) -> ResultEngine<()> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| EngineError::PasswordHash(err.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| EngineError::InvalidPassword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_roundtrip() {
        let hash = hash_password("segretissima").unwrap();
        assert!(verify_password("segretissima", &hash).is_ok());
        assert!(matches!(
            verify_password("sbagliata", &hash),
            Err(EngineError::InvalidPassword)
        ));
    }

    #[test]
    fn damaged_hash_is_not_a_password_mismatch() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(EngineError::PasswordHash(_))
        ));
    }
}
