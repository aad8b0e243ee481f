//! Admin accounts: sign-in, password change and the seeded admin.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, UserRepository};
use crate::validation::{FieldErrors, min_chars, required};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const INVALID_CREDENTIALS: &str = "The provided credentials do not match our records.";

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let mut errors = FieldErrors::new();
        required(&mut errors, "email", email);
        if !email.trim().is_empty() && !email.contains('@') {
            errors.add("email", "The email field must be a valid email address.");
        }
        required(&mut errors, "password", password);
        errors.into_result()?;

        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            return Err(DomainError::Unauthorized);
        };
        if !self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(internal)?
        {
            return Err(DomainError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current: &str,
        new: &str,
        confirmation: &str,
    ) -> Result<(), DomainError> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))?;

        let mut errors = FieldErrors::new();
        required(&mut errors, "current_password", current);
        if !errors.contains("current_password")
            && !self
                .passwords
                .verify(current, &user.password_hash)
                .map_err(internal)?
        {
            errors.add("current_password", "The password is incorrect.");
        }
        required(&mut errors, "password", new);
        min_chars(&mut errors, "password", new, MIN_PASSWORD_CHARS);
        if new != confirmation {
            errors.add("password", "The password field confirmation does not match.");
        }
        errors.into_result()?;

        user.password_hash = self.passwords.hash(new).map_err(internal)?;
        user.updated_at = Utc::now();
        self.users.update(user).await?;
        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Create the admin account unless a user with that email exists.
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            return Ok(existing);
        }
        let hash = self.passwords.hash(password).map_err(internal)?;
        let user = self
            .users
            .create(User::new(name.to_string(), email.to_string(), hash))
            .await?;
        tracing::info!(user_id = %user.id, "Admin account seeded");
        Ok(user)
    }
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}
