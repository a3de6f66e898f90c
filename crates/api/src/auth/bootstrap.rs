//! Startup creation of the first admin account.

use anyhow::Context;
use galeria_core::newsletter::normalize_email;
use galeria_core::roles::ROLE_ADMIN;
use galeria_db::models::user::CreateUser;
use galeria_db::repositories::UserRepo;
use galeria_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};

const ADMIN_NAME: &str = "Administrador";

/// Credentials read from `ADMIN_EMAIL` / `ADMIN_PASSWORD`.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl AdminSeed {
    /// `None` unless both variables are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty())?;
        let password = std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty())?;
        Some(Self { email, password })
    }
}

/// Create the admin account unless a user with that e-mail already exists.
///
/// Returns `true` when an account was created. An existing user is left
/// untouched, whatever its role.
pub async fn ensure_admin(pool: &DbPool, seed: &AdminSeed) -> anyhow::Result<bool> {
    let email = normalize_email(&seed.email);
    if UserRepo::find_by_email(pool, &email)
        .await
        .context("looking up admin account")?
        .is_some()
    {
        return Ok(false);
    }

    validate_password_strength(&seed.password, MIN_PASSWORD_LENGTH)
        .map_err(anyhow::Error::msg)
        .context("ADMIN_PASSWORD is too weak")?;
    let password_hash = hash_password(&seed.password)
        .map_err(|e| anyhow::anyhow!("hashing admin password: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            password_hash,
            name: ADMIN_NAME.to_string(),
            phone: None,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await
    .context("creating admin account")?;

    tracing::info!(user_id = user.id, email = %user.email, "Admin account created");
    Ok(true)
}
