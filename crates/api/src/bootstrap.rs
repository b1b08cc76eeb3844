//! First-start provisioning.

use anyhow::Context;
use storehub_core::roles::ROLE_ADMIN;
use storehub_db::models::user::CreateUser;
use storehub_db::repositories::UserRepo;
use storehub_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::AdminBootstrap;
use crate::handlers::auth::normalize_email;

/// Display name given to the bootstrapped admin.
const ADMIN_NAME: &str = "Administrator";

/// Create the configured admin account unless the email is already taken.
///
/// Returns `true` when a new account was inserted. An existing user with the
/// same email is left untouched, whatever its role.
pub async fn ensure_admin(pool: &DbPool, admin: Option<&AdminBootstrap>) -> anyhow::Result<bool> {
    let Some(admin) = admin else {
        return Ok(false);
    };

    validate_password_strength(&admin.password)
        .map_err(|msg| anyhow::anyhow!("ADMIN_PASSWORD is too weak: {msg}"))?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {e}"))?;

    let email = normalize_email(&admin.email);
    let created = UserRepo::create_if_absent(
        pool,
        &CreateUser {
            email: email.clone(),
            name: ADMIN_NAME.to_string(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await
    .context("Failed to create bootstrap admin")?;

    match created {
        Some(user) => {
            tracing::info!(user_id = user.id, email = %email, "Bootstrap admin created");
            Ok(true)
        }
        None => {
            tracing::debug!(email = %email, "Bootstrap admin already exists");
            Ok(false)
        }
    }
}
