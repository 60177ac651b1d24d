use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::classifier::Pipeline;
use crate::core::config::{AdminConfig, Config};
use crate::core::state::AppState;
use crate::models::user::Role;
use crate::security::session::SessionManager;
use crate::stores::{database, user_store::UserStore};
use crate::utils::auth::hash_password;

/// Open the database, seed the admin account, load the category model and
/// assemble the shared state. Any failure aborts startup.
pub async fn build_state(config: Config) -> Result<AppState> {
    let pool = database::connect(&config.database)
        .await
        .context(format!(
            "Failed to open database at '{}'",
            config.database.path.display()
        ))?;

    let classifier = Pipeline::load(&config.classifier.model_path)
        .context("Failed to load category model")?;

    let sessions = SessionManager::from_config(&config.session)?;

    let state = AppState::new(config, pool, Arc::new(classifier), sessions);

    seed_admin(&state.users, &state.config.admin).await?;

    Ok(state)
}

/// Create the default admin account unless an account with that name exists.
/// Returns whether an account was created.
pub async fn seed_admin(users: &UserStore, admin: &AdminConfig) -> Result<bool> {
    if users
        .find_by_username(&admin.username)
        .await
        .context("Failed to look up admin account")?
        .is_some()
    {
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password).context("Failed to hash admin password")?;

    users
        .create(&admin.username, &password_hash, Role::Admin)
        .await
        .context("Failed to create admin account")?;

    info!(username = %admin.username, "Default admin account created");

    Ok(true)
}
