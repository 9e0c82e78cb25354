use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use sehati_core::models::user::{Role, User};
use sehati_core::tables;
use sehati_storage::records::{find_record, insert_record, update_record};
use sehati_storage::{Filter, RecordStore};

use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::session::{IssuedToken, SessionKeys};

/// Fields needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
    pub health_unit_id: Option<Uuid>,
}

/// Check a username/password pair and sign a session for it.
///
/// Unknown users and wrong passwords produce the same error.
pub async fn login(
    store: &dyn RecordStore,
    keys: &SessionKeys,
    username: &str,
    password: &str,
) -> Result<(User, IssuedToken), AuthError> {
    let user: Option<User> =
        find_record(store, tables::USERS, &Filter::new().eq("username", username)).await?;

    let Some(user) = user else {
        info!(username, "login for unknown user");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        info!(username, "login with wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let issued = keys.issue(&user)?;
    info!(user_id = %user.id, role = %user.role, "session issued");
    Ok((user, issued))
}

/// Create an account with a hashed password. Usernames are unique.
pub async fn register(store: &dyn RecordStore, new: NewUser) -> Result<User, AuthError> {
    let existing: Option<User> = find_record(
        store,
        tables::USERS,
        &Filter::new().eq("username", new.username.as_str()),
    )
    .await?;
    if existing.is_some() {
        return Err(AuthError::UsernameTaken(new.username));
    }

    let now = jiff::Timestamp::now();
    let user = User {
        id: Uuid::new_v4(),
        username: new.username,
        display_name: new.display_name,
        role: new.role,
        password_hash: hash_password(&new.password)?,
        health_unit_id: new.health_unit_id,
        created_at: now,
        updated_at: now,
    };
    Ok(insert_record(store, tables::USERS, &user).await?)
}

/// Replace a user's password.
pub async fn change_password(
    store: &dyn RecordStore,
    user_id: Uuid,
    password: &str,
) -> Result<User, AuthError> {
    update_account(store, user_id, Map::new(), Some(password)).await
}

/// Apply profile `changes` and, when given, a new password to one user in
/// a single write.
pub async fn update_account(
    store: &dyn RecordStore,
    user_id: Uuid,
    mut changes: Map<String, Value>,
    password: Option<&str>,
) -> Result<User, AuthError> {
    changes.remove("password_hash");
    if let Some(password) = password {
        changes.insert(
            "password_hash".to_string(),
            Value::String(hash_password(password)?),
        );
    }
    changes.insert("updated_at".to_string(), json!(jiff::Timestamp::now()));
    Ok(update_record(store, tables::USERS, user_id, Value::Object(changes)).await?)
}

/// Make sure an admin named `username` exists, creating it if missing.
/// An existing account is left untouched, whatever its role.
pub async fn ensure_admin(
    store: &dyn RecordStore,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let existing: Option<User> =
        find_record(store, tables::USERS, &Filter::new().eq("username", username)).await?;
    if let Some(user) = existing {
        if user.role != Role::Admin {
            warn!(username, "bootstrap admin name belongs to a non-admin account");
        }
        return Ok(user);
    }

    info!(username, "creating bootstrap admin");
    register(
        store,
        NewUser {
            username: username.to_string(),
            display_name: username.to_string(),
            password: password.to_string(),
            role: Role::Admin,
            health_unit_id: None,
        },
    )
    .await
}
