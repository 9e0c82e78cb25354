use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use sehati_auth::error::AuthError;
use sehati_auth::flows::{
    change_password, ensure_admin, login, register, update_account, NewUser,
};
use sehati_auth::session::SessionKeys;
use sehati_core::models::user::Role;
use sehati_storage::error::StorageError;
use sehati_storage::memory::MemoryStore;
use sehati_storage::{Filter, Order, RecordStore};

fn keys() -> SessionKeys {
    SessionKeys::new(b"flows-secret", Duration::from_secs(300)).unwrap()
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        display_name: "Ibu Ani".to_string(),
        password: "kata-sandi".to_string(),
        role: Role::Respondent,
        health_unit_id: None,
    }
}

#[tokio::test]
async fn register_then_login() {
    let store = MemoryStore::new();
    let keys = keys();
    let user = register(&store, new_user("ani")).await.unwrap();
    assert_ne!(user.password_hash, "kata-sandi");

    let (logged_in, issued) = login(&store, &keys, "ani", "kata-sandi").await.unwrap();
    assert_eq!(logged_in.id, user.id);
    assert_eq!(keys.validate(&issued.token).unwrap().sub, user.id);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let store = MemoryStore::new();
    register(&store, new_user("ani")).await.unwrap();

    let wrong = login(&store, &keys(), "ani", "nope").await.unwrap_err();
    let unknown = login(&store, &keys(), "budi", "kata-sandi").await.unwrap_err();
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert!(matches!(unknown, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let store = MemoryStore::new();
    register(&store, new_user("ani")).await.unwrap();
    let err = register(&store, new_user("ani")).await.unwrap_err();
    assert!(matches!(err, AuthError::UsernameTaken(name) if name == "ani"));
}

#[tokio::test]
async fn changed_password_replaces_old_one() {
    let store = MemoryStore::new();
    let user = register(&store, new_user("ani")).await.unwrap();
    change_password(&store, user.id, "baru").await.unwrap();

    assert!(login(&store, &keys(), "ani", "kata-sandi").await.is_err());
    assert!(login(&store, &keys(), "ani", "baru").await.is_ok());
}

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let store = MemoryStore::new();
    let first = ensure_admin(&store, "admin", "pw").await.unwrap();
    let second = ensure_admin(&store, "admin", "other").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.role, Role::Admin);
    assert_eq!(store.len("users").await, 1);
    assert!(login(&store, &keys(), "admin", "pw").await.is_ok());
}

/// Memory store that counts update calls.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    updates: AtomicUsize,
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StorageError> {
        self.inner.insert(table, record).await
    }

    async fn select(
        &self,
        table: &str,
        filter: &Filter,
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StorageError> {
        self.inner.select(table, filter, order).await
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filter: &Filter,
    ) -> Result<Vec<Value>, StorageError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(table, patch, filter).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<usize, StorageError> {
        self.inner.delete(table, filter).await
    }
}

#[tokio::test]
async fn profile_and_password_change_in_one_write() {
    let store = CountingStore::default();
    let user = register(&store, new_user("ani")).await.unwrap();

    let mut changes = Map::new();
    changes.insert("display_name".to_string(), json!("Ani Lestari"));
    let updated = update_account(&store, user.id, changes, Some("baru"))
        .await
        .unwrap();

    assert_eq!(store.updates.load(Ordering::SeqCst), 1);
    assert_eq!(updated.display_name, "Ani Lestari");
    assert!(login(&store, &keys(), "ani", "baru").await.is_ok());
    assert!(login(&store, &keys(), "ani", "kata-sandi").await.is_err());
}

#[tokio::test]
async fn raw_password_hash_in_changes_is_ignored() {
    let store = MemoryStore::new();
    let user = register(&store, new_user("ani")).await.unwrap();

    let mut changes = Map::new();
    changes.insert("password_hash".to_string(), json!("forged"));
    let updated = update_account(&store, user.id, changes, None).await.unwrap();

    assert_eq!(updated.password_hash, user.password_hash);
    assert!(login(&store, &keys(), "ani", "kata-sandi").await.is_ok());
}
