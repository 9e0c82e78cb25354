use std::time::Duration;

use uuid::Uuid;

use sehati_auth::error::AuthError;
use sehati_auth::password::{hash_password, verify_password};
use sehati_auth::session::SessionKeys;
use sehati_core::models::user::{Role, User};

fn user(role: Role) -> User {
    let now = jiff::Timestamp::now();
    User {
        id: Uuid::new_v4(),
        username: "bidan.sari".to_string(),
        display_name: "Bidan Sari".to_string(),
        role,
        password_hash: String::new(),
        health_unit_id: Some(Uuid::new_v4()),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn issued_token_validates_to_same_claims() {
    let keys = SessionKeys::new(b"test-secret", Duration::from_secs(600)).unwrap();
    let admin = user(Role::Admin);

    let issued = keys.issue(&admin).unwrap();
    let claims = keys.validate(&issued.token).unwrap();

    assert_eq!(claims.sub, admin.id);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.health_unit_id, admin.health_unit_id);
    assert!(claims.is_admin());
    assert_eq!(claims.exp - claims.iat, 600);
    assert_eq!(issued.expires_at.as_second() as u64, claims.exp);
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let keys = SessionKeys::new(b"secret-a", Duration::from_secs(600)).unwrap();
    let other = SessionKeys::new(b"secret-b", Duration::from_secs(600)).unwrap();

    let issued = other.issue(&user(Role::Respondent)).unwrap();
    let err = keys.validate(&issued.token).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(_)));
}

#[test]
fn zero_ttl_token_is_expired() {
    let keys = SessionKeys::new(b"secret", Duration::ZERO).unwrap();
    let issued = keys.issue(&user(Role::Respondent)).unwrap();
    std::thread::sleep(Duration::from_millis(1100));

    let err = keys.validate(&issued.token).unwrap_err();
    assert!(matches!(err, AuthError::TokenExpired));
}

#[test]
fn garbage_token_is_rejected() {
    let keys = SessionKeys::new(b"secret", Duration::from_secs(60)).unwrap();
    assert!(keys.validate("not.a.token").is_err());
}

#[test]
fn empty_secret_is_refused() {
    assert!(matches!(
        SessionKeys::new(b"", Duration::from_secs(60)),
        Err(AuthError::EmptySecret)
    ));
}

#[test]
fn password_hash_round_trip() {
    let hash = hash_password("rahasia-123").unwrap();
    assert_ne!(hash, "rahasia-123");
    assert!(verify_password("rahasia-123", &hash).unwrap());
    assert!(!verify_password("salah", &hash).unwrap());
    assert!(verify_password("x", "not-a-phc-string").is_err());
}

#[test]
fn token_survives_rebuilding_keys_from_same_secret() {
    let respondent = user(Role::Respondent);
    let issued = SessionKeys::new(b"shared", Duration::from_secs(60))
        .unwrap()
        .issue(&respondent)
        .unwrap();

    let restarted = SessionKeys::new(b"shared", Duration::from_secs(60)).unwrap();
    let claims = restarted.validate(&issued.token).unwrap();
    assert_eq!(claims.sub, respondent.id);
    assert!(!claims.is_admin());
}
