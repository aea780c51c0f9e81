// End-to-end authorization ladder: token -> identity -> roles -> permissions

mod common;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use common::{setup_test_app, TEST_SECRET};
use stockroom_backend::auth::{Permission, RoleKind};
use stockroom_backend::errors::ApiError;
use stockroom_backend::types::internal::auth::Claims;

fn unauthorized_body(err: &ApiError) -> (String, String) {
    match err {
        ApiError::Unauthorized(json) => (json.0.error.clone(), json.0.message.clone()),
        other => panic!("Expected Unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_system_admin_passes_checks_across_resource_types() {
    let app = setup_test_app().await;
    let (_, token) = app
        .seed_user_with_role("admin", "password123", RoleKind::SystemAdmin)
        .await;

    let current = app
        .gate
        .authorize(
            Some(&token),
            &[Permission::UserCreate, Permission::ItemDelete],
        )
        .await
        .expect("admin should pass a mixed user/item check");

    assert_eq!(current.username, "admin");
    assert_eq!(current.roles, vec![RoleKind::SystemAdmin]);
}

#[tokio::test]
async fn test_operator_is_forbidden_from_user_management_but_not_items() {
    let app = setup_test_app().await;
    let (_, token) = app
        .seed_user_with_role("operator", "password123", RoleKind::LocationOperator)
        .await;

    // Same token, same user: the outcome depends only on the required set
    let denied = app
        .gate
        .authorize(Some(&token), &[Permission::UserCreate])
        .await;
    match denied {
        Err(ApiError::Forbidden(json)) => assert_eq!(json.0.message, "Permission denied."),
        other => panic!("Expected Forbidden, got {:?}", other),
    }

    app.gate
        .authorize(
            Some(&token),
            &[Permission::ItemCreate, Permission::ItemUpdate],
        )
        .await
        .expect("operator should keep full item access");
}

#[tokio::test]
async fn test_expired_and_tampered_tokens_are_indistinguishable() {
    let app = setup_test_app().await;
    app.seed_user_with_role("admin", "password123", RoleKind::SystemAdmin)
        .await;

    let now = Utc::now().timestamp();

    // Correct secret, expired beyond leeway
    let expired = encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: "admin".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    // Valid shape and expiry, wrong secret
    let tampered = encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: "admin".to_string(),
            exp: now + 3600,
            iat: now,
        },
        &EncodingKey::from_secret(b"some-other-secret-32-characters-xx"),
    )
    .unwrap();

    let expired_err = app
        .gate
        .authorize(Some(&expired), &[Permission::ItemRead])
        .await
        .unwrap_err();
    let tampered_err = app
        .gate
        .authorize(Some(&tampered), &[Permission::ItemRead])
        .await
        .unwrap_err();

    assert_eq!(unauthorized_body(&expired_err), unauthorized_body(&tampered_err));
}

#[tokio::test]
async fn test_token_for_a_deleted_user_stops_working() {
    let app = setup_test_app().await;
    let (user_id, token) = app
        .seed_user_with_role("shortlived", "password123", RoleKind::SystemAdmin)
        .await;

    // The token is valid while the account exists
    app.gate
        .authorize(Some(&token), &[Permission::ItemRead])
        .await
        .expect("token should work before deletion");

    app.user_store
        .delete(user_id)
        .await
        .expect("Failed to delete user");

    // Afterwards it is rejected like any bad credential, with the same body
    let deleted_err = app
        .gate
        .authorize(Some(&token), &[Permission::ItemRead])
        .await
        .unwrap_err();
    let garbage_err = app
        .gate
        .authorize(Some("garbage"), &[Permission::ItemRead])
        .await
        .unwrap_err();

    assert_eq!(unauthorized_body(&deleted_err), unauthorized_body(&garbage_err));
}

#[tokio::test]
async fn test_missing_token_has_its_own_message() {
    let app = setup_test_app().await;

    let err = app
        .gate
        .authorize(None, &[Permission::ItemRead])
        .await
        .unwrap_err();

    let (_, message) = unauthorized_body(&err);
    assert_eq!(message, "Not authenticated");
}

#[tokio::test]
async fn test_authenticated_user_without_roles_passes_vacuous_checks_only() {
    let app = setup_test_app().await;
    app.user_store
        .create("roleless", "password123", None, &[])
        .await
        .expect("Failed to create user");
    let token = app.token_service.issue("roleless").unwrap();

    app.gate
        .authorize(Some(&token), &[])
        .await
        .expect("empty requirement admits any authenticated user");

    let denied = app
        .gate
        .authorize(Some(&token), &[Permission::ItemRead])
        .await;
    assert!(matches!(denied, Err(ApiError::Forbidden(_))));
}
