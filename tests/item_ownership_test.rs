// Ownership scoping: permissions decide endpoint access, user id decides rows

mod common;

use common::setup_test_app;
use stockroom_backend::auth::{Permission, RoleKind};
use stockroom_backend::errors::StoreError;

#[tokio::test]
async fn test_operators_only_ever_see_their_own_items() {
    let app = setup_test_app().await;
    let (alice_id, alice_token) = app
        .seed_user_with_role("alice", "password123", RoleKind::LocationOperator)
        .await;
    let (bob_id, bob_token) = app
        .seed_user_with_role("bob", "password123", RoleKind::LocationOperator)
        .await;

    let crate_of_bolts = app
        .item_store
        .create(alice_id, "Crate of bolts", "Aisle 4")
        .await
        .expect("Failed to create item");

    // Both pass the permission check for reading items
    let alice = app
        .gate
        .authorize(Some(&alice_token), &[Permission::ItemRead])
        .await
        .expect("alice should pass");
    let bob = app
        .gate
        .authorize(Some(&bob_token), &[Permission::ItemRead])
        .await
        .expect("bob should pass");

    // The store resolves the same item id differently per caller
    assert!(app
        .item_store
        .find(alice.id, crate_of_bolts.id)
        .await
        .unwrap()
        .is_some());
    assert!(app
        .item_store
        .find(bob.id, crate_of_bolts.id)
        .await
        .unwrap()
        .is_none());
    assert!(app.item_store.list(bob_id, 0, 100).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_permissions_do_not_bypass_ownership() {
    let app = setup_test_app().await;
    let (operator_id, _) = app
        .seed_user_with_role("operator", "password123", RoleKind::LocationOperator)
        .await;
    let (_, admin_token) = app
        .seed_user_with_role("admin", "password123", RoleKind::SystemAdmin)
        .await;

    let crate_of_bolts = app
        .item_store
        .create(operator_id, "Crate of bolts", "Aisle 4")
        .await
        .expect("Failed to create item");

    // The admin clears every permission check
    let admin = app
        .gate
        .authorize(Some(&admin_token), &[Permission::ItemRead, Permission::ItemDelete])
        .await
        .expect("admin should pass");

    // But item queries are keyed by the caller's own id, so the
    // operator's crate is out of reach
    assert!(app
        .item_store
        .find(admin.id, crate_of_bolts.id)
        .await
        .unwrap()
        .is_none());
    match app.item_store.delete(admin.id, crate_of_bolts.id).await {
        Err(StoreError::ItemNotFound(id)) => assert_eq!(id, crate_of_bolts.id),
        other => panic!("Expected ItemNotFound, got {:?}", other),
    }

    // Still on the shelf for its owner
    let intact = app
        .item_store
        .find(operator_id, crate_of_bolts.id)
        .await
        .unwrap()
        .expect("item should survive");
    assert_eq!(intact.title, "Crate of bolts");
}

#[tokio::test]
async fn test_owner_can_update_and_delete_through_the_gate() {
    let app = setup_test_app().await;
    let (alice_id, alice_token) = app
        .seed_user_with_role("alice", "password123", RoleKind::LocationOperator)
        .await;

    let created = app
        .item_store
        .create(alice_id, "Crate of bolts", "Aisle 4")
        .await
        .expect("Failed to create item");

    let current = app
        .gate
        .authorize(
            Some(&alice_token),
            &[Permission::ItemUpdate, Permission::ItemDelete],
        )
        .await
        .expect("owner should pass");

    let updated = app
        .item_store
        .update(current.id, created.id, "Crate of nuts", "Aisle 5")
        .await
        .expect("Failed to update item");
    assert_eq!(updated.title, "Crate of nuts");

    app.item_store
        .delete(current.id, created.id)
        .await
        .expect("Failed to delete item");
    assert!(app
        .item_store
        .find(current.id, created.id)
        .await
        .unwrap()
        .is_none());
}
