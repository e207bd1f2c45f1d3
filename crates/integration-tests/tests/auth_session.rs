//! Integration tests for the auth session store.
//!
//! The loopback discard port (127.0.0.1:9) gives a fast connection
//! refusal, standing in for an unreachable backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use vitrine_client::app::VitrineApp;
use vitrine_client::config::ClientConfig;
use vitrine_client::models::{StoreSummary, User};
use vitrine_client::storage::{KeyValueStore, MemoryStore, RedbStore};
use vitrine_core::{StoreId, UserId};

fn unreachable_app(storage: Arc<dyn KeyValueStore>) -> VitrineApp {
    let config = ClientConfig::with_base_url("http://127.0.0.1:9").unwrap();
    VitrineApp::new(config, storage)
}

fn merchant() -> User {
    User {
        id: UserId::new("u1"),
        name: "Maria Souza".to_owned(),
        email: "maria@example.com".to_owned(),
        tax_id: "52998224725".to_owned(),
        store: Some(StoreSummary {
            id: StoreId::new("st1"),
            name: "Loja da Maria".to_owned(),
            subdomain: "loja-da-maria".to_owned(),
        }),
    }
}

#[tokio::test]
async fn logout_clears_local_state_even_when_remote_rejects() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let app = unreachable_app(Arc::clone(&storage));

    app.session()
        .login("tok".to_owned(), Some("ref".to_owned()), merchant())
        .await;
    assert!(app.session().is_authenticated().await);

    // The remote call fails (connection refused); cleanup must proceed
    app.session().logout(app.auth()).await;

    assert!(!app.session().is_authenticated().await);
    assert!(storage.get("token").await.unwrap().is_none());
    assert!(storage.get("refreshToken").await.unwrap().is_none());
    assert!(storage.get("user").await.unwrap().is_none());
}

#[tokio::test]
async fn session_survives_restart_on_redb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vitrine.redb");

    {
        let storage: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&path).unwrap());
        let app = unreachable_app(storage);
        app.session().login("tok".to_owned(), None, merchant()).await;
    }

    let storage: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&path).unwrap());
    let app = unreachable_app(storage);

    assert!(!app.session().is_authenticated().await);
    assert!(app.session().restore().await);

    let user = app.session().current_user().await.unwrap();
    assert_eq!(user.email, "maria@example.com");
    assert_eq!(user.store.unwrap().subdomain, "loja-da-maria");
}

#[tokio::test]
async fn corrupt_user_record_purges_session_keys() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set("token", "tok").await.unwrap();
    storage.set("user", "corrupted{").await.unwrap();

    let app = unreachable_app(Arc::clone(&storage));
    assert!(!app.session().restore().await);
    assert!(!app.session().is_authenticated().await);
    assert!(storage.get("token").await.unwrap().is_none());
    assert!(storage.get("user").await.unwrap().is_none());
}

#[tokio::test]
async fn token_without_user_is_not_a_session() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set("token", "tok").await.unwrap();

    let app = unreachable_app(Arc::clone(&storage));
    assert!(!app.session().restore().await);
    assert!(!app.session().is_authenticated().await);
}

#[tokio::test]
async fn remembered_email_outlives_logout() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let app = unreachable_app(Arc::clone(&storage));

    app.session().login("tok".to_owned(), None, merchant()).await;
    app.session().remember_email("maria@example.com").await;

    app.session().logout(app.auth()).await;

    // Logout clears the session but not the remember-me preference
    assert_eq!(
        app.session().remembered_email().await.as_deref(),
        Some("maria@example.com")
    );
}
